//! One page read.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::query::RequestDescriptor;
use crate::resource::Resource;

use super::list_state::Page;

/// Read one page of `R` and decode it.
///
/// Transport, status and decode failures come back as their own error
/// variants. The caller decides what to do with them.
pub async fn fetch_page<R: Resource>(
    gateway: &dyn Gateway,
    descriptor: &RequestDescriptor,
    offset: u64,
    limit: u64,
) -> Result<Page<R>> {
    let response = gateway
        .read_with_count(&descriptor.path())
        .await?
        .require_success()?;
    let records: Vec<R> = response.decode(R::TABLE)?;
    Ok(Page::new(records, response.total_count(), offset, limit))
}

/// Read every row matching `descriptor`, without pagination metadata.
pub async fn fetch_all<R: Resource>(
    gateway: &dyn Gateway,
    descriptor: &RequestDescriptor,
) -> Result<Vec<R>> {
    let response = gateway.read(&descriptor.path()).await?.require_success()?;
    response.decode(R::TABLE)
}
