//! Typed records for each backend table.
//!
//! Each record type is decoded once, at the gateway boundary, and carries the
//! query profile of its table through the [`Resource`] trait: which columns
//! to select, how the free-text term and the status/category filters map to
//! columns, and the default ordering.

pub mod category;
pub mod customer;
pub mod delivery;
pub mod order;
pub mod payment;
pub mod product;

pub use category::Category;
pub use customer::Customer;
pub use delivery::{DeliveryAssignment, DeliveryPerson};
pub use order::{CustomerRef, Order, OrderLine, OrderStatusRow};
pub use payment::{OrderSummary, Payment};
pub use product::Product;

use std::borrow::Cow;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::query::{FilterState, SortOrder};

pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Table (or view) name.
    const TABLE: &'static str;
    /// Primary key column.
    const ID_COLUMN: &'static str;
    /// Default `select` list.
    const SELECT: &'static str;
    /// Column matched exactly when the term is all digits.
    const TERM_ID_COLUMN: &'static str = Self::ID_COLUMN;
    /// Columns searched case-insensitively for a text term. Empty means the
    /// term is applied client-side with [`Resource::matches_text`].
    const TEXT_COLUMNS: &'static [&'static str] = &[];
    /// Column restricted by the status filter.
    const STATUS_COLUMN: Option<&'static str> = None;
    /// Column restricted by the category filter.
    const CATEGORY_COLUMN: Option<&'static str> = None;
    /// Filters sent with every list request, already encoded.
    const FIXED_FILTERS: &'static [(&'static str, &'static str)] = &[];

    fn default_order() -> SortOrder;

    /// `select` list for a given filter. Most tables use [`Resource::SELECT`].
    fn select(_filter: &FilterState) -> Cow<'static, str> {
        Cow::Borrowed(Self::SELECT)
    }

    /// Stable identifier used for selection reconciliation.
    fn id(&self) -> i64;

    /// Client-side text match for tables the backend cannot search.
    ///
    /// `needle` is already lowercased.
    fn matches_text(&self, _needle: &str) -> bool {
        true
    }

    /// Whether the text term is applied after fetching instead of by the backend.
    fn filters_text_locally(filter: &FilterState) -> bool {
        Self::TEXT_COLUMNS.is_empty()
            && matches!(filter.search_term(), crate::query::SearchTerm::Text(_))
    }
}

/// Join optional name parts with a space, skipping blanks.
pub(crate) fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_blanks() {
        assert_eq!(full_name(Some("Ana"), Some("Quispe")), "Ana Quispe");
        assert_eq!(full_name(Some(" Ana "), None), "Ana");
        assert_eq!(full_name(Some(""), Some("")), "");
    }
}
