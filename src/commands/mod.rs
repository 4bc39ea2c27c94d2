//! Command implementations.
//!
//! List commands open a [`Screen`], issue one refresh and wait for it to
//! settle. Write commands validate their input first, then dispatch a
//! [`Mutation`] on a screen focused on the affected rows, so the refresh that
//! follows a successful write is what gets printed.

mod categories;
mod config;
mod customers;
mod dashboard;
mod delivery;
mod orders;
mod payments;
mod products;

pub use categories::{cmd_categories_create, cmd_categories_ls, cmd_categories_update};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use customers::cmd_customers_ls;
pub use dashboard::cmd_dashboard;
pub use delivery::cmd_delivery_ls;
pub use orders::{
    cmd_orders_assign, cmd_orders_ls, cmd_orders_show, cmd_orders_status, cmd_orders_watch,
};
pub use payments::{cmd_payments_amount, cmd_payments_approve, cmd_payments_ls, cmd_payments_reject};
pub use products::{
    cmd_products_create, cmd_products_ls, cmd_products_price, cmd_products_rm,
    cmd_products_status, cmd_products_stock, cmd_products_update,
};

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tabled::Tabled;

use crate::config::Config;
use crate::display::render_table;
use crate::error::{PasteleriaError, Result};
use crate::gateway::{Gateway, PostgrestGateway};
use crate::query::FilterState;
use crate::resource::Resource;
use crate::screen::{Mutation, Notice, Screen};

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

/// Output of a command in both renderings. Text falls back to JSON.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        CommandOutput { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

const FOCUS_LIMIT: u64 = 50;

/// Options shared by the list commands.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub statuses: Vec<String>,
    /// Ignore the default status set.
    pub all: bool,
    pub category: Option<i64>,
    /// One-based page number.
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListOptions {
    pub(crate) fn filter(&self, default_limit: u64, default_statuses: &[&str]) -> FilterState {
        let statuses: Vec<String> = if self.all {
            Vec::new()
        } else if self.statuses.is_empty() {
            default_statuses.iter().map(|s| s.to_string()).collect()
        } else {
            self.statuses.clone()
        };
        FilterState::new(self.limit.unwrap_or(default_limit))
            .with_term(self.search.clone().unwrap_or_default())
            .with_statuses(statuses)
            .with_category(self.category)
            .with_page(self.page.unwrap_or(1).saturating_sub(1))
    }
}

pub(crate) fn page_size(config: &Config) -> u64 {
    u64::from(config.list.page_size)
}

pub(crate) fn connect(config: &Config) -> Result<Arc<dyn Gateway>> {
    Ok(Arc::new(PostgrestGateway::from_config(config)?))
}

/// Open a screen and load its first page.
pub(crate) async fn open<R: Resource>(
    gateway: Arc<dyn Gateway>,
    filter: FilterState,
) -> Result<Screen<R>> {
    let mut screen = Screen::new(gateway, filter);
    screen.refresh()?;
    let notices = screen.settle().await;
    if notices
        .iter()
        .any(|n| matches!(n, Notice::FetchFailed { .. }))
    {
        return Err(screen
            .take_error()
            .unwrap_or_else(|| PasteleriaError::Other(format!("failed to load {}", R::TABLE))));
    }
    Ok(screen)
}

/// A screen showing the rows whose term column equals `id`.
pub(crate) async fn focus<R: Resource>(gateway: Arc<dyn Gateway>, id: i64) -> Result<Screen<R>> {
    open(gateway, FilterState::new(FOCUS_LIMIT).with_term(id.to_string())).await
}

/// Dispatch a mutation and wait for it and the refresh it triggers.
///
/// Returns the confirmation label. A failed refresh after a successful write
/// is logged and does not fail the command.
pub(crate) async fn apply<R: Resource>(screen: &mut Screen<R>, mutation: Mutation) -> Result<String> {
    screen.mutate(mutation);
    let mut saved = None;
    for notice in screen.settle().await {
        match notice {
            Notice::Saved { label, .. } => saved = Some(label),
            Notice::MutationFailed { message, .. } => {
                return Err(screen
                    .take_error()
                    .unwrap_or(PasteleriaError::Other(message)));
            }
            Notice::FetchFailed { message, .. } => {
                tracing::warn!(%message, "refresh after write failed");
            }
            _ => {}
        }
    }
    saved.ok_or_else(|| PasteleriaError::Other("write did not complete".to_string()))
}

/// JSON and text rendering of the current page of a screen.
pub(crate) fn list_output<R, T>(screen: &Screen<R>, noun: &str) -> CommandOutput
where
    R: Resource,
    T: Tabled + for<'a> From<&'a R>,
{
    let state = screen.state();
    let visible = state.visible();
    let range = state.range();
    let filter = state.filter();

    let json = json!({
        "range": { "from": range.from, "to": range.to, "total": range.total },
        "total": state.total(),
        "offset": filter.offset(),
        "limit": filter.limit(),
        "has_next": state.has_next(),
        "has_previous": state.has_previous(),
        "rows": visible,
    });

    if visible.is_empty() {
        return CommandOutput::new(json).with_text(format!("No {noun} found").dimmed().to_string());
    }

    let rows: Vec<T> = visible.iter().map(|r| T::from(*r)).collect();
    let page = filter.offset() / filter.limit() + 1;
    let pages = state.total().div_ceil(filter.limit()).max(1);
    let text = format!(
        "{}\n{}",
        render_table(rows),
        format!("{range} · page {page} of {pages}").dimmed()
    );
    CommandOutput::new(json).with_text(text)
}

/// Confirmation line plus the affected rows.
pub(crate) fn write_output<R, T>(screen: &Screen<R>, action: &str, label: &str) -> CommandOutput
where
    R: Resource,
    T: Tabled + for<'a> From<&'a R>,
{
    let visible = screen.state().visible();
    let json = json!({
        "action": action,
        "message": label,
        "success": true,
        "rows": visible,
    });
    let mut text = format!("{} {}", "✓".green(), label);
    if !visible.is_empty() {
        let rows: Vec<T> = visible.iter().map(|r| T::from(*r)).collect();
        text.push('\n');
        text.push_str(&render_table(rows));
    }
    CommandOutput::new(json).with_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_default_statuses() {
        let options = ListOptions::default();
        let filter = options.filter(20, &["APROBADO", "SERVIDO"]);
        assert_eq!(filter.statuses().len(), 2);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_list_options_all_clears_statuses() {
        let options = ListOptions {
            all: true,
            statuses: vec!["SERVIDO".into()],
            ..Default::default()
        };
        assert!(options.filter(20, &["APROBADO"]).statuses().is_empty());
    }

    #[test]
    fn test_list_options_page_sets_offset() {
        let options = ListOptions {
            page: Some(3),
            limit: Some(10),
            search: Some("torta".into()),
            ..Default::default()
        };
        let filter = options.filter(20, &[]);
        assert_eq!(filter.offset(), 20);
        assert_eq!(filter.limit(), 10);
        assert_eq!(filter.term(), "torta");
    }
}
