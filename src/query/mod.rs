//! Query building for list screens.
//!
//! [`build`] turns a [`FilterState`] into a [`RequestDescriptor`]: the
//! resource path plus the ordered, already-encoded query parameters. It reads
//! nothing but its inputs, so equal filter states always produce equal
//! descriptors.

pub mod filter;
pub mod predicate;
pub mod sort;

pub use filter::{DEFAULT_LIMIT, FilterState, SearchTerm};
pub use predicate::Predicate;
pub use sort::{SortDirection, SortOrder};

use std::fmt;

use crate::resource::Resource;

/// Resource path and encoded query parameters for one gateway request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestDescriptor {
    table: String,
    params: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(table: &str) -> Self {
        RequestDescriptor {
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    /// Append a raw parameter. `value` must already be encoded.
    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    pub fn predicate(mut self, predicate: &Predicate) -> Self {
        self.params.push(predicate.to_param());
        self
    }

    /// Shorthand for the `id=eq.<id>` filter used by single-row writes.
    pub fn by_id(table: &str, id_column: &str, id: i64) -> Self {
        RequestDescriptor::new(table).predicate(&Predicate::eq(id_column, id))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Path relative to the REST base URL.
    pub fn path(&self) -> String {
        if self.params.is_empty() {
            return self.table.clone();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{}?{}", self.table, query.join("&"))
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Predicate for the text term, if it maps to a server-side filter.
///
/// Digits become an exact identifier match. Other text becomes a
/// case-insensitive match over the resource's text columns; resources without
/// any are filtered client-side instead, see [`Resource::matches_text`].
pub fn term_predicate<R: Resource>(filter: &FilterState) -> Option<Predicate> {
    match filter.search_term() {
        SearchTerm::Blank => None,
        SearchTerm::Identifier(id) => Some(Predicate::eq(R::TERM_ID_COLUMN, id)),
        SearchTerm::Text(text) if !R::TEXT_COLUMNS.is_empty() => {
            Some(Predicate::contains_any(R::TEXT_COLUMNS, text))
        }
        SearchTerm::Text(_) => None,
    }
}

/// Build the list request for `filter` against resource `R`.
///
/// An empty status set means no status restriction.
pub fn build<R: Resource>(filter: &FilterState) -> RequestDescriptor {
    let mut descriptor = RequestDescriptor::new(R::TABLE).param("select", R::select(filter));

    for (column, value) in R::FIXED_FILTERS {
        descriptor = descriptor.param(column, *value);
    }

    if let Some(predicate) = term_predicate::<R>(filter) {
        descriptor = descriptor.predicate(&predicate);
    }

    if let Some(column) = R::STATUS_COLUMN
        && !filter.statuses().is_empty()
    {
        descriptor = descriptor.predicate(&Predicate::one_of(
            column,
            filter.statuses().iter().cloned(),
        ));
    }

    if let (Some(column), Some(category)) = (R::CATEGORY_COLUMN, filter.category()) {
        descriptor = descriptor.predicate(&Predicate::eq(column, category));
    }

    let order = filter.sort().cloned().unwrap_or_else(R::default_order);
    descriptor
        .param("order", order.encode())
        .param("limit", filter.limit().to_string())
        .param("offset", filter.offset().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Category, Order, Payment, Product};

    #[test]
    fn test_path_without_params_is_table() {
        assert_eq!(RequestDescriptor::new("categorias").path(), "categorias");
        assert_eq!(
            RequestDescriptor::by_id("pedidos", "id_pedido", 7).path(),
            "pedidos?id_pedido=eq.7"
        );
    }

    #[test]
    fn test_blank_term_sends_no_text_filter() {
        let filter = FilterState::new(20).with_term("   ");
        let descriptor = build::<Product>(&filter);
        assert!(descriptor.get("or").is_none());
        assert!(descriptor.get("id_producto").is_none());
    }

    #[test]
    fn test_numeric_term_is_identifier_match() {
        let filter = FilterState::new(20).with_term("1024");
        let descriptor = build::<Order>(&filter);
        assert_eq!(descriptor.get("id_pedido"), Some("eq.1024"));
        assert!(descriptor.get("or").is_none());
    }

    #[test]
    fn test_text_term_is_or_of_ilike() {
        let filter = FilterState::new(20).with_term("torta");
        let descriptor = build::<Category>(&filter);
        assert_eq!(
            descriptor.get("or"),
            Some("(nombre.ilike.*torta*,descripcion.ilike.*torta*)")
        );
    }

    #[test]
    fn test_empty_status_set_returns_all() {
        let descriptor = build::<Order>(&FilterState::new(20));
        assert!(descriptor.get("estado").is_none());
    }

    #[test]
    fn test_payment_status_filters_through_inner_join() {
        let filtered = build::<Payment>(&FilterState::new(20).with_statuses(["EN_REVISION"]));
        assert_eq!(filtered.get("pedido.estado"), Some("in.(EN_REVISION)"));
        assert!(filtered.get("select").unwrap().contains("pedidos!inner("));

        let all = build::<Payment>(&FilterState::new(20));
        assert!(all.get("pedido.estado").is_none());
        assert!(!all.get("select").unwrap().contains("!inner"));
    }

    #[test]
    fn test_category_and_pagination_params() {
        let mut filter = FilterState::new(20).with_category(Some(4));
        filter.set_offset(40);
        let descriptor = build::<Product>(&filter);
        assert_eq!(descriptor.get("id_categoria"), Some("eq.4"));
        assert_eq!(descriptor.get("order"), Some("nombre.asc"));
        assert_eq!(descriptor.get("limit"), Some("20"));
        assert_eq!(descriptor.get("offset"), Some("40"));
    }

    #[test]
    fn test_sort_override_replaces_default_order() {
        let filter = FilterState::new(20).with_sort(Some(SortOrder::desc("precio")));
        assert_eq!(build::<Product>(&filter).get("order"), Some("precio.desc"));
    }
}
