//! User-chosen search, filter and pagination state of a list.

use std::collections::BTreeSet;

use super::sort::SortOrder;

pub const DEFAULT_LIMIT: u64 = 20;

/// How the free-text term is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm<'a> {
    /// Empty or whitespace only: no text filter at all.
    Blank,
    /// Digits only: exact match on the record identifier.
    Identifier(i64),
    /// Anything else: case-insensitive substring match.
    Text(&'a str),
}

impl<'a> SearchTerm<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let term = raw.trim();
        if term.is_empty() {
            return SearchTerm::Blank;
        }
        if term.bytes().all(|b| b.is_ascii_digit())
            && let Ok(id) = term.parse::<i64>()
        {
            return SearchTerm::Identifier(id);
        }
        SearchTerm::Text(term)
    }
}

/// Filter state of one list screen.
///
/// Every setter that changes what is being asked for sends the list back to
/// the first page, so a stale offset never outlives the filter it was valid
/// for. Statuses are kept ordered so equal states encode identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    term: String,
    category: Option<i64>,
    statuses: BTreeSet<String>,
    offset: u64,
    limit: u64,
    sort: Option<SortOrder>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState::new(DEFAULT_LIMIT)
    }
}

impl FilterState {
    pub fn new(limit: u64) -> Self {
        FilterState {
            term: String::new(),
            category: None,
            statuses: BTreeSet::new(),
            offset: 0,
            limit: limit.max(1),
            sort: None,
        }
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_statuses(statuses);
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.set_term(term);
        self
    }

    pub fn with_category(mut self, category: Option<i64>) -> Self {
        self.set_category(category);
        self
    }

    pub fn with_sort(mut self, sort: Option<SortOrder>) -> Self {
        self.set_sort(sort);
        self
    }

    /// Start at a zero-based page. Call after the other builders, which reset
    /// the offset.
    pub fn with_page(mut self, page: u64) -> Self {
        self.offset = page.saturating_mul(self.limit);
        self
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn search_term(&self) -> SearchTerm<'_> {
        SearchTerm::parse(&self.term)
    }

    pub fn category(&self) -> Option<i64> {
        self.category
    }

    pub fn statuses(&self) -> &BTreeSet<String> {
        &self.statuses
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn sort(&self) -> Option<&SortOrder> {
        self.sort.as_ref()
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
        self.offset = 0;
    }

    pub fn set_category(&mut self, category: Option<i64>) {
        self.category = category;
        self.offset = 0;
    }

    pub fn set_statuses<I, S>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = statuses
            .into_iter()
            .map(|s| s.into().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        self.offset = 0;
    }

    /// Add the status if absent, remove it otherwise. Blank input is ignored.
    pub fn toggle_status(&mut self, status: &str) {
        let status = status.trim().to_uppercase();
        if status.is_empty() {
            return;
        }
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
        self.offset = 0;
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.sort = sort;
        self.offset = 0;
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = limit.max(1);
        self.offset = 0;
    }

    /// Move to an explicit offset. Only paging should call this.
    pub(crate) fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }
}
