//! Current page, filter and selection of one list screen.

use std::fmt;

use crate::query::{FilterState, SearchTerm, SortOrder};
use crate::resource::Resource;

/// One fetched batch of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    records: Vec<R>,
    total: u64,
    offset: u64,
    limit: u64,
}

impl<R> Page<R> {
    /// Build a page from a response.
    ///
    /// `reported_total` comes from the count header. A missing or too small
    /// total is raised to `offset + records.len()`, so the page never claims
    /// fewer rows than it holds.
    pub fn new(records: Vec<R>, reported_total: Option<u64>, offset: u64, limit: u64) -> Self {
        let floor = offset + records.len() as u64;
        Page {
            total: reported_total.unwrap_or(0).max(floor),
            records,
            offset,
            limit: limit.max(1),
        }
    }

    pub fn empty(limit: u64) -> Self {
        Page::new(Vec::new(), Some(0), 0, limit)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.limit < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.offset >= self.limit
    }
}

/// The "showing X-Y of N" numbers for the rows on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeLabel {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl fmt::Display for RangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {}-{} of {}", self.from, self.to, self.total)
    }
}

/// What happened to the selection when a page was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing was selected.
    None,
    /// The selected record is still on the page.
    Kept(i64),
    /// The selected record is gone and the selection was cleared.
    Cleared(i64),
}

/// Authoritative list state of one screen.
///
/// Fields are private: the filter changes through the setters below, the page
/// only through [`ListState::replace_page`], and selection only through
/// [`ListState::select`] and reconciliation.
#[derive(Debug, Clone)]
pub struct ListState<R> {
    filter: FilterState,
    page: Page<R>,
    selection: Option<i64>,
}

impl<R: Resource> ListState<R> {
    pub fn new(filter: FilterState) -> Self {
        let page = Page::empty(filter.limit());
        ListState {
            filter,
            page,
            selection: None,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> &Page<R> {
        &self.page
    }

    pub fn records(&self) -> &[R] {
        self.page.records()
    }

    pub fn total(&self) -> u64 {
        self.page.total()
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.filter.set_term(term);
    }

    pub fn set_category(&mut self, category: Option<i64>) {
        self.filter.set_category(category);
    }

    pub fn set_statuses<I, S>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.set_statuses(statuses);
    }

    pub fn toggle_status(&mut self, status: &str) {
        self.filter.toggle_status(status);
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.filter.set_sort(sort);
    }

    pub fn has_next(&self) -> bool {
        self.filter.offset() + self.filter.limit() < self.page.total()
    }

    pub fn has_previous(&self) -> bool {
        self.filter.offset() >= self.filter.limit()
    }

    /// Advance the filter one page. Returns `false` at the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        let offset = self.filter.offset() + self.filter.limit();
        self.filter.set_offset(offset);
        true
    }

    /// Go back one page. Returns `false` at the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        let offset = self.filter.offset() - self.filter.limit();
        self.filter.set_offset(offset);
        true
    }

    /// Jump to a zero-based page number.
    pub fn go_to_page(&mut self, page: u64) {
        let offset = page.saturating_mul(self.filter.limit());
        self.filter.set_offset(offset);
    }

    fn is_visible(&self, id: i64) -> bool {
        self.visible().iter().any(|r| r.id() == id)
    }

    /// Swap in a freshly fetched page and re-resolve the selection by id.
    ///
    /// A record hidden by the client-side text filter counts as gone.
    pub fn replace_page(&mut self, page: Page<R>) -> Reconciliation {
        self.page = page;
        match self.selection {
            None => Reconciliation::None,
            Some(id) if self.is_visible(id) => Reconciliation::Kept(id),
            Some(id) => {
                self.selection = None;
                Reconciliation::Cleared(id)
            }
        }
    }

    /// Select the record with `id`. Returns `false` if it is not shown.
    pub fn select(&mut self, id: i64) -> bool {
        if self.is_visible(id) {
            self.selection = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<i64> {
        self.selection
    }

    /// The selected record, which is also what a detail view shows.
    pub fn selected(&self) -> Option<&R> {
        let id = self.selection?;
        self.visible().into_iter().find(|r| r.id() == id)
    }

    /// Whether the text term is applied to the fetched page locally.
    pub fn is_locally_filtered(&self) -> bool {
        R::filters_text_locally(&self.filter)
    }

    /// Records to display, after any client-side text filter.
    pub fn visible(&self) -> Vec<&R> {
        match self.filter.search_term() {
            SearchTerm::Text(text) if self.is_locally_filtered() => {
                let needle = text.to_lowercase();
                self.page
                    .records()
                    .iter()
                    .filter(|r| r.matches_text(&needle))
                    .collect()
            }
            _ => self.page.records().iter().collect(),
        }
    }

    /// Range of the rows on screen.
    ///
    /// With a client-side filter the server total no longer describes what is
    /// shown, so the range counts only the rows that passed the filter.
    pub fn range(&self) -> RangeLabel {
        if self.is_locally_filtered() {
            let shown = self.visible().len() as u64;
            return RangeLabel {
                from: u64::from(shown > 0),
                to: shown,
                total: shown,
            };
        }

        let offset = self.page.offset();
        let total = self.page.total();
        let rows = self.page.len() as u64;
        RangeLabel {
            from: if total == 0 { 0 } else { offset + 1 },
            to: (offset + self.page.limit()).min(total.max(offset + rows)),
            total,
        }
    }
}
