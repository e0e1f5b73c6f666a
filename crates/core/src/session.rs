//! Caller-side state transitions for an interactive search session
//!
//! The projector stays side-effect free; everything stateful lives here:
//! which result set is current, whether a search is in flight, and when the
//! page number snaps back to 1.
//!
//! Overlapping searches resolve latest-wins. Every [`SearchSession::begin_search`]
//! hands out a [`SearchTicket`] with a fresh generation, and only the ticket
//! with the newest generation may install its result.

use crate::display::{build_page_output, PageOutput, EMPTY_PAGE_MESSAGE};
use crate::projection::{clamp_page, project, Projection, SortKey, ViewParameters};
use crate::search::{SearchQuery, SearchResultSet};

/// Proof that a search was issued, carried to [`SearchSession::complete_search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: SearchQuery,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    results: SearchResultSet,
    params: ViewParameters,
    query: Option<SearchQuery>,
    loading: bool,
    issued: u64,
    /// Generation of the installed result set, 0 before the first search.
    applied: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &SearchResultSet {
        &self.results
    }

    pub fn params(&self) -> &ViewParameters {
        &self.params
    }

    /// Query that produced the current result set.
    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a search
    ///
    /// Blank terms are a no-op and return `None`: no request must be made
    /// and no state changes. Otherwise the session enters the loading state
    /// and any older in-flight ticket becomes stale.
    pub fn begin_search(&mut self, title: &str, author: &str) -> Option<SearchTicket> {
        let query = SearchQuery::from_terms(title, author)?;

        self.issued += 1;
        self.loading = true;

        Some(SearchTicket {
            generation: self.issued,
            query,
        })
    }

    /// Install the outcome of a search
    ///
    /// Returns `false` and leaves the session untouched when a newer search
    /// has been issued since `ticket`.
    pub fn complete_search(&mut self, ticket: SearchTicket, results: SearchResultSet) -> bool {
        if ticket.generation != self.issued {
            return false;
        }

        self.results = results;
        self.query = Some(ticket.query);
        self.applied = ticket.generation;
        self.loading = false;
        self.params.page_number = 1;
        true
    }

    pub fn set_min_year(&mut self, min_year: Option<i32>) {
        if self.params.min_year != min_year {
            self.params.min_year = min_year;
            self.params.page_number = 1;
        }
    }

    pub fn set_max_year(&mut self, max_year: Option<i32>) {
        if self.params.max_year != max_year {
            self.params.max_year = max_year;
            self.params.page_number = 1;
        }
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        if self.params.sort_key != sort_key {
            self.params.sort_key = sort_key;
            self.params.page_number = 1;
        }
    }

    /// Pages available under the current filters.
    pub fn page_count(&self) -> usize {
        self.projection().page_count
    }

    /// Jump to a page, clamped into the available range
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.params.page_number = clamp_page(page, self.page_count());
        self.params.page_number
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.params.page_number.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to_page(self.params.page_number.saturating_sub(1))
    }

    pub fn projection(&self) -> Projection<'_> {
        project(&self.results.records, &self.params)
    }

    /// Text to show instead of result cards, if any
    ///
    /// A search error wins over the generic empty-page hint.
    pub fn status_message(&self) -> Option<String> {
        if let Some(error) = &self.results.error {
            return Some(error.to_string());
        }

        let projection = self.projection();
        if projection.is_empty() {
            Some(EMPTY_PAGE_MESSAGE.to_string())
        } else {
            None
        }
    }

    /// Serializable view of the current page, including any search error
    pub fn page_output(&self) -> PageOutput {
        let mut output = build_page_output(&self.projection(), &self.params, self.query());
        output.error = self.results.error.clone();
        output.status = self.status_message();
        output.show_pagination = self.has_multiple_pages();
        output
    }

    /// Whether pagination controls should be shown.
    pub fn has_multiple_pages(&self) -> bool {
        self.page_count() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{BookRecord, SearchError};

    fn result_set(count: usize) -> SearchResultSet {
        SearchResultSet {
            records: (0..count)
                .map(|i| BookRecord {
                    title: Some(format!("Book {i}")),
                    first_publish_year: Some(1990 + i as i32),
                    ..BookRecord::default()
                })
                .collect(),
            error: None,
        }
    }

    fn loaded_session(count: usize) -> SearchSession {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("book", "").unwrap();
        assert!(session.complete_search(ticket, result_set(count)));
        session
    }

    #[test]
    fn test_blank_search_is_noop() {
        let mut session = loaded_session(3);
        let before = session.results().clone();

        assert!(session.begin_search("", "  ").is_none());
        assert!(!session.is_loading());
        assert_eq!(session.results(), &before);
        assert_eq!(session.query().unwrap().title, Some("book".to_string()));
    }

    #[test]
    fn test_begin_search_sets_loading() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("Dune", "").unwrap();

        assert!(session.is_loading());
        assert_eq!(ticket.generation, 1);
        assert_eq!(ticket.query.title, Some("Dune".to_string()));
    }

    #[test]
    fn test_complete_search_resets_page() {
        let mut session = loaded_session(25);
        session.go_to_page(3);
        assert_eq!(session.params().page_number, 3);

        let ticket = session.begin_search("other", "").unwrap();
        assert!(session.complete_search(ticket, result_set(25)));

        assert_eq!(session.params().page_number, 1);
        assert!(!session.is_loading());
        assert_eq!(session.query().unwrap().title, Some("other".to_string()));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = SearchSession::new();
        let first = session.begin_search("first", "").unwrap();
        let second = session.begin_search("second", "").unwrap();

        assert!(session.complete_search(second, result_set(2)));
        assert!(!session.complete_search(first, result_set(7)));

        assert_eq!(session.results().records.len(), 2);
        assert_eq!(session.query().unwrap().title, Some("second".to_string()));
    }

    #[test]
    fn test_stale_completion_keeps_loading_for_newer_search() {
        let mut session = SearchSession::new();
        let first = session.begin_search("first", "").unwrap();
        let _second = session.begin_search("second", "").unwrap();

        assert!(!session.complete_search(first, result_set(1)));
        assert!(session.is_loading());
    }

    #[test]
    fn test_failed_search_replaces_results() {
        let mut session = loaded_session(5);
        let ticket = session.begin_search("nothing", "").unwrap();
        session.complete_search(ticket, SearchResultSet::failed(SearchError::NoResults));

        assert!(session.results().is_empty());
        assert_eq!(session.status_message(), Some("No books found 😔".to_string()));
    }

    #[test]
    fn test_filter_and_sort_changes_reset_page() {
        let mut session = loaded_session(25);

        session.go_to_page(2);
        session.set_min_year(Some(1991));
        assert_eq!(session.params().page_number, 1);

        session.go_to_page(2);
        session.set_max_year(Some(2014));
        assert_eq!(session.params().page_number, 1);

        session.go_to_page(2);
        session.set_sort_key(SortKey::YearDescending);
        assert_eq!(session.params().page_number, 1);
    }

    #[test]
    fn test_unchanged_filter_keeps_page() {
        let mut session = loaded_session(25);
        session.set_sort_key(SortKey::TitleAlphabetical);
        session.go_to_page(2);

        session.set_sort_key(SortKey::TitleAlphabetical);
        session.set_min_year(None);

        assert_eq!(session.params().page_number, 2);
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut session = loaded_session(25);

        assert_eq!(session.prev_page(), 1);
        assert_eq!(session.next_page(), 2);
        assert_eq!(session.next_page(), 3);
        assert_eq!(session.next_page(), 3);
        assert_eq!(session.go_to_page(99), 3);
        assert_eq!(session.go_to_page(0), 1);
    }

    #[test]
    fn test_navigation_on_empty_session_stays_on_first_page() {
        let mut session = SearchSession::new();
        assert_eq!(session.next_page(), 1);
        assert_eq!(session.page_count(), 0);
    }

    #[test]
    fn test_status_message_for_empty_page() {
        let mut session = loaded_session(3);
        assert_eq!(session.status_message(), None);

        session.set_min_year(Some(3000));
        assert_eq!(session.status_message(), Some(EMPTY_PAGE_MESSAGE.to_string()));
    }

    #[test]
    fn test_page_output_carries_error() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("zzzz", "").unwrap();
        session.complete_search(ticket, SearchResultSet::failed(SearchError::NoResults));

        let output = session.page_output();

        assert!(output.books.is_empty());
        assert_eq!(output.error, Some(SearchError::NoResults));
        assert_eq!(output.status, Some("No books found 😔".to_string()));
        assert!(!output.show_pagination);
        assert_eq!(output.query.unwrap().title, Some("zzzz".to_string()));
    }

    #[test]
    fn test_page_output_navigation_matches_session_page() {
        let mut session = loaded_session(25);
        session.go_to_page(2);

        let output = session.page_output();

        assert_eq!(output.pagination.current_page, 2);
        assert_eq!(
            output.pagination.next_page_command,
            Some("bookfinder search --title book --page 3".to_string())
        );
    }

    #[test]
    fn test_has_multiple_pages() {
        assert!(!loaded_session(10).has_multiple_pages());
        assert!(loaded_session(11).has_multiple_pages());
    }

    #[test]
    fn test_page_output_follows_session_status_and_pagination() {
        let mut session = loaded_session(11);

        let output = session.page_output();
        assert_eq!(output.status, None);
        assert!(output.show_pagination);

        session.set_min_year(Some(3000));
        let output = session.page_output();
        assert_eq!(output.status, session.status_message());
        assert_eq!(output.status, Some(EMPTY_PAGE_MESSAGE.to_string()));
        assert!(!output.show_pagination);
    }

    #[test]
    fn test_projection_follows_params() {
        let mut session = loaded_session(25);
        session.set_sort_key(SortKey::YearDescending);
        let projection = session.projection();

        assert_eq!(projection.items[0].title, Some("Book 24".to_string()));
        assert_eq!(projection.page_count, 3);
    }
}
