//! Open Library search request construction and response normalization
//!
//! Pure half of the query executor: everything here is deterministic and
//! free of I/O. The binary crate performs the actual GET and feeds the
//! decoded body (or the failure) back through these functions.

use serde::{Deserialize, Serialize};

/// Default Open Library host.
pub const OPEN_LIBRARY_BASE: &str = "https://openlibrary.org";

/// Search endpoint path, appended to the API base.
pub const SEARCH_PATH: &str = "/search.json";

/// Maximum number of documents requested per search.
pub const RESULT_LIMIT: usize = 30;

/// User-facing message for a successful search without matches.
pub const NO_RESULTS_MESSAGE: &str = "No books found 😔";

/// Raw document from the `docs` array of a search response
///
/// Every field is optional; Open Library omits whatever it does not know.
/// Unknown fields are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SearchDoc {
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub first_publish_year: Option<i32>,
    pub cover_i: Option<u64>,
    pub key: Option<String>,
}

/// Search response envelope
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Option<Vec<SearchDoc>>,
}

/// One normalized search hit
///
/// Absent fields stay absent. Display defaults ("Untitled", "Unknown", ...)
/// are applied by [`crate::display`], never here.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct BookRecord {
    pub title: Option<String>,
    pub author_names: Option<Vec<String>>,
    pub first_publish_year: Option<i32>,
    pub cover_id: Option<u64>,
    pub key: Option<String>,
}

impl From<SearchDoc> for BookRecord {
    fn from(doc: SearchDoc) -> Self {
        BookRecord {
            title: doc.title,
            author_names: doc.author_name,
            first_publish_year: doc.first_publish_year,
            cover_id: doc.cover_i,
            key: doc.key,
        }
    }
}

/// Non-fatal search failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SearchError {
    /// Non-success status, network failure or undecodable body.
    #[error("{0}")]
    Transport(String),

    /// The API answered successfully but matched nothing.
    #[error("{}", NO_RESULTS_MESSAGE)]
    NoResults,
}

impl SearchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, SearchError::Transport(_))
    }
}

/// Complete, unfiltered outcome of the latest search
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct SearchResultSet {
    pub records: Vec<BookRecord>,
    pub error: Option<SearchError>,
}

impl SearchResultSet {
    pub fn failed(error: SearchError) -> Self {
        SearchResultSet {
            records: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Validated search terms
///
/// Only constructible with at least one non-empty term, which makes the
/// "nothing to search" case unrepresentable past [`SearchQuery::from_terms`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
}

fn non_empty(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl SearchQuery {
    /// Build a query from raw user input
    ///
    /// Returns `None` when both terms are blank; callers must not issue a
    /// request in that case.
    pub fn from_terms(title: &str, author: &str) -> Option<Self> {
        let title = non_empty(title);
        let author = non_empty(author);

        if title.is_none() && author.is_none() {
            return None;
        }

        Some(SearchQuery { title, author })
    }

    /// Query parameters in request order: present terms, then the limit.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(title) = &self.title {
            pairs.push(("title", title.clone()));
        }
        if let Some(author) = &self.author {
            pairs.push(("author", author.clone()));
        }
        pairs.push(("limit", RESULT_LIMIT.to_string()));
        pairs
    }

    /// Short human label, e.g. `title "The Hobbit", author "Tolkien"`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(format!("title \"{title}\""));
        }
        if let Some(author) = &self.author {
            parts.push(format!("author \"{author}\""));
        }
        parts.join(", ")
    }
}

/// Build the full, percent-encoded search URL for a query
pub fn build_search_url(api_base: &str, query: &SearchQuery) -> String {
    let params = query
        .query_pairs()
        .into_iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(&value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}{SEARCH_PATH}?{params}", api_base.trim_end_matches('/'))
}

/// Normalize a decoded search response
///
/// A missing or empty `docs` array is a [`SearchError::NoResults`], not a
/// transport failure.
pub fn transform_search_response(response: SearchResponse) -> SearchResultSet {
    match response.docs {
        Some(docs) if !docs.is_empty() => SearchResultSet {
            records: docs.into_iter().map(BookRecord::from).collect(),
            error: None,
        },
        _ => SearchResultSet::failed(SearchError::NoResults),
    }
}

/// Result set for a non-success HTTP status
pub fn status_failure(status: u16) -> SearchResultSet {
    SearchResultSet::failed(SearchError::Transport(format!("Request failed: {status}")))
}

/// Result set for a network or decode failure
///
/// Blank details fall back to a generic message so the user always sees text.
pub fn transport_failure(detail: &str) -> SearchResultSet {
    let message = if detail.trim().is_empty() {
        "Something went wrong".to_string()
    } else {
        detail.to_string()
    };
    SearchResultSet::failed(SearchError::Transport(message))
}

/// Decode a raw response body into a result set
pub fn parse_search_body(body: &str) -> SearchResultSet {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(response) => transform_search_response(response),
        Err(e) => transport_failure(&format!("Failed to parse search response: {e}")),
    }
}
