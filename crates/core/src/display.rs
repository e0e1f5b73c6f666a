//! Display derivation for projected records
//!
//! This is the only place where absent record fields turn into user-facing
//! defaults.

use serde::Serialize;

use crate::projection::{Projection, SortKey, ViewParameters};
use crate::search::{BookRecord, SearchError, SearchQuery, OPEN_LIBRARY_BASE};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const UNKNOWN_YEAR: &str = "N/A";
pub const EMPTY_PAGE_MESSAGE: &str = "No books to display. Try searching something else.";

const COVERS_BASE: &str = "https://covers.openlibrary.org/b/id";
const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/150x200?text=No+Cover";

/// Medium-size cover image URL, or a placeholder when there is no cover
pub fn cover_url(cover_id: Option<u64>) -> String {
    match cover_id {
        Some(id) => format!("{COVERS_BASE}/{id}-M.jpg"),
        None => PLACEHOLDER_COVER.to_string(),
    }
}

/// Canonical Open Library page for a work key such as `/works/OL45883W`
pub fn detail_url(key: Option<&str>) -> Option<String> {
    key.map(|key| format!("{OPEN_LIBRARY_BASE}{key}"))
}

pub fn display_title(record: &BookRecord) -> &str {
    record.title.as_deref().unwrap_or(UNTITLED)
}

pub fn display_authors(record: &BookRecord) -> String {
    match &record.author_names {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => UNKNOWN_AUTHOR.to_string(),
    }
}

pub fn display_year(record: &BookRecord) -> String {
    record
        .first_publish_year
        .map(|year| year.to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

/// Row key combining the work key with the position on the page
///
/// Keys are not guaranteed unique within a result page, the index is.
pub fn display_key(record: &BookRecord, index: usize) -> String {
    match &record.key {
        Some(key) => format!("{key}-{index}"),
        None => index.to_string(),
    }
}

/// Display-ready book
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub display_key: String,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub cover_url: String,
    pub has_cover: bool,
    pub detail_url: Option<String>,
}

impl BookCard {
    pub fn from_record(record: &BookRecord, index: usize) -> Self {
        BookCard {
            display_key: display_key(record, index),
            title: display_title(record).to_string(),
            authors: display_authors(record),
            year: display_year(record),
            cover_url: cover_url(record.cover_id),
            has_cover: record.cover_id.is_some(),
            detail_url: detail_url(record.key.as_deref()),
        }
    }
}

/// Pagination metadata for a rendered page
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub limit: usize,
    pub next_page_command: Option<String>,
    pub prev_page_command: Option<String>,
}

/// Filters in effect for a rendered page
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ViewSummary {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub sort: SortKey,
}

/// Complete page output: query echo, cards and pagination
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PageOutput {
    pub query: Option<SearchQuery>,
    pub view: ViewSummary,
    pub books: Vec<BookCard>,
    pub pagination: PaginationInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SearchError>,
    /// Message shown in place of the cards: the search error or the empty-page hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip)]
    pub show_pagination: bool,
}

fn quote(arg: &str) -> String {
    shlex::try_quote(arg)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| format!("'{arg}'"))
}

/// CLI invocation reproducing a query and view at a given page
pub fn search_command(query: &SearchQuery, params: &ViewParameters, page: usize) -> String {
    let mut command = String::from("bookfinder search");

    if let Some(title) = &query.title {
        command.push_str(&format!(" --title {}", quote(title)));
    }
    if let Some(author) = &query.author {
        command.push_str(&format!(" --author {}", quote(author)));
    }
    if let Some(min_year) = params.min_year {
        command.push_str(&format!(" --min-year {min_year}"));
    }
    if let Some(max_year) = params.max_year {
        command.push_str(&format!(" --max-year {max_year}"));
    }
    if params.sort_key != SortKey::Relevance {
        command.push_str(&format!(" --sort {}", params.sort_key));
    }
    command.push_str(&format!(" --page {page}"));

    command
}

/// Build the serializable output for a projection
///
/// Navigation commands are only produced when the query is known and the
/// adjacent page exists. `error`, `status` and `show_pagination` are left
/// unset; [`crate::session::SearchSession::page_output`] fills them in.
pub fn build_page_output(
    projection: &Projection<'_>,
    params: &ViewParameters,
    query: Option<&SearchQuery>,
) -> PageOutput {
    let page = projection.page_number;
    let total_pages = projection.page_count;

    let next_page_command = match query {
        Some(query) if page < total_pages => Some(search_command(query, params, page + 1)),
        _ => None,
    };

    let prev_page_command = match query {
        Some(query) if page > 1 && total_pages > 0 => {
            Some(search_command(query, params, (page - 1).min(total_pages)))
        }
        _ => None,
    };

    PageOutput {
        query: query.cloned(),
        view: ViewSummary {
            min_year: params.min_year,
            max_year: params.max_year,
            sort: params.sort_key,
        },
        books: projection
            .items
            .iter()
            .enumerate()
            .map(|(idx, record)| BookCard::from_record(record, idx))
            .collect(),
        pagination: PaginationInfo {
            current_page: page,
            total_pages,
            total_items: projection.total_matches,
            limit: params.page_size,
            next_page_command,
            prev_page_command,
        },
        error: None,
        status: None,
        show_pagination: false,
    }
}
