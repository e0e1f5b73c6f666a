//! Result projection: year filter, sort and pagination
//!
//! [`project`] is a pure function of `(records, params)`. It never mutates
//! the records, never clamps the page and never fails: an out-of-range page
//! simply yields no items. Page resets and clamping belong to the caller
//! (see [`crate::session`]).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::search::BookRecord;

/// Number of records per page.
pub const PAGE_SIZE: usize = 10;

/// Stand-in year for absent years when sorting ascending (sorts last).
const MISSING_YEAR_ASC: i32 = 9999;

/// Stand-in year for absent years when sorting descending (sorts last).
const MISSING_YEAR_DESC: i32 = 0;

/// Invalid user input for view parameters
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Invalid sort key: {0}. Valid keys: relevance, year-asc, year-desc, title")]
    InvalidSortKey(String),

    #[error("Invalid page number: {0}")]
    InvalidPage(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Order returned by the search API
    #[default]
    Relevance,
    YearAscending,
    YearDescending,
    TitleAlphabetical,
}

impl SortKey {
    /// Canonical command-line spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::YearAscending => "year-asc",
            SortKey::YearDescending => "year-desc",
            SortKey::TitleAlphabetical => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevance",
            SortKey::YearAscending => "Year ↑",
            SortKey::YearDescending => "Year ↓",
            SortKey::TitleAlphabetical => "Title (A→Z)",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "relevance" => Ok(SortKey::Relevance),
            "year-asc" | "year-ascending" => Ok(SortKey::YearAscending),
            "year-desc" | "year-descending" => Ok(SortKey::YearDescending),
            "title" | "title-alphabetical" => Ok(SortKey::TitleAlphabetical),
            _ => Err(ParseError::InvalidSortKey(s.to_string())),
        }
    }
}

/// User-controlled filter, sort and pagination settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewParameters {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub sort_key: SortKey,
    /// 1-indexed
    pub page_number: usize,
    pub page_size: usize,
}

impl Default for ViewParameters {
    fn default() -> Self {
        ViewParameters {
            min_year: None,
            max_year: None,
            sort_key: SortKey::Relevance,
            page_number: 1,
            page_size: PAGE_SIZE,
        }
    }
}

/// Parse a year bound as typed by a user
///
/// Blank input clears the bound.
pub fn parse_year_bound(input: &str) -> Result<Option<i32>, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ParseError::InvalidYear(input.to_string()))
}

/// Parse a 1-indexed page number
pub fn parse_page_number(input: &str) -> Result<usize, ParseError> {
    match input.trim().parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ParseError::InvalidPage(input.to_string())),
    }
}

/// The page of records to display plus pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection<'a> {
    pub items: Vec<&'a BookRecord>,
    pub page_count: usize,
    /// Number of records surviving the year filter.
    pub total_matches: usize,
    pub page_number: usize,
}

impl Projection<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn within_bounds(record: &BookRecord, min_year: Option<i32>, max_year: Option<i32>) -> bool {
    if min_year.is_none() && max_year.is_none() {
        return true;
    }

    // A missing year never satisfies a numeric bound.
    let Some(year) = record.first_publish_year else {
        return false;
    };

    min_year.map_or(true, |min| year >= min) && max_year.map_or(true, |max| year <= max)
}

/// Keep the records whose first publish year satisfies every present bound
pub fn filter_by_year(
    records: &[BookRecord],
    min_year: Option<i32>,
    max_year: Option<i32>,
) -> Vec<&BookRecord> {
    records
        .iter()
        .filter(|record| within_bounds(record, min_year, max_year))
        .collect()
}

/// Collation class of a folded character: spaces and punctuation, digits, letters
fn char_class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

/// Accent- and case-insensitive collation key for titles
fn collation_key(text: &str) -> Vec<(u8, char)> {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (char_class(c), c))
        .collect()
}

/// Locale-style title comparison
///
/// Base letters first, then case (lowercase before uppercase), then the raw
/// code points so the order is total. Whitespace and punctuation sort before
/// digits, and digits before letters, wherever they fall in the code table.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| {
            let case_a = a.chars().filter(|c| c.is_alphabetic()).map(char::is_uppercase);
            let case_b = b.chars().filter(|c| c.is_alphabetic()).map(char::is_uppercase);
            case_a.cmp(case_b)
        })
        .then_with(|| a.cmp(b))
}

/// Stable sort of a filtered view; the input order is kept for ties
pub fn sort_records<'a>(records: &[&'a BookRecord], sort_key: SortKey) -> Vec<&'a BookRecord> {
    let mut sorted = records.to_vec();

    match sort_key {
        SortKey::Relevance => {}
        SortKey::YearAscending => {
            sorted.sort_by_key(|r| r.first_publish_year.unwrap_or(MISSING_YEAR_ASC));
        }
        SortKey::YearDescending => {
            sorted.sort_by_key(|r| {
                std::cmp::Reverse(r.first_publish_year.unwrap_or(MISSING_YEAR_DESC))
            });
        }
        SortKey::TitleAlphabetical => {
            sorted.sort_by(|a, b| {
                compare_titles(
                    a.title.as_deref().unwrap_or(""),
                    b.title.as_deref().unwrap_or(""),
                )
            });
        }
    }

    sorted
}

/// `ceil(total / page_size)`, 0 for an empty set
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Clamp a page number into `[1, max(1, page_count)]`
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// Slice out one page, clipped to the available items
///
/// Pages past the end (and page 0) produce an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }

    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }

    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Filter, sort and paginate a result list
pub fn project<'a>(records: &'a [BookRecord], params: &ViewParameters) -> Projection<'a> {
    let filtered = filter_by_year(records, params.min_year, params.max_year);
    let sorted = sort_records(&filtered, params.sort_key);

    Projection {
        items: paginate(&sorted, params.page_number, params.page_size).to_vec(),
        page_count: page_count(sorted.len(), params.page_size),
        total_matches: sorted.len(),
        page_number: params.page_number,
    }
}
