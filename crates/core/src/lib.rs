//! Core library for bookfinder
//!
//! This crate implements the **Functional Core** of the bookfinder application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`bookfinder_core`** (this crate): Pure transformation functions with zero I/O
//! - **`bookfinder`**: HTTP requests, terminal rendering and the interactive loop
//!   (the Imperative Shell)
//!
//! Everything here is deterministic and can be tested with fixture data, no
//! mocking or network required.
//!
//! # Module Organization
//!
//! - [`search`]: Search request construction and Open Library response normalization
//! - [`projection`]: Year filtering, sorting and pagination of a result set
//! - [`display`]: Display defaults, cover/detail URLs and serializable page output
//! - [`session`]: Caller state transitions (page resets, stale response handling)
//!
//! # Example Usage
//!
//! ```rust
//! use bookfinder_core::projection::{project, SortKey, ViewParameters};
//! use bookfinder_core::search::parse_search_body;
//!
//! let results = parse_search_body(
//!     r#"{"docs":[{"title":"B","first_publish_year":2001},{"title":"A","first_publish_year":1999}]}"#,
//! );
//!
//! let params = ViewParameters {
//!     sort_key: SortKey::TitleAlphabetical,
//!     ..ViewParameters::default()
//! };
//! let projection = project(&results.records, &params);
//!
//! assert_eq!(projection.items[0].title.as_deref(), Some("A"));
//! assert_eq!(projection.page_count, 1);
//! ```

pub mod display;
pub mod projection;
pub mod search;
pub mod session;
