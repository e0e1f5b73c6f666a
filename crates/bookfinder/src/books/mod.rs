use crate::prelude::*;
use bookfinder_core::projection::SortKey;
use bookfinder_core::search::{
    build_search_url, parse_search_body, status_failure, transport_failure, SearchQuery,
    SearchResultSet,
};
use log::{debug, info, warn};

pub mod interactive;
pub mod render;
pub mod search;

#[derive(Debug, Clone, Copy, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Order returned by Open Library (default)
    Relevance,
    /// Oldest first, unknown years last
    YearAsc,
    /// Newest first, unknown years last
    YearDesc,
    /// Title A→Z
    Title,
}

impl From<SortBy> for SortKey {
    fn from(s: SortBy) -> Self {
        match s {
            SortBy::Relevance => SortKey::Relevance,
            SortBy::YearAsc => SortKey::YearAscending,
            SortBy::YearDesc => SortKey::YearDescending,
            SortBy::Title => SortKey::TitleAlphabetical,
        }
    }
}

/// HTTP client shared by every search of a session
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("bookfinder/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Run one search against the Open Library API
///
/// Never fails: transport problems and empty results come back folded into
/// the returned result set.
pub async fn search_books_data(
    client: &reqwest::Client,
    api_base: &str,
    query: &SearchQuery,
) -> SearchResultSet {
    let url = build_search_url(api_base, query);
    debug!("GET {url}");

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Search request failed: {e}");
            return transport_failure(&e.to_string());
        }
    };

    let status = response.status();
    debug!("Search response status: {status}");

    if !status.is_success() {
        warn!("Search request returned HTTP {status}");
        return status_failure(status.as_u16());
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read search response: {e}");
            return transport_failure(&f!("Failed to read search response: {e}"));
        }
    };

    let results = parse_search_body(&body);
    match &results.error {
        None => info!("{} returned {} book(s)", query.describe(), results.records.len()),
        Some(error) if error.is_transport() => {
            warn!("{} failed: {error}", query.describe())
        }
        Some(error) => info!("{} returned no books: {error}", query.describe()),
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use bookfinder_core::search::SearchError;
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn echo_params(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "numFound": 1,
            "docs": [{
                "title": params.get("title"),
                "author_name": params.get("author").map(|a| vec![a.clone()]),
                "first_publish_year": 1937,
                "key": format!("/limit/{}", params.get("limit").cloned().unwrap_or_default()),
            }]
        }))
    }

    #[test]
    fn test_sort_by_conversion() {
        assert_eq!(SortKey::from(SortBy::Relevance), SortKey::Relevance);
        assert_eq!(SortKey::from(SortBy::YearAsc), SortKey::YearAscending);
        assert_eq!(SortKey::from(SortBy::YearDesc), SortKey::YearDescending);
        assert_eq!(SortKey::from(SortBy::Title), SortKey::TitleAlphabetical);
    }

    #[tokio::test]
    async fn test_search_sends_present_terms_and_limit() {
        let base = serve(Router::new().route("/search.json", get(echo_params))).await;
        let client = build_client().unwrap();
        let query = SearchQuery::from_terms("The Hobbit", "").unwrap();

        let results = search_books_data(&client, &base, &query).await;

        assert!(results.error.is_none());
        assert_eq!(results.records.len(), 1);
        let record = &results.records[0];
        assert_eq!(record.title, Some("The Hobbit".to_string()));
        assert_eq!(record.author_names, None);
        assert_eq!(record.key, Some("/limit/30".to_string()));
    }

    #[tokio::test]
    async fn test_search_with_author_only() {
        let base = serve(Router::new().route("/search.json", get(echo_params))).await;
        let client = build_client().unwrap();
        let query = SearchQuery::from_terms("", "Tolkien").unwrap();

        let results = search_books_data(&client, &base, &query).await;

        assert_eq!(results.records[0].title, None);
        assert_eq!(
            results.records[0].author_names,
            Some(vec!["Tolkien".to_string()])
        );
    }

    #[tokio::test]
    async fn test_search_empty_docs_is_no_results() {
        let router = Router::new().route(
            "/search.json",
            get(|| async { Json(serde_json::json!({ "numFound": 0, "docs": [] })) }),
        );
        let base = serve(router).await;
        let client = build_client().unwrap();
        let query = SearchQuery::from_terms("zzzzzz", "").unwrap();

        let results = search_books_data(&client, &base, &query).await;

        assert!(results.records.is_empty());
        assert_eq!(results.error, Some(SearchError::NoResults));
    }

    #[tokio::test]
    async fn test_search_http_error_status() {
        let router = Router::new().route(
            "/search.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
        );
        let base = serve(router).await;
        let client = build_client().unwrap();
        let query = SearchQuery::from_terms("Dune", "").unwrap();

        let results = search_books_data(&client, &base, &query).await;

        assert!(results.records.is_empty());
        assert_eq!(
            results.error,
            Some(SearchError::Transport("Request failed: 503".to_string()))
        );
    }

    #[tokio::test]
    async fn test_search_invalid_json_is_transport_error() {
        let router = Router::new().route("/search.json", get(|| async { "not json" }));
        let base = serve(router).await;
        let client = build_client().unwrap();
        let query = SearchQuery::from_terms("Dune", "").unwrap();

        let results = search_books_data(&client, &base, &query).await;

        assert!(results.error.unwrap().is_transport());
    }

    #[tokio::test]
    async fn test_search_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = build_client().unwrap();
        let query = SearchQuery::from_terms("Dune", "").unwrap();

        let results = search_books_data(&client, &format!("http://{addr}"), &query).await;

        assert!(results.records.is_empty());
        assert!(results.error.unwrap().is_transport());
    }
}
