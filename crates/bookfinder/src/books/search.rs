use crate::prelude::{eprintln, print, println, *};
use bookfinder_core::projection::parse_year_bound;
use bookfinder_core::session::SearchSession;

use super::render::{format_page_json, format_page_table, format_page_text};
use super::{build_client, search_books_data, SortBy};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SearchOptions {
    /// Title to search for (e.g., "The Hobbit")
    #[arg(short, long, env = "BOOKFINDER_TITLE")]
    pub title: Option<String>,

    /// Author to search for (e.g., "Tolkien")
    #[arg(short, long, env = "BOOKFINDER_AUTHOR")]
    pub author: Option<String>,

    /// Only keep books first published in or after this year
    #[arg(long, value_name = "YEAR")]
    pub min_year: Option<String>,

    /// Only keep books first published in or before this year
    #[arg(long, value_name = "YEAR")]
    pub max_year: Option<String>,

    /// Sort order
    #[arg(short, long, value_enum, default_value = "relevance")]
    pub sort: SortBy,

    /// Page number (1-indexed, clamped to the available pages)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output as JSON
    #[arg(long, conflicts_with = "table")]
    pub json: bool,

    /// Output as a compact table
    #[arg(long)]
    pub table: bool,
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let mut session = SearchSession::new();

    // Validate view parameters before touching the network
    let min_year =
        parse_year_bound(options.min_year.as_deref().unwrap_or("")).map_err(Error::from)?;
    let max_year =
        parse_year_bound(options.max_year.as_deref().unwrap_or("")).map_err(Error::from)?;

    let ticket = session
        .begin_search(
            options.title.as_deref().unwrap_or(""),
            options.author.as_deref().unwrap_or(""),
        )
        .ok_or(Error::MissingTerms)?;

    if global.verbose {
        eprintln!(
            "Searching Open Library for {} ({})",
            ticket.query.describe(),
            global.api_base
        );
    }

    let client = build_client()?;
    let results = search_books_data(&client, &global.api_base, &ticket.query).await;
    session.complete_search(ticket, results);

    session.set_min_year(min_year);
    session.set_max_year(max_year);
    session.set_sort_key(options.sort.into());
    let page = session.go_to_page(options.page);

    if global.verbose && page != options.page {
        eprintln!("Page {} is out of range, showing page {}", options.page, page);
    }

    let output = session.page_output();

    if options.json {
        println!("{}", format_page_json(&output)?);
    } else if options.table && output.status.is_none() {
        format_page_table(&output).printstd();
        if let Some(next) = &output.pagination.next_page_command {
            eprintln!("\nTo fetch the next page, run:\n  {}", next);
        }
    } else {
        print!("{}", format_page_text(&output));
    }

    Ok(())
}
