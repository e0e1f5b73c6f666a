use crate::prelude::*;
use bookfinder_core::display::{BookCard, PageOutput};
use colored::Colorize;

/// Convert page output to a JSON string
pub fn format_page_json(output: &PageOutput) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn filters_line(output: &PageOutput) -> String {
    let year = |bound: Option<i32>| bound.map(|y| y.to_string()).unwrap_or_else(|| "any".into());

    f!(
        "{}: {} | {}: {} | {}: {}",
        "Min Year".green(),
        year(output.view.min_year).bright_white(),
        "Max Year".green(),
        year(output.view.max_year).bright_white(),
        "Sort By".green(),
        output.view.sort.label().bright_white()
    )
}

fn format_card(card: &BookCard, number: usize) -> String {
    let mut result = String::new();

    result.push_str(&f!(
        "\n{} {}\n",
        f!("[{number}]").yellow().bold(),
        card.title.white().bold()
    ));
    result.push_str(&f!(
        "    {}: {} | {}: {}\n",
        "Author".green(),
        card.authors.bright_white(),
        "Year".green(),
        card.year.bright_yellow()
    ));

    if card.has_cover {
        result.push_str(&f!(
            "    {}: {}\n",
            "Cover".green(),
            card.cover_url.cyan().underline()
        ));
    } else {
        result.push_str(&f!("    {}: {}\n", "Cover".green(), "No cover".bright_black()));
    }

    if let Some(url) = &card.detail_url {
        result.push_str(&f!(
            "    {}: {}\n",
            "Open on OpenLibrary".green(),
            url.cyan().underline()
        ));
    }

    result
}

/// Convert page output to formatted text with colors
pub fn format_page_text(output: &PageOutput) -> String {
    let mut result = String::new();
    let pagination = &output.pagination;

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!("{}\n", "📚 BOOK FINDER".bright_cyan().bold()));
    if let Some(query) = &output.query {
        result.push_str(&f!("{}\n", query.describe().bright_white()));
    }
    result.push_str(&f!("{}\n", filters_line(output)));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    if let Some(status) = &output.status {
        let status = if output.error.is_some() {
            status.red().bold()
        } else {
            status.yellow()
        };
        result.push_str(&f!("\n{}\n", status));
    } else {
        let offset = (pagination.current_page.saturating_sub(1)) * pagination.limit;
        for (idx, card) in output.books.iter().enumerate() {
            result.push_str(&format_card(card, offset + idx + 1));
        }
    }

    if output.show_pagination {
        result.push_str(&f!("\n{}\n", "=".repeat(80).bright_yellow()));
        result.push_str(&f!(
            "{} {} / {} ({} {})\n",
            "Page".bright_white(),
            pagination.current_page.to_string().bright_cyan().bold(),
            pagination.total_pages.to_string().bright_cyan().bold(),
            pagination.total_items.to_string().bright_cyan().bold(),
            "matching books".bright_white()
        ));

        if let Some(next) = &pagination.next_page_command {
            result.push_str(&f!("  {}: {}\n", "Next page".green(), next.cyan()));
        }
        if let Some(prev) = &pagination.prev_page_command {
            result.push_str(&f!("  {}: {}\n", "Previous page".green(), prev.cyan()));
        }
    }

    result.push_str(&f!("\n{}\n", "Data from Open Library".bright_black()));
    result
}

/// Compact one-row-per-book table
pub fn format_page_table(output: &PageOutput) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["#", "Title", "Author", "Year", "Link"]);

    let offset = (output.pagination.current_page.saturating_sub(1)) * output.pagination.limit;
    for (idx, card) in output.books.iter().enumerate() {
        let number = offset + idx + 1;
        table.add_row(prettytable::row![
            number,
            &card.title,
            &card.authors,
            &card.year,
            card.detail_url.as_deref().unwrap_or("-")
        ]);
    }

    table
}
