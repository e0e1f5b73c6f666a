use crate::prelude::{eprintln, println, *};
use bookfinder_core::projection::{parse_page_number, parse_year_bound, SortKey};
use bookfinder_core::session::SearchSession;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::render::{format_page_json, format_page_table, format_page_text};
use super::{build_client, search_books_data};

const PROMPT: &str = "bookfinder> ";

const HELP: &str = "\
Commands:
  search <title>                   Search by title
  search title=<t> author=<a>      Search by title and/or author (quote values with spaces)
  min <year> | min                 Set or clear the minimum first publish year
  max <year> | max                 Set or clear the maximum first publish year
  sort relevance|year-asc|year-desc|title
  next | prev | page <n>           Move between pages
  show                             Print the current page again
  help                             Show this help
  quit                             Leave the session";

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct InteractiveOptions {
    /// Print pages as JSON
    #[arg(long, conflicts_with = "table")]
    pub json: bool,

    /// Print pages as a compact table
    #[arg(long)]
    pub table: bool,
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Search { title: String, author: String },
    MinYear(Option<i32>),
    MaxYear(Option<i32>),
    Sort(SortKey),
    Next,
    Prev,
    Page(usize),
    Show,
    Help,
    Quit,
}

fn parse_search_terms(args: &[String]) -> (String, String) {
    let mut title = Vec::new();
    let mut author = Vec::new();

    for arg in args {
        if let Some(value) = arg.strip_prefix("title=") {
            title.push(value.to_string());
        } else if let Some(value) = arg.strip_prefix("author=") {
            author.push(value.to_string());
        } else {
            title.push(arg.clone());
        }
    }

    (title.join(" "), author.join(" "))
}

/// Parse a line typed at the prompt
pub fn parse_command(line: &str) -> std::result::Result<SessionCommand, Error> {
    let tokens = shlex::split(line)
        .ok_or_else(|| Error::InvalidArgument(f!("Unbalanced quotes in: {line}")))?;

    let Some((command, args)) = tokens.split_first() else {
        return Err(Error::InvalidArgument("Empty command".to_string()));
    };
    let arg = args.first().map(String::as_str).unwrap_or("");

    let parsed = match command.to_lowercase().as_str() {
        "search" | "s" => {
            let (title, author) = parse_search_terms(args);
            SessionCommand::Search { title, author }
        }
        "min" => SessionCommand::MinYear(parse_year_bound(arg)?),
        "max" => SessionCommand::MaxYear(parse_year_bound(arg)?),
        "sort" => SessionCommand::Sort(arg.parse()?),
        "next" | "n" => SessionCommand::Next,
        "prev" | "p" => SessionCommand::Prev,
        "page" => SessionCommand::Page(parse_page_number(arg)?),
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => {
            return Err(Error::InvalidArgument(f!(
                "Unknown command: {other}. Type 'help' for a list of commands"
            )))
        }
    };

    Ok(parsed)
}

fn render(session: &SearchSession, options: &InteractiveOptions) -> Result<String> {
    let output = session.page_output();

    if options.json {
        return format_page_json(&output);
    }
    if options.table && output.status.is_none() {
        return Ok(format_page_table(&output).to_string());
    }
    Ok(format_page_text(&output))
}

pub async fn run(options: InteractiveOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Open Library API Base: {}", global.api_base);
        eprintln!();
    }

    let client = build_client()?;
    let mut session = SearchSession::new();

    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    println!("{HELP}");

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let command = match parse_command(trimmed) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            SessionCommand::Search { title, author } => {
                let Some(ticket) = session.begin_search(&title, &author) else {
                    eprintln!("Enter a title or an author to search.");
                    continue;
                };

                eprintln!("Searching...");
                let results = search_books_data(&client, &global.api_base, &ticket.query).await;
                if !session.complete_search(ticket, results) {
                    log::warn!("Discarded a stale search response");
                }
            }
            SessionCommand::MinYear(year) => session.set_min_year(year),
            SessionCommand::MaxYear(year) => session.set_max_year(year),
            SessionCommand::Sort(key) => session.set_sort_key(key),
            SessionCommand::Next => {
                session.next_page();
            }
            SessionCommand::Prev => {
                session.prev_page();
            }
            SessionCommand::Page(page) => {
                session.go_to_page(page);
            }
            SessionCommand::Show => {}
            SessionCommand::Help => {
                println!("{HELP}");
                continue;
            }
            SessionCommand::Quit => break,
        }

        println!("{}", render(&session, &options)?);
    }

    Ok(())
}
