use crate::prelude::*;
use clap::Parser;

mod books;
mod error;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search the Open Library for books by title and author, filter by year, sort and page through the results"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Open Library API base URL
    #[clap(
        long,
        env = "BOOKFINDER_API_BASE",
        global = true,
        default_value = bookfinder_core::search::OPEN_LIBRARY_BASE
    )]
    api_base: String,

    /// Whether to display additional information.
    #[clap(long, env = "BOOKFINDER_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search once and print a single page of results
    Search(crate::books::search::SearchOptions),

    /// Interactive session: search, filter, sort and page from a prompt
    Interactive(crate::books::interactive::InteractiveOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Search(options) => crate::books::search::run(options, app.global).await,
        SubCommands::Interactive(options) => {
            crate::books::interactive::run(options, app.global).await
        }
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
