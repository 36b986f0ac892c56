use crate::commands::{print_rss, print_sitemap, run_search};
use crate::server;
use adhd_directory::directory::SortBy;
use adhd_directory::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ADHD NSW site",
    about = "Serve the ADHD NSW directory and blog, or print its feeds from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default command)
    Serve(ServeArgs),
    /// Print the sitemap XML to stdout
    Sitemap(SourceArgs),
    /// Print the blog RSS feed to stdout
    Rss(SourceArgs),
    /// Run a directory search and print the matching professionals
    Search(SearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// JSON fixture to seed the record store from (overrides STORE_FIXTURE_PATH)
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Free-text query, e.g. "adult assessment"
    pub(crate) query: Option<String>,
    /// Suburb or postcode
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Comma-separated service type slugs
    #[arg(long, value_delimiter = ',')]
    pub(crate) services: Vec<String>,
    /// Comma-separated age group slugs
    #[arg(long = "ages", value_delimiter = ',')]
    pub(crate) age_groups: Vec<String>,
    /// Comma-separated languages the professional must all speak
    #[arg(long, value_delimiter = ',')]
    pub(crate) languages: Vec<String>,
    /// Only NDIS registered professionals
    #[arg(long)]
    pub(crate) ndis: bool,
    /// Only professionals offering telehealth
    #[arg(long)]
    pub(crate) telehealth: bool,
    /// Only professionals accepting new patients
    #[arg(long)]
    pub(crate) accepting: bool,
    /// relevance, distance or name
    #[arg(long, default_value = "relevance", value_parser = parse_sort)]
    pub(crate) sort: SortBy,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u64,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

fn parse_sort(raw: &str) -> Result<SortBy, String> {
    SortBy::parse(raw).ok_or_else(|| format!("unknown sort '{raw}'; use relevance, distance or name"))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Sitemap(args) => print_sitemap(args).await,
        Command::Rss(args) => print_rss(args).await,
        Command::Search(args) => run_search(args).await,
    }
}
