use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use report_catalog::fetch::{fetch_reports, load_reports_file, DEFAULT_ENDPOINT};
use report_catalog::render::render_markdown;
use report_catalog::{BucketPolicy, CategoryFilter, LoadState, Query, QueryEvent, SortKey};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Report Catalog - query the research report catalog
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CMS endpoint returning the JSON array of reports
    #[arg(long, env = "REPORT_CATALOG_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Read reports from a saved JSON payload instead of the CMS
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Free-text search over titles and descriptions
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sort key: newest, oldest, rating or title (anything else keeps feed order)
    #[arg(long, default_value = "newest")]
    sort: String,

    /// Category substring filter, or "all"
    #[arg(short, long, default_value = "all")]
    category: String,

    /// JSON file overriding section limits and the whitepaper marker
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Request timeout for the CMS fetch, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

async fn load(args: &Args) -> Result<Vec<report_catalog::Report>> {
    match &args.input {
        Some(path) => load_reports_file(path),
        None => {
            let client = Client::builder()
                .timeout(Duration::from_secs(args.timeout_secs))
                .build()?;
            fetch_reports(&client, &args.endpoint).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    info!("Starting report_catalog");

    let policy = match &args.policy {
        Some(path) => BucketPolicy::load(path)?,
        None => BucketPolicy::default(),
    };

    let mut query = Query::new();
    query.apply(QueryEvent::Search(args.search.clone()));
    query.apply(QueryEvent::Sort(SortKey::parse(&args.sort)));
    query.apply(QueryEvent::Category(CategoryFilter::parse(&args.category)));
    debug!("Query prepared - {:?}", query);

    let mut state = LoadState::default();
    state.begin_load();
    state.finish(load(&args).await);

    let Some(catalog) = state.catalog() else {
        let msg = state.error().unwrap_or("catalog not loaded").to_string();
        error!("Unable to load reports - {}", msg);
        return Err(anyhow!("Failed to fetch reports: {}", msg));
    };

    let derived = catalog.derive_with(&query, &policy);
    info!(
        "Catalog derived - reports={}, view={}, top={}, whitepapers={}, market={}",
        catalog.len(),
        derived.view.len(),
        derived.buckets.top.len(),
        derived.buckets.whitepapers.len(),
        derived.buckets.market.len()
    );

    match args.format {
        OutputFormat::Text => print!("{}", render_markdown(&derived, &policy)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&derived)?),
    }

    Ok(())
}
