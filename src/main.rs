use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;

use nuget_feed::config::{self, FeedConfig};
use nuget_feed::feed::error::FeedError;
use nuget_feed::feed::local::LocalFeed;
use nuget_feed::feed::source::PackageFeed;
use nuget_feed::feed::sources::{create_feeds, search_all};
use nuget_feed::feed::types::PackageSource;

#[derive(Parser)]
#[command(name = "nuget-feed")]
#[command(version, about = "Search local NuGet feeds and list package versions")]
struct Cli {
    /// Configuration file (defaults to the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Target {
    /// Configured source to use, by id or name (all sources when omitted)
    #[arg(long, conflicts_with = "dir")]
    source: Option<String>,

    /// Search this directory instead of the configured sources
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Search packages by file name (glob or free text)
    Search {
        query: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        take: Option<usize>,
        #[arg(long)]
        skip: Option<usize>,
    },
    /// List the versions of a package
    Versions {
        package_id: String,
        #[command(flatten)]
        target: Target,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = nuget_feed::logging::init(cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")?;

    let config_path = cli.config.unwrap_or_else(config::config_path);
    let config = FeedConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config))
}

async fn run(command: Command, config: FeedConfig) -> anyhow::Result<()> {
    match command {
        Command::Search {
            query,
            target,
            take,
            skip,
        } => {
            let feeds = select_feeds(&target, &config)?;
            let results = match feeds.as_slice() {
                [feed] => vec![feed.search(&query, take, skip).await?],
                _ => search_all(&feeds, &query, take, skip).await,
            };
            print_json(&results)
        }
        Command::Versions { package_id, target } => {
            let feeds = select_feeds(&target, &config)?;
            let mut found = Vec::new();
            for feed in &feeds {
                match feed.fetch_package_versions(&package_id).await {
                    Ok(versions) => found.push(versions),
                    Err(FeedError::PackageNotFound { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            if found.is_empty() {
                anyhow::bail!("package {package_id} not found in any source");
            }
            print_json(&found)
        }
    }
}

fn select_feeds(target: &Target, config: &FeedConfig) -> anyhow::Result<Vec<Arc<dyn PackageFeed>>> {
    if let Some(dir) = &target.dir {
        let source = PackageSource::new("local", "Local", Some(&dir.to_string_lossy()));
        let feed: Arc<dyn PackageFeed> = Arc::new(LocalFeed::new(source, config.search.clone()));
        return Ok(vec![feed]);
    }

    if let Some(name) = &target.source {
        let source = config
            .find_source(name)
            .with_context(|| format!("unknown source: {name}"))?;
        let feed: Arc<dyn PackageFeed> =
            Arc::new(LocalFeed::new(source.clone(), config.search.clone()));
        return Ok(vec![feed]);
    }

    if config.sources.is_empty() {
        warn!("No sources configured; pass --dir or add sources to the config file");
    }
    Ok(create_feeds(config))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
