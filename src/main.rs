use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cl_scout::{CraigslistScraper, Lookback, ScoutConfig, SearchQuery, SortOrder};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search Craigslist for-sale listings")]
struct Args {
    /// User agent sent with every request
    #[arg(long, env = "CL_SCOUT_USER_AGENT")]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CL_SCOUT_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search one city's for-sale listings
    Search {
        /// City slug, e.g. sfbay
        city: String,
        /// Free-text query
        query: String,
        /// rel, priceasc or pricedsc
        #[arg(long, default_value = "rel")]
        sort: SortOrder,
        /// Only keep listings posted within this many days
        #[arg(long)]
        lookback_days: Option<u32>,
        /// Resolve coordinates for every listing
        #[arg(long, default_value_t = false)]
        geo: bool,
        /// Write the results as JSON
        #[arg(long)]
        output: Option<PathBuf>,
        /// Download thumbnails into this directory
        #[arg(long)]
        images: Option<PathBuf>,
        /// Maximum thumbnails per listing
        #[arg(long, requires = "images")]
        max_images: Option<usize>,
    },
    /// List cities near a city
    Nearby { city: String },
    /// List cities in a US state (two-letter code)
    State { state: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = ScoutConfig {
        timeout_secs: args.timeout_secs,
        ..ScoutConfig::default()
    };
    if let Some(user_agent) = args.user_agent {
        config.user_agent = user_agent;
    }

    let scraper = CraigslistScraper::new(config).context("Failed to create scraper")?;

    match args.command {
        Command::Search {
            city,
            query,
            sort,
            lookback_days,
            geo,
            output,
            images,
            max_images,
        } => {
            let query = SearchQuery::new(&city, &query, sort, Lookback::from(lookback_days));
            let results = scraper.search(&query).await.context("Search failed")?;

            info!("✅ Found {} listings", results.len());

            for (i, record) in results.iter().enumerate() {
                println!("{}. {}", i + 1, record);
                println!("   Posted: {}", record.posted_at());
                println!("   URL: {}", record.detail_url());
                if geo {
                    match scraper.geolocate(record).await {
                        Ok(point) => println!("   Map: {}", point.maps_url()),
                        Err(e) => warn!("Could not locate {}: {}", record.id(), e),
                    }
                }
                println!();
            }

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&results)?;
                tokio::fs::write(&path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("💾 Saved results to {}", path.display());
            }

            if let Some(dir) = images {
                tokio::fs::create_dir_all(&dir).await?;
                for (j, record) in results.iter().enumerate() {
                    info!("Post ({}/{}) images downloading.", j + 1, results.len());
                    for (index, bytes) in scraper.download_images(record, max_images).await? {
                        let filename = dir.join(format!("{}_{}.jpg", record.id(), index));
                        tokio::fs::write(&filename, bytes).await?;
                    }
                }
                info!("💾 Saved images to {}", dir.display());
            }
        }
        Command::Nearby { city } => {
            for slug in scraper.nearby_cities(&city).await? {
                println!("{}", slug);
            }
        }
        Command::State { state } => {
            for slug in scraper.cities_by_state(&state).await? {
                println!("{}", slug);
            }
        }
    }

    Ok(())
}
