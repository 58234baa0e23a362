mod pipeline;
mod provision;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catlift_core::{load_app_config, load_site, AppConfig, SiteConfig};
use catlift_scraper::{validate_site_selectors, HttpPageFetcher, RandomInventory};

use crate::pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(name = "catlift")]
#[command(about = "Crawl a catalog site, extract products, and provision them to a storefront")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract products from cached pages, optionally refreshing the caches first
    Run {
        /// Re-crawl collection pages and reseed the catalog first
        #[arg(long)]
        collections: bool,

        /// Re-fetch product pages before extracting
        #[arg(long)]
        products: bool,
    },
    /// Crawl collection pages and reseed the catalog
    Collect,
    /// Fetch and cache the product page of every catalog record
    Fetch,
    /// Extract product data from cached product pages into the catalog
    Extract,
    /// Create extracted products in the storefront
    Provision,
    /// Validate the site configuration and every selector in it
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let site = load_site(&config.site_path)
        .with_context(|| format!("failed to load site config {}", config.site_path.display()))?;
    tracing::debug!(?config, site = %site.name, "configuration loaded");

    match cli.command {
        Some(Commands::Run {
            collections,
            products,
        }) => run(&config, &site, collections, products).await,
        Some(Commands::Collect) => {
            validate_site_selectors(&site)?;
            let fetcher = HttpPageFetcher::from_config(&config)?;
            Pipeline::new(&config, &site, &fetcher).collect().await?;
            Ok(())
        }
        Some(Commands::Fetch) => {
            let fetcher = HttpPageFetcher::from_config(&config)?;
            Pipeline::new(&config, &site, &fetcher).fetch_products().await?;
            Ok(())
        }
        Some(Commands::Extract) | None => run(&config, &site, false, false).await,
        Some(Commands::Provision) => {
            let client = provision::build_admin_client(&config)?;
            provision::provision_catalog(&config, &client).await?;
            Ok(())
        }
        Some(Commands::Check) => check(&site),
    }
}

/// Runs the enabled crawl stages in order, then extraction. Reseeding the
/// catalog drops cached page paths, so `--collections` is normally paired
/// with `--products`.
async fn run(
    config: &AppConfig,
    site: &SiteConfig,
    collections: bool,
    products: bool,
) -> anyhow::Result<()> {
    validate_site_selectors(site)?;
    let fetcher = HttpPageFetcher::from_config(config)?;
    let pipeline = Pipeline::new(config, site, &fetcher);

    if collections {
        pipeline.collect().await?;
    }
    if products {
        pipeline.fetch_products().await?;
    }
    pipeline.extract(RandomInventory::from_os()).await?;
    Ok(())
}

fn check(site: &SiteConfig) -> anyhow::Result<()> {
    validate_site_selectors(site)?;
    println!(
        "site '{}' ok: {} collection source(s), {} metafield rule(s)",
        site.name,
        site.navigation
            .as_ref()
            .map_or(site.collection_urls.len(), |_| 1),
        site.metafields.len()
    );
    Ok(())
}
