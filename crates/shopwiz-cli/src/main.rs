mod run;

use clap::{Parser, Subcommand};
use shopwiz_core::ShopName;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopwiz-cli")]
#[command(about = "Search Irish grocery retailers from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every enabled shop, using the cache when possible
    Search {
        query: String,
        /// Result page; non-numeric values select page 1
        #[arg(long, default_value = "1")]
        page: String,
        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scrape a single shop directly, bypassing cache and aggregation
    Scrape {
        #[arg(value_parser = parse_shop)]
        shop: ShopName,
        query: String,
        /// Maximum number of products to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List configured shops
    Shops,
}

fn parse_shop(raw: &str) -> Result<ShopName, String> {
    ShopName::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = ShopName::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown shop '{raw}', expected one of: {}", known.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopwiz_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let shops = shopwiz_core::load_shops_or_default(&config.shops_path)?;

    match cli.command {
        Commands::Search { query, page, json } => {
            run::run_search(&config, &shops, &query, &page, json).await?;
        }
        Commands::Scrape { shop, query, limit } => {
            run::run_scrape(&config, &shops, shop, &query, limit).await?;
        }
        Commands::Shops => run::print_shops(&shops),
    }

    Ok(())
}
