use anyhow::Context;
use clap::Parser;
use hotel_offer_search::api::start_server;
use hotel_offer_search::{BatchMode, CatalogConfig, DatasetLoader, HotelCatalog, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hotel-offer-search", about = "Search hotel offers by city and dates")]
struct Args {
    /// HTTP bind address
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Directory holding cities.csv, advertisers.csv, hotels.csv and hotel_advertiser.csv
    #[arg(long, default_value = "samples")]
    data_dir: PathBuf,

    /// Validate a whole update batch before applying any of it
    #[arg(long)]
    atomic_batches: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind_addr: args.bind,
            data_dir: args.data_dir,
            catalog: CatalogConfig {
                batch_mode: if args.atomic_batches {
                    BatchMode::Atomic
                } else {
                    BatchMode::Sequential
                },
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from(Args::parse());

    let store = DatasetLoader::new(&config.data_dir)
        .load()
        .with_context(|| format!("loading dataset from {}", config.data_dir.display()))?;
    let catalog = Arc::new(HotelCatalog::new(store, config.catalog.clone()));

    start_server(config.bind_addr, catalog)
        .await
        .with_context(|| format!("serving on {}", config.bind_addr))?;
    Ok(())
}
