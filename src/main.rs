//! txview main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use txview_api::start_server;
use txview_config::Config;
use txview_core::ViewCoordinator;
use txview_source::{FixtureSource, SourceOptions};

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "txview")]
#[command(version = "0.1.0")]
#[command(about = "Transaction review board with employee filtering and local approvals", long_about = None)]
struct Args {
    /// Configuration file path (defaults to config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None if PathBuf::from(DEFAULT_CONFIG).exists() => PathBuf::from(DEFAULT_CONFIG),
        None => return Ok(Config::default()),
    };

    Config::load(path.clone()).map_err(|e| {
        let details = e.to_details();
        anyhow::anyhow!("{}", details).context(format!("loading {}", path.display()))
    })
}

fn init_logging(config: &Config) {
    let env = env_logger::Env::default().default_filter_or(config.logging.level.to_lowercase());
    env_logger::Builder::from_env(env).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(args.config)?;
    init_logging(&config);

    log::info!(
        "Config loaded: data path={}, page size={}",
        config.data.path.display(),
        config.pagination.page_size
    );

    let options = SourceOptions {
        page_size: config.pagination.page_size,
        latency: Duration::from_millis(config.source.latency_ms),
    };
    let source = FixtureSource::load(&config.data.path, options)
        .await
        .with_context(|| format!("failed to load data from {}", config.data.path.display()))?;

    let coordinator = Arc::new(ViewCoordinator::from_source(Arc::new(source)));
    coordinator.initialize().await;

    start_server(config, coordinator).await
}
