//! Relaygen binary: exports block and merkle-proof fixtures from a bitcoind node.

use std::path::PathBuf;

use tracing::error;

use relaygendlib::{config::load_config, exporter::run_export};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("relaygen.toml"));

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_export(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}
