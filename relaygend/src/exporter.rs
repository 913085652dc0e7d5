//! Relaygen fixture export run.

use std::path::Path;

use tracing::info;

use relaygen_export::{record::FixtureFile, FixtureAssembler, JsonRpcSource};
use relaygen_fetch::jsonrpc::connector::JsonRpcConnector;

use crate::{config::RelaygendConfig, error::RelaygendError};

/// Runs a full export: connects to the node, assembles the fixture for
/// the configured blocks and writes the document once at the end.
pub async fn run_export(config: RelaygendConfig) -> Result<(), RelaygendError> {
    startup_message();
    config.check_config()?;

    info!("Checking connection with node..");
    let connector = JsonRpcConnector::new_from_config_parts(
        config.node_settings.rpc_listen_address,
        config
            .node_settings
            .rpc_user
            .clone()
            .unwrap_or_else(|| "xxxxxx".to_string()),
        config
            .node_settings
            .rpc_password
            .clone()
            .unwrap_or_else(|| "xxxxxx".to_string()),
        config.node_settings.rpc_cookie_path.clone(),
    )
    .await?;
    info!(
        " - Connected to node using JsonRPC at address {}.",
        connector.url()
    );

    let chain_height = connector.get_block_count().await?;
    info!(
        " - Node reports chain height {} on {}.",
        chain_height.0,
        config.network.chain_name()
    );

    // Callers may copy hashes out of previously exported fixtures; the
    // node wants them bare.
    let block_hashes: Vec<String> = config
        .blocks
        .iter()
        .map(|hash| hash.trim_start_matches("0x").to_lowercase())
        .collect();

    let source = JsonRpcSource::new(connector);
    let assembler = FixtureAssembler::new(&source);
    let fixture = assembler.assemble(&block_hashes).await?;

    write_fixture(&fixture, &config.output_path)?;
    info!(
        "### Exported {} blocks to {} ###",
        fixture.0.len(),
        config.output_path.display()
    );

    Ok(())
}

/// Writes the finished fixture document. This is the run's only side
/// effect; nothing is written incrementally.
pub fn write_fixture(fixture: &FixtureFile, path: &Path) -> Result<(), RelaygendError> {
    let document = fixture.to_json_pretty()?;
    std::fs::write(path, document)?;
    Ok(())
}

/// Prints the startup message.
fn startup_message() {
    info!("Starting relaygen..");
}
