use anyhow::{anyhow, Result};
use api::ApiConfig;
use tracing::info;

/// Run the API server until it stops or Ctrl-C is pressed
pub async fn execute(config: ApiConfig) -> Result<()> {
    info!(
        "Starting Taskboard on {} (ownership: {}, demo data: {})",
        config.bind_address(),
        config.ownership,
        config.seed_data
    );

    tokio::select! {
        result = api::start_server_with_config(config) => {
            result.map_err(|e| anyhow!("API server error: {}", e))?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
