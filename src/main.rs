use anyhow::{Context, Result, anyhow};
use genproxy::{config, server};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Picks the log directives, `RUST_LOG` first. A bare level must be one of
/// the known names; anything with a target or list goes to `EnvFilter`.
fn log_directives(from_env: Option<String>, configured: &str) -> Result<String> {
    let directives = from_env
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| configured.trim().to_string());

    if directives.contains(['=', ',']) {
        EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid log directives: '{}'", directives))?;
    } else {
        directives.parse::<LevelFilter>().map_err(|_| {
            anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                directives
            )
        })?;
    }

    Ok(directives)
}

fn init_tracing(directives: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(directives)?)
        .json()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()
        .await
        .context("Failed to load configuration")?;

    let directives = log_directives(std::env::var("RUST_LOG").ok(), &config.server.logs.level)?;
    init_tracing(&directives)?;

    info!("genproxy starting (log directives: {})", directives);
    info!(
        "Text model: {}, image model: {}",
        config.inference.text_model, config.inference.image_model
    );

    server::run(config).await?;

    Ok(())
}
