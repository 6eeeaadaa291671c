//! Logging setup
//!
//! Logs go to stderr so stdout only carries command output.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `launcher=info`)
//! - `LAUNCHER_LOG_FORMAT`: `json` for structured output, anything else for pretty
//!
//! # Example
//!
//! ```text
//! LAUNCHER_LOG_FORMAT=json RUST_LOG=launcher=debug \
//!     launcher --topology topology.json kill 9
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Prefix match: covers launcher_core, launcher_infra_system and launcher_cli
const DEFAULT_FILTER: &str = "launcher=info";

pub fn init_logging() -> Result<()> {
    let log_format = std::env::var("LAUNCHER_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to install JSON subscriber")?,
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to install subscriber")?,
    }

    Ok(())
}
