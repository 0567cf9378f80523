use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration to the default config location.
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    let config = setup_at_path(&path)?;
    println!(
        "Created configuration at {} for {}",
        path.display(),
        config.participants.iter().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

/// Writes the example configuration to `path` and reads it back, so a
/// roster the app cannot use is caught before the first `balance` run.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    let config = AppConfig::load_from_path(path)?;
    tracing::info!(
        participants = config.participants.len(),
        base_url = %config.backend.base_url,
        "Created configuration at {}",
        path.display()
    );
    Ok(config)
}
