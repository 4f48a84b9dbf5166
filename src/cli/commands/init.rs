//! Init command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Create the catalog directory and persist the configuration.
pub fn run_init(settings: &Settings) -> Result<()> {
    let catalog_dir = settings.catalog_dir();
    std::fs::create_dir_all(&catalog_dir)?;

    let config_path = Settings::default_config_path();
    if !config_path.exists() {
        settings.save()?;
        Output::success("Wrote default configuration");
    } else {
        Output::info("Configuration already exists");
    }

    Output::kv("Catalog", &catalog_dir.display().to_string());
    Output::kv("Config", &config_path.display().to_string());
    Ok(())
}
