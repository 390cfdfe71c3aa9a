//! RefFlow - main entry point
//!
//! Loads configuration, initializes logging, creates the working
//! directories and runs the command loop on stdin.

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;

use refflow_core::config::ConfigManager;
use refflow_core::logging::init_tracing_with_file;

mod command;
mod repl;

use repl::Repl;

/// Config path resolution: `REFFLOW_CONFIG`, then `.config/settings.toml`
/// in the working directory if present, then the per-user config dir.
fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("REFFLOW_CONFIG") {
        return PathBuf::from(path);
    }

    let local = PathBuf::from(".config").join("settings.toml");
    if local.exists() {
        return local;
    }

    ProjectDirs::from("io.github", "refflow", "refflow")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or(local)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = default_config_path();
    let mut config_manager = ConfigManager::new(&config_path);

    let report = match config_manager.load_or_create() {
        Ok(report) => Some(report),
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            None
        }
    };

    let logs_dir = config_manager.logs_folder();
    if let Err(e) = config_manager.ensure_dirs_exist() {
        eprintln!("Warning: Failed to create directories: {}", e);
    }
    let _log_guard = init_tracing_with_file(config_manager.settings().logging.level, &logs_dir);

    tracing::info!("RefFlow starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", refflow_core::version());
    if let Some(report) = report.filter(|r| !r.is_clean()) {
        tracing::info!(
            unknown = ?report.unknown_sections,
            filled = report.missing_keys.len(),
            reset = ?report.reset_values,
            "Settings file was rewritten"
        );
    }

    let settings = config_manager.settings().clone();
    Repl::new(settings).run().await
}
