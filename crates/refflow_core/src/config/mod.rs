//! Settings for RefFlow, stored as `settings.toml`.
//!
//! One TOML table per [`ConfigSection`]. Missing keys take their defaults,
//! out-of-range values are reset, and a file that needed either is
//! rewritten on load.
//!
//! ```no_run
//! use refflow_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Exports go to: {}", config.settings().paths.output_folder);
//!
//! config.settings_mut().export.preset = "medium".to_string();
//! config.update_section(ConfigSection::Export).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult, LoadReport};
pub use settings::{
    ConfigSection, ExportSettings, LoggingSettings, PathSettings, PlaybackSettings, Settings,
};
