//! Loading and saving `settings.toml`.
//!
//! Writes go through a temp file and a rename. Section updates edit only
//! their own table with `toml_edit`. A file with unknown sections, missing
//! keys or out-of-range values is rewritten in clean form on load.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot serialize [{section}]: {source}")]
    Serialize {
        section: &'static str,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Malformed TOML in {path}: {source}")]
    Edit {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

impl ConfigError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// What a load found wrong with the file on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Top-level tables that are not settings sections.
    pub unknown_sections: Vec<String>,
    /// `section.key` entries filled in from defaults.
    pub missing_keys: Vec<String>,
    /// `section.key` entries reset because their value was out of range.
    pub reset_values: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_sections.is_empty() && self.missing_keys.is_empty() && self.reset_values.is_empty()
    }
}

/// Owns the settings and the file they came from.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Manager for `config_path` holding default settings until loaded.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory changes are written by `save()` or `update_section()`.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read the file as is. It must exist.
    pub fn load(&mut self) -> ConfigResult<LoadReport> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }
        let content = self.read()?;
        let (settings, report) = self.inspect(&content)?;
        self.settings = settings;
        Ok(report)
    }

    /// Read the file, creating it with defaults when absent and rewriting
    /// it when the load report is not clean.
    pub fn load_or_create(&mut self) -> ConfigResult<LoadReport> {
        if !self.config_path.exists() {
            tracing::info!(path = %self.config_path.display(), "Creating default settings");
            self.settings = Settings::default();
            self.save()?;
            return Ok(LoadReport::default());
        }

        let report = self.load()?;
        if !report.is_clean() {
            for section in &report.unknown_sections {
                tracing::warn!(section = %section, "Dropping unknown settings section");
            }
            for key in &report.reset_values {
                tracing::warn!(key = %key, "Setting out of range, using default");
            }
            if !report.missing_keys.is_empty() {
                tracing::debug!(keys = ?report.missing_keys, "Filling in default settings");
            }
            self.save()?;
        }
        Ok(report)
    }

    /// Create the output, temp and logs folders.
    pub fn ensure_dirs_exist(&self) -> ConfigResult<()> {
        let paths = &self.settings.paths;
        for dir in [&paths.output_folder, &paths.temp_root, &paths.logs_folder] {
            let dir = Path::new(dir);
            fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
        }
        Ok(())
    }

    pub fn logs_folder(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.logs_folder)
    }

    /// Write every section, replacing the file.
    pub fn save(&self) -> ConfigResult<()> {
        let mut output = String::from("# RefFlow settings\n# Regenerated when keys are missing or invalid.\n\n");
        for section in ConfigSection::ALL {
            output.push_str(section.comment());
            output.push('\n');
            output.push_str(&format!("[{}]\n", section.table_name()));
            output.push_str(&section_toml(&self.settings, section)?);
            output.push('\n');
        }
        self.atomic_write(&output)
    }

    /// Write one section, keeping the rest of the file (and its comments)
    /// as it is on disk.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let mut doc = if self.config_path.exists() {
            self.parse_document(&self.read()?)?
        } else {
            DocumentMut::new()
        };

        let table = self.parse_document(&section_toml(&self.settings, section)?)?;
        doc[section.table_name()] = Item::Table(table.as_table().clone());

        self.atomic_write(&doc.to_string())?;
        tracing::debug!(section = section.table_name(), "Settings section saved");
        Ok(())
    }

    fn read(&self) -> ConfigResult<String> {
        fs::read_to_string(&self.config_path).map_err(|e| ConfigError::io(&self.config_path, e))
    }

    fn parse_document(&self, content: &str) -> ConfigResult<DocumentMut> {
        content.parse().map_err(|source| ConfigError::Edit {
            path: self.config_path.clone(),
            source,
        })
    }

    /// Deserialize `content` and compare it with its clean form.
    fn inspect(&self, content: &str) -> ConfigResult<(Settings, LoadReport)> {
        let doc = self.parse_document(content)?;
        let mut settings: Settings = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        })?;

        let known: Vec<&str> = ConfigSection::ALL.iter().map(|s| s.table_name()).collect();
        let mut report = LoadReport {
            unknown_sections: doc
                .iter()
                .map(|(key, _)| key)
                .filter(|key| !known.contains(key))
                .map(str::to_string)
                .collect(),
            ..LoadReport::default()
        };

        for section in ConfigSection::ALL {
            let name = section.table_name();
            let expected = self.parse_document(&section_toml(&settings, section)?)?;
            let present = doc.get(name).and_then(Item::as_table);
            for (key, _) in expected.iter() {
                if !present.is_some_and(|table| table.contains_key(key)) {
                    report.missing_keys.push(format!("{}.{}", name, key));
                }
            }
        }

        report.reset_values = settings.sanitize();
        Ok((settings, report))
    }

    fn atomic_write(&self, content: &str) -> ConfigResult<()> {
        let path = &self.config_path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }

        let temp_path = path.with_extension("toml.tmp");
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, path)
        };
        write().map_err(|e| ConfigError::io(path, e))
    }
}

fn section_toml(settings: &Settings, section: ConfigSection) -> ConfigResult<String> {
    let rendered = match section {
        ConfigSection::Paths => toml::to_string_pretty(&settings.paths),
        ConfigSection::Logging => toml::to_string_pretty(&settings.logging),
        ConfigSection::Export => toml::to_string_pretty(&settings.export),
        ConfigSection::Playback => toml::to_string_pretty(&settings.playback),
    };
    rendered.map_err(|source| ConfigError::Serialize {
        section: section.table_name(),
        source,
    })
}
