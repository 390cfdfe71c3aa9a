//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Clip export settings.
    #[serde(default)]
    pub export: ExportSettings,

    /// Transport and timeline settings.
    #[serde(default)]
    pub playback: PlaybackSettings,
}

/// Path configuration for exports, engine scratch space and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder exported playlists are saved into.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Root folder for per-export engine working directories.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for export log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "exports".to_string()
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for the application-wide subscriber.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact export logs (engine output only kept in the tail).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of engine output lines replayed on error.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
        }
    }
}

/// Encoder options used when cutting clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Path to the ffmpeg executable (empty = find in PATH).
    #[serde(default)]
    pub ffmpeg_path: String,

    /// Video encoder for the re-encoded clips.
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Audio encoder for the re-encoded clips.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Encoder preset.
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Output container extension.
    #[serde(default = "default_container")]
    pub container: String,

    /// Keep the engine working directory after the export (debugging).
    #[serde(default)]
    pub keep_work_dir: bool,
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_preset() -> String {
    "fast".to_string()
}

fn default_container() -> String {
    "mp4".to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: String::new(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            preset: default_preset(),
            container: default_container(),
            keep_work_dir: false,
        }
    }
}

impl ExportSettings {
    /// The ffmpeg command to run.
    pub fn ffmpeg_cmd(&self) -> &str {
        if self.ffmpeg_path.trim().is_empty() {
            "ffmpeg"
        } else {
            self.ffmpeg_path.as_str()
        }
    }
}

/// Transport and timeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Seconds jumped by the skip buttons.
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,

    /// Zoom increment of the timeline zoom buttons.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,

    /// Selectable playback rates.
    #[serde(default = "default_rates")]
    pub rates: Vec<f64>,
}

fn default_skip_seconds() -> f64 {
    5.0
}

fn default_zoom_step() -> f64 {
    0.2
}

fn default_rates() -> Vec<f64> {
    vec![0.5, 1.0, 1.5, 2.0]
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            skip_seconds: default_skip_seconds(),
            zoom_step: default_zoom_step(),
            rates: default_rates(),
        }
    }
}

impl Settings {
    /// Replace out-of-range values with their defaults.
    ///
    /// Returns one `section.key` entry per value that was reset.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut reset = Vec::new();

        let export = &mut self.export;
        if export.container.trim().trim_start_matches('.').is_empty() {
            export.container = default_container();
            reset.push("export.container".to_string());
        }
        for (key, value, default) in [
            ("export.video_codec", &mut export.video_codec, default_video_codec()),
            ("export.audio_codec", &mut export.audio_codec, default_audio_codec()),
            ("export.preset", &mut export.preset, default_preset()),
        ] {
            if value.trim().is_empty() {
                *value = default;
                reset.push(key.to_string());
            }
        }

        let playback = &mut self.playback;
        if !(playback.skip_seconds.is_finite() && playback.skip_seconds > 0.0) {
            playback.skip_seconds = default_skip_seconds();
            reset.push("playback.skip_seconds".to_string());
        }
        if !(playback.zoom_step.is_finite() && playback.zoom_step > 0.0) {
            playback.zoom_step = default_zoom_step();
            reset.push("playback.zoom_step".to_string());
        }
        let before = playback.rates.len();
        playback.rates.retain(|r| r.is_finite() && *r > 0.0);
        if playback.rates.is_empty() {
            playback.rates = default_rates();
        }
        if playback.rates.len() != before {
            reset.push("playback.rates".to_string());
        }

        if self.logging.progress_step == 0 || self.logging.progress_step > 100 {
            self.logging.progress_step = default_progress_step();
            reset.push("logging.progress_step".to_string());
        }

        reset
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Logging,
    Export,
    Playback,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Paths,
        ConfigSection::Logging,
        ConfigSection::Export,
        ConfigSection::Playback,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Export => "export",
            ConfigSection::Playback => "playback",
        }
    }

    /// Comment written above the section.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Output, scratch and log directories",
            ConfigSection::Logging => "# Logging configuration",
            ConfigSection::Export => "# Clip export encoder options",
            ConfigSection::Playback => "# Transport and timeline behaviour",
        }
    }
}
