//! The video file loaded into a session.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Container extensions accepted as video.
pub const VIDEO_EXTENSIONS: [&str; 8] = ["mkv", "mp4", "avi", "mov", "webm", "m4v", "ts", "m2ts"];

/// Error from opening a video source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    #[error("Not a video file: {path}")]
    NotAVideo { path: String },

    #[error("Video file not found: {path}")]
    NotFound { path: String },
}

pub type MediaResult<T> = Result<T, MediaError>;

/// A local video file selected by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    path: PathBuf,
}

impl VideoSource {
    /// Open `path` after checking it looks like a video and exists.
    pub fn open(path: impl Into<PathBuf>) -> MediaResult<Self> {
        let path = path.into();
        if !is_video_path(&path) {
            return Err(MediaError::NotAVideo {
                path: path.display().to_string(),
            });
        }
        if !path.is_file() {
            return Err(MediaError::NotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for display, falling back to the full path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Lowercase extension, used to name the engine's input file.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Whether `path` has a known video container extension (case-insensitive).
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}
