//! Error types for the export pipeline.
//!
//! Errors carry context that chains through layers:
//! Playlist → Stage → Engine → Detail

use std::io;

use thiserror::Error;

use super::progress::ExportStage;

/// Top-level export error with playlist context.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The export was rejected before the engine was touched.
    #[error("{0}")]
    InvalidInput(String),

    /// A stage failed; the whole export is aborted.
    #[error("Export of '{playlist}' failed at stage '{stage}': {source}")]
    StageFailed {
        playlist: String,
        stage: ExportStage,
        #[source]
        source: EngineError,
    },

    #[error("Export of '{playlist}' was cancelled")]
    Cancelled { playlist: String },

    /// The artifact was produced but could not be written out.
    #[error("Failed to save '{file_name}': {source}")]
    SaveFailed {
        file_name: String,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Wrap an engine error, turning engine cancellation into [`ExportError::Cancelled`].
    pub fn stage_failed(playlist: impl Into<String>, stage: ExportStage, source: EngineError) -> Self {
        match source {
            EngineError::Cancelled => Self::Cancelled {
                playlist: playlist.into(),
            },
            source => Self::StageFailed {
                playlist: playlist.into(),
                stage,
                source,
            },
        }
    }

    pub fn cancelled(playlist: impl Into<String>) -> Self {
        Self::Cancelled {
            playlist: playlist.into(),
        }
    }

    pub fn save_failed(file_name: impl Into<String>, source: io::Error) -> Self {
        Self::SaveFailed {
            file_name: file_name.into(),
            source,
        }
    }

    /// Whether the engine was never invoked.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Error from the transcoding engine with operation context.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary could not be started.
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// An engine command exited unsuccessfully.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Working filesystem I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A file was missing from the engine's working filesystem.
    #[error("File not found in engine workspace: {name}")]
    FileNotFound { name: String },

    #[error("Engine command was cancelled")]
    Cancelled,

    /// An operation was issued before `load`.
    #[error("Engine is not loaded")]
    NotLoaded,
}

impl EngineError {
    pub fn spawn(tool: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            tool: tool.into(),
            source,
        }
    }

    pub fn command_failed(tool: impl Into<String>, exit_code: i32, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn file_not_found(name: impl Into<String>) -> Self {
        Self::FileNotFound { name: name.into() }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_chain_context() {
        let err = ExportError::stage_failed(
            "Highlights",
            ExportStage::Concatenate,
            EngineError::command_failed("ffmpeg", 1, "Invalid data found"),
        );
        assert_eq!(
            err.to_string(),
            "Export of 'Highlights' failed at stage 'Concatenate': ffmpeg failed with exit code 1: Invalid data found"
        );
    }

    #[test]
    fn engine_cancel_becomes_export_cancel() {
        let err = ExportError::stage_failed("Saves", ExportStage::ExtractClips, EngineError::Cancelled);
        assert!(matches!(err, ExportError::Cancelled { ref playlist } if playlist == "Saves"));
        assert!(!err.is_rejection());
        assert!(ExportError::invalid_input("Playlist is empty").is_rejection());
    }
}
