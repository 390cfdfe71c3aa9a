//! Error types for store operations.

use thiserror::Error;

use crate::models::{EventId, PlaylistId, TagId};

/// Error from a tag, event, playlist or recording operation.
///
/// Every variant leaves the store unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// User input was rejected (empty name, bad color, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tag not found: {0}")]
    TagNotFound(TagId),

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// A reorder index was outside the playlist.
    #[error("Index {index} out of range for playlist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No video loaded")]
    NoVideoLoaded,
}

impl StoreError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
