//! Finished export output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::logging::sanitize_filename;

/// The concatenated clip, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested name, `<playlist-name>.<container>`.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write into `dir` under the sanitized suggested name.
    pub fn save_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let file_name = match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !ext.is_empty() => format!("{}.{}", sanitize_filename(stem), ext),
            _ => sanitize_filename(&self.file_name),
        };

        let target = dir.join(file_name);
        fs::write(&target, &self.bytes)?;
        Ok(target)
    }
}
