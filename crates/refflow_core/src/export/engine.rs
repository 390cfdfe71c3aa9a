//! Transcoding engine abstraction.

use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::command::TranscodeCommand;
use super::errors::EngineResult;

/// Receives engine output while a command runs.
pub trait EngineObserver: Send + Sync {
    /// One line of engine log output.
    fn log_line(&self, line: &str);

    /// Fraction in `[0, 1]` of the current command.
    fn progress(&self, fraction: f64);
}

/// A transcoding engine with a private working filesystem.
///
/// One engine instance serves one export at a time. Calls are sequential:
/// `load` first, then file and command operations, then `cleanup`.
#[async_trait]
pub trait TranscodeEngine: Send {
    /// Prepare the engine and its working filesystem.
    async fn load(&mut self) -> EngineResult<()>;

    /// Bring a local file into the working filesystem as `name`.
    async fn import_file(&mut self, name: &str, source: &Path) -> EngineResult<()>;

    async fn write_file(&mut self, name: &str, contents: &[u8]) -> EngineResult<()>;

    /// Run one command to completion, or until `cancel` fires.
    async fn exec(
        &mut self,
        command: &TranscodeCommand,
        observer: &dyn EngineObserver,
        cancel: &CancellationToken,
    ) -> EngineResult<()>;

    async fn read_file(&mut self, name: &str) -> EngineResult<Vec<u8>>;

    /// Drop the working filesystem. Safe to call more than once.
    async fn cleanup(&mut self) -> EngineResult<()>;
}

/// Observer that discards everything.
pub struct NullObserver;

impl EngineObserver for NullObserver {
    fn log_line(&self, _line: &str) {}

    fn progress(&self, _fraction: f64) {}
}
