//! Playlist export: cut each event's interval out of the source video and
//! join the clips into one file.
//!
//! - [`ExportPlan`] snapshots a playlist into chronologically ordered clips
//! - [`TranscodeEngine`] is the engine seam; [`FfmpegEngine`] drives the
//!   `ffmpeg` binary
//! - [`ClipExporter`] runs the stages and reports [`ExportStatus`]
//! - [`ExportGate`] keeps exports single-flight

mod artifact;
mod command;
mod engine;
mod errors;
mod exporter;
mod ffmpeg;
mod gate;
mod plan;
mod progress;

pub use artifact::ExportArtifact;
pub use command::{concat_manifest, parse_concat_manifest, EncodeOptions, TranscodeCommand};
pub use engine::{EngineObserver, NullObserver, TranscodeEngine};
pub use errors::{EngineError, EngineResult, ExportError, ExportResult};
pub use exporter::{ClipExporter, ExportOptions};
pub use ffmpeg::{parse_progress_line, FfmpegEngine};
pub use gate::{ExportGate, ExportPermit};
pub use plan::{ClipSpec, ExportPlan, MANIFEST_NAME};
pub use progress::{ExportStage, ExportStatus, ProgressTracker};
