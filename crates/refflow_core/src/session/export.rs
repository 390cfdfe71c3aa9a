//! Single-flight playlist export driven from the session.
//!
//! [`Session::prepare_export`] validates and snapshots the playlist and takes
//! the export slot; the returned [`ExportJob`] runs without borrowing the
//! session so the front end stays responsive; [`Session::finish_export`]
//! saves the artifact and reports the outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::notice::Notice;
use super::Session;
use crate::export::{
    ClipExporter, ExportArtifact, ExportError, ExportOptions, ExportPermit, ExportPlan,
    ExportResult, ExportStatus, TranscodeEngine,
};
use crate::logging::LogCallback;
use crate::media::TimeSource;
use crate::models::PlaylistId;

/// A validated export holding the export slot until it finishes.
pub struct ExportJob {
    plan: ExportPlan,
    source: PathBuf,
    exporter: ClipExporter,
    _permit: ExportPermit,
}

impl ExportJob {
    pub fn plan(&self) -> &ExportPlan {
        &self.plan
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Forward export log lines to `callback`.
    pub fn with_log_callback(mut self, callback: LogCallback) -> Self {
        self.exporter = self.exporter.with_log_callback(callback);
        self
    }

    /// Run every stage on `engine`. The slot is released when this returns.
    pub async fn run<E>(self, engine: &mut E) -> ExportResult<ExportArtifact>
    where
        E: TranscodeEngine + ?Sized,
    {
        let ExportJob {
            plan,
            source,
            exporter,
            _permit,
        } = self;
        exporter.run(&plan, &source, engine).await
    }
}

impl<T: TimeSource> Session<T> {
    /// Subscribe to export status updates.
    pub fn export_status(&self) -> watch::Receiver<ExportStatus> {
        self.export_status.subscribe()
    }

    pub fn current_export_status(&self) -> ExportStatus {
        self.export_status.borrow().clone()
    }

    /// Whether an export currently holds the slot.
    pub fn is_exporting(&self) -> bool {
        self.export_gate.is_busy()
    }

    /// Ask the running export to stop at the next opportunity.
    pub fn cancel_export(&self) {
        if self.is_exporting() {
            tracing::info!("Export cancellation requested");
            self.export_cancel.cancel();
        }
    }

    /// Validate an export of `playlist_id` and take the export slot.
    ///
    /// Rejections (missing or empty playlist, no video, export in flight)
    /// queue a notice and never touch the engine or the status channel.
    pub fn prepare_export(&mut self, playlist_id: PlaylistId) -> ExportResult<ExportJob> {
        match self.try_prepare_export(playlist_id) {
            Ok(job) => {
                tracing::info!(
                    playlist = %job.plan.playlist_name,
                    clips = job.plan.clips.len(),
                    "Export started"
                );
                Ok(job)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Export rejected");
                self.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn try_prepare_export(&mut self, playlist_id: PlaylistId) -> ExportResult<ExportJob> {
        let plan = ExportPlan::build(&self.store, playlist_id, &self.settings.export.container)?;

        let source = self
            .video
            .as_ref()
            .map(|v| v.path().to_path_buf())
            .ok_or_else(|| ExportError::invalid_input("No video loaded"))?;

        let permit = self
            .export_gate
            .try_acquire()
            .ok_or_else(|| ExportError::invalid_input("An export is already in progress"))?;

        self.export_cancel = CancellationToken::new();
        let options = ExportOptions::from_settings(&self.settings, &self.settings.paths.logs_folder);
        let exporter = ClipExporter::new(options, Arc::clone(&self.export_status), self.export_cancel.clone());

        Ok(ExportJob {
            plan,
            source,
            exporter,
            _permit: permit,
        })
    }

    /// Save a finished export into the output folder and report the outcome.
    pub fn finish_export(&mut self, result: ExportResult<ExportArtifact>) -> ExportResult<PathBuf> {
        let output_dir = PathBuf::from(&self.settings.paths.output_folder);
        let saved = result.and_then(|artifact| {
            artifact
                .save_to(&output_dir)
                .map_err(|e| ExportError::save_failed(&artifact.file_name, e))
        });

        match &saved {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Export saved");
                self.notify(Notice::success("Export complete!"));
            }
            Err(ExportError::Cancelled { .. }) => {
                self.notify(Notice::info("Export cancelled"));
            }
            Err(err) => {
                tracing::error!(error = %err, "Export failed");
                if matches!(err, ExportError::SaveFailed { .. }) {
                    self.export_status.send_replace(ExportStatus::Failed {
                        message: err.to_string(),
                    });
                }
                self.notify(Notice::error(format!("Export failed: {}", err)));
            }
        }
        saved
    }

    /// Prepare, run and finish an export in one call.
    ///
    /// Holds the session for the whole export; front ends that must stay
    /// interactive use [`prepare_export`](Self::prepare_export) instead.
    pub async fn export_playlist<E>(&mut self, playlist_id: PlaylistId, engine: &mut E) -> ExportResult<PathBuf>
    where
        E: TranscodeEngine + ?Sized,
    {
        let job = self.prepare_export(playlist_id)?;
        let result = job.run(engine).await;
        self.finish_export(result)
    }
}
