//! Clip exporter: runs an [`ExportPlan`] through a [`TranscodeEngine`].
//!
//! Stages run strictly in sequence:
//! 1. Initialize the engine
//! 2. Load the source video into its working filesystem
//! 3. Extract each clip (re-encoded) in chronological order
//! 4. Write the concat manifest
//! 5. Concatenate by stream copy
//! 6. Read the output back as an [`ExportArtifact`]
//!
//! Any failure aborts the export. The engine is cleaned up either way and
//! the status channel ends in `Done` or `Failed`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::logging::{ExportLogger, LogCallback, LogConfig};

use super::artifact::ExportArtifact;
use super::command::EncodeOptions;
use super::engine::{EngineObserver, TranscodeEngine};
use super::errors::{EngineError, ExportError, ExportResult};
use super::plan::{ExportPlan, MANIFEST_NAME};
use super::progress::{ExportStage, ExportStatus, ProgressTracker};

/// Everything the exporter takes from configuration.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub encode: EncodeOptions,
    pub container: String,
    pub logs_dir: PathBuf,
    pub log_config: LogConfig,
}

impl ExportOptions {
    pub fn from_settings(settings: &Settings, logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            encode: EncodeOptions {
                video_codec: settings.export.video_codec.clone(),
                audio_codec: settings.export.audio_codec.clone(),
                preset: settings.export.preset.clone(),
            },
            container: settings.export.container.clone(),
            logs_dir: logs_dir.into(),
            log_config: LogConfig::from(&settings.logging),
        }
    }
}

/// Runs one export.
pub struct ClipExporter {
    options: ExportOptions,
    status: Arc<watch::Sender<ExportStatus>>,
    cancel: CancellationToken,
    log_callback: Option<LogCallback>,
}

impl ClipExporter {
    pub fn new(
        options: ExportOptions,
        status: Arc<watch::Sender<ExportStatus>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            options,
            status,
            cancel,
            log_callback: None,
        }
    }

    /// Forward every export log line to `callback` as well.
    pub fn with_log_callback(mut self, callback: LogCallback) -> Self {
        self.log_callback = Some(callback);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export `plan` cut from `source`.
    pub async fn run<E>(mut self, plan: &ExportPlan, source: &Path, engine: &mut E) -> ExportResult<ExportArtifact>
    where
        E: TranscodeEngine + ?Sized,
    {
        let logger = ExportLogger::new(
            &plan.playlist_name,
            &self.options.logs_dir,
            self.options.log_config.clone(),
            self.log_callback.take(),
        )
        .map_err(|e| {
            ExportError::stage_failed(
                &plan.playlist_name,
                ExportStage::Initialize,
                EngineError::io("creating export log", e),
            )
        })?;

        logger.info(&format!(
            "Exporting {} clip(s) of '{}' from {}",
            plan.clips.len(),
            plan.playlist_name,
            source.display()
        ));
        for event_id in &plan.skipped {
            logger.warn(&format!("Skipping {}: interval is empty or inverted", event_id));
        }

        let tracker = Mutex::new(ProgressTracker::new(plan.clips.len()));
        let result = self.run_stages(plan, source, engine, &logger, &tracker).await;

        if let Err(e) = engine.cleanup().await {
            logger.warn(&format!("Engine cleanup failed: {}", e));
        }

        match &result {
            Ok(artifact) => {
                logger.success(&format!(
                    "Export complete: {} ({} bytes)",
                    artifact.file_name,
                    artifact.len()
                ));
                self.status.send_replace(ExportStatus::Done {
                    file_name: artifact.file_name.clone(),
                });
            }
            Err(e) => {
                logger.error(&e.to_string());
                logger.show_tail("ffmpeg");
                self.status.send_replace(ExportStatus::Failed {
                    message: e.to_string(),
                });
            }
        }

        logger.close();
        result
    }

    async fn run_stages<E>(
        &self,
        plan: &ExportPlan,
        source: &Path,
        engine: &mut E,
        logger: &ExportLogger,
        tracker: &Mutex<ProgressTracker>,
    ) -> ExportResult<ExportArtifact>
    where
        E: TranscodeEngine + ?Sized,
    {
        let name = plan.playlist_name.as_str();

        self.begin(plan, ExportStage::Initialize, logger, tracker)?;
        engine.load().await.map_err(failed(name, ExportStage::Initialize))?;

        self.begin(plan, ExportStage::LoadSource, logger, tracker)?;
        let input = input_file_name(source);
        engine
            .import_file(&input, source)
            .await
            .map_err(failed(name, ExportStage::LoadSource))?;

        self.begin(plan, ExportStage::ExtractClips, logger, tracker)?;
        for command in plan.extract_commands(&input, &self.options.encode) {
            if self.cancel.is_cancelled() {
                return Err(ExportError::cancelled(name));
            }
            logger.command(&command.to_string());
            let observer = StageObserver {
                logger,
                tracker,
                status: &self.status,
                stage: ExportStage::ExtractClips,
            };
            engine
                .exec(&command, &observer, &self.cancel)
                .await
                .map_err(failed(name, ExportStage::ExtractClips))?;
            let percent = tracker.lock().complete_unit();
            publish(&self.status, logger, ExportStage::ExtractClips, percent);
        }

        self.begin(plan, ExportStage::WriteManifest, logger, tracker)?;
        let manifest = plan.manifest();
        logger.debug(&format!("{}:\n{}", MANIFEST_NAME, manifest.trim_end()));
        engine
            .write_file(MANIFEST_NAME, manifest.as_bytes())
            .await
            .map_err(failed(name, ExportStage::WriteManifest))?;

        self.begin(plan, ExportStage::Concatenate, logger, tracker)?;
        let concat = plan.concat_command();
        logger.command(&concat.to_string());
        let observer = StageObserver {
            logger,
            tracker,
            status: &self.status,
            stage: ExportStage::Concatenate,
        };
        engine
            .exec(&concat, &observer, &self.cancel)
            .await
            .map_err(failed(name, ExportStage::Concatenate))?;
        let percent = tracker.lock().complete_unit();
        publish(&self.status, logger, ExportStage::Concatenate, percent);

        self.begin(plan, ExportStage::ReadOutput, logger, tracker)?;
        let bytes = engine
            .read_file(&plan.output_file_name())
            .await
            .map_err(failed(name, ExportStage::ReadOutput))?;

        Ok(ExportArtifact {
            file_name: plan.artifact_name(),
            bytes,
        })
    }

    /// Enter `stage`, honouring cancellation at the boundary.
    fn begin(
        &self,
        plan: &ExportPlan,
        stage: ExportStage,
        logger: &ExportLogger,
        tracker: &Mutex<ProgressTracker>,
    ) -> ExportResult<()> {
        if self.cancel.is_cancelled() {
            logger.warn(&format!("Export cancelled before stage '{}'", stage));
            return Err(ExportError::cancelled(&plan.playlist_name));
        }
        logger.phase(stage.name());
        let percent = tracker.lock().percent();
        publish(&self.status, logger, stage, percent);
        Ok(())
    }
}

fn failed(playlist: &str, stage: ExportStage) -> impl FnOnce(EngineError) -> ExportError + '_ {
    move |source| ExportError::stage_failed(playlist, stage, source)
}

fn publish(status: &watch::Sender<ExportStatus>, logger: &ExportLogger, stage: ExportStage, percent: u32) {
    let next = ExportStatus::Running { percent, stage };
    let changed = status.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next.clone();
            true
        }
    });
    if changed {
        logger.progress(percent);
    }
}

/// Name of the source video inside the engine workspace.
fn input_file_name(source: &Path) -> String {
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "mp4".to_string());
    format!("input.{}", ext)
}

/// Routes engine output of one stage into the logger and status channel.
struct StageObserver<'a> {
    logger: &'a ExportLogger,
    tracker: &'a Mutex<ProgressTracker>,
    status: &'a watch::Sender<ExportStatus>,
    stage: ExportStage,
}

impl EngineObserver for StageObserver<'_> {
    fn log_line(&self, line: &str) {
        self.logger.output_line(line);
    }

    fn progress(&self, fraction: f64) {
        let percent = self.tracker.lock().unit_progress(fraction);
        publish(self.status, self.logger, self.stage, percent);
    }
}
