//! Export stages, status reporting and monotonic progress.

use std::fmt;

use serde::Serialize;

/// Sequential stages of one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStage {
    Initialize,
    LoadSource,
    ExtractClips,
    WriteManifest,
    Concatenate,
    ReadOutput,
}

impl ExportStage {
    pub const ALL: [ExportStage; 6] = [
        ExportStage::Initialize,
        ExportStage::LoadSource,
        ExportStage::ExtractClips,
        ExportStage::WriteManifest,
        ExportStage::Concatenate,
        ExportStage::ReadOutput,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExportStage::Initialize => "Initialize",
            ExportStage::LoadSource => "LoadSource",
            ExportStage::ExtractClips => "ExtractClips",
            ExportStage::WriteManifest => "WriteManifest",
            ExportStage::Concatenate => "Concatenate",
            ExportStage::ReadOutput => "ReadOutput",
        }
    }
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observable state of the export slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExportStatus {
    #[default]
    Idle,
    Running { percent: u32, stage: ExportStage },
    Done { file_name: String },
    Failed { message: String },
}

impl ExportStatus {
    /// Progress shown to the user. Anything but a running export reads 0.
    pub fn percent(&self) -> u32 {
        match self {
            ExportStatus::Running { percent, .. } => *percent,
            _ => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ExportStatus::Running { .. })
    }
}

/// Overall progress across the clip extractions and the final concat.
///
/// Each engine command is one unit of work; fractional progress inside a
/// unit maps into that unit's share. The reported percentage never
/// decreases, even if an engine reports a smaller fraction later.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_units: usize,
    completed_units: usize,
    last_percent: u32,
}

impl ProgressTracker {
    /// Tracker for `clip_count` extractions plus one concatenation.
    pub fn new(clip_count: usize) -> Self {
        Self {
            total_units: clip_count + 1,
            completed_units: 0,
            last_percent: 0,
        }
    }

    pub fn percent(&self) -> u32 {
        self.last_percent
    }

    /// Record fractional progress of the current unit. Returns the new percentage.
    pub fn unit_progress(&mut self, fraction: f64) -> u32 {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let done = (self.completed_units as f64 + fraction) / self.total_units as f64;
        self.bump((done * 100.0).round() as u32)
    }

    /// Mark the current unit finished. Returns the new percentage.
    pub fn complete_unit(&mut self) -> u32 {
        self.completed_units = (self.completed_units + 1).min(self.total_units);
        let done = self.completed_units as f64 / self.total_units as f64;
        self.bump((done * 100.0).round() as u32)
    }

    fn bump(&mut self, percent: u32) -> u32 {
        self.last_percent = self.last_percent.max(percent.min(100));
        self.last_percent
    }
}
