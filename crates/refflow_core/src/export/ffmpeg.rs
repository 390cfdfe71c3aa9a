//! Transcoding engine backed by the `ffmpeg` binary.
//!
//! Each export gets a private working directory under the temp root. Input,
//! clips, manifest and output all live there and are removed by `cleanup`
//! unless the directory is kept for debugging.

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::command::TranscodeCommand;
use super::engine::{EngineObserver, TranscodeEngine};
use super::errors::{EngineError, EngineResult};

/// Lines of stderr kept for the failure message.
const STDERR_TAIL: usize = 5;

/// Runs engine commands as `ffmpeg` child processes.
#[derive(Debug)]
pub struct FfmpegEngine {
    ffmpeg: String,
    temp_root: PathBuf,
    keep_work_dir: bool,
    work_dir: Option<PathBuf>,
}

impl FfmpegEngine {
    pub fn new(ffmpeg: impl Into<String>, temp_root: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            temp_root: temp_root.into(),
            keep_work_dir: false,
            work_dir: None,
        }
    }

    pub fn with_keep_work_dir(mut self, keep: bool) -> Self {
        self.keep_work_dir = keep;
        self
    }

    /// The working directory, once loaded.
    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    fn workspace_path(&self, name: &str) -> EngineResult<PathBuf> {
        let dir = self.work_dir.as_ref().ok_or(EngineError::NotLoaded)?;
        Ok(dir.join(name))
    }
}

#[async_trait]
impl TranscodeEngine for FfmpegEngine {
    async fn load(&mut self) -> EngineResult<()> {
        let status = Command::new(&self.ffmpeg)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| EngineError::spawn(&self.ffmpeg, e))?;
        if !status.success() {
            return Err(EngineError::command_failed(
                &self.ffmpeg,
                status.code().unwrap_or(-1),
                "version check failed",
            ));
        }

        let dir = self.temp_root.join(format!(
            "export_{}_{}",
            Local::now().format("%Y%m%d_%H%M%S_%3f"),
            std::process::id()
        ));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| EngineError::io("creating engine work directory", e))?;

        tracing::debug!(work_dir = %dir.display(), "Engine loaded");
        self.work_dir = Some(dir);
        Ok(())
    }

    async fn import_file(&mut self, name: &str, source: &Path) -> EngineResult<()> {
        let target = self.workspace_path(name)?;
        if !source.is_file() {
            return Err(EngineError::file_not_found(source.display().to_string()));
        }

        // Same filesystem: link instead of copying a full match video.
        if tokio::fs::hard_link(source, &target).await.is_ok() {
            return Ok(());
        }
        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| EngineError::io("importing source video", e))?;
        Ok(())
    }

    async fn write_file(&mut self, name: &str, contents: &[u8]) -> EngineResult<()> {
        let target = self.workspace_path(name)?;
        tokio::fs::write(&target, contents)
            .await
            .map_err(|e| EngineError::io(format!("writing {}", name), e))
    }

    async fn exec(
        &mut self,
        command: &TranscodeCommand,
        observer: &dyn EngineObserver,
        cancel: &CancellationToken,
    ) -> EngineResult<()> {
        let work_dir = self.work_dir.clone().ok_or(EngineError::NotLoaded)?;
        let expected = command.expected_duration();

        let mut child = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-nostats", "-progress", "pipe:1"])
            .args(command.to_args())
            .current_dir(&work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::spawn(&self.ffmpeg, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::io("capturing ffmpeg stdout", ErrorKind::BrokenPipe.into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::io("capturing ffmpeg stderr", ErrorKind::BrokenPipe.into()))?;
        let mut stdout = BufReader::new(stdout).lines();
        let mut stderr = BufReader::new(stderr).lines();

        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL);
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    let _ = child.kill().await;
                    return Err(EngineError::Cancelled);
                }
                line = stdout.next_line(), if stdout_open => match line {
                    Ok(Some(line)) => {
                        if let Some(fraction) = parse_progress_line(&line, expected) {
                            observer.progress(fraction);
                        }
                    }
                    Ok(None) => stdout_open = false,
                    Err(e) => return Err(EngineError::io("reading ffmpeg progress", e)),
                },
                line = stderr.next_line(), if stderr_open => match line {
                    Ok(Some(line)) => {
                        observer.log_line(&line);
                        if tail.len() == STDERR_TAIL {
                            tail.pop_front();
                        }
                        tail.push_back(line);
                    }
                    Ok(None) => stderr_open = false,
                    Err(e) => return Err(EngineError::io("reading ffmpeg output", e)),
                },
            }
        }

        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let _ = child.kill().await;
                return Err(EngineError::Cancelled);
            }
            status = child.wait() => status.map_err(|e| EngineError::io("waiting for ffmpeg", e))?,
        };

        if !status.success() {
            let message = if tail.is_empty() {
                "no output".to_string()
            } else {
                Vec::from(tail).join(" | ")
            };
            return Err(EngineError::command_failed(
                "ffmpeg",
                status.code().unwrap_or(-1),
                message,
            ));
        }

        observer.progress(1.0);
        Ok(())
    }

    async fn read_file(&mut self, name: &str) -> EngineResult<Vec<u8>> {
        let path = self.workspace_path(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(EngineError::file_not_found(name)),
            Err(e) => Err(EngineError::io(format!("reading {}", name), e)),
        }
    }

    async fn cleanup(&mut self) -> EngineResult<()> {
        let Some(dir) = self.work_dir.take() else {
            return Ok(());
        };
        if self.keep_work_dir {
            tracing::info!(work_dir = %dir.display(), "Keeping engine work directory");
            return Ok(());
        }
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EngineError::io("removing engine work directory", e)),
        }
    }
}

/// Fraction of `expected` seconds reached, from one `-progress` line.
///
/// Understands `out_time_us`/`out_time_ms` (both microseconds) and
/// `progress=end`.
pub fn parse_progress_line(line: &str, expected: f64) -> Option<f64> {
    let (key, value) = line.trim().split_once('=')?;
    match key {
        "out_time_us" | "out_time_ms" => {
            if expected <= 0.0 {
                return None;
            }
            let micros: f64 = value.trim().parse().ok()?;
            Some((micros / 1_000_000.0 / expected).clamp(0.0, 1.0))
        }
        "progress" if value.trim() == "end" => Some(1.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_progress_keys() {
        assert_eq!(parse_progress_line("out_time_us=2500000", 5.0), Some(0.5));
        assert_eq!(parse_progress_line("out_time_ms=10000000", 5.0), Some(1.0));
        assert_eq!(parse_progress_line("progress=end", 5.0), Some(1.0));
        assert_eq!(parse_progress_line("progress=continue", 5.0), None);
        assert_eq!(parse_progress_line("out_time_us=N/A", 5.0), None);
        assert_eq!(parse_progress_line("frame=12", 5.0), None);
        assert_eq!(parse_progress_line("out_time_us=100", 0.0), None);
    }

    #[tokio::test]
    async fn file_ops_require_load() {
        let dir = tempdir().unwrap();
        let mut engine = FfmpegEngine::new("ffmpeg", dir.path());
        assert!(matches!(
            engine.write_file("concat.txt", b"x").await,
            Err(EngineError::NotLoaded)
        ));
        assert!(matches!(
            engine.read_file("output.mp4").await,
            Err(EngineError::NotLoaded)
        ));
        engine.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let dir = tempdir().unwrap();
        let mut engine = FfmpegEngine::new("/nonexistent/refflow-ffmpeg", dir.path());
        assert!(matches!(engine.load().await, Err(EngineError::Spawn { .. })));
    }
}
