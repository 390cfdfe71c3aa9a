//! One log file per export.
//!
//! Every line goes to `<playlist>.log` in the logs folder, to the optional
//! UI callback and to `tracing`. Engine output is kept in a bounded tail
//! that is replayed after a failure. In compact mode engine output stays
//! out of the file and progress is thinned to `progress_step` intervals.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

struct LogState {
    writer: Option<BufWriter<File>>,
    tail: VecDeque<String>,
    last_progress: Option<u32>,
}

pub struct ExportLogger {
    export_name: String,
    log_path: PathBuf,
    config: LogConfig,
    callback: Option<LogCallback>,
    started: Instant,
    state: Mutex<LogState>,
}

impl ExportLogger {
    /// Create `<export_name>.log` in `log_dir`, truncating an older log of
    /// the same playlist.
    pub fn new(
        export_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let export_name = export_name.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&export_name)));
        let mut writer = BufWriter::new(File::create(&log_path)?);
        writeln!(
            writer,
            "# RefFlow export '{}' started {}",
            export_name,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;

        Ok(Self {
            state: Mutex::new(LogState {
                writer: Some(writer),
                tail: VecDeque::with_capacity(config.error_tail),
                last_progress: None,
            }),
            export_name,
            log_path,
            config,
            callback,
            started: Instant::now(),
        })
    }

    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Seconds since the logger was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        let export = &self.export_name;
        match level {
            LogLevel::Trace => tracing::trace!(export = %export, "{}", message),
            LogLevel::Debug => tracing::debug!(export = %export, "{}", message),
            LogLevel::Info => tracing::info!(export = %export, "{}", message),
            LogLevel::Warn => tracing::warn!(export = %export, "{}", message),
            LogLevel::Error => tracing::error!(export = %export, "{}", message),
        }

        self.emit(message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// An engine command about to run.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    /// Start of an export stage.
    pub fn phase(&self, stage: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(stage));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log overall progress. Returns whether the value was written.
    ///
    /// Compact mode writes 0, each crossing of a `progress_step` multiple,
    /// and 100. Otherwise every change is written.
    pub fn progress(&self, percent: u32) -> bool {
        {
            let mut state = self.state.lock();
            let step = self.config.progress_step.max(1);
            let keep = match (self.config.compact, state.last_progress) {
                (_, Some(previous)) if previous == percent => false,
                (true, Some(previous)) => percent >= 100 || percent / step > previous / step,
                (true, None) => percent == 0 || percent >= step,
                (false, _) => true,
            };
            if !keep {
                return false;
            }
            state.last_progress = Some(percent);
        }

        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// One line of engine output.
    pub fn output_line(&self, line: &str) {
        {
            let mut state = self.state.lock();
            if self.config.error_tail > 0 {
                if state.tail.len() >= self.config.error_tail {
                    state.tail.pop_front();
                }
                state.tail.push_back(line.to_string());
            }
        }

        if !self.config.compact {
            self.emit(line);
        }
    }

    /// Replay the engine output tail under a `[<tool>/tail]` header.
    pub fn show_tail(&self, tool: &str) {
        let lines = self.tail();
        if lines.is_empty() {
            return;
        }
        self.emit(&format!("[{}/tail]", tool));
        for line in &lines {
            self.emit(line);
        }
    }

    pub fn tail(&self) -> Vec<String> {
        self.state.lock().tail.iter().cloned().collect()
    }

    pub fn flush(&self) {
        if let Some(writer) = self.state.lock().writer.as_mut() {
            let _ = writer.flush();
        }
    }

    /// Write the closing line and release the file. Later lines only reach
    /// the callback.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if let Some(mut writer) = state.writer.take() {
            let _ = writeln!(writer, "# finished after {:.1}s", self.elapsed_secs());
            let _ = writer.flush();
        }
    }

    fn emit(&self, message: &str) {
        let line = if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        };

        if let Some(writer) = self.state.lock().writer.as_mut() {
            let _ = writeln!(writer, "{}", line);
        }
        if let Some(callback) = &self.callback {
            callback(&line);
        }
    }
}

impl Drop for ExportLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are not allowed in file names on common
/// platforms. Never returns an empty name.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect();

    match cleaned.trim().trim_matches('.') {
        "" => "export".to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file_named_after_export() {
        let dir = tempdir().unwrap();
        let logger =
            ExportLogger::new("Attacking Plays", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().ends_with("Attacking Plays.log"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempdir().unwrap();
        let logger = ExportLogger::new("reel", dir.path(), LogConfig::default(), None).unwrap();

        logger.phase("Concatenate");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("=== Concatenate ==="));
    }

    #[test]
    fn calls_callback() {
        let dir = tempdir().unwrap();
        let call_count = Arc::new(AtomicUsize::new(0));
        let count_clone = call_count.clone();

        let callback: LogCallback = Box::new(move |_msg| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        let logger = ExportLogger::new("reel", dir.path(), LogConfig::default(), Some(callback)).unwrap();

        logger.info("one");
        logger.info("two");
        logger.debug("filtered by level");

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compact_mode_filters_progress() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: true,
            progress_step: 20,
            ..LogConfig::default()
        };
        let logger = ExportLogger::new("reel", dir.path(), config, None).unwrap();

        assert!(logger.progress(0));
        assert!(!logger.progress(5));
        assert!(!logger.progress(15));
        assert!(logger.progress(20));
        assert!(!logger.progress(25));
        assert!(logger.progress(40));
        assert!(logger.progress(100));
    }

    #[test]
    fn compact_output_lines_only_reach_the_tail() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: true,
            error_tail: 3,
            ..LogConfig::default()
        };
        let logger = ExportLogger::new("reel", dir.path(), config, None).unwrap();

        for i in 0..5 {
            logger.output_line(&format!("frame= {}", i));
        }
        logger.flush();

        assert_eq!(logger.tail(), vec!["frame= 2", "frame= 3", "frame= 4"]);
        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(!content.contains("frame="));

        logger.show_tail("ffmpeg");
        logger.flush();
        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("[ffmpeg/tail]"));
        assert!(content.contains("frame= 4"));
    }

    #[test]
    fn close_writes_footer_once() {
        let dir = tempdir().unwrap();
        let logger = ExportLogger::new("reel", dir.path(), LogConfig::default(), None).unwrap();
        logger.info("cut");
        logger.close();
        logger.close();
        logger.info("after close");

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.starts_with("# RefFlow export 'reel' started "));
        assert_eq!(content.matches("# finished after").count(), 1);
        assert!(!content.contains("after close"));
    }

    #[test]
    fn verbose_mode_writes_every_change() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: false,
            ..LogConfig::default()
        };
        let logger = ExportLogger::new("reel", dir.path(), config, None).unwrap();
        assert!(logger.progress(3));
        assert!(!logger.progress(3));
        assert!(logger.progress(4));
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a<b>c"), "a_b_c");
        assert_eq!(sanitize_filename("  ..  "), "export");
    }
}
