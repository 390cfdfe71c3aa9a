//! Engine command lists for clip extraction and concatenation.

use std::fmt;

/// Encoder options for the re-encoded clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "fast".to_string(),
        }
    }
}

/// One command for the transcoding engine.
///
/// File names are relative to the engine's working filesystem.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeCommand {
    /// Cut `[start, start + duration)` out of `input`, re-encoding so the
    /// boundaries are frame accurate.
    ExtractClip {
        input: String,
        start: f64,
        duration: f64,
        output: String,
        encode: EncodeOptions,
    },
    /// Join the files listed in `manifest` by stream copy.
    Concat {
        manifest: String,
        output: String,
        /// Sum of the clip durations, for progress.
        total_duration: f64,
    },
}

impl TranscodeCommand {
    /// Argument list, without the binary or any reporting flags.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            TranscodeCommand::ExtractClip {
                input,
                start,
                duration,
                output,
                encode,
            } => vec![
                "-i".to_string(),
                input.clone(),
                // -ss after -i: decode-accurate seek
                "-ss".to_string(),
                format!("{:.3}", start),
                "-t".to_string(),
                format!("{:.3}", duration),
                "-c:v".to_string(),
                encode.video_codec.clone(),
                "-c:a".to_string(),
                encode.audio_codec.clone(),
                "-preset".to_string(),
                encode.preset.clone(),
                "-avoid_negative_ts".to_string(),
                "make_zero".to_string(),
                "-fflags".to_string(),
                "+genpts".to_string(),
                "-y".to_string(),
                output.clone(),
            ],
            TranscodeCommand::Concat {
                manifest, output, ..
            } => vec![
                "-f".to_string(),
                "concat".to_string(),
                "-safe".to_string(),
                "0".to_string(),
                "-i".to_string(),
                manifest.clone(),
                "-c".to_string(),
                "copy".to_string(),
                "-y".to_string(),
                output.clone(),
            ],
        }
    }

    /// Media duration the command produces, in seconds.
    pub fn expected_duration(&self) -> f64 {
        match self {
            TranscodeCommand::ExtractClip { duration, .. } => *duration,
            TranscodeCommand::Concat { total_duration, .. } => *total_duration,
        }
    }

    pub fn output(&self) -> &str {
        match self {
            TranscodeCommand::ExtractClip { output, .. } | TranscodeCommand::Concat { output, .. } => output,
        }
    }
}

impl fmt::Display for TranscodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ffmpeg {}", self.to_args().join(" "))
    }
}

/// Concat demuxer manifest listing `files` in order.
pub fn concat_manifest<S: AsRef<str>>(files: &[S]) -> String {
    files
        .iter()
        .map(|f| format!("file '{}'\n", f.as_ref()))
        .collect()
}

/// Parse a manifest written by [`concat_manifest`] back into file names.
pub fn parse_concat_manifest(manifest: &str) -> Vec<String> {
    manifest
        .lines()
        .filter_map(|line| {
            line.trim()
                .strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .map(str::to_string)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_args_seek_after_input() {
        let cmd = TranscodeCommand::ExtractClip {
            input: "input.mp4".into(),
            start: 2.0,
            duration: 3.25,
            output: "clip0.mp4".into(),
            encode: EncodeOptions::default(),
        };
        assert_eq!(
            cmd.to_args().join(" "),
            "-i input.mp4 -ss 2.000 -t 3.250 -c:v libx264 -c:a aac -preset fast \
             -avoid_negative_ts make_zero -fflags +genpts -y clip0.mp4"
        );
        assert_eq!(cmd.output(), "clip0.mp4");
    }

    #[test]
    fn concat_args_stream_copy() {
        let cmd = TranscodeCommand::Concat {
            manifest: "concat.txt".into(),
            output: "output.mp4".into(),
            total_duration: 8.0,
        };
        assert_eq!(
            cmd.to_string(),
            "ffmpeg -f concat -safe 0 -i concat.txt -c copy -y output.mp4"
        );
        assert_eq!(cmd.expected_duration(), 8.0);
    }

    #[test]
    fn manifest_lists_files_in_order() {
        let manifest = concat_manifest(&["clip0.mp4", "clip1.mp4"]);
        assert_eq!(manifest, "file 'clip0.mp4'\nfile 'clip1.mp4'\n");
        assert_eq!(parse_concat_manifest(&manifest), vec!["clip0.mp4", "clip1.mp4"]);
    }
}
