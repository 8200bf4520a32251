//! External media tool invocation
//!
//! The pipeline assumes a working ffmpeg on the machine. It is used for two
//! jobs only: synthesizing the fixed-duration silence pad, and concatenating
//! an ordered list of clips into one combined file via ffmpeg's concat
//! demuxer and a `file '<path>'` manifest. A non-zero exit is fatal; there is
//! no fallback encoding path.
//!
//! The manifest and the temporary concat output live at unqualified paths in
//! the current directory, so concurrent runs from one directory collide.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::{MinpairError, Result};

/// Seam over the external media executable so tests can substitute a fake.
pub trait MediaTool: Send + Sync {
    /// Synthesize a mono silence clip of `duration_secs` at `out`.
    fn synthesize_silence(&self, duration_secs: f64, out: &Path) -> Result<()>;

    /// Concatenate `inputs` in order into `out`. `out` must not be written
    /// until the tool has fully succeeded.
    fn concatenate(&self, inputs: &[PathBuf], out: &Path) -> Result<()>;
}

/// Configuration for the ffmpeg-backed media tool
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    pub bin: PathBuf,
    /// Sample rate of the synthesized silence pad
    pub sample_rate: u32,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            bin: std::env::var("MINPAIR_FFMPEG_BIN")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ffmpeg")),
            sample_rate: std::env::var("MINPAIR_SILENCE_SAMPLE_RATE")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(16_000),
        }
    }
}

/// ffmpeg subprocess implementation of [`MediaTool`]
#[derive(Debug, Clone, Default)]
pub struct FfmpegTool {
    cfg: FfmpegConfig,
}

impl FfmpegTool {
    pub fn new(cfg: FfmpegConfig) -> Self {
        Self { cfg }
    }
}

impl MediaTool for FfmpegTool {
    fn synthesize_silence(&self, duration_secs: f64, out: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.cfg.bin);
        cmd.arg("-f")
            .arg("lavfi")
            .arg("-i")
            .arg(format!("anullsrc=r={}:cl=mono", self.cfg.sample_rate))
            .arg("-t")
            .arg(format!("{duration_secs}"))
            .arg(out);
        run_checked(cmd, "silence synthesis")
    }

    fn concatenate(&self, inputs: &[PathBuf], out: &Path) -> Result<()> {
        let manifest = PathBuf::from("input-file-paths.txt");
        fs::write(&manifest, manifest_contents(inputs))?;

        let tmp_out = PathBuf::from("output.wav");
        let mut cmd = Command::new(&self.cfg.bin);
        cmd.arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .arg("-i")
            .arg(&manifest)
            .arg("-c")
            .arg("copy")
            .arg(&tmp_out);
        if let Err(e) = run_checked(cmd, "concatenation") {
            let _ = fs::remove_file(&manifest);
            return Err(e);
        }

        // Move into place only once the tool has fully succeeded
        fs::rename(&tmp_out, out)?;
        fs::remove_file(&manifest)?;
        Ok(())
    }
}

/// Concat demuxer manifest: one `file '<path>'` directive per input clip.
fn manifest_contents(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| format!("file '{}'", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn run_checked(mut cmd: Command, what: &str) -> Result<()> {
    debug!(target = "media", cmd = ?cmd, "Invoking media tool");
    let output = cmd
        .output()
        .map_err(|e| MinpairError::MediaTool(format!("failed to launch {what}: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MinpairError::MediaTool(format!(
            "{what} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lists_every_clip_in_order() {
        let inputs = vec![
            PathBuf::from("a.wav"),
            PathBuf::from("silence.wav"),
            PathBuf::from("b.wav"),
        ];
        assert_eq!(
            manifest_contents(&inputs),
            "file 'a.wav'\nfile 'silence.wav'\nfile 'b.wav'"
        );
    }

    #[test]
    fn test_missing_binary_is_fatal() {
        let tool = FfmpegTool::new(FfmpegConfig {
            bin: PathBuf::from("/nonexistent/ffmpeg-for-sure"),
            sample_rate: 16_000,
        });
        let err = tool
            .synthesize_silence(0.5, Path::new("silence-test.wav"))
            .unwrap_err();
        assert!(matches!(err, MinpairError::MediaTool(_)));
    }
}
