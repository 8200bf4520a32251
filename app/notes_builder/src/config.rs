use std::fs;
use std::path::{Path, PathBuf};

use minpair_core::{FfmpegConfig, PipelineConfig, TtsConfig};

/// High-level configuration for the notes builder
#[derive(Clone, Debug, Default)]
pub struct NotesBuilderConfig {
    pub tts: TtsConfig,
    pub media: FfmpegConfig,
    pub pipeline: PipelineConfig,
}

impl NotesBuilderConfig {
    /// Load configuration from a TOML file (path via NOTES_BUILDER_CONFIG or
    /// ./notes_builder.toml), overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path =
            std::env::var("NOTES_BUILDER_CONFIG").unwrap_or_else(|_| "notes_builder.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "notes_builder", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<NotesBuilderToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target = "notes_builder", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target = "notes_builder", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct NotesBuilderToml {
    pub tts: Option<TtsToml>,
    pub media: Option<MediaToml>,
    pub pipeline: Option<PipelineToml>,
}

impl NotesBuilderToml {
    fn overlay(self, mut base: NotesBuilderConfig) -> NotesBuilderConfig {
        if let Some(t) = self.tts {
            t.apply(&mut base.tts);
        }
        if let Some(m) = self.media {
            m.apply(&mut base.media);
        }
        if let Some(p) = self.pipeline {
            p.apply(&mut base.pipeline);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct TtsToml {
    pub endpoint: Option<String>,
    pub speed: Option<String>,
    pub format: Option<String>,
    pub request_timeout_ms: Option<u64>,
}
impl TtsToml {
    fn apply(self, t: &mut TtsConfig) {
        if let Some(x) = self.endpoint {
            t.endpoint = x;
        }
        if let Some(x) = self.speed {
            t.speed = x;
        }
        if let Some(x) = self.format {
            t.format = x;
        }
        if let Some(x) = self.request_timeout_ms {
            t.request_timeout_ms = x;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct MediaToml {
    pub ffmpeg_bin: Option<PathBuf>,
    pub sample_rate: Option<u32>,
}
impl MediaToml {
    fn apply(self, m: &mut FfmpegConfig) {
        if let Some(x) = self.ffmpeg_bin {
            m.bin = x;
        }
        if let Some(x) = self.sample_rate {
            m.sample_rate = x;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct PipelineToml {
    pub base_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub delimiter: Option<String>,
    pub female_voice: Option<String>,
    pub male_voice: Option<String>,
    pub download_delay_ms: Option<u64>,
    pub silence_secs: Option<f64>,
    pub audio_ext: Option<String>,
}
impl PipelineToml {
    fn apply(self, p: &mut PipelineConfig) {
        if let Some(x) = self.base_dir {
            p.base_dir = x;
        }
        if let Some(x) = self.work_dir {
            p.work_dir = x;
        }
        if let Some(x) = self.delimiter.and_then(|s| s.chars().next()) {
            p.delimiter = x;
        }
        if let Some(x) = self.female_voice {
            p.female_voice = x;
        }
        if let Some(x) = self.male_voice {
            p.male_voice = x;
        }
        if let Some(x) = self.download_delay_ms {
            p.download_delay_ms = x;
        }
        if let Some(x) = self.silence_secs {
            p.silence_secs = x;
        }
        if let Some(x) = self.audio_ext {
            p.audio_ext = x;
        }
    }
}
