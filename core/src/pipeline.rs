//! Run orchestration
//!
//! Strictly sequential state machine, no loops back:
//! Parse → CreateExportDir → MaterializeAssets → AssembleClips → ExportPairs.
//!
//! A combined clip already present under its canonical name in the media
//! directory is never rebuilt; that filename check is the only caching
//! mechanism and what makes repeated runs idempotent. Refused speech requests
//! and refused downloads skip the affected word but never abort the run; the
//! exported notes file therefore always lists every deduplicated word, even
//! ones that ended up without audio.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use reqwest::Url;
use tracing::{debug, info};

use crate::export;
use crate::media::MediaTool;
use crate::pair::{parse_components, PairComponent};
use crate::tts::SpeechService;
use crate::Result;

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for already-combined clips (e.g. the flashcard
    /// application's media directory).
    pub media_dir: PathBuf,
    /// Base directory under which each run creates its timestamped bundle.
    pub base_dir: PathBuf,
    /// Scratch directory for the silence pad and downloaded voice clips.
    pub work_dir: PathBuf,
    /// Record delimiter of the input listing (`;` or `|`).
    pub delimiter: char,
    /// Voice names passed to the speech service.
    pub female_voice: String,
    pub male_voice: String,
    /// Pacing delay before each word's asset downloads. Courtesy towards the
    /// remote service, not a retry/backoff mechanism.
    pub download_delay_ms: u64,
    /// Duration of the silence pad between clips.
    pub silence_secs: f64,
    /// Container extension of the audio assets.
    pub audio_ext: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("."),
            base_dir: std::env::var("MINPAIR_BASE_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("vietnamese-minimal-pairs")),
            work_dir: PathBuf::from("."),
            delimiter: ';',
            female_voice: std::env::var("MINPAIR_FEMALE_VOICE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "banmai".to_string()),
            male_voice: std::env::var("MINPAIR_MALE_VOICE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "leminh".to_string()),
            download_delay_ms: std::env::var("MINPAIR_DOWNLOAD_DELAY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(1_000),
            silence_secs: 0.5,
            audio_ext: "wav".to_string(),
        }
    }
}

/// Work item carried from the fetch phase to the download/assembly phase.
#[derive(Debug, Clone)]
pub struct PendingClip {
    pub word: String,
    /// Canonical combined filename, `tts-<word>.<ext>`
    pub filename: String,
    pub female_url: Url,
    pub male_url: Url,
}

/// End-to-end run driver, generic over the two external collaborators.
pub struct Pipeline<S, M> {
    cfg: PipelineConfig,
    speech: S,
    media: M,
}

impl<S: SpeechService, M: MediaTool> Pipeline<S, M> {
    pub fn new(cfg: PipelineConfig, speech: S, media: M) -> Self {
        Self { cfg, speech, media }
    }

    /// Collaborator accessors, mainly useful for inspecting fakes in tests.
    pub fn speech(&self) -> &S {
        &self.speech
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn into_media(self) -> M {
        self.media
    }

    /// Run the whole pipeline over a raw input listing.
    ///
    /// Returns the export bundle directory. Any error returned here is fatal;
    /// per-word skips have already been logged and swallowed.
    pub async fn run(&self, input: &str) -> Result<PathBuf> {
        let components = parse_components(input, self.cfg.delimiter)?;
        info!(
            target = "pipeline",
            components = components.len(),
            "Parsed input listing"
        );

        let export_dir = self.create_export_dir()?;
        self.materialize_audio(&components, &export_dir).await?;

        let notes = export::write_notes(&components, &export_dir)?;
        info!(
            target = "pipeline",
            notes = %notes.display(),
            "Run complete"
        );
        Ok(export_dir)
    }

    /// Create the timestamped bundle directory, parents included. Must
    /// succeed before any network work starts.
    fn create_export_dir(&self) -> Result<PathBuf> {
        let stamp = Local::now().format("%y-%m-%d-%H-%M-%S").to_string();
        let dir = self.cfg.base_dir.join(stamp);
        std::fs::create_dir_all(&dir)?;
        info!(target = "pipeline", export_dir = %dir.display(), "Created export bundle directory");
        Ok(dir)
    }

    fn combined_filename(&self, word: &str) -> String {
        format!("tts-{word}.{}", self.cfg.audio_ext)
    }

    /// Fetch phase: request female and male renders for every word whose
    /// combined clip is not already cached in the media directory.
    async fn collect_pending(&self, components: &[PairComponent]) -> Result<Vec<PendingClip>> {
        let mut pending = Vec::new();
        for component in components {
            let filename = self.combined_filename(&component.word);
            if self.cfg.media_dir.join(&filename).exists() {
                debug!(
                    target = "pipeline",
                    word = %component.word,
                    "Combined clip already cached; skipping"
                );
                continue;
            }

            let Some(female_url) = self
                .speech
                .fetch_speech(&component.word, &self.cfg.female_voice)
                .await?
            else {
                continue;
            };
            let Some(male_url) = self
                .speech
                .fetch_speech(&component.word, &self.cfg.male_voice)
                .await?
            else {
                continue;
            };

            pending.push(PendingClip {
                word: component.word.clone(),
                filename,
                female_url,
                male_url,
            });
        }
        Ok(pending)
    }

    /// Download/assembly phase: one silence pad per run, then per pending
    /// word download both voices and concatenate the seven clip slots.
    async fn materialize_audio(
        &self,
        components: &[PairComponent],
        export_dir: &Path,
    ) -> Result<()> {
        let pending = self.collect_pending(components).await?;
        if pending.is_empty() {
            info!(target = "pipeline", "No clips to build");
            return Ok(());
        }

        let silence = self
            .cfg
            .work_dir
            .join(format!("silence.{}", self.cfg.audio_ext));
        self.media.synthesize_silence(self.cfg.silence_secs, &silence)?;

        for clip in &pending {
            tokio::time::sleep(Duration::from_millis(self.cfg.download_delay_ms)).await;

            let female = self
                .cfg
                .work_dir
                .join(format!("dl-{}-female.{}", clip.word, self.cfg.audio_ext));
            let male = self
                .cfg
                .work_dir
                .join(format!("dl-{}-male.{}", clip.word, self.cfg.audio_ext));

            // A refused download skips this word's assembly; an asset that
            // already landed is left in place.
            if !self.speech.download(&clip.female_url, &female).await? {
                continue;
            }
            if !self.speech.download(&clip.male_url, &male).await? {
                continue;
            }

            let inputs = vec![
                female.clone(),
                silence.clone(),
                male.clone(),
                silence.clone(),
                female.clone(),
                silence.clone(),
                male.clone(),
            ];
            self.media
                .concatenate(&inputs, &export_dir.join(&clip.filename))?;
            info!(target = "pipeline", word = %clip.word, file = %clip.filename, "Assembled combined clip");

            let _ = std::fs::remove_file(&female);
            let _ = std::fs::remove_file(&male);
        }

        std::fs::remove_file(&silence)?;
        Ok(())
    }
}
