//! Speech fetching against the FPT.AI HMI text-to-speech HTTP API
//!
//! The API renders asynchronously: a POST with the raw word text returns a
//! JSON envelope whose `async` field points at the URL where the rendered
//! audio file will eventually be available; that URL is fetched by a separate
//! GET. A refused request (non-2xx) is not an error of the run — the caller
//! logs and skips the word. An undecodable response body is fatal: the API
//! contract itself is broken.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{MinpairError, Result};

/// Configuration for the speech client
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// TTS endpoint, e.g. https://api.fpt.ai/hmi/tts/v5
    pub endpoint: String,
    pub api_key: String,
    /// Speech speed header value (-1 = default service speed)
    pub speed: String,
    /// Audio container format requested from the service
    pub format: String,
    /// Timeout for API requests in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: std::env::var("MINPAIR_TTS_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://api.fpt.ai/hmi/tts/v5".to_string()),
            api_key: std::env::var("MINPAIR_API_KEY").unwrap_or_default(),
            speed: std::env::var("MINPAIR_TTS_SPEED")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "-1".to_string()),
            format: std::env::var("MINPAIR_TTS_FORMAT")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "wav".to_string()),
            request_timeout_ms: std::env::var("MINPAIR_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30_000),
        }
    }
}

/// Response envelope from the TTS API
#[derive(Debug, Clone, Deserialize)]
pub struct TtsResponse {
    /// URL at which the rendered audio file will become available
    #[serde(rename = "async")]
    pub async_url: Url,
    pub error: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,
}

/// Seam over the remote speech service so the pipeline can run against fakes.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Request a render of `word` with `voice`.
    ///
    /// `Ok(None)` means the service refused the request (non-2xx) and the
    /// word should be skipped for this run.
    async fn fetch_speech(&self, word: &str, voice: &str) -> Result<Option<Url>>;

    /// Download a rendered asset to `dest`.
    ///
    /// `Ok(false)` means the asset was not served (non-2xx) and the word's
    /// assembly should be skipped for this run.
    async fn download(&self, url: &Url, dest: &Path) -> Result<bool>;
}

/// HTTP client for the FPT.AI TTS service
pub struct FptTtsClient {
    http: Client,
    cfg: TtsConfig,
}

impl FptTtsClient {
    pub fn new(cfg: TtsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()?;
        Ok(Self { http, cfg })
    }
}

#[async_trait]
impl SpeechService for FptTtsClient {
    async fn fetch_speech(&self, word: &str, voice: &str) -> Result<Option<Url>> {
        debug!(target = "tts", word, voice, "POST {}", self.cfg.endpoint);
        let resp = self
            .http
            .post(&self.cfg.endpoint)
            .header("api-key", &self.cfg.api_key)
            .header("speed", &self.cfg.speed)
            .header("voice", voice)
            .header("format", &self.cfg.format)
            .body(word.to_string())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                target = "tts",
                word,
                voice,
                status = %status,
                "Speech request refused; skipping word"
            );
            return Ok(None);
        }

        let decoded: TtsResponse = resp
            .json()
            .await
            .map_err(|e| MinpairError::MalformedResponse(e.to_string()))?;
        if decoded.error != 0 {
            warn!(
                target = "tts",
                word,
                code = decoded.error,
                message = %decoded.message,
                "Speech API reported an error code"
            );
        }
        Ok(Some(decoded.async_url))
    }

    async fn download(&self, url: &Url, dest: &Path) -> Result<bool> {
        debug!(target = "tts", url = %url, dest = %dest.display(), "GET rendered asset");
        let resp = self.http.get(url.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                target = "tts",
                url = %url,
                status = %status,
                "Asset download refused; skipping word"
            );
            return Ok(false);
        }

        let bytes = resp.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(true)
    }
}
