//! Transcription service client.
//!
//! Speaks the AssemblyAI v2 flow: upload the media bytes, create a
//! transcript job, poll until it settles, and return word-level
//! timestamps. Callers treat every failure here as advisory.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";
const POLL_INTERVAL: Duration = Duration::from_secs(3);
const MAX_POLLS: u32 = 200;

/// One transcribed word with millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub text: String,
    #[serde(rename = "start")]
    pub start_ms: u64,
    #[serde(rename = "end")]
    pub end_ms: u64,
}

/// Transcription service client.
pub struct TranscriberClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct CreateTranscriptRequest<'a> {
    audio_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    #[serde(default)]
    words: Option<Vec<TranscriptWord>>,
    #[serde(default)]
    error: Option<String>,
}

impl TranscriberClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Create a client from the environment. Reads `TRANSCRIBE_API_KEY`,
    /// falling back to `ASSEMBLY_API_KEY`.
    pub fn from_env() -> MediaResult<Self> {
        let api_key = std::env::var("TRANSCRIBE_API_KEY")
            .or_else(|_| std::env::var("ASSEMBLY_API_KEY"))
            .map_err(|_| {
                MediaError::transcription_failed("no transcription API key in environment")
            })?;
        Ok(Self::new(api_key))
    }

    /// Override the service base URL (self-hosted gateways, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Transcribe a media file into word-level timestamps.
    ///
    /// A completed transcript with no recognized speech yields an empty
    /// list, not an error.
    pub async fn transcribe(&self, media: &Path) -> MediaResult<Vec<TranscriptWord>> {
        let bytes = tokio::fs::read(media).await?;
        info!(media = %media.display(), size = bytes.len(), "Uploading media for transcription");

        let upload: UploadResponse = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(bytes)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let created: TranscriptResponse = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&CreateTranscriptRequest {
                audio_url: &upload.upload_url,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.poll_transcript(&created.id).await
    }

    async fn poll_transcript(&self, id: &str) -> MediaResult<Vec<TranscriptWord>> {
        for _ in 0..MAX_POLLS {
            let transcript: TranscriptResponse = self
                .client
                .get(format!("{}/transcript/{}", self.base_url, id))
                .header("authorization", &self.api_key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match transcript.status.as_str() {
                "completed" => {
                    let words = transcript.words.unwrap_or_default();
                    debug!(id, words = words.len(), "Transcript completed");
                    return Ok(words);
                }
                "error" => {
                    return Err(MediaError::transcription_failed(
                        transcript
                            .error
                            .unwrap_or_else(|| "unknown service error".to_string()),
                    ));
                }
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
        Err(MediaError::transcription_failed(
            "transcript did not settle within the polling budget",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completed_transcript() {
        let raw = r#"{
            "id": "t-1",
            "status": "completed",
            "words": [
                {"text": "well", "start": 120, "end": 480},
                {"text": "damn", "start": 520, "end": 900}
            ]
        }"#;
        let parsed: TranscriptResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "completed");
        let words = parsed.words.unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].text, "damn");
        assert_eq!(words[1].start_ms, 520);
        assert_eq!(words[1].end_ms, 900);
    }

    #[test]
    fn test_parse_transcript_without_words() {
        let raw = r#"{"id": "t-2", "status": "completed"}"#;
        let parsed: TranscriptResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.words.is_none());
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_parse_errored_transcript() {
        let raw = r#"{"id": "t-3", "status": "error", "error": "no audio track"}"#;
        let parsed: TranscriptResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "error");
        assert_eq!(parsed.error.as_deref(), Some("no audio track"));
    }
}
