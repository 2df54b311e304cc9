//! OpenAI-compatible Whisper client.
//!
//! Downloads the recording, then uploads it as multipart form data
//! (`file`, `model`, optional `language`) with a bearer token. The response
//! is JSON with a `text` field.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{NO_TRANSCRIPTION, TranscriptionProvider};
use crate::config::WhisperConfig;
use crate::error::TranscriptionError;

const PROVIDER: &str = "OpenAI";
const AUDIO_FILENAME: &str = "voicemail.mp3";
const AUDIO_MIME: &str = "audio/mpeg";

#[derive(Deserialize)]
struct WhisperResponse {
    #[serde(default)]
    text: Option<String>,
}

pub struct WhisperClient {
    api_key: SecretString,
    api_url: String,
    model: String,
    language: Option<String>,
    client: reqwest::Client,
}

impl WhisperClient {
    pub fn new(config: WhisperConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Share a connection pool with other clients.
    pub fn with_client(config: WhisperConfig, client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key,
            api_url: config.api_url,
            model: config.model,
            language: config.language,
            client,
        }
    }

    /// Fetch the recording. Anything but 200 OK is a failure.
    async fn download(&self, recording_url: &str) -> Result<Vec<u8>, TranscriptionError> {
        let resp = self
            .client
            .get(recording_url)
            .send()
            .await
            .map_err(|e| TranscriptionError::Download(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(TranscriptionError::Download(resp.status().as_u16().to_string()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TranscriptionError::Download(e.to_string()))?;
        tracing::debug!(bytes = bytes.len(), "Downloaded voicemail audio");
        Ok(bytes.to_vec())
    }

    fn build_form(&self, audio: Vec<u8>) -> Result<Form, TranscriptionError> {
        let file = Part::bytes(audio)
            .file_name(AUDIO_FILENAME)
            .mime_str(AUDIO_MIME)
            .map_err(|e| TranscriptionError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        let mut form = Form::new().part("file", file).text("model", self.model.clone());
        if let Some(lang) = &self.language {
            form = form.text("language", lang.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperClient {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn transcribe(&self, recording_url: &str) -> Result<String, TranscriptionError> {
        let audio = self.download(recording_url).await?;
        let form = self.build_form(audio)?;

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TranscriptionError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        classify_response(status.as_u16(), body)
    }
}

/// Non-2xx statuses carry the provider's body verbatim; anything else is
/// parsed for its transcript.
fn classify_response(status: u16, body: String) -> Result<String, TranscriptionError> {
    if !(200..300).contains(&status) {
        return Err(TranscriptionError::Api {
            provider: PROVIDER.into(),
            status,
            body,
        });
    }
    transcript_from_body(&body)
}

/// Pull `text` out of a success body, substituting the placeholder when the
/// provider returned nothing.
fn transcript_from_body(body: &str) -> Result<String, TranscriptionError> {
    let parsed: WhisperResponse =
        serde_json::from_str(body).map_err(|e| TranscriptionError::InvalidResponse {
            provider: PROVIDER.into(),
            reason: e.to_string(),
        })?;

    Ok(parsed
        .text
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| NO_TRANSCRIPTION.to_string()))
}
