//! Speech-to-text for voicemail recordings.
//!
//! The webhook handler only sees [`TranscriptionProvider`]; the
//! OpenAI-compatible [`WhisperClient`] is the production implementation.

pub mod whisper;

pub use whisper::WhisperClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::TranscriptionError;

/// Text used when no transcript exists and none could be requested.
pub const NO_TRANSCRIPTION: &str = "No transcription available";

/// Text substituted when the speech-to-text call fails.
pub const TRANSCRIPTION_FAILED: &str = "Transcription failed - please listen to recording";

/// Turns a publicly fetchable recording URL into text.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Transcribe the recording. Called at most once per webhook, no retry.
    async fn transcribe(&self, recording_url: &str) -> Result<String, TranscriptionError>;
}

/// Where a transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    /// Supplied by the telephony provider in the webhook body.
    Inline,
    /// Produced by the speech-to-text provider.
    SpeechToText,
    /// Speech-to-text was attempted and failed.
    Failed,
    /// No inline text, and no recording URL or provider to ask.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub source: TranscriptSource,
}

impl Transcript {
    pub fn new(text: impl Into<String>, source: TranscriptSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}
