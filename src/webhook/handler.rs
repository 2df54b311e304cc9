//! HTTP surface and per-request flow for voicemail webhooks.
//!
//! One request: method check → body normalization → recipient routing →
//! transcript (inline or speech-to-text, failures tolerated) → render →
//! email submission → JSON status. Upstream calls run strictly in sequence
//! and are each attempted once.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Request, State},
    http::{Method, header},
    response::IntoResponse,
    routing::{any, get},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::event::InboundCallEvent;
use super::notification::OutboundNotification;
use crate::config::AppConfig;
use crate::email::{EmailProvider, MandrillClient};
use crate::error::{PayloadError, WebhookError};
use crate::routing::RecipientRoutes;
use crate::transcription::{
    NO_TRANSCRIPTION, TRANSCRIPTION_FAILED, Transcript, TranscriptSource, TranscriptionProvider,
    WhisperClient,
};

/// Upper bound on inbound webhook bodies, shared by the JSON and form paths.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared, read-only state for the webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RecipientRoutes>,
    /// `None` disables speech-to-text; inline transcripts still work.
    pub transcriber: Option<Arc<dyn TranscriptionProvider>>,
    pub mailer: Arc<dyn EmailProvider>,
}

impl AppState {
    /// Wire the production providers from configuration. One HTTP client
    /// (and connection pool) is shared by both.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = reqwest::Client::new();
        let transcriber = config.whisper.clone().map(|whisper| {
            Arc::new(WhisperClient::with_client(whisper, client.clone()))
                as Arc<dyn TranscriptionProvider>
        });
        Self {
            routes: Arc::new(config.routes.clone()),
            transcriber,
            mailer: Arc::new(MandrillClient::with_client(config.mandrill.clone(), client)),
        }
    }
}

/// Body of a 200 response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicemailOutcome {
    pub message: String,
    pub email_sent: bool,
    pub recipient: String,
    pub transcription_method: TranscriptSource,
}

/// Build the Axum router with the webhook and health routes.
pub fn webhook_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/webhook", any(webhook))
        .route("/webhook", any(webhook))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "voicemail-relay"
    }))
}

// ── Webhook ─────────────────────────────────────────────────────────────

async fn webhook(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<VoicemailOutcome>, WebhookError> {
    if request.method() != Method::POST {
        warn!(method = %request.method(), "Rejected webhook: method not allowed");
        return Err(WebhookError::MethodNotAllowed);
    }

    let event = parse_event(request).await.map_err(|e| {
        error!(error = %e, "Failed to parse webhook body");
        e
    })?;

    process_voicemail(&state, &event).await.map(Json)
}

/// Decode the body as a form when the content type says so, JSON otherwise.
///
/// Both paths buffer through axum extractors, so they honour the same
/// `DefaultBodyLimit`.
pub async fn parse_event(request: Request) -> Result<InboundCallEvent, PayloadError> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        });

    if is_form {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|e| PayloadError::Form(e.body_text()))?;
        return Ok(InboundCallEvent::from_form(fields));
    }

    let body = Bytes::from_request(request, &())
        .await
        .map_err(|e| PayloadError::Body(e.body_text()))?;
    InboundCallEvent::from_json(&body)
}

/// Route, transcribe, render and deliver one voicemail.
pub async fn process_voicemail(
    state: &AppState,
    event: &InboundCallEvent,
) -> Result<VoicemailOutcome, WebhookError> {
    info!(
        call_id = ?event.call_id,
        caller = ?event.caller,
        called = ?event.called,
        record_file = ?event.record_file,
        has_recording = event.recording_url.is_some(),
        has_transcript = event.transcript.is_some(),
        "Voicemail webhook received"
    );

    let Some(recipient) = state.routes.resolve(event.called.as_deref()) else {
        error!(called = ?event.called, "No recipient found for number");
        return Err(WebhookError::NoRecipient);
    };

    let transcript = obtain_transcript(state.transcriber.as_deref(), event).await;
    let notification = OutboundNotification::render(event, recipient, &transcript);

    let response = state.mailer.send(&notification).await.map_err(|e| {
        error!(
            provider = state.mailer.name(),
            recipient,
            error = %e,
            "Failed to send voicemail email"
        );
        e
    })?;

    info!(
        provider = state.mailer.name(),
        recipient,
        response = %response,
        "Voicemail email sent"
    );

    Ok(VoicemailOutcome {
        message: "Voicemail processed successfully".to_string(),
        email_sent: true,
        recipient: recipient.to_string(),
        transcription_method: transcript.source,
    })
}

/// Inline text wins; otherwise ask the provider once. Failures degrade to a
/// placeholder and never abort the request.
pub async fn obtain_transcript(
    provider: Option<&dyn TranscriptionProvider>,
    event: &InboundCallEvent,
) -> Transcript {
    if let Some(text) = &event.transcript {
        return Transcript::new(text.clone(), TranscriptSource::Inline);
    }

    let (Some(url), Some(provider)) = (event.recording_url.as_deref(), provider) else {
        return Transcript::new(NO_TRANSCRIPTION, TranscriptSource::Unavailable);
    };

    match provider.transcribe(url).await {
        Ok(text) => {
            info!(
                provider = provider.name(),
                chars = text.len(),
                "Recording transcribed"
            );
            Transcript::new(text, TranscriptSource::SpeechToText)
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "Transcription failed");
            Transcript::new(TRANSCRIPTION_FAILED, TranscriptSource::Failed)
        }
    }
}
