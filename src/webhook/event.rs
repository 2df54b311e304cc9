//! Inbound voicemail event normalization.
//!
//! Plivo posts PascalCase keys (`From`, `RecordUrl`, `CallUUID`, ...) while
//! relays and test harnesses tend to send snake_case or `src`/`dst`. Each field
//! is read with an ordered alias list; the first present key wins.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::PayloadError;

pub const CALLER_ALIASES: &[&str] = &["From", "from", "src"];
pub const CALLED_ALIASES: &[&str] = &["To", "to", "dst"];
pub const RECORDING_URL_ALIASES: &[&str] = &["RecordUrl", "record_url", "recording_url"];
pub const CALL_ID_ALIASES: &[&str] = &["CallUUID", "call_uuid"];
pub const TRANSCRIPT_ALIASES: &[&str] =
    &["TranscriptionText", "transcription_text", "transcription"];
pub const RECORD_FILE_ALIASES: &[&str] = &["RecordFile", "record_file"];

/// A normalized voicemail notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundCallEvent {
    pub caller: Option<String>,
    pub called: Option<String>,
    pub recording_url: Option<String>,
    pub call_id: Option<String>,
    pub transcript: Option<String>,
    pub record_file: Option<String>,
}

impl InboundCallEvent {
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            caller: first_present(fields, CALLER_ALIASES),
            called: first_present(fields, CALLED_ALIASES),
            recording_url: first_present(fields, RECORDING_URL_ALIASES),
            call_id: first_present(fields, CALL_ID_ALIASES),
            transcript: first_present(fields, TRANSCRIPT_ALIASES),
            record_file: first_present(fields, RECORD_FILE_ALIASES),
        }
    }

    /// Decode a JSON body. Anything but a top-level object is rejected.
    pub fn from_json(body: &[u8]) -> Result<Self, PayloadError> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => Ok(Self::from_fields(&fields)),
            _ => Err(PayloadError::NotAnObject),
        }
    }

    /// Build from already-decoded `application/x-www-form-urlencoded` pairs.
    pub fn from_form(form: HashMap<String, String>) -> Self {
        let fields: Map<String, Value> = form
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Self::from_fields(&fields)
    }
}

/// Return the value of the first alias that is present.
///
/// Strings count when non-blank; numbers and booleans are stringified (some
/// relays send phone numbers as JSON numbers). Null, arrays and objects are
/// treated as absent and the lookup moves on to the next alias.
pub fn first_present(fields: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|key| fields.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
}
