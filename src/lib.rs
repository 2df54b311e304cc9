//! Voicemail Relay: telephony voicemail webhook → transcript → email.

pub mod config;
pub mod email;
pub mod error;
pub mod routing;
pub mod transcription;
pub mod webhook;
