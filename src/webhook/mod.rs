//! Voicemail webhook: inbound normalization, orchestration, rendering.

pub mod event;
pub mod handler;
pub mod notification;

pub use event::InboundCallEvent;
pub use handler::{AppState, VoicemailOutcome, process_voicemail, webhook_routes};
pub use notification::OutboundNotification;
