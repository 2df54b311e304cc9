//! Email rendering for a voicemail notification.

use super::event::InboundCallEvent;
use crate::transcription::{Transcript, TranscriptSource};

/// Placeholder for fields the provider left out.
const UNKNOWN: &str = "unknown";

const BUTTON_STYLE: &str = "background-color: #007cba; color: white; padding: 10px 20px; \
                            text-decoration: none; border-radius: 5px;";

const TRANSCRIPT_STYLE: &str = "background-color: #f5f5f5; padding: 10px; \
                                border-left: 4px solid #007cba;";

/// A fully rendered notification ready for the email provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundNotification {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OutboundNotification {
    /// Render subject, plain text and HTML bodies. Field values, transcript
    /// included, are interpolated as received; transcript newlines become
    /// `<br>` in HTML.
    pub fn render(event: &InboundCallEvent, recipient: &str, transcript: &Transcript) -> Self {
        let caller = event.caller.as_deref().unwrap_or(UNKNOWN);
        let called = event.called.as_deref().unwrap_or(UNKNOWN);
        let call_id = event.call_id.as_deref().unwrap_or(UNKNOWN);
        let recording_url = event.recording_url.as_deref();
        let heading = transcript_heading(transcript.source);

        let subject = format!("New Voicemail from {caller}");

        let mut text = format!(
            "You have received a new voicemail:\n\
             \n\
             From: {caller}\n\
             To: {called}\n\
             Call ID: {call_id}\n\
             Recording URL: {url}\n\
             \n\
             {heading}\n\
             {transcript}",
            url = recording_url.unwrap_or(UNKNOWN),
            transcript = transcript.text,
        );
        if let Some(url) = recording_url {
            text.push_str(&format!("\n\nYou can listen to the recording at: {url}"));
        }

        let recording_html = match recording_url {
            Some(url) => format!("<a href=\"{url}\">{url}</a>"),
            None => UNKNOWN.to_string(),
        };
        let mut html = format!(
            "<h2>New Voicemail Received</h2>\n\
             <p><strong>From:</strong> {caller}</p>\n\
             <p><strong>To:</strong> {called}</p>\n\
             <p><strong>Call ID:</strong> {call_id}</p>\n\
             <p><strong>Recording URL:</strong> {recording_html}</p>\n\
             \n\
             <h3>{heading}</h3>\n\
             <p style=\"{TRANSCRIPT_STYLE}\">{transcript}</p>\n",
            transcript = newlines_to_br(&transcript.text),
        );
        if let Some(url) = recording_url {
            html.push_str(&format!(
                "\n<p><a href=\"{url}\" style=\"{BUTTON_STYLE}\">Listen to Recording</a></p>\n"
            ));
        }

        Self {
            to: recipient.to_string(),
            subject,
            text,
            html,
        }
    }
}

fn transcript_heading(source: TranscriptSource) -> &'static str {
    match source {
        TranscriptSource::SpeechToText => "Transcription (AI-generated):",
        _ => "Transcription:",
    }
}

fn newlines_to_br(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::{NO_TRANSCRIPTION, TRANSCRIPTION_FAILED};

    fn event() -> InboundCallEvent {
        InboundCallEvent {
            caller: Some("+1111".into()),
            called: Some("+1234567890".into()),
            recording_url: Some("http://r/1.mp3".into()),
            call_id: Some("abc-123".into()),
            ..Default::default()
        }
    }

    #[test]
    fn subject_names_the_caller() {
        let transcript = Transcript::new("hello", TranscriptSource::Inline);
        let n = OutboundNotification::render(&event(), "sales@x.com", &transcript);
        assert_eq!(n.subject, "New Voicemail from +1111");
        assert_eq!(n.to, "sales@x.com");
    }

    #[test]
    fn text_body_lists_call_details() {
        let transcript = Transcript::new("Please call back.", TranscriptSource::Inline);
        let n = OutboundNotification::render(&event(), "sales@x.com", &transcript);
        assert!(n.text.starts_with("You have received a new voicemail:"));
        assert!(n.text.contains("From: +1111\n"));
        assert!(n.text.contains("To: +1234567890\n"));
        assert!(n.text.contains("Call ID: abc-123\n"));
        assert!(n.text.contains("Recording URL: http://r/1.mp3\n"));
        assert!(n.text.contains("Transcription:\nPlease call back."));
        assert!(
            n.text
                .ends_with("You can listen to the recording at: http://r/1.mp3")
        );
    }

    #[test]
    fn html_converts_transcript_newlines() {
        let transcript =
            Transcript::new("line one\nline two\r\nline three", TranscriptSource::Inline);
        let n = OutboundNotification::render(&event(), "sales@x.com", &transcript);
        assert!(n.html.contains("line one<br>line two<br>line three"));
        assert!(n.html.contains("<a href=\"http://r/1.mp3\">http://r/1.mp3</a>"));
        assert!(n.html.contains("Listen to Recording"));
    }

    #[test]
    fn transcript_whitespace_is_kept() {
        let transcript = Transcript::new("  hello\n", TranscriptSource::Inline);
        let n = OutboundNotification::render(&event(), "sales@x.com", &transcript);
        assert!(n.text.contains("Transcription:\n  hello\n\n\nYou can listen"));
        assert!(n.html.contains("border-left: 4px solid #007cba;\">  hello<br></p>"));
    }

    #[test]
    fn speech_to_text_is_labelled_ai_generated() {
        let transcript = Transcript::new("hi", TranscriptSource::SpeechToText);
        let n = OutboundNotification::render(&event(), "sales@x.com", &transcript);
        assert!(n.text.contains("Transcription (AI-generated):\nhi"));
        assert!(n.html.contains("<h3>Transcription (AI-generated):</h3>"));
    }

    #[test]
    fn fallback_text_is_rendered() {
        let transcript = Transcript::new(TRANSCRIPTION_FAILED, TranscriptSource::Failed);
        let n = OutboundNotification::render(&event(), "sales@x.com", &transcript);
        assert!(n.text.contains(TRANSCRIPTION_FAILED));
        assert!(n.html.contains(TRANSCRIPTION_FAILED));
    }

    #[test]
    fn missing_fields_render_as_unknown() {
        let transcript = Transcript::new(NO_TRANSCRIPTION, TranscriptSource::Unavailable);
        let n =
            OutboundNotification::render(&InboundCallEvent::default(), "ops@x.com", &transcript);
        assert_eq!(n.subject, "New Voicemail from unknown");
        assert!(n.text.contains("Recording URL: unknown"));
        assert!(!n.text.contains("You can listen"));
        assert!(!n.html.contains("Listen to Recording"));
    }
}
