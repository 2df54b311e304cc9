//! Configuration types.
//!
//! Everything is read once at startup into an immutable [`AppConfig`] that is
//! handed to the webhook router. [`AppConfig::from_lookup`] takes any key
//! lookup so tests never touch process environment.

use std::net::IpAddr;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::routing::RecipientRoutes;

pub const DEFAULT_FROM_EMAIL: &str = "voicemail@example.com";
pub const DEFAULT_FROM_NAME: &str = "Voicemail System";
pub const DEFAULT_MANDRILL_URL: &str = "https://mandrillapp.com/api/1.0/messages/send.json";
pub const DEFAULT_TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";
pub const DEFAULT_WHISPER_LANGUAGE: &str = "en";
pub const DEFAULT_PORT: u16 = 3000;

/// Transactional email provider settings.
#[derive(Debug, Clone)]
pub struct MandrillConfig {
    pub api_key: SecretString,
    pub from_email: String,
    pub from_name: String,
    pub api_url: String,
}

/// Speech-to-text provider settings. Absent when no API key is configured.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub api_key: SecretString,
    pub api_url: String,
    pub model: String,
    /// `None` lets the provider auto-detect.
    pub language: Option<String>,
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub routes: RecipientRoutes,
    pub mandrill: MandrillConfig,
    pub whisper: Option<WhisperConfig>,
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let routes = RecipientRoutes::new(
            RecipientRoutes::parse_table(&get("VOICEMAIL_ROUTES").unwrap_or_default())?,
            get("TARGET_EMAIL"),
        );

        let mandrill = MandrillConfig {
            api_key: SecretString::from(
                get("MANDRILL_API_KEY")
                    .ok_or_else(|| ConfigError::MissingEnvVar("MANDRILL_API_KEY".into()))?,
            ),
            from_email: get("MANDRILL_USER").unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            from_name: get("MANDRILL_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            api_url: get("MANDRILL_API_URL").unwrap_or_else(|| DEFAULT_MANDRILL_URL.to_string()),
        };

        // WHISPER_LANGUAGE set to an empty string disables the hint, so read it raw.
        let language = match lookup("WHISPER_LANGUAGE") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => Some(DEFAULT_WHISPER_LANGUAGE.to_string()),
        };

        let whisper = get("OPENAI_API_KEY").map(|key| WhisperConfig {
            api_key: SecretString::from(key),
            api_url: get("OPENAI_TRANSCRIPTION_URL")
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_URL.to_string()),
            model: get("WHISPER_MODEL").unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string()),
            language,
        });

        let bind_addr = match get("VOICEMAIL_BIND") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "VOICEMAIL_BIND".into(),
                message: format!("{e}"),
            })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = match get("VOICEMAIL_PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "VOICEMAIL_PORT".into(),
                message: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            routes,
            mandrill,
            whisper,
            bind_addr,
            port,
        })
    }
}
