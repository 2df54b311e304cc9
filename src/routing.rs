//! Recipient routing: called number → destination email address.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Static route table with an optional fallback recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientRoutes {
    routes: HashMap<String, String>,
    default_recipient: Option<String>,
}

impl RecipientRoutes {
    pub fn new(routes: HashMap<String, String>, default_recipient: Option<String>) -> Self {
        Self {
            routes,
            default_recipient: default_recipient.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Parse a `number=email,number=email` table.
    ///
    /// Whitespace around entries is ignored; empty entries are skipped.
    pub fn parse_table(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
        let mut routes = HashMap::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((number, email)) = entry.split_once('=') else {
                return Err(ConfigError::InvalidValue {
                    key: "VOICEMAIL_ROUTES".into(),
                    message: format!("expected number=email, got '{entry}'"),
                });
            };
            let (number, email) = (number.trim(), email.trim());
            if number.is_empty() || email.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "VOICEMAIL_ROUTES".into(),
                    message: format!("empty number or email in '{entry}'"),
                });
            }
            routes.insert(number.to_string(), email.to_string());
        }
        Ok(routes)
    }

    /// Exact match on the called number, else the default recipient.
    pub fn resolve(&self, called: Option<&str>) -> Option<&str> {
        called
            .and_then(|number| self.routes.get(number))
            .or(self.default_recipient.as_ref())
            .map(String::as_str)
    }

    pub fn default_recipient(&self) -> Option<&str> {
        self.default_recipient.as_deref()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
