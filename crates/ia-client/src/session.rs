use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::Result;
use crate::token;

/// Tokens of the logged in InPost account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// On-disk shape of a session, absent tokens are written as empty strings
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    auth_token: String,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl Session {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.and_then(non_empty),
            refresh_token: refresh_token.and_then(non_empty),
        }
    }

    /// Restore a session from config store bytes.
    ///
    /// Empty or unparsable bytes mean no session.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        match serde_json::from_slice::<PersistedSession>(bytes) {
            Ok(persisted) => Self::new(Some(persisted.auth_token), Some(persisted.refresh_token)),
            Err(e) => {
                warn!("Ignoring unreadable saved session: {}", e);
                Self::default()
            }
        }
    }

    /// Serialize for the config store
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let persisted = PersistedSession {
            refresh_token: self.refresh_token.clone().unwrap_or_default(),
            auth_token: self.access_token.clone().unwrap_or_default(),
        };

        Ok(serde_json::to_vec_pretty(&persisted)?)
    }

    /// Stored access token, `Bearer ` prefix included
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Check the access token's expiry without asking the server
    pub fn is_access_token_valid(&self) -> Result<bool> {
        token::is_valid_at(self.access_token(), Utc::now())
    }

    pub(crate) fn set_access_token(&mut self, access_token: String) {
        self.access_token = non_empty(access_token);
    }

    pub(crate) fn set_tokens(&mut self, access_token: String, refresh_token: String) {
        self.access_token = non_empty(access_token);
        self.refresh_token = non_empty(refresh_token);
    }
}
