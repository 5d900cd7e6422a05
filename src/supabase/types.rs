//! Backend wire types — auth users, sessions, and errors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend client operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SupabaseError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl SupabaseError {
    /// True when the backend rejected the caller's credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// True for failures that may clear up on their own: transport errors,
    /// rate limiting and 5xx.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Api { status: 429 | 500..=599, .. })
    }

    /// True when the backend answered at all, whatever the status.
    #[must_use]
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Pull a human-readable message out of an error body.
///
/// The auth API uses `msg`, `error_description` or `error`; the data API uses
/// `message`. Falls back to the raw body, then to a generic message.
#[must_use]
pub fn api_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() { "unknown error".to_string() } else { trimmed.to_string() }
}

// =============================================================================
// USER / SESSION
// =============================================================================

/// Authenticated user record as returned by the auth API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<String>,
    pub last_sign_in_at: Option<String>,
    pub email_confirmed_at: Option<String>,
}

fn default_token_type() -> String {
    "bearer".into()
}

/// Token pair plus the user it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Unix timestamp of access token expiry, when the backend sends it.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

/// Result of a signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The project auto-confirms; the user is signed in.
    Session(Session),
    /// A confirmation email was sent; no session yet.
    ConfirmationSent(User),
}

/// Interpret a signup response body.
///
/// Auto-confirming projects return a full session; otherwise the body is the
/// bare user (or the user nested under `user`).
///
/// # Errors
///
/// Returns [`SupabaseError::Parse`] if the body is neither shape.
pub fn parse_sign_up(body: serde_json::Value) -> Result<SignUpOutcome, SupabaseError> {
    if body.get("access_token").is_some() {
        let session: Session = serde_json::from_value(body).map_err(|e| SupabaseError::Parse(e.to_string()))?;
        return Ok(SignUpOutcome::Session(session));
    }

    let user_value = match body.get("user") {
        Some(nested) if nested.is_object() => nested.clone(),
        _ => body,
    };
    let user: User = serde_json::from_value(user_value).map_err(|e| SupabaseError::Parse(e.to_string()))?;
    Ok(SignUpOutcome::ConfirmationSent(user))
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
