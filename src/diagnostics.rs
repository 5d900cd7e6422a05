//! Backend connectivity diagnostic.
//!
//! Resolves the caller's session, then reads one row from a probe table. A
//! data-API error still proves the backend is reachable and counts as a pass;
//! only a failed session lookup or a transport failure fails the check.

use serde::Serialize;

use crate::auth_state::{self, AuthEvent, AuthState, SessionCookies};
use crate::config::AppConfig;
use crate::supabase::AuthBackend;

const SUCCESS_GUIDANCE: &[&str] = &[
    "Your Supabase URL and API key are correctly configured",
    "The connection to your Supabase project is working",
    "You can now start building features with Supabase",
    "Consider setting up authentication, database tables, or storage as needed",
];

const ERROR_GUIDANCE: &[&str] = &[
    "Check that your environment variables are correctly set",
    "Verify your Supabase project is active and not paused",
    "Ensure your API key is the 'anon/public' key, not the service role key",
    "Check your network connection",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessDetails {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_ref: Option<String>,
    pub auth_session: String,
    pub test_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetails {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportDetails {
    Success(SuccessDetails),
    Error(ErrorDetails),
}

/// Outcome of one connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionReport {
    pub status: ConnectionStatus,
    pub message: String,
    pub details: ReportDetails,
}

impl ConnectionReport {
    fn failure(url: String, reason: String) -> Self {
        Self {
            status: ConnectionStatus::Error,
            message: format!("Connection failed: {reason}"),
            details: ReportDetails::Error(ErrorDetails { url, error: format!("Error: {reason}") }),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ConnectionStatus::Success
    }

    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match self.status {
            ConnectionStatus::Success => "Connection Successful",
            ConnectionStatus::Error => "Connection Failed",
        }
    }

    #[must_use]
    pub fn indicator_class(&self) -> &'static str {
        match self.status {
            ConnectionStatus::Success => "indicator-success",
            ConnectionStatus::Error => "indicator-error",
        }
    }

    #[must_use]
    pub fn guidance_title(&self) -> &'static str {
        match self.status {
            ConnectionStatus::Success => "\u{2705} What this means:",
            ConnectionStatus::Error => "\u{274c} Common fixes:",
        }
    }

    #[must_use]
    pub fn guidance(&self) -> &'static [&'static str] {
        match self.status {
            ConnectionStatus::Success => SUCCESS_GUIDANCE,
            ConnectionStatus::Error => ERROR_GUIDANCE,
        }
    }

    /// Details as indented JSON for display.
    #[must_use]
    pub fn details_json(&self) -> String {
        serde_json::to_string_pretty(&self.details).unwrap_or_default()
    }
}

/// Run the connectivity check for the caller identified by `cookies`.
///
/// Also returns any auth event the session lookup produced so the caller can
/// persist refreshed tokens.
pub async fn run(
    backend: &dyn AuthBackend,
    config: &AppConfig,
    cookies: &SessionCookies,
) -> (ConnectionReport, Option<AuthEvent>) {
    let url = config.supabase.url.clone();

    let auth = match auth_state::resolve(backend, cookies).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!(error = %e, "connection test: session lookup failed");
            return (ConnectionReport::failure(url, format!("Auth error: {e}")), None);
        }
    };

    let probe = backend
        .probe_table(&config.diagnostics_table, probe_token(&auth, cookies))
        .await;
    let test_query = match probe {
        Ok(_) => "Query successful".to_string(),
        Err(e) if e.is_api() => {
            tracing::debug!(error = %e, table = %config.diagnostics_table, "connection test: probe query rejected");
            format!("Query failed (expected): {e}")
        }
        Err(e) => {
            tracing::warn!(error = %e, "connection test: backend unreachable");
            return (ConnectionReport::failure(url, e.to_string()), auth.event);
        }
    };

    let auth_session = if auth.has_session() {
        "Session found"
    } else {
        "No active session (normal for public access)"
    };

    let report = ConnectionReport {
        status: ConnectionStatus::Success,
        message: "Supabase connection successful!".to_string(),
        details: ReportDetails::Success(SuccessDetails {
            project_ref: config.supabase.project_ref().map(str::to_owned),
            url,
            auth_session: auth_session.to_string(),
            test_query,
        }),
    };
    (report, auth.event)
}

/// Token the probe should run as: the refreshed one, the cookie's one if it
/// resolved a user, otherwise none (anon key).
fn probe_token<'a>(auth: &'a AuthState, cookies: &'a SessionCookies) -> Option<&'a str> {
    match &auth.event {
        Some(AuthEvent::TokenRefreshed(session) | AuthEvent::SignedIn(session)) => Some(session.access_token.as_str()),
        Some(AuthEvent::SignedOut) => None,
        None if auth.has_session() => cookies.access_token.as_deref(),
        None => None,
    }
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
