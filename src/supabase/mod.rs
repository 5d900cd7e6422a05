//! Backend client — thin HTTP wrapper over the hosted auth and data APIs.
//!
//! DESIGN
//! ======
//! Route handlers depend on the [`AuthBackend`] trait rather than the concrete
//! client so they can be exercised against an in-memory mock. The concrete
//! [`SupabaseClient`] owns one pooled `reqwest::Client`; auth endpoints live in
//! `auth.rs`, data endpoints in `rest.rs`.

mod auth;
mod rest;
pub mod types;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::SupabaseConfig;
pub use types::{SignUpOutcome, Session, SupabaseError, User};

// =============================================================================
// TRAIT
// =============================================================================

/// Operations the views need from the hosted backend.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Look up the user owning an access token.
    async fn get_user(&self, access_token: &str) -> Result<User, SupabaseError>;

    /// Exchange a refresh token for a fresh session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, SupabaseError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, SupabaseError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError>;

    /// Revoke the session behind an access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError>;

    /// Read at most one row from `table`. Uses the anon key when no access
    /// token is given.
    async fn probe_table(
        &self,
        table: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, SupabaseError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| SupabaseError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.url.clone(), anon_key: config.anon_key.clone() })
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{path}", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(self.anon_key.as_str()))
    }
}

#[async_trait::async_trait]
impl AuthBackend for SupabaseClient {
    async fn get_user(&self, access_token: &str) -> Result<User, SupabaseError> {
        self.fetch_user(access_token).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, SupabaseError> {
        self.grant_refresh_token(refresh_token).await
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, SupabaseError> {
        self.grant_password(email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError> {
        self.signup(email, password).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        self.logout(access_token).await
    }

    async fn probe_table(
        &self,
        table: &str,
        access_token: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, SupabaseError> {
        self.select_one(table, access_token).await
    }
}

// =============================================================================
// RESPONSE HELPERS
// =============================================================================

async fn send(builder: RequestBuilder) -> Result<Response, SupabaseError> {
    builder
        .send()
        .await
        .map_err(|e| SupabaseError::Request(e.to_string()))
}

/// Turn a non-success response into [`SupabaseError::Api`].
async fn check_status(response: Response) -> Result<Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SupabaseError::Api { status: status.as_u16(), message: types::api_error_message(&body) })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SupabaseError> {
    let response = check_status(response).await?;
    let body = response
        .text()
        .await
        .map_err(|e| SupabaseError::Request(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
