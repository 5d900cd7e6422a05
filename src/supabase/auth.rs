//! Auth API endpoints (`/auth/v1`).

use reqwest::Method;
use serde::Serialize;

use super::types::{self, SignUpOutcome, Session, SupabaseError, User};
use super::{SupabaseClient, check_status, read_json, send};

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl SupabaseClient {
    pub(super) async fn fetch_user(&self, access_token: &str) -> Result<User, SupabaseError> {
        let response = send(self.request(Method::GET, "auth/v1/user", Some(access_token))).await?;
        read_json(response).await
    }

    pub(super) async fn grant_refresh_token(&self, refresh_token: &str) -> Result<Session, SupabaseError> {
        let builder = self
            .request(Method::POST, "auth/v1/token", None)
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token });
        read_json(send(builder).await?).await
    }

    pub(super) async fn grant_password(&self, email: &str, password: &str) -> Result<Session, SupabaseError> {
        let builder = self
            .request(Method::POST, "auth/v1/token", None)
            .query(&[("grant_type", "password")])
            .json(&PasswordCredentials { email, password });
        read_json(send(builder).await?).await
    }

    pub(super) async fn signup(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError> {
        let builder = self
            .request(Method::POST, "auth/v1/signup", None)
            .json(&PasswordCredentials { email, password });
        let body: serde_json::Value = read_json(send(builder).await?).await?;
        types::parse_sign_up(body)
    }

    /// Revoke every session of the token's user.
    ///
    /// A token the backend no longer recognises is already signed out, so
    /// 401/403/404 count as success.
    pub(super) async fn logout(&self, access_token: &str) -> Result<(), SupabaseError> {
        let builder = self
            .request(Method::POST, "auth/v1/logout", Some(access_token))
            .query(&[("scope", "global")]);
        match check_status(send(builder).await?).await {
            Ok(_) => Ok(()),
            Err(SupabaseError::Api { status: 401 | 403 | 404, message }) => {
                tracing::debug!(%message, "sign-out of an already invalid session");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
