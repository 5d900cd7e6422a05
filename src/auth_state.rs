//! Session resolution from request cookies.
//!
//! ARCHITECTURE
//! ============
//! The browser holds the backend's access and refresh tokens in HttpOnly
//! cookies. Each request resolves them into an [`AuthState`]: the current user
//! (if any) plus the [`AuthEvent`] the resolution produced, e.g. a refreshed
//! token pair that must be written back. Handlers pass the event to [`apply`]
//! so the response carries the new cookies.
//!
//! Resolution is one sequential pass per request, so there is no race between
//! an initial lookup and a later notification.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::supabase::{AuthBackend, Session, SupabaseError, User};

pub const ACCESS_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

const REFRESH_COOKIE_DAYS: i64 = 30;

/// Session state change discovered while handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Resolved view of who is making the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub event: Option<AuthEvent>,
}

impl AuthState {
    fn anonymous() -> Self {
        Self::default()
    }

    fn signed_out() -> Self {
        Self { user: None, event: Some(AuthEvent::SignedOut) }
    }

    /// True when the request carried a usable session.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.user.is_some()
    }
}

/// Token pair read from cookies. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionCookies {
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        let read = |name: &str| {
            jar.get(name)
                .map(Cookie::value)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        Self { access_token: read(ACCESS_COOKIE), refresh_token: read(REFRESH_COOKIE) }
    }
}

/// Resolve the current user from the request's session cookies.
///
/// - no tokens: anonymous, no event
/// - valid access token: that user
/// - rejected or missing access token with a refresh token: refresh, yielding
///   [`AuthEvent::TokenRefreshed`], or [`AuthEvent::SignedOut`] if the backend
///   rejects the refresh token with a non-retryable 4xx
/// - rejected access token without a refresh token: [`AuthEvent::SignedOut`]
///
/// # Errors
///
/// Transport failures, rate limiting and 5xx responses propagate with the
/// cookies left untouched.
pub async fn resolve(backend: &dyn AuthBackend, cookies: &SessionCookies) -> Result<AuthState, SupabaseError> {
    if let Some(access_token) = cookies.access_token.as_deref() {
        match backend.get_user(access_token).await {
            Ok(user) => return Ok(AuthState { user: Some(user), event: None }),
            Err(e) if e.is_unauthorized() => {
                tracing::debug!(error = %e, "access token rejected");
            }
            Err(e) => return Err(e),
        }
    }

    let Some(refresh_token) = cookies.refresh_token.as_deref() else {
        return Ok(if cookies.access_token.is_some() { AuthState::signed_out() } else { AuthState::anonymous() });
    };

    match backend.refresh_session(refresh_token).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user.id, "session refreshed");
            Ok(AuthState { user: Some(session.user.clone()), event: Some(AuthEvent::TokenRefreshed(session)) })
        }
        Err(e) if e.is_api() && !e.is_retryable() => {
            tracing::info!(error = %e, "refresh token rejected; signing out");
            Ok(AuthState::signed_out())
        }
        Err(e) => Err(e),
    }
}

/// Write the cookie changes an event implies onto `jar`.
#[must_use]
pub fn apply(jar: CookieJar, event: Option<&AuthEvent>, secure: bool) -> CookieJar {
    match event {
        None => jar,
        Some(AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session)) => jar
            .add(session_cookie(ACCESS_COOKIE, session.access_token.clone(), Duration::seconds(session.expires_in), secure))
            .add(session_cookie(
                REFRESH_COOKIE,
                session.refresh_token.clone(),
                Duration::days(REFRESH_COOKIE_DAYS),
                secure,
            )),
        Some(AuthEvent::SignedOut) => clear(jar, secure),
    }
}

/// Remove both session cookies.
#[must_use]
pub fn clear(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, String::new(), Duration::ZERO, secure))
        .add(session_cookie(REFRESH_COOKIE, String::new(), Duration::ZERO, secure))
}

fn session_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

#[cfg(test)]
#[path = "auth_state_test.rs"]
mod tests;
