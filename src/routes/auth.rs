//! Auth routes — email/password login and signup, logout, current user.

use std::fmt::Write;

use axum::Form;
use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;
use serde::Deserialize;
use time::Duration;

use super::page_response;
use crate::auth_state::{self, AuthEvent, SessionCookies};
use crate::state::AppState;
use crate::supabase::{Session, SignUpOutcome, SupabaseError, User};
use crate::views::{AuthForm, AuthMode};

const CSRF_COOKIE: &str = "csrf_token";
const CSRF_MAX_AGE_MINUTES: i64 = 60;
const CSRF_MISMATCH: &str = "Your form expired. Please try again.";
const BACKEND_UNREACHABLE: &str = "Could not reach the authentication service. Please try again.";

/// Lowercase hex, two digits per byte.
pub(crate) fn encode_csrf_token(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Fresh double-submit token for a credential form.
#[must_use]
pub fn new_csrf_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    encode_csrf_token(&bytes)
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved from the session cookies.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: User,
    /// Token change the lookup produced; handlers should write it back.
    pub event: Option<AuthEvent>,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookies = SessionCookies::from_jar(&jar);
        if cookies == SessionCookies::default() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let auth = auth_state::resolve(app_state.backend.as_ref(), &cookies)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "session lookup failed");
                StatusCode::BAD_GATEWAY
            })?;
        let user = auth.user.ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, event: auth.event })
    }
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    csrf_token: String,
}

fn csrf_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::minutes(CSRF_MAX_AGE_MINUTES))
        .build()
}

/// Double-submit check: the hidden field must echo the cookie.
pub(crate) fn csrf_matches(jar: &CookieJar, submitted: &str) -> bool {
    let expected = jar
        .get(CSRF_COOKIE)
        .map(Cookie::value)
        .unwrap_or_default();
    !expected.is_empty() && expected == submitted
}

/// Render a credential form with a fresh CSRF token.
fn form_response(
    state: &AppState,
    jar: CookieJar,
    mode: AuthMode,
    email: &str,
    error: Option<&str>,
    status: StatusCode,
) -> Response {
    let token = new_csrf_token();
    let jar = jar.add(csrf_cookie(token.clone(), state.cookie_secure()));
    let page = state
        .views
        .auth_form(&AuthForm { mode, email, error, csrf_token: &token });
    page_response(status, jar, page)
}

/// Store a new session and send the user home.
fn signed_in(state: &AppState, jar: CookieJar, session: Session) -> Response {
    tracing::info!(user_id = %session.user.id, "user signed in");
    let jar = jar.remove(Cookie::build(CSRF_COOKIE).path("/"));
    let jar = auth_state::apply(jar, Some(&AuthEvent::SignedIn(session)), state.cookie_secure());
    (jar, Redirect::to("/")).into_response()
}

fn backend_failure(state: &AppState, jar: CookieJar, mode: AuthMode, email: &str, err: &SupabaseError) -> Response {
    if err.is_api() {
        let status = match mode {
            AuthMode::Login => StatusCode::UNAUTHORIZED,
            AuthMode::Signup => StatusCode::BAD_REQUEST,
        };
        let message = err.to_string();
        return form_response(state, jar, mode, email, Some(&message), status);
    }

    tracing::error!(error = %err, action = mode.action(), "auth request failed");
    form_response(state, jar, mode, email, Some(BACKEND_UNREACHABLE), StatusCode::BAD_GATEWAY)
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /login`
pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    form_response(&state, jar, AuthMode::Login, "", None, StatusCode::OK)
}

/// `POST /login` — password grant, set session cookies, redirect to `/`.
pub async fn login_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<CredentialsForm>) -> Response {
    let email = form.email.trim();
    if !csrf_matches(&jar, &form.csrf_token) {
        return form_response(&state, jar, AuthMode::Login, email, Some(CSRF_MISMATCH), StatusCode::BAD_REQUEST);
    }

    match state.backend.sign_in_with_password(email, &form.password).await {
        Ok(session) => signed_in(&state, jar, session),
        Err(e) => backend_failure(&state, jar, AuthMode::Login, email, &e),
    }
}

/// `GET /signup`
pub async fn signup_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    form_response(&state, jar, AuthMode::Signup, "", None, StatusCode::OK)
}

/// `POST /signup` — create the account; sign in directly when the project
/// auto-confirms, otherwise ask the user to check their email.
pub async fn signup_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<CredentialsForm>) -> Response {
    let email = form.email.trim();
    if !csrf_matches(&jar, &form.csrf_token) {
        return form_response(&state, jar, AuthMode::Signup, email, Some(CSRF_MISMATCH), StatusCode::BAD_REQUEST);
    }

    match state.backend.sign_up(email, &form.password).await {
        Ok(SignUpOutcome::Session(session)) => signed_in(&state, jar, session),
        Ok(SignUpOutcome::ConfirmationSent(user)) => {
            tracing::info!(user_id = %user.id, "signup awaiting email confirmation");
            let jar = jar.remove(Cookie::build(CSRF_COOKIE).path("/"));
            let shown = user.email.as_deref().unwrap_or(email);
            page_response(StatusCode::OK, jar, state.views.signup_pending(shown))
        }
        Err(e) => backend_failure(&state, jar, AuthMode::Signup, email, &e),
    }
}

/// Revoke the backend session behind `cookies`. An expired access cookie is
/// replaced by refreshing first so the refresh token does not outlive logout.
async fn revoke_session(state: &AppState, cookies: &SessionCookies) -> Result<(), SupabaseError> {
    let access_token = match (&cookies.access_token, &cookies.refresh_token) {
        (Some(access_token), _) => access_token.clone(),
        (None, Some(refresh_token)) => state.backend.refresh_session(refresh_token).await?.access_token,
        (None, None) => return Ok(()),
    };
    state.backend.sign_out(&access_token).await
}

/// `POST /logout` — revoke the session, clear cookies, redirect to `/login`.
///
/// Backend errors are logged only; the local session is always cleared.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let cookies = SessionCookies::from_jar(&jar);
    if let Err(e) = revoke_session(&state, &cookies).await {
        tracing::error!(error = %e, "error signing out");
    }

    let jar = auth_state::clear(jar, state.cookie_secure());
    (jar, Redirect::to("/login"))
}

/// `GET /api/auth/me` — return current user.
pub async fn me(State(state): State<AppState>, jar: CookieJar, auth: AuthUser) -> impl IntoResponse {
    let jar = auth_state::apply(jar, auth.event.as_ref(), state.cookie_secure());
    (jar, Json(auth.user))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
