//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! HTML pages (`/`, `/login`, `/signup`, `/test-supabase`) are rendered on
//! the server; the logout control is a form post. A few JSON endpoints
//! expose the same data for scripts and health checks.

pub mod auth;
pub mod diagnostics;
pub mod home;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum_extra::extract::cookie::CookieJar;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::views::ViewError;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/signup", get(auth::signup_page).post(auth::signup_submit))
        .route("/logout", post(auth::logout))
        .route("/test-supabase", get(diagnostics::test_supabase))
        .route("/api/test-supabase", get(diagnostics::test_supabase_json))
        .route("/api/auth/me", get(auth::me))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Send a rendered page along with any cookie changes, or a 500 if the
/// template failed.
pub(crate) fn page_response(status: StatusCode, jar: CookieJar, page: Result<String, ViewError>) -> Response {
    match page {
        Ok(body) => (status, jar, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "page render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
