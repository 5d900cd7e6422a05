//! Connection test routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use super::page_response;
use crate::auth_state::{self, SessionCookies};
use crate::diagnostics::{self, ConnectionReport};
use crate::state::AppState;

async fn run_check(state: &AppState, jar: CookieJar) -> (ConnectionReport, CookieJar) {
    let cookies = SessionCookies::from_jar(&jar);
    let (report, event) = diagnostics::run(state.backend.as_ref(), &state.config, &cookies).await;
    tracing::info!(status = ?report.status, "connection test finished");
    (report, auth_state::apply(jar, event.as_ref(), state.cookie_secure()))
}

/// `GET /test-supabase` — HTML report.
pub async fn test_supabase(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (report, jar) = run_check(&state, jar).await;
    page_response(StatusCode::OK, jar, state.views.diagnostics(&report))
}

/// `GET /api/test-supabase` — JSON report; 503 when the check fails.
pub async fn test_supabase_json(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (report, jar) = run_check(&state, jar).await;
    let status = if report.is_success() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, jar, Json(report)).into_response()
}
