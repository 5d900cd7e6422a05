//! Home page — landing for visitors, welcome for signed-in users.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use super::page_response;
use crate::auth_state::{self, AuthState, SessionCookies};
use crate::state::AppState;

/// `GET /` — resolve the session, then render the matching page.
///
/// A backend that cannot be reached is treated like no session.
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Response {
    let cookies = SessionCookies::from_jar(&jar);
    let auth = match auth_state::resolve(state.backend.as_ref(), &cookies).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed; showing landing page");
            AuthState::default()
        }
    };

    let jar = auth_state::apply(jar, auth.event.as_ref(), state.cookie_secure());
    let page = match &auth.user {
        Some(user) => state.views.welcome(user),
        None => state.views.landing(),
    };
    page_response(StatusCode::OK, jar, page)
}
