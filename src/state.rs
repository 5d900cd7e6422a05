//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! immutable after startup: the backend client, the compiled templates, and
//! the parsed config, each behind an `Arc`.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::supabase::AuthBackend;
use crate::views::Views;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn AuthBackend>,
    pub views: Arc<Views>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, views: Views, config: AppConfig) -> Self {
        Self { backend, views: Arc::new(views), config: Arc::new(config) }
    }

    /// Whether auth cookies should be marked `Secure`.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.config.cookie_secure
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
