//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlebars escapes every `{{value}}`, so backend-supplied text (emails,
//! error messages) is safe to interpolate.

use handlebars::Handlebars;
use serde_json::json;

use crate::diagnostics::ConnectionReport;
use crate::supabase::User;

const PARTIALS: &[(&str, &str)] = &[
    ("head", include_str!("templates/head.hbs")),
    ("foot", include_str!("templates/foot.hbs")),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("home_anonymous", include_str!("templates/home_anonymous.hbs")),
    ("home_welcome", include_str!("templates/home_welcome.hbs")),
    ("auth_form", include_str!("templates/auth_form.hbs")),
    ("signup_pending", include_str!("templates/signup_pending.hbs")),
    ("diagnostics", include_str!("templates/diagnostics.hbs")),
];

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("template {name} failed to compile: {message}")]
    Template { name: &'static str, message: String },

    #[error("render failed: {0}")]
    Render(String),
}

/// Which credential form to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    fn heading(self) -> &'static str {
        match self {
            Self::Login => "Log in to PicShare",
            Self::Signup => "Sign up for PicShare",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
        }
    }

    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
        }
    }

    fn alternate(self) -> (&'static str, &'static str) {
        match self {
            Self::Login => ("/signup", "Need an account? Sign Up"),
            Self::Signup => ("/login", "Already have an account? Login"),
        }
    }
}

/// Data for a login or signup form.
#[derive(Debug, Clone)]
pub struct AuthForm<'a> {
    pub mode: AuthMode,
    pub email: &'a str,
    pub error: Option<&'a str>,
    pub csrf_token: &'a str,
}

pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    /// Compile all page templates.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first template that fails to compile.
    pub fn new() -> Result<Self, ViewError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);

        for &(name, source) in PARTIALS {
            registry
                .register_partial(name, source)
                .map_err(|e| ViewError::Template { name, message: e.to_string() })?;
        }
        for &(name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| ViewError::Template { name, message: e.to_string() })?;
        }

        Ok(Self { registry })
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, ViewError> {
        self.registry
            .render(name, data)
            .map_err(|e| ViewError::Render(e.to_string()))
    }

    /// Landing page for visitors without a session.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn landing(&self) -> Result<String, ViewError> {
        self.render("home_anonymous", &json!({}))
    }

    /// Welcome page for a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn welcome(&self, user: &User) -> Result<String, ViewError> {
        self.render("home_welcome", &json!({ "id": user.id, "email": user.email }))
    }

    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn auth_form(&self, form: &AuthForm<'_>) -> Result<String, ViewError> {
        let (alternate_href, alternate_label) = form.mode.alternate();
        self.render(
            "auth_form",
            &json!({
                "heading": form.mode.heading(),
                "action": form.mode.action(),
                "submit_label": form.mode.submit_label(),
                "alternate_href": alternate_href,
                "alternate_label": alternate_label,
                "email": form.email,
                "error": form.error,
                "csrf_token": form.csrf_token,
            }),
        )
    }

    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn signup_pending(&self, email: &str) -> Result<String, ViewError> {
        self.render("signup_pending", &json!({ "email": email }))
    }

    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn diagnostics(&self, report: &ConnectionReport) -> Result<String, ViewError> {
        let guidance_class = if report.is_success() { "guidance-success" } else { "guidance-error" };
        self.render(
            "diagnostics",
            &json!({
                "status_label": report.status_label(),
                "indicator_class": report.indicator_class(),
                "message": report.message,
                "details_json": report.details_json(),
                "guidance_title": report.guidance_title(),
                "guidance_class": guidance_class,
                "guidance": report.guidance(),
            }),
        )
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
