//! Application configuration parsed from environment variables.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DIAGNOSTICS_TABLE: &str = "_realtime_subscription";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required env var {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Connection settings for the hosted backend project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project base URL without a trailing slash.
    pub url: String,
    /// Public (anon) API key.
    pub anon_key: String,
    pub timeouts: HttpTimeouts,
}

impl SupabaseConfig {
    /// Load from `SUPABASE_URL` and `SUPABASE_ANON_KEY`, with optional
    /// `SUPABASE_REQUEST_TIMEOUT_SECS` / `SUPABASE_CONNECT_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if either required variable is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = required("SUPABASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let anon_key = required("SUPABASE_ANON_KEY")?;
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("SUPABASE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SUPABASE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { url, anon_key, timeouts })
    }

    /// Project reference: the first host label of the project URL.
    ///
    /// `https://abcd1234.supabase.co` yields `abcd1234`.
    #[must_use]
    pub fn project_ref(&self) -> Option<&str> {
        let (_, rest) = self.url.split_once("//")?;
        rest.split('.').next().filter(|label| !label.is_empty())
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub port: u16,
    /// Whether auth cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// Table read by the connection diagnostic.
    pub diagnostics_table: String,
}

impl AppConfig {
    /// Build the application config from the environment.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: default true when `PUBLIC_URL` is `https://`
    /// - `DIAGNOSTICS_TABLE`: default `_realtime_subscription`
    ///
    /// # Errors
    ///
    /// Returns an error for missing backend settings or an unparseable `PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase = SupabaseConfig::from_env()?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };
        let diagnostics_table = std::env::var("DIAGNOSTICS_TABLE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DIAGNOSTICS_TABLE.to_string());

        Ok(Self { supabase, port, cookie_secure: cookie_secure(), diagnostics_table })
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_URL")
        .map(|url| url.starts_with("https://"))
        .unwrap_or(false)
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
