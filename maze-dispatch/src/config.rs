//! Environment-driven settings, read once at process startup.

use std::env;

/// Process-wide configuration. Constructed once via [`Settings::from_env`]
/// and handed around behind an `Arc`, read once up front rather than
/// re-read per request.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Set when running on a platform that cannot host a background
    /// thread pool, forcing the dispatcher to solve inline.
    pub deta_runtime: bool,
    pub bind_addr: String,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            deta_runtime: env_flag("DETA_RUNTIME"),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            log_level: env::var("MAZE_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            deta_runtime: false,
            bind_addr: "127.0.0.1:8080".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false)
}
