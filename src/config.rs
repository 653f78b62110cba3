//! Environment-driven configuration.
//!
//! Everything the process needs is read once at startup and handed to the
//! components that use it; nothing reads the environment after boot.

use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Razorpay API base url (overridable for staging/sandbox).
    pub razorpay_base_url: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    /// Timeout for gateway calls, milliseconds.
    pub gateway_timeout_ms: u64,
    /// Token the session middleware would normally mint; callers present it
    /// as a bearer token.
    pub session_token: String,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// The gateway credentials are required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            razorpay_base_url: env_or("RAZORPAY_BASE_URL", "https://api.razorpay.com"),
            razorpay_key_id: required("RAZORPAY_KEY_ID")?,
            razorpay_key_secret: required("RAZORPAY_KEY_SECRET")?,
            gateway_timeout_ms: env_u64("GATEWAY_TIMEOUT_MS", 10_000),
            session_token: required("SESSION_TOKEN")?,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}
