//! # Application Configuration
//!
//! Environment-driven configuration for the server binary. Every
//! variable is optional; unset or unparseable values fall back to the
//! built-in defaults.
//!
//! - `HOST`, `PORT` - listen address
//! - `CORS_ORIGINS` - comma-separated allow list; unset means permissive
//! - `JWT_SECRET` - token signing secret
//! - `TOKEN_TTL_HOURS` - token lifetime

use chrono::Duration;

use crate::auth::JwtConfig;
use crate::http_server::HttpServerConfig;

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpServerConfig,
    pub token: JwtConfig,
}

impl AppConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        let mut http = HttpServerConfig::default();

        if let Ok(host) = std::env::var("HOST") {
            if !host.is_empty() {
                http.host = host;
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                http.port = port;
            }
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            http.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        let mut token = JwtConfig::default();
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => token.secret = secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the built-in default secret");
            }
        }
        if let Ok(hours) = std::env::var("TOKEN_TTL_HOURS") {
            if let Ok(hours) = hours.parse::<i64>() {
                if hours > 0 {
                    token.ttl = Duration::hours(hours);
                }
            }
        }

        Self { http, token }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            token: JwtConfig::default(),
        }
    }
}
