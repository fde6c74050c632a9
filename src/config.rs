//! Process configuration read from the environment.
//!
//! Secrets are optional: a missing admin password disables admin login and a
//! missing email API key swaps in a sender that fails every delivery. Neither
//! stops the server from starting.

use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
pub const ENV_RESEND_API_KEY: &str = "RESEND_API_KEY";
pub const ENV_RESEND_API_URL: &str = "RESEND_API_URL";
pub const ENV_EMAIL_FROM: &str = "EMAIL_FROM";
pub const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";
pub const ENV_SECURE_COOKIES: &str = "SECURE_COOKIES";
pub const ENV_CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_EMAIL_FROM: &str = "Club Grille <onboarding@resend.dev>";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub admin_password: Option<String>,
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub email_from: String,
    pub public_base_url: String,
    pub secure_cookies: bool,
    pub cors_allowed_origin: Option<String>,
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct ConfigError(pub String);

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var(ENV_DATABASE_URL)
            .map_err(|_| ConfigError(format!("{ENV_DATABASE_URL} must be set")))?;

        let admin_password = optional_secret(ENV_ADMIN_PASSWORD);
        if admin_password.is_none() {
            warn!("{ENV_ADMIN_PASSWORD} not set - admin login is disabled");
        }

        let resend_api_key = optional_secret(ENV_RESEND_API_KEY);
        if resend_api_key.is_none() {
            warn!("{ENV_RESEND_API_KEY} not set - email notifications will fail");
        }

        Ok(Self {
            database_url,
            bind_addr: try_load(ENV_BIND_ADDR, DEFAULT_BIND_ADDR)?,
            admin_password,
            resend_api_key,
            resend_api_url: try_load(ENV_RESEND_API_URL, DEFAULT_RESEND_API_URL)?,
            email_from: try_load(ENV_EMAIL_FROM, DEFAULT_EMAIL_FROM)?,
            public_base_url: try_load::<String>(ENV_PUBLIC_BASE_URL, DEFAULT_PUBLIC_BASE_URL)?
                .trim_end_matches('/')
                .to_string(),
            secure_cookies: try_load(ENV_SECURE_COOKIES, "false")?,
            cors_allowed_origin: optional_secret(ENV_CORS_ALLOWED_ORIGIN),
        })
    }
}

/// Empty values count as unset.
fn optional_secret(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| ConfigError(format!("Invalid {key} value {raw:?}: {e}")))
}
