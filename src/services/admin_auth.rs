//! Admin authentication.
//!
//! One shared password unlocks the admin panel. A successful login hands out
//! the process-wide session token in an HTTP-only cookie; every admin route
//! takes an [`AdminSession`] argument, which rejects requests whose cookie is
//! missing or does not carry that token.
//!
//! Handlers depend only on [`AdminAuth`], so per-user credentials can replace
//! [`SharedPasswordAuth`] without touching them.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::error::ApiError;
use crate::AppState;

pub const ADMIN_COOKIE: &str = "admin-auth";

pub trait AdminAuth: Send + Sync {
    /// Session token to issue when `password` is accepted.
    fn login(&self, password: &str) -> Option<String>;

    fn verify_session(&self, token: &str) -> bool;
}

pub struct SharedPasswordAuth {
    password: Option<String>,
    session_token: String,
}

impl SharedPasswordAuth {
    /// `None` disables login entirely. The session token is random per
    /// process, so a restart signs the operator out.
    pub fn new(password: Option<String>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
            session_token: uuid::Uuid::new_v4().simple().to_string(),
        }
    }
}

impl AdminAuth for SharedPasswordAuth {
    fn login(&self, password: &str) -> Option<String> {
        match &self.password {
            Some(expected) if expected == password => Some(self.session_token.clone()),
            _ => None,
        }
    }

    fn verify_session(&self, token: &str) -> bool {
        self.password.is_some() && token == self.session_token
    }
}

/// Proof that the request carried a valid admin cookie.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = read_cookie(&parts.headers, ADMIN_COOKIE) else {
            tracing::debug!("Admin route {} called without session cookie", parts.uri.path());
            return Err(ApiError::Unauthorized);
        };

        if state.auth.verify_session(&token) {
            Ok(AdminSession)
        } else {
            tracing::warn!("Admin route {} called with stale session cookie", parts.uri.path());
            Err(ApiError::Unauthorized)
        }
    }
}

/// `Set-Cookie` value issued on login.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{ADMIN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{ADMIN_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
