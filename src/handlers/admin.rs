use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Json,
};

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::models::admin::AdminLoginRequest;
use crate::models::common::SuccessResponse;
use crate::services::admin_auth::{clear_session_cookie, session_cookie};
use crate::AppState;

pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AdminLoginRequest>,
) -> Result<(HeaderMap, Json<SuccessResponse>), ApiError> {
    let Some(token) = state.auth.login(&payload.password) else {
        tracing::warn!("Rejected admin login attempt");
        return Err(ApiError::Unauthorized);
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie_header(session_cookie(&token, state.secure_cookies))?);

    tracing::info!("Admin logged in");
    Ok((headers, Json(SuccessResponse::new("Logged in"))))
}

pub async fn admin_logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<SuccessResponse>), ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie_header(clear_session_cookie(state.secure_cookies))?);

    Ok((headers, Json(SuccessResponse::new("Logged out"))))
}

fn cookie_header(value: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&value)
        .map_err(|e| ApiError::Internal(format!("Invalid cookie header: {}", e)))
}
