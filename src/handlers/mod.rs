use axum::extract::FromRequest;

use crate::error::ApiError;

pub mod admin;
pub mod orders;
pub mod ratings;
pub mod reservations;

/// `Json` body extractor whose rejections render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
