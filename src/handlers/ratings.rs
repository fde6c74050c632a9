use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::models::rating::{RatingListResponse, SubmitRatingRequest, SubmitRatingResponse};
use crate::services::admin_auth::AdminSession;
use crate::services::ratings;
use crate::services::validation::validate_rating;
use crate::AppState;

/// Public endpoint behind the link in the completion email.
pub async fn submit_rating(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmitRatingRequest>,
) -> Result<Json<SubmitRatingResponse>, ApiError> {
    let new_rating = validate_rating(payload)?;
    let rating = ratings::submit_rating(&state.db, new_rating).await?;

    Ok(Json(SubmitRatingResponse {
        success: true,
        rating: rating.into(),
        message: "Thank you for your feedback!".to_string(),
    }))
}

pub async fn list_ratings(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<RatingListResponse>, ApiError> {
    let ratings = ratings::list_current_ratings(&state.db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(RatingListResponse {
        success: true,
        ratings,
    }))
}
