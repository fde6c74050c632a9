use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entities::ratings;
use crate::models::common::LooseNumber;

/// Score stored for the row written automatically when an order completes
pub const PLACEHOLDER_RATING: i32 = 0;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitRatingRequest {
    pub order_id: Option<String>,
    pub rating: Option<LooseNumber>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: i32,
    pub order_id: String,
    pub rating: i32,
    pub feedback: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<ratings::Model> for RatingResponse {
    fn from(r: ratings::Model) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            rating: r.rating,
            feedback: r.feedback,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRatingResponse {
    pub success: bool,
    pub rating: RatingResponse,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingListResponse {
    pub success: bool,
    pub ratings: Vec<RatingResponse>,
}
