//! Ratings are append-only. The admin view shows one row per order: the most
//! recently inserted one, which is the customer's rating once they submit it
//! and the completion placeholder until then.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Order, QueryOrder, Set};
use std::collections::HashSet;

use crate::entities::{prelude::*, ratings};
use crate::error::ApiError;
use crate::services::validation::NewRating;

pub async fn submit_rating(
    db: &DatabaseConnection,
    new_rating: NewRating,
) -> Result<ratings::Model, ApiError> {
    let rating = ratings::ActiveModel {
        order_id: Set(new_rating.order_id),
        rating: Set(new_rating.rating),
        feedback: Set(new_rating.feedback),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Rating {} saved for order {}: {}/5", rating.id, rating.order_id, rating.rating);
    Ok(rating)
}

pub async fn list_current_ratings(db: &DatabaseConnection) -> Result<Vec<ratings::Model>, ApiError> {
    let rows = Ratings::find()
        .order_by(ratings::Column::CreatedAt, Order::Desc)
        .order_by(ratings::Column::Id, Order::Desc)
        .all(db)
        .await?;

    Ok(latest_per_order(rows))
}

/// Keep the first row seen for each order. Input must be newest first.
pub fn latest_per_order(rows: Vec<ratings::Model>) -> Vec<ratings::Model> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| seen.insert(r.order_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn rating(id: i32, order_id: &str, score: i32, minutes_ago: i64) -> ratings::Model {
        ratings::Model {
            id,
            order_id: order_id.to_string(),
            rating: score,
            feedback: None,
            created_at: (Utc::now() - Duration::minutes(minutes_ago)).fixed_offset(),
        }
    }

    #[test]
    fn test_latest_per_order_keeps_first_seen() {
        let rows = vec![
            rating(4, "a", 5, 1),
            rating(3, "b", 2, 2),
            rating(2, "a", 0, 10),
            rating(1, "b", 0, 20),
        ];

        let current = latest_per_order(rows);
        let ids: Vec<i32> = current.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[test]
    fn test_latest_per_order_placeholder_only() {
        let current = latest_per_order(vec![rating(1, "a", 0, 0)]);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].rating, 0);
    }

    #[test]
    fn test_latest_per_order_empty() {
        assert!(latest_per_order(Vec::new()).is_empty());
    }
}
