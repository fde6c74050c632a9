//! Order lifecycle: creation, status transitions, removal.
//!
//! The status write is authoritative. Side effects of a transition (emails,
//! the placeholder rating) run after it commits, each exactly once, and a
//! failure in any of them is logged without failing the transition.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::str::FromStr;

use crate::entities::{orders, prelude::*, ratings};
use crate::error::ApiError;
use crate::models::order::{OrderResponse, OrderStatus};
use crate::models::rating::PLACEHOLDER_RATING;
use crate::services::email::DeliveryReport;
use crate::services::notifications::Notifier;
use crate::services::validation::NewOrder;

/// Admin listing cap, newest first
pub const ORDER_LIST_LIMIT: u64 = 50;

#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order: OrderResponse,
    pub confirmation: DeliveryReport,
}

pub async fn create_order(
    db: &DatabaseConnection,
    notifier: &Notifier,
    new_order: NewOrder,
) -> Result<CreatedOrder, ApiError> {
    let now = Utc::now().fixed_offset();
    let items = serde_json::to_string(&new_order.items)
        .map_err(|e| ApiError::Internal(format!("Failed to encode order items: {}", e)))?;

    let (bkash_number, bkash_transaction_id, bkash_amount) = match new_order.wallet {
        Some(w) => (Some(w.number), Some(w.transaction_id), Some(w.amount)),
        None => (None, None, None),
    };

    let model = orders::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        customer_name: Set(new_order.customer_name),
        customer_email: Set(new_order.customer_email),
        customer_phone: Set(new_order.customer_phone),
        delivery_address: Set(new_order.delivery_address),
        items: Set(items),
        subtotal: Set(new_order.subtotal),
        tax: Set(new_order.tax),
        total: Set(new_order.total),
        payment_method: Set(new_order.payment_method.to_string()),
        bkash_number: Set(bkash_number),
        bkash_transaction_id: Set(bkash_transaction_id),
        bkash_amount: Set(bkash_amount),
        notes: Set(new_order.notes),
        status: Set(OrderStatus::Pending.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::info!(
        "Created order {} for {} (total {}, {})",
        model.id,
        model.customer_email,
        model.total,
        model.payment_method
    );

    let order = OrderResponse::from(model);
    let confirmation = notifier.order_confirmation(&order).await;

    Ok(CreatedOrder {
        order,
        confirmation,
    })
}

pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<OrderResponse>, ApiError> {
    let rows = Orders::find()
        .order_by(orders::Column::CreatedAt, Order::Desc)
        .limit(ORDER_LIST_LIMIT)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(OrderResponse::from).collect())
}

#[derive(Debug, Clone)]
pub struct OrderTransition {
    pub order: OrderResponse,
    /// `None` when the stored status was not a recognised value
    pub previous: Option<OrderStatus>,
    /// Set only when this call moved the order into `completed`
    pub completion_email: Option<DeliveryReport>,
    pub placeholder_created: bool,
}

/// Move an order to `target`. Any status may follow any other.
pub async fn transition_order(
    db: &DatabaseConnection,
    notifier: &Notifier,
    order_id: &str,
    target: OrderStatus,
) -> Result<OrderTransition, ApiError> {
    let existing = Orders::find_by_id(order_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Order {} not found", order_id)))?;

    let previous = OrderStatus::from_str(&existing.status).ok();

    let mut active: orders::ActiveModel = existing.into();
    active.status = Set(target.to_string());
    active.updated_at = Set(Utc::now().fixed_offset());
    let updated = active.update(db).await?;

    tracing::info!(
        "Order {} status {} -> {}",
        order_id,
        previous.map(|s| s.as_str()).unwrap_or("unknown"),
        target
    );

    let order = OrderResponse::from(updated);
    let entered = previous != Some(target);

    let mut completion_email = None;
    let mut placeholder_created = false;

    match target {
        OrderStatus::Completed if entered => {
            completion_email = Some(notifier.order_completion(&order).await);

            placeholder_created = match ensure_placeholder_rating(db, &order.id).await {
                Ok(created) => created,
                Err(e) => {
                    tracing::warn!("Failed to create placeholder rating for order {}: {}", order.id, e);
                    false
                }
            };
        }
        OrderStatus::Ready if entered => {
            // Hook point: customers are not notified when an order is ready
            tracing::debug!("Order {} is ready; no ready notification is sent", order.id);
        }
        _ => {}
    }

    Ok(OrderTransition {
        order,
        previous,
        completion_email,
        placeholder_created,
    })
}

/// Insert a score-0 rating unless the order already has any rating row.
/// Returns whether a row was written.
pub async fn ensure_placeholder_rating(
    db: &DatabaseConnection,
    order_id: &str,
) -> Result<bool, sea_orm::DbErr> {
    let existing = Ratings::find()
        .filter(ratings::Column::OrderId.eq(order_id))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(false);
    }

    ratings::ActiveModel {
        order_id: Set(order_id.to_string()),
        rating: Set(PLACEHOLDER_RATING),
        feedback: Set(None),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!("Created placeholder rating for order {}", order_id);
    Ok(true)
}

/// Returns whether a row was removed; removing an absent id is a no-op.
pub async fn delete_order(db: &DatabaseConnection, order_id: &str) -> Result<bool, ApiError> {
    let result = Orders::delete_by_id(order_id.to_string()).exec(db).await?;

    if result.rows_affected == 0 {
        tracing::debug!("Delete of order {}: no such order", order_id);
    } else {
        tracing::info!("Deleted order {}", order_id);
    }

    Ok(result.rows_affected > 0)
}

/// Remove every completed or cancelled order. Returns the number removed.
pub async fn clear_finished_orders(db: &DatabaseConnection) -> Result<u64, ApiError> {
    let terminal: Vec<&str> = OrderStatus::ALL
        .iter()
        .filter(|s| s.is_terminal())
        .map(|s| s.as_str())
        .collect();

    let result = Orders::delete_many()
        .filter(orders::Column::Status.is_in(terminal))
        .exec(db)
        .await?;

    tracing::info!("Cleared {} completed/cancelled orders", result.rows_affected);
    Ok(result.rows_affected)
}
