use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::str::FromStr;

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::models::common::DeleteResponse;
use crate::models::order::{
    ClearCompletedResponse, CreateOrderRequest, CreateOrderResponse, OrderListResponse,
    OrderStatus, UpdateOrderResponse, UpdateStatusRequest,
};
use crate::services::admin_auth::AdminSession;
use crate::services::order_lifecycle;
use crate::services::validation::validate_new_order;
use crate::AppState;

pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    let new_order = validate_new_order(payload).map_err(|e| {
        tracing::debug!("Rejected order: {}", e);
        e
    })?;

    let created = order_lifecycle::create_order(&state.db, &state.notifier, new_order).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            order_id: created.order.id.clone(),
            order: created.order,
            email_sent: created.confirmation.success,
            email_error: created.confirmation.error,
            message: "Order created successfully".to_string(),
        }),
    ))
}

pub async fn list_orders(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let orders = order_lifecycle::list_orders(&state.db).await?;

    Ok(Json(OrderListResponse {
        success: true,
        orders,
    }))
}

pub async fn update_order_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> Result<Json<UpdateOrderResponse>, ApiError> {
    let raw = payload
        .status
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Status is required"))?;
    let target = OrderStatus::from_str(&raw).map_err(|_| ApiError::validation("Invalid status"))?;

    let transition =
        order_lifecycle::transition_order(&state.db, &state.notifier, &order_id, target).await?;

    Ok(Json(UpdateOrderResponse {
        success: true,
        order: transition.order,
        message: format!("Order status updated to {}", target),
    }))
}

pub async fn delete_order(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = order_lifecycle::delete_order(&state.db, &order_id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted,
        message: if deleted {
            "Order removed from panel".to_string()
        } else {
            "Order already removed".to_string()
        },
    }))
}

pub async fn clear_completed_orders(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ClearCompletedResponse>, ApiError> {
    let deleted_count = order_lifecycle::clear_finished_orders(&state.db).await?;

    Ok(Json(ClearCompletedResponse {
        success: true,
        deleted_count,
        message: format!("Cleared {} completed/cancelled orders", deleted_count),
    }))
}
