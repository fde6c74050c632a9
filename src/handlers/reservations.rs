use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::str::FromStr;

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::models::common::DeleteResponse;
use crate::models::order::UpdateStatusRequest;
use crate::models::reservation::{
    CreateReservationRequest, CreateReservationResponse, ReservationListResponse,
    ReservationLookupRequest, ReservationLookupResponse, ReservationStatus,
    ResendReservationEmailRequest, ResendReservationEmailResponse, UpdateReservationResponse,
};
use crate::services::admin_auth::AdminSession;
use crate::services::reservation_lifecycle;
use crate::services::validation::validate_new_reservation;
use crate::AppState;

pub async fn create_reservation(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), ApiError> {
    let new_reservation = validate_new_reservation(payload)?;
    let reservation = reservation_lifecycle::create_reservation(&state.db, new_reservation).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReservationResponse {
            success: true,
            reservation_id: reservation.id,
            message: "Reservation created successfully".to_string(),
        }),
    ))
}

pub async fn list_reservations(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ReservationListResponse>, ApiError> {
    let reservations = reservation_lifecycle::list_reservations(&state.db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ReservationListResponse {
        success: true,
        reservations,
    }))
}

/// Public lookup so guests can check on their request.
pub async fn lookup_reservation(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ReservationLookupRequest>,
) -> Result<Json<ReservationLookupResponse>, ApiError> {
    let reservation_id = payload.reservation_id.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let email = payload.email.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if reservation_id.is_none() && email.is_none() {
        return Err(ApiError::validation("Email or Reservation ID is required."));
    }

    let reservation = reservation_lifecycle::lookup_reservation(&state.db, reservation_id, email)
        .await?
        .ok_or_else(|| ApiError::not_found("No reservation found."))?;

    Ok(Json(ReservationLookupResponse {
        reservation: reservation.into(),
    }))
}

pub async fn update_reservation_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(reservation_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> Result<Json<UpdateReservationResponse>, ApiError> {
    let raw = payload
        .status
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Status is required"))?;
    let target =
        ReservationStatus::from_str(&raw).map_err(|_| ApiError::validation("Invalid status"))?;

    let transition = reservation_lifecycle::transition_reservation(
        &state.db,
        &state.notifier,
        &reservation_id,
        target,
    )
    .await?;

    let (email_sent, email_error) = match transition.email {
        Some(report) => (report.success, report.error),
        None => (false, None),
    };

    let message = match (target, email_sent) {
        (ReservationStatus::Pending, _) => "Reservation moved back to pending".to_string(),
        (_, true) => format!("Reservation {} and email sent", target),
        (_, false) => format!("Reservation {} but the email could not be sent", target),
    };

    Ok(Json(UpdateReservationResponse {
        success: true,
        reservation: transition.reservation.into(),
        email_sent,
        email_error,
        message,
    }))
}

pub async fn delete_reservation(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(reservation_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = reservation_lifecycle::delete_reservation(&state.db, &reservation_id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted,
        message: if deleted {
            "Reservation deleted successfully".to_string()
        } else {
            "Reservation already removed".to_string()
        },
    }))
}

/// Resend the approval or rejection email for a decided reservation.
pub async fn resend_reservation_email(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResendReservationEmailRequest>,
) -> Result<Json<ResendReservationEmailResponse>, ApiError> {
    let reservation_id = payload
        .reservation_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Reservation ID is required"))?;

    let (status, report) =
        reservation_lifecycle::resend_decision_email(&state.db, &state.notifier, reservation_id)
            .await?;

    let message = if report.success {
        format!("Email sent for {} reservation", status)
    } else {
        format!("Email for {} reservation could not be sent", status)
    };

    Ok(Json(ResendReservationEmailResponse {
        success: true,
        status: status.to_string(),
        email_sent: report.success,
        email_error: report.error,
        message,
    }))
}
