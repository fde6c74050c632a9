//! Reservation requests and their approval flow.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};

use std::str::FromStr;

use crate::entities::{prelude::*, reservations};
use crate::error::ApiError;
use crate::models::reservation::ReservationStatus;
use crate::services::email::DeliveryReport;
use crate::services::notifications::Notifier;
use crate::services::validation::NewReservation;

pub async fn create_reservation(
    db: &DatabaseConnection,
    new_reservation: NewReservation,
) -> Result<reservations::Model, ApiError> {
    let reservation = reservations::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(new_reservation.name),
        email: Set(new_reservation.email),
        phone: Set(new_reservation.phone),
        date: Set(new_reservation.date),
        time: Set(new_reservation.time),
        guests: Set(new_reservation.guests),
        message: Set(new_reservation.message),
        status: Set(ReservationStatus::Pending.to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;

    tracing::info!(
        "Reservation {} requested for {} on {} at {} ({} guests)",
        reservation.id,
        reservation.email,
        reservation.date,
        reservation.time,
        reservation.guests
    );

    Ok(reservation)
}

pub async fn list_reservations(
    db: &DatabaseConnection,
) -> Result<Vec<reservations::Model>, ApiError> {
    Ok(Reservations::find()
        .order_by(reservations::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?)
}

/// Find by id when given, otherwise the most recent reservation for `email`.
pub async fn lookup_reservation(
    db: &DatabaseConnection,
    reservation_id: Option<&str>,
    email: Option<&str>,
) -> Result<Option<reservations::Model>, ApiError> {
    let found = match (reservation_id, email) {
        (Some(id), _) => Reservations::find_by_id(id.to_string()).one(db).await?,
        (None, Some(email)) => {
            Reservations::find()
                .filter(reservations::Column::Email.eq(email))
                .order_by(reservations::Column::CreatedAt, Order::Desc)
                .one(db)
                .await?
        }
        (None, None) => None,
    };

    Ok(found)
}

#[derive(Debug, Clone)]
pub struct ReservationTransition {
    pub reservation: reservations::Model,
    /// `None` when the target status sends nothing (`pending`)
    pub email: Option<DeliveryReport>,
}

/// Persist the new status, then notify the guest. The email outcome never
/// affects the stored status.
pub async fn transition_reservation(
    db: &DatabaseConnection,
    notifier: &Notifier,
    reservation_id: &str,
    target: ReservationStatus,
) -> Result<ReservationTransition, ApiError> {
    let existing = Reservations::find_by_id(reservation_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Reservation {} not found", reservation_id)))?;

    let previous = existing.status.clone();

    let mut active: reservations::ActiveModel = existing.into();
    active.status = Set(target.to_string());
    let reservation = active.update(db).await?;

    tracing::info!(
        "Reservation {} status {} -> {}",
        reservation_id,
        previous,
        target
    );

    let email = match target {
        ReservationStatus::Approved => Some(notifier.reservation_approved(&reservation).await),
        ReservationStatus::Rejected => Some(notifier.reservation_rejected(&reservation).await),
        ReservationStatus::Pending => None,
    };

    Ok(ReservationTransition { reservation, email })
}

/// Send the guest the email matching the stored decision again, without
/// touching the reservation. Pending reservations have nothing to resend.
pub async fn resend_decision_email(
    db: &DatabaseConnection,
    notifier: &Notifier,
    reservation_id: &str,
) -> Result<(ReservationStatus, DeliveryReport), ApiError> {
    let reservation = Reservations::find_by_id(reservation_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Reservation {} not found", reservation_id)))?;

    let status = ReservationStatus::from_str(&reservation.status).map_err(|_| {
        ApiError::Internal(format!(
            "Reservation {} has unrecognised status {:?}",
            reservation_id, reservation.status
        ))
    })?;

    let report = match status {
        ReservationStatus::Approved => notifier.reservation_approved(&reservation).await,
        ReservationStatus::Rejected => notifier.reservation_rejected(&reservation).await,
        ReservationStatus::Pending => {
            return Err(ApiError::validation(
                "Reservation is still pending; approve or reject it first",
            ));
        }
    };

    tracing::info!(
        "Resent {} email for reservation {} (delivered: {})",
        status,
        reservation_id,
        report.success
    );

    Ok((status, report))
}

pub async fn delete_reservation(
    db: &DatabaseConnection,
    reservation_id: &str,
) -> Result<bool, ApiError> {
    let result = Reservations::delete_by_id(reservation_id.to_string())
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!("Deleted reservation {}", reservation_id);
    }

    Ok(result.rows_affected > 0)
}
