use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entities::reservations;
use crate::models::common::LooseNumber;

/// Canonical reservation status.
///
/// Older admin screens sent `confirmed` / `cancelled` and the first
/// reservation endpoint stored `PENDING`; those spellings are mapped here and
/// never reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "approved" | "confirmed" => Ok(ReservationStatus::Approved),
            "rejected" | "cancelled" | "canceled" => Ok(ReservationStatus::Rejected),
            _ => Err(format!("Unknown reservation status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReservationRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    /// `YYYY-MM-DD`, or an ISO timestamp whose date part is used
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<LooseNumber>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationLookupRequest {
    pub email: Option<String>,
    pub reservation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<reservations::Model> for ReservationResponse {
    fn from(r: reservations::Model) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            date: r.date,
            time: r.time,
            guests: r.guests,
            message: r.message,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    pub success: bool,
    pub reservation_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationListResponse {
    pub success: bool,
    pub reservations: Vec<ReservationResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationLookupResponse {
    pub reservation: ReservationResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationResponse {
    pub success: bool,
    pub reservation: ReservationResponse,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResendReservationEmailRequest {
    pub reservation_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendReservationEmailResponse {
    pub success: bool,
    pub status: String,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
    pub message: String,
}
