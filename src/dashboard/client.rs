//! HTTP client for the admin endpoints.
//!
//! The session cookie set by `/admin-login` is kept in the client's cookie
//! store and sent on every later request.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::error::ErrorResponse;
use crate::models::admin::AdminLoginRequest;
use crate::models::common::DeleteResponse;
use crate::models::order::{
    ClearCompletedResponse, OrderListResponse, OrderResponse, OrderStatus, UpdateOrderResponse,
};
use crate::models::rating::{RatingListResponse, RatingResponse};
use crate::models::reservation::{
    ReservationListResponse, ReservationResponse, ReservationStatus, UpdateReservationResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The admin cookie is missing, expired or the password was wrong
    #[error("Not authorized")]
    Unauthorized,

    #[error("Server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, password: &str) -> Result<(), ClientError> {
        let body = AdminLoginRequest {
            password: password.to_string(),
        };
        let response = self.request(Method::POST, "/admin-login").json(&body).send().await?;
        check(response).await?;

        tracing::info!("Logged in to {}", self.base_url);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.request(Method::POST, "/admin-logout").send().await?;
        check(response).await?;
        Ok(())
    }

    pub async fn fetch_orders(&self) -> Result<Vec<OrderResponse>, ClientError> {
        let list: OrderListResponse = self.get_json("/orders").await?;
        Ok(list.orders)
    }

    pub async fn fetch_reservations(&self) -> Result<Vec<ReservationResponse>, ClientError> {
        let list: ReservationListResponse = self.get_json("/reservations").await?;
        Ok(list.reservations)
    }

    pub async fn fetch_ratings(&self) -> Result<Vec<RatingResponse>, ClientError> {
        let list: RatingListResponse = self.get_json("/ratings").await?;
        Ok(list.ratings)
    }

    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<UpdateOrderResponse, ClientError> {
        let response = self
            .request(Method::PATCH, &format!("/orders/{}", order_id))
            .json(&json!({ "status": status.as_str() }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_reservation_status(
        &self,
        reservation_id: &str,
        status: ReservationStatus,
    ) -> Result<UpdateReservationResponse, ClientError> {
        let response = self
            .request(Method::PATCH, &format!("/reservations/{}", reservation_id))
            .json(&json!({ "status": status.as_str() }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_order(&self, order_id: &str) -> Result<DeleteResponse, ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/orders/{}", order_id))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_reservation(
        &self,
        reservation_id: &str,
    ) -> Result<DeleteResponse, ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/reservations/{}", reservation_id))
            .send()
            .await?;
        decode(response).await
    }

    /// Remove all completed and cancelled orders; returns how many went.
    pub async fn clear_completed(&self) -> Result<u64, ClientError> {
        let response = self
            .request(Method::DELETE, "/orders/clear-completed")
            .send()
            .await?;
        let cleared: ClearCompletedResponse = decode(response).await?;
        Ok(cleared.deleted_count)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.request(Method::GET, path).send().await?;
        decode(response).await
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    Err(ClientError::Api { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = DashboardClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
