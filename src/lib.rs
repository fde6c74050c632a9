// src/lib.rs

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use services::{admin_auth::AdminAuth, notifications::Notifier};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: Notifier,
    pub auth: Arc<dyn AdminAuth>,
    /// Adds `Secure` to the admin cookie; on when served over HTTPS
    pub secure_cookies: bool,
}

pub mod entities {
    pub mod prelude;
    pub mod orders;
    pub mod ratings;
    pub mod reservations;
}

pub mod services {
    pub mod admin_auth;
    pub mod email;
    pub mod notifications;
    pub mod order_lifecycle;
    pub mod ratings;
    pub mod reservation_lifecycle;
    pub mod validation;
}

pub mod storefront {
    pub mod cart;
    pub mod forms;
}

pub mod dashboard {
    pub mod client;
    pub mod session;
}

pub mod jobs {
    pub mod dashboard_poll;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

/// All HTTP routes. Admin-only handlers take an `AdminSession` argument.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello_restaurant))
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route(
            "/orders/clear-completed",
            delete(handlers::orders::clear_completed_orders),
        )
        .route(
            "/orders/{id}",
            patch(handlers::orders::update_order_status).delete(handlers::orders::delete_order),
        )
        .route(
            "/reservations",
            post(handlers::reservations::create_reservation)
                .get(handlers::reservations::list_reservations),
        )
        .route(
            "/reservations/lookup",
            post(handlers::reservations::lookup_reservation),
        )
        .route(
            "/reservations/{id}",
            patch(handlers::reservations::update_reservation_status)
                .put(handlers::reservations::update_reservation_status)
                .delete(handlers::reservations::delete_reservation),
        )
        .route(
            "/send-reservation-email",
            post(handlers::reservations::resend_reservation_email),
        )
        .route(
            "/ratings",
            post(handlers::ratings::submit_rating).get(handlers::ratings::list_ratings),
        )
        .route("/admin-login", post(handlers::admin::admin_login))
        .route("/admin-logout", post(handlers::admin::admin_logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn hello_restaurant() -> &'static str {
    "Club Grille backend is running"
}
