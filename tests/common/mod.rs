#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use restaurant_backend::{
    build_router,
    services::{
        admin_auth::SharedPasswordAuth,
        email::{EmailError, EmailMessage, EmailSender},
        notifications::Notifier,
    },
    AppState,
};

pub const ADMIN_PASSWORD: &str = "test-password";

/// Fresh in-memory SQLite database with all migrations applied.
/// One connection, so every query sees the same memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Keeps every message instead of sending it
#[derive(Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.subject.clone()).collect()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().push(message);
        Ok(())
    }
}

/// Provider that rejects everything
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _message: EmailMessage) -> Result<(), EmailError> {
        Err(EmailError::Provider {
            status: 503,
            body: "provider unavailable".to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub emails: RecordingEmailSender,
}

pub async fn spawn_app() -> TestApp {
    let emails = RecordingEmailSender::default();
    let (router, db) = build_app(Arc::new(emails.clone())).await;
    TestApp { router, db, emails }
}

pub async fn spawn_app_with_sender(sender: Arc<dyn EmailSender>) -> TestApp {
    let (router, db) = build_app(sender).await;
    TestApp {
        router,
        db,
        emails: RecordingEmailSender::default(),
    }
}

async fn build_app(sender: Arc<dyn EmailSender>) -> (Router, DatabaseConnection) {
    let db = setup_test_db().await.expect("Failed to set up test DB");

    let state = AppState {
        db: db.clone(),
        notifier: Notifier::new(sender, "http://localhost:3000"),
        auth: Arc::new(SharedPasswordAuth::new(Some(ADMIN_PASSWORD.to_string()))),
        secure_cookies: false,
    };

    (build_router(state), db)
}

impl TestApp {
    /// Serve the router on an ephemeral local port; returns its base URL.
    pub async fn serve(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        let router = self.router.clone();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value, Option<String>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };

        (status, json, set_cookie)
    }

    /// Log in and return the `name=value` pair to send as a Cookie header.
    pub async fn admin_cookie(&self) -> String {
        let (status, _, set_cookie) = self
            .request(
                Method::POST,
                "/admin-login",
                None,
                Some(serde_json::json!({ "password": ADMIN_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        set_cookie
            .expect("login should set a cookie")
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    pub async fn create_order(&self, body: Value) -> (StatusCode, Value) {
        let (status, json, _) = self.request(Method::POST, "/orders", None, Some(body)).await;
        (status, json)
    }

    pub async fn set_order_status(&self, cookie: &str, id: &str, status: &str) -> (StatusCode, Value) {
        let (status, json, _) = self
            .request(
                Method::PATCH,
                &format!("/orders/{}", id),
                Some(cookie),
                Some(serde_json::json!({ "status": status })),
            )
            .await;
        (status, json)
    }
}

/// A valid cash order for the 2 x 500 + 1 x 300 basket
pub fn sample_order() -> Value {
    serde_json::json!({
        "customerName": "Sadia Islam",
        "customerEmail": "sadia@example.com",
        "customerPhone": "01812345678",
        "deliveryAddress": "House 12, Road 3, Khulshi, Chattogram",
        "items": [
            { "id": "a", "name": "Item A", "price": 500, "qty": 2 },
            { "id": "b", "name": "Item B", "price": 300, "qty": 1 }
        ],
        "subtotal": 1300,
        "tax": 65,
        "total": 1415,
        "paymentMethod": "cash"
    })
}

pub fn sample_reservation(date: &str) -> Value {
    serde_json::json!({
        "customerName": "Imran Hossain",
        "customerEmail": "imran@example.com",
        "customerPhone": "01512345678",
        "date": date,
        "time": "7:00 PM",
        "guests": "4",
        "specialRequests": "Window seat"
    })
}
