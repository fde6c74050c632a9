use axum::http::{header, HeaderValue, Method};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restaurant_backend::{
    build_router,
    config::Config,
    services::{
        admin_auth::SharedPasswordAuth,
        email::{DisabledEmailSender, EmailSender, ResendEmailService},
        notifications::Notifier,
    },
    AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,restaurant_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let sender: Arc<dyn EmailSender> = match &config.resend_api_key {
        Some(key) => Arc::new(ResendEmailService::new(
            key.clone(),
            config.resend_api_url.clone(),
            config.email_from.clone(),
        )),
        None => Arc::new(DisabledEmailSender),
    };

    let state = AppState {
        db,
        notifier: Notifier::new(sender, config.public_base_url.clone()),
        auth: Arc::new(SharedPasswordAuth::new(config.admin_password.clone())),
        secure_cookies: config.secure_cookies,
    };

    let mut app = build_router(state);

    // The storefront is served from another origin in development
    if let Some(origin) = &config.cors_allowed_origin {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => {
                app = app.layer(
                    CorsLayer::new()
                        .allow_origin(origin)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PATCH,
                            Method::PUT,
                            Method::DELETE,
                        ])
                        .allow_headers([header::CONTENT_TYPE])
                        .allow_credentials(true),
                );
            }
            Err(e) => tracing::warn!("Ignoring invalid CORS_ALLOWED_ORIGIN {:?}: {}", origin, e),
        }
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener.local_addr().expect("Listener has no local address")
    );

    axum::serve(listener, app).await.expect("Server error");
}
