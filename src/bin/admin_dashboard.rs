use parking_lot::Mutex;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restaurant_backend::dashboard::client::DashboardClient;
use restaurant_backend::dashboard::session::{Category, DashboardSession};
use restaurant_backend::jobs::dashboard_poll::{poll_interval_from_env, start_dashboard_poller};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,restaurant_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let base_url =
        env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let Ok(password) = env::var("ADMIN_PASSWORD") else {
        eprintln!("ADMIN_PASSWORD must be set");
        std::process::exit(1);
    };
    let every = poll_interval_from_env();

    let client = DashboardClient::new(base_url)?;
    client.login(&password).await?;

    let session = Arc::new(Mutex::new(DashboardSession::new()));
    tracing::info!(
        "Watching {} for new orders and reservations every {}s",
        client.base_url(),
        every.as_secs()
    );

    let poller = start_dashboard_poller(client.clone(), session.clone(), every);

    tokio::signal::ctrl_c().await?;
    poller.abort();

    {
        let session = session.lock();
        tracing::info!(
            "Stopping with {} unacknowledged orders and {} unacknowledged reservations",
            session.badges(Category::Orders).badge_count(),
            session.badges(Category::Reservations).badge_count()
        );
    }

    if let Err(e) = client.logout().await {
        tracing::warn!("Logout failed: {}", e);
    }

    Ok(())
}
