use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::dashboard::client::{ClientError, DashboardClient};
use crate::dashboard::session::{Category, DashboardSession};
use crate::models::order::OrderStatus;
use crate::models::reservation::ReservationStatus;

pub const ENV_POLL_INTERVAL_SECS: &str = "DASHBOARD_POLL_INTERVAL_SECS";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Interval from `DASHBOARD_POLL_INTERVAL_SECS`, falling back to 10 seconds.
pub fn poll_interval_from_env() -> Duration {
    std::env::var(ENV_POLL_INTERVAL_SECS)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// Poll both listings on `every` until the handle is aborted.
pub fn start_dashboard_poller(
    client: DashboardClient,
    session: Arc<Mutex<DashboardSession>>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick fires immediately
            interval.tick().await;

            if let Err(e) = refresh(&client, &session).await {
                tracing::error!("Dashboard refresh failed: {}", e);
            }
        }
    })
}

/// One poll: fetch both listings and flag new pending items. Also used for
/// a manual refresh.
pub async fn refresh(
    client: &DashboardClient,
    session: &Mutex<DashboardSession>,
) -> Result<(), ClientError> {
    let orders = client.fetch_orders().await?;
    let reservations = client.fetch_reservations().await?;

    let pending_order = OrderStatus::Pending.as_str();
    let pending_reservation = ReservationStatus::Pending.as_str();

    let (new_orders, new_reservations) = {
        let mut session = session.lock();
        let new_orders = session.observe(
            Category::Orders,
            orders.iter().map(|o| (o.id.as_str(), o.status == pending_order)),
        );
        let new_reservations = session.observe(
            Category::Reservations,
            reservations
                .iter()
                .map(|r| (r.id.as_str(), r.status == pending_reservation)),
        );
        (new_orders, new_reservations)
    };

    for id in &new_orders {
        if let Some(order) = orders.iter().find(|o| &o.id == id) {
            tracing::info!(
                "New order {} from {} ({} items, total {})",
                order.id,
                order.customer_name,
                order.items.len(),
                order.total
            );
        }
    }

    for id in &new_reservations {
        if let Some(r) = reservations.iter().find(|r| &r.id == id) {
            tracing::info!(
                "New reservation {} for {} on {} at {} ({} guests)",
                r.id,
                r.name,
                r.date,
                r.time,
                r.guests
            );
        }
    }

    tracing::debug!(
        "Dashboard refreshed: {} orders, {} reservations",
        orders.len(),
        reservations.len()
    );

    Ok(())
}
