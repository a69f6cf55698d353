//! Freightdesk server binary.
//!
//! Loads configuration, wires the persistence adapters and the event hub,
//! composes the HTTP + WebSocket router, and serves until ctrl-c.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use freightdesk::adapters::http::booking::{booking_routes, BookingAppState};
use freightdesk::adapters::http::health::{health_routes, HealthState};
use freightdesk::adapters::http::plans::{plan_routes, PlanAppState};
use freightdesk::adapters::persistence::{InMemoryBookingStore, InMemoryPlanStore};
use freightdesk::adapters::realtime::{realtime_router, EventHub, RealtimeState};
use freightdesk::config::AppConfig;
use freightdesk::domain::billing::{BillingInterval, SubscriptionPlan};
use freightdesk::ports::{BookingRepository, PlanReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!("freightdesk v{} starting", env!("CARGO_PKG_VERSION"));

    // Persistence adapters. Production swaps SQL-backed implementations in
    // behind the same ports.
    let plans: Arc<dyn PlanReader> = Arc::new(InMemoryPlanStore::with_plans(default_plans()));
    let bookings: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingStore::new());

    // The hub is constructed exactly once and injected everywhere it is
    // needed; nothing reaches it through a global.
    let hub = Arc::new(EventHub::new());

    let realtime_state = RealtimeState::new(
        hub.clone(),
        plans.clone(),
        config.realtime.keepalive_interval(),
    );
    let booking_state = BookingAppState {
        bookings,
        hub: hub.clone(),
    };
    let plan_state = PlanAppState {
        plans,
        hub: hub.clone(),
    };
    let health_state = HealthState { hub };

    let app = Router::new()
        .nest("/api/bookings", booking_routes().with_state(booking_state))
        .nest("/api/plans", plan_routes().with_state(plan_state))
        .merge(realtime_router().with_state(realtime_state))
        .merge(health_routes().with_state(health_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("freightdesk stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.parse().unwrap_or_default());

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

/// Plans seeded at startup so the pricing page has content before any admin
/// has edited anything.
fn default_plans() -> Vec<SubscriptionPlan> {
    [
        ("Starter", 4900, vec!["25 bookings/month", "2 vehicles"]),
        (
            "Growth",
            14900,
            vec!["250 bookings/month", "20 vehicles", "Warehouse inventory"],
        ),
        (
            "Enterprise",
            49900,
            vec![
                "Unlimited bookings",
                "Unlimited vehicles",
                "Warehouse inventory",
                "Priority support",
            ],
        ),
    ]
    .into_iter()
    .filter_map(|(name, price, features)| {
        SubscriptionPlan::new(
            name,
            price,
            "USD",
            BillingInterval::Monthly,
            features.into_iter().map(String::from).collect(),
        )
        .ok()
    })
    .collect()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
