use std::net::SocketAddr;
use std::sync::Arc;

use aerobook_api::flights::FlightCatalog;
use aerobook_api::{
    app,
    state::{AppState, AuthConfig},
};
use aerobook_core::booking::BookingManager;
use aerobook_core::enquiry::EnquiryManager;
use aerobook_core::support::SupportManager;
use aerobook_store::{
    DbClient, PgBookingRepository, PgEnquiryRepository, PgTicketRepository, PgUserRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "aerobook_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = aerobook_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting AeroBook API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let app_state = AppState {
        users: Arc::new(PgUserRepository::new(db.pool.clone())),
        bookings: BookingManager::new(Arc::new(PgBookingRepository::new(db.pool.clone()))),
        tickets: SupportManager::new(Arc::new(PgTicketRepository::new(db.pool.clone()))),
        enquiries: EnquiryManager::new(Arc::new(PgEnquiryRepository::new(db.pool.clone()))),
        catalog: Arc::new(FlightCatalog::standard()),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
