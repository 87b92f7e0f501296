use axum::{http::Method, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod enquiry;
pub mod error;
pub mod flights;
pub mod identity;
pub mod profile;
pub mod state;
pub mod support;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .merge(auth::routes())
        .merge(profile::routes())
        .merge(flights::routes())
        .merge(bookings::routes())
        .merge(support::routes())
        .merge(enquiry::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "AeroBook API is running"
    }))
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to AeroBook API",
        "version": "1.0.0",
        "endpoints": {
            "auth": "/api/auth",
            "flights": "/api/flights",
            "bookings": "/api/bookings",
            "support": "/api/support",
            "profile": "/api/profile",
            "enquiry": "/api/enquiry"
        }
    }))
}
