use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aerobook_core::booking::{Booking, BookingStatus, CreateBooking, UpdateBooking};
use aerobook_core::CoreError;

use crate::error::AppError;
use crate::identity::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct BookingEnvelope {
    message: String,
    booking: Booking,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    booking: Booking,
}

#[derive(Debug, Serialize)]
struct BookingListResponse {
    bookings: Vec<Booking>,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create_booking).get(list_bookings))
        .route(
            "/api/bookings/{booking_id}",
            get(get_booking).put(update_booking),
        )
        .route("/api/bookings/{booking_id}/cancel", post(cancel_booking))
        .route("/api/bookings/reference/{reference}", get(get_by_reference))
}

async fn create_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateBooking>,
) -> Result<(StatusCode, Json<BookingEnvelope>), AppError> {
    let booking = state.bookings.create(user_id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingEnvelope {
            message: "Booking created successfully".to_string(),
            booking,
        }),
    ))
}

async fn list_bookings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<BookingListResponse>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            BookingStatus::parse(s)
                .ok_or_else(|| CoreError::Validation(format!("unknown status filter: {s}")))
        })
        .transpose()?;

    let bookings = state.bookings.list(user_id, status).await?;
    let count = bookings.len();

    Ok(Json(BookingListResponse { bookings, count }))
}

async fn get_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.get(user_id, booking_id).await?;
    Ok(Json(BookingResponse { booking }))
}

async fn update_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<UpdateBooking>,
) -> Result<Json<BookingEnvelope>, AppError> {
    let booking = state.bookings.update(user_id, booking_id, req).await?;

    Ok(Json(BookingEnvelope {
        message: "Booking updated successfully".to_string(),
        booking,
    }))
}

async fn cancel_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingEnvelope>, AppError> {
    let booking = state.bookings.cancel(user_id, booking_id).await?;

    Ok(Json(BookingEnvelope {
        message: "Booking cancelled successfully".to_string(),
        booking,
    }))
}

/// Guest lookup by reference code; deliberately unauthenticated.
async fn get_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.get_by_reference(&reference).await?;
    Ok(Json(BookingResponse { booking }))
}
