use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aerobook_core::support::{CreateTicket, SupportTicket, TicketStatus, UpdateTicket};
use aerobook_core::CoreError;

use crate::error::AppError;
use crate::identity::{AuthUser, MaybeUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct TicketEnvelope {
    message: String,
    ticket: SupportTicket,
}

#[derive(Debug, Serialize)]
struct TicketResponse {
    ticket: SupportTicket,
}

#[derive(Debug, Serialize)]
struct TicketListResponse {
    tickets: Vec<SupportTicket>,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct FaqItem {
    id: u32,
    question: &'static str,
    answer: &'static str,
    category: &'static str,
}

#[derive(Debug, Serialize)]
struct FaqResponse {
    faqs: Vec<FaqItem>,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct FaqQuery {
    category: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/support/tickets",
            post(create_ticket).get(list_tickets),
        )
        .route(
            "/api/support/tickets/{ticket_id}",
            get(get_ticket).put(update_ticket),
        )
        .route("/api/support/tickets/number/{number}", get(get_by_number))
        .route("/api/support/faq", get(get_faq))
}

/// Ticket creation is open to guests; authenticated callers get the ticket
/// attached to their account.
async fn create_ticket(
    State(state): State<AppState>,
    MaybeUser(user_id): MaybeUser,
    Json(req): Json<CreateTicket>,
) -> Result<(StatusCode, Json<TicketEnvelope>), AppError> {
    let ticket = state.tickets.create(user_id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(TicketEnvelope {
            message: "Support ticket created successfully".to_string(),
            ticket,
        }),
    ))
}

async fn list_tickets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<TicketListResponse>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            TicketStatus::parse(s)
                .ok_or_else(|| CoreError::Validation(format!("unknown status filter: {s}")))
        })
        .transpose()?;

    let tickets = state.tickets.list(user_id, status).await?;
    let count = tickets.len();

    Ok(Json(TicketListResponse { tickets, count }))
}

async fn get_ticket(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state.tickets.get(user_id, ticket_id).await?;
    Ok(Json(TicketResponse { ticket }))
}

async fn update_ticket(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(ticket_id): Path<Uuid>,
    Json(req): Json<UpdateTicket>,
) -> Result<Json<TicketEnvelope>, AppError> {
    let ticket = state.tickets.update(user_id, ticket_id, req).await?;

    Ok(Json(TicketEnvelope {
        message: "Ticket updated successfully".to_string(),
        ticket,
    }))
}

/// Guest lookup by ticket number; deliberately unauthenticated.
async fn get_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state.tickets.get_by_number(&number).await?;
    Ok(Json(TicketResponse { ticket }))
}

async fn get_faq(Query(query): Query<FaqQuery>) -> Json<FaqResponse> {
    let faqs: Vec<FaqItem> = FAQ_ITEMS
        .iter()
        .filter(|(_, _, _, category)| {
            query
                .category
                .as_deref()
                .is_none_or(|wanted| *category == wanted)
        })
        .map(|&(id, question, answer, category)| FaqItem {
            id,
            question,
            answer,
            category,
        })
        .collect();

    let count = faqs.len();
    Json(FaqResponse { faqs, count })
}

const FAQ_ITEMS: &[(u32, &str, &str, &str)] = &[
    (
        1,
        "How do I cancel my booking?",
        "You can cancel your booking from the \"My Bookings\" page. Click on the \"Cancel Booking\" button next to your reservation. Cancellation fees may apply based on the airline's policy.",
        "bookings",
    ),
    (
        2,
        "What payment methods do you accept?",
        "We accept all major credit cards (Visa, MasterCard, American Express), debit cards, and PayPal. All transactions are secured with 256-bit encryption.",
        "payments",
    ),
    (
        3,
        "Can I change my flight date?",
        "Yes, flight date changes are subject to availability and airline policies. Additional charges may apply. Contact our support team for assistance.",
        "bookings",
    ),
    (
        4,
        "How early should I arrive at the airport?",
        "We recommend arriving at least 2 hours before domestic flights and 3 hours before international flights to allow time for check-in and security procedures.",
        "travel",
    ),
    (
        5,
        "What is your refund policy?",
        "Refund policies vary by airline and ticket type. Fully refundable tickets can be cancelled with a full refund, while non-refundable tickets may incur cancellation fees.",
        "refunds",
    ),
];
