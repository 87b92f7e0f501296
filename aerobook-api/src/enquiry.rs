use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use uuid::Uuid;

use aerobook_core::enquiry::{CreateEnquiry, Enquiry};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct EnquiryEnvelope {
    message: String,
    enquiry: Enquiry,
}

#[derive(Debug, Serialize)]
struct EnquiryResponse {
    enquiry: Enquiry,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/enquiry", post(submit_enquiry))
        .route("/api/enquiry/{enquiry_id}", get(get_enquiry))
}

async fn submit_enquiry(
    State(state): State<AppState>,
    Json(req): Json<CreateEnquiry>,
) -> Result<(StatusCode, Json<EnquiryEnvelope>), AppError> {
    let enquiry = state.enquiries.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(EnquiryEnvelope {
            message: "Enquiry submitted successfully".to_string(),
            enquiry,
        }),
    ))
}

async fn get_enquiry(
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
) -> Result<Json<EnquiryResponse>, AppError> {
    let enquiry = state.enquiries.get(enquiry_id).await?;
    Ok(Json(EnquiryResponse { enquiry }))
}
