use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use aerobook_api::flights::FlightCatalog;
use aerobook_api::state::{AppState, AuthConfig};
use aerobook_core::booking::BookingManager;
use aerobook_core::enquiry::EnquiryManager;
use aerobook_core::memory::{
    MemoryBookingRepository, MemoryEnquiryRepository, MemoryTicketRepository,
    MemoryUserRepository,
};
use aerobook_core::support::SupportManager;

fn test_app() -> Router {
    let state = AppState {
        users: Arc::new(MemoryUserRepository::new()),
        bookings: BookingManager::new(Arc::new(MemoryBookingRepository::new())),
        tickets: SupportManager::new(Arc::new(MemoryTicketRepository::new())),
        enquiries: EnquiryManager::new(Arc::new(MemoryEnquiryRepository::new())),
        catalog: Arc::new(FlightCatalog::standard()),
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        },
    };
    aerobook_api::app(state)
}

fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": email,
                "password": "hunter22",
                "name": "Test Traveller"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

fn booking_payload() -> Value {
    json!({
        "flight_id": "SW1004",
        "airline": "SkyWings",
        "origin": "JFK",
        "destination": "LHR",
        "departure_time": "08:30",
        "arrival_time": "14:45",
        "departure_date": "2026-09-15",
        "duration": "6h 15m",
        "passengers": 3,
        "class_type": "economy",
        "price": 200.0,
        "passenger_name": "Ada Lovelace",
        "passenger_email": "ada@example.com",
        "passenger_phone": "+44 20 7946 0000"
    })
}

#[tokio::test]
async fn health_and_index_respond() {
    let app = test_app();

    let (status, body) = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, request("GET", "/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["bookings"], "/api/bookings");
}

#[tokio::test]
async fn register_login_round_trip() {
    let app = test_app();

    let token = register(&app, "ada@example.com").await;
    assert!(!token.is_empty());

    // Duplicate registration is rejected.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "ada@example.com",
                "password": "hunter22",
                "name": "Ada Again"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "ada@example.com", "password": "wrong-password"})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "ada@example.com", "password": "hunter22"})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let app = test_app();
    let token = register(&app, "ada@example.com").await;

    // Unauthenticated creation is refused.
    let (status, _) = send(
        &app,
        request("POST", "/api/bookings", Some(booking_payload()), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/bookings",
            Some(booking_payload()),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking = &body["booking"];
    assert_eq!(booking["total_price"], 600.0);
    assert_eq!(booking["status"], "confirmed");
    let id = booking["id"].as_str().unwrap().to_string();
    let reference = booking["booking_reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("BK"));
    assert_eq!(reference.len(), 8);

    // Owner listing with and without a status filter.
    let (status, body) = send(&app, request("GET", "/api/bookings", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(
        &app,
        request("GET", "/api/bookings?status=cancelled", None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    // Guest lookup by reference needs no token.
    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/api/bookings/reference/{reference}"),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["id"], id.as_str());

    // Update touches the passenger contact fields only.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/bookings/{id}"),
            Some(json!({"passenger_name": "Grace Hopper", "price": 1.0})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["passenger_name"], "Grace Hopper");
    assert_eq!(body["booking"]["total_price"], 600.0);

    // A different account sees 404, same as a missing id.
    let other = register(&app, "eve@example.com").await;
    let (status, _) = send(
        &app,
        request("GET", &format!("/api/bookings/{id}"), None, Some(&other)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Cancel once, then conflict on the second attempt.
    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/api/bookings/{id}/cancel"),
            None,
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "cancelled");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/api/bookings/{id}/cancel"),
            None,
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Booking already cancelled");
}

#[tokio::test]
async fn booking_creation_validates_fields() {
    let app = test_app();
    let token = register(&app, "ada@example.com").await;

    let mut payload = booking_payload();
    payload.as_object_mut().unwrap().remove("passenger_email");

    let (status, body) = send(
        &app,
        request("POST", "/api/bookings", Some(payload), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "passenger_email is required");

    let mut payload = booking_payload();
    payload["departure_date"] = json!("15/09/2026");
    let (status, body) = send(
        &app,
        request("POST", "/api/bookings", Some(payload), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format");
}

#[tokio::test]
async fn anonymous_tickets_require_contact_info() {
    let app = test_app();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/support/tickets",
            Some(json!({
                "subject": "Lost luggage",
                "description": "Bag did not arrive on BK123456"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Contact name and email required");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/support/tickets",
            Some(json!({
                "subject": "Lost luggage",
                "description": "Bag did not arrive on BK123456",
                "contact_name": "Jo Guest",
                "contact_email": "jo@example.com"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let number = body["ticket"]["ticket_number"].as_str().unwrap().to_string();
    assert!(number.starts_with("TKT"));
    assert_eq!(number.len(), 8);
    assert_eq!(body["ticket"]["status"], "open");
    assert_eq!(body["ticket"]["priority"], "medium");

    // Public lookup by ticket number.
    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/api/support/tickets/number/{number}"),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticket"]["ticket_number"], number.as_str());
}

#[tokio::test]
async fn authenticated_ticket_lifecycle() {
    let app = test_app();
    let token = register(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/support/tickets",
            Some(json!({
                "subject": "Seat change",
                "description": "Please move me to an aisle seat",
                "priority": "high",
                "booking_reference": "BK999999"
            })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["ticket"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["ticket"]["priority"], "high");

    let (status, body) = send(
        &app,
        request("GET", "/api/support/tickets", None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    // Listing without a token is refused.
    let (status, _) = send(&app, request("GET", "/api/support/tickets", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/support/tickets/{id}"),
            Some(json!({"priority": "urgent", "subject": "ignored"})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticket"]["priority"], "urgent");
    assert_eq!(body["ticket"]["subject"], "Seat change");

    // Another account cannot see the ticket by id.
    let other = register(&app, "eve@example.com").await;
    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/api/support/tickets/{id}"),
            None,
            Some(&other),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enquiry_intake_and_lookup() {
    let app = test_app();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/enquiry",
            Some(json!({
                "name": "Sam",
                "email": "sam@example.com",
                "subject": "Group fares",
                "message": "Do you offer discounts for groups of ten?"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["enquiry"]["status"], "new");
    let id = body["enquiry"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, request("GET", &format!("/api/enquiry/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enquiry"]["subject"], "Group fares");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/enquiry",
            Some(json!({"name": "Sam", "email": "sam@example.com", "subject": "Hi"})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "message is required");
}

#[tokio::test]
async fn flight_search_validates_and_prices() {
    let app = test_app();

    let (status, body) = send(
        &app,
        request("GET", "/api/flights/search?origin=JFK", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Origin, destination, and date are required");

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/api/flights/search?origin=JFK&destination=LHR&date=2026-09-15&passengers=2&class=business",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 8);
    assert_eq!(body["search_params"]["class"], "business");
    let prices: Vec<f64> = body["flights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["price"].as_f64().unwrap())
        .collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/api/flights/search?origin=JFK&destination=LHR&date=tomorrow",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format. Use YYYY-MM-DD");

    let (status, body) = send(&app, request("GET", "/api/flights/airports", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["airports"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn profile_round_trip() {
    let app = test_app();
    let token = register(&app, "ada@example.com").await;

    let (status, body) = send(&app, request("GET", "/api/profile", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["name"], "Test Traveller");

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/profile",
            Some(json!({
                "name": "Ada King",
                "frequent_flyer_number": "FF-1815",
                "date_of_birth": "1815-12-10"
            })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["name"], "Ada King");
    assert_eq!(body["profile"]["date_of_birth"], "1815-12-10");

    // Wrong current password cannot rotate credentials.
    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/profile/password",
            Some(json!({"current_password": "nope", "new_password": "new-password"})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/profile/password",
            Some(json!({"current_password": "hunter22", "new_password": "new-password"})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "ada@example.com", "password": "new-password"})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
