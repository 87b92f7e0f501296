//! Mock flight search. The airline and airport tables are read-only data
//! built once at startup and carried in `AppState`; flight results are
//! generated on the fly and never persisted.

use axum::{
    extract::{Json, Path, Query, State},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use aerobook_core::booking::CabinClass;
use aerobook_core::CoreError;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Airline {
    pub name: &'static str,
    pub code: &'static str,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Airport {
    pub code: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub country: &'static str,
}

pub struct FlightCatalog {
    pub airlines: Vec<Airline>,
    pub airports: Vec<Airport>,
    pub aircraft: Vec<&'static str>,
}

impl FlightCatalog {
    pub fn standard() -> Self {
        Self {
            airlines: vec![
                Airline { name: "SkyWings", code: "SW", rating: 4.5 },
                Airline { name: "AeroElite", code: "AE", rating: 4.7 },
                Airline { name: "CloudNine", code: "CN", rating: 4.3 },
                Airline { name: "JetStream", code: "JS", rating: 4.6 },
                Airline { name: "FlyHigh", code: "FH", rating: 4.4 },
                Airline { name: "Pacific Air", code: "PA", rating: 4.8 },
                Airline { name: "Continental Express", code: "CE", rating: 4.2 },
            ],
            airports: vec![
                Airport { code: "JFK", name: "John F. Kennedy International", city: "New York", country: "USA" },
                Airport { code: "LHR", name: "London Heathrow", city: "London", country: "UK" },
                Airport { code: "NRT", name: "Narita International", city: "Tokyo", country: "Japan" },
                Airport { code: "DXB", name: "Dubai International", city: "Dubai", country: "UAE" },
                Airport { code: "SIN", name: "Singapore Changi", city: "Singapore", country: "Singapore" },
                Airport { code: "CDG", name: "Charles de Gaulle", city: "Paris", country: "France" },
                Airport { code: "LAX", name: "Los Angeles International", city: "Los Angeles", country: "USA" },
                Airport { code: "SYD", name: "Sydney Airport", city: "Sydney", country: "Australia" },
                Airport { code: "HKG", name: "Hong Kong International", city: "Hong Kong", country: "China" },
                Airport { code: "FRA", name: "Frankfurt Airport", city: "Frankfurt", country: "Germany" },
                Airport { code: "YYZ", name: "Toronto Pearson", city: "Toronto", country: "Canada" },
                Airport { code: "BOM", name: "Chhatrapati Shivaji Maharaj International", city: "Mumbai", country: "India" },
            ],
            aircraft: vec!["Boeing 737", "Airbus A320", "Boeing 787", "Airbus A350"],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlightOffer {
    pub id: String,
    pub airline: String,
    pub airline_code: String,
    pub rating: f64,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub date: String,
    pub duration: String,
    pub price: f64,
    pub stops: u32,
    pub seats_available: u32,
    pub aircraft: String,
    #[serde(rename = "class")]
    pub class_type: CabinClass,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    origin: Option<String>,
    destination: Option<String>,
    date: Option<String>,
    passengers: Option<u32>,
    #[serde(rename = "class")]
    class_type: Option<CabinClass>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    flights: Vec<FlightOffer>,
    count: usize,
    search_params: SearchParams,
}

#[derive(Debug, Serialize)]
struct SearchParams {
    origin: String,
    destination: String,
    date: String,
    passengers: u32,
    #[serde(rename = "class")]
    class_type: CabinClass,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights/search", get(search_flights))
        .route("/api/flights/airports", get(get_airports))
        .route("/api/flights/{flight_id}", get(get_flight_details))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn generate_offers(
    catalog: &FlightCatalog,
    origin: &str,
    destination: &str,
    date: &str,
    passengers: u32,
    class_type: CabinClass,
) -> Vec<FlightOffer> {
    let mut rng = rand::thread_rng();
    let multiplier = class_type.price_multiplier();
    let mut flights = Vec::with_capacity(8);

    for i in 0..8u32 {
        let airline = catalog
            .airlines
            .choose(&mut rng)
            .expect("airline table is never empty");

        let dep_hour = 6 + i * 2;
        let dep_minute = *[0u32, 30].choose(&mut rng).unwrap();

        let duration_hours = rng.gen_range(2..=8u32);
        let duration_minutes = *[0u32, 15, 30, 45].choose(&mut rng).unwrap();

        let arr_hour = (dep_hour + duration_hours) % 24;
        let arr_minute = (dep_minute + duration_minutes) % 60;

        // Per-person economy fare; later passengers are discounted.
        let base_price = rng.gen_range(150..=500) as f64;
        let price = base_price + (passengers.saturating_sub(1)) as f64 * (base_price * 0.8);

        flights.push(FlightOffer {
            id: format!("{}{}", airline.code, 1000 + i),
            airline: airline.name.to_string(),
            airline_code: airline.code.to_string(),
            rating: airline.rating,
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time: format!("{dep_hour:02}:{dep_minute:02}"),
            arrival_time: format!("{arr_hour:02}:{arr_minute:02}"),
            date: date.to_string(),
            duration: format!("{duration_hours}h {duration_minutes}m"),
            price: round2(price * multiplier),
            stops: *[0u32, 0, 0, 1].choose(&mut rng).unwrap(),
            seats_available: rng.gen_range(10..=60),
            aircraft: catalog.aircraft.choose(&mut rng).unwrap().to_string(),
            class_type,
        });
    }

    flights.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal));
    flights
}

async fn search_flights(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let (origin, destination, date) = match (query.origin, query.destination, query.date) {
        (Some(o), Some(d), Some(dt)) if !o.is_empty() && !d.is_empty() && !dt.is_empty() => {
            (o, d, dt)
        }
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Origin, destination, and date are required".to_string(),
            )))
        }
    };

    if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid date format. Use YYYY-MM-DD".to_string(),
        )));
    }

    let passengers = query.passengers.unwrap_or(1);
    let class_type = query.class_type.unwrap_or(CabinClass::Economy);

    let flights = generate_offers(
        &state.catalog,
        &origin,
        &destination,
        &date,
        passengers,
        class_type,
    );
    let count = flights.len();

    Ok(Json(SearchResponse {
        flights,
        count,
        search_params: SearchParams {
            origin,
            destination,
            date,
            passengers,
            class_type,
        },
    }))
}

async fn get_flight_details(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Json<serde_json::Value> {
    // Mock detail: recover the airline from the code prefix of the id.
    let airline = state
        .catalog
        .airlines
        .iter()
        .find(|a| flight_id.starts_with(a.code))
        .unwrap_or(&state.catalog.airlines[0]);

    Json(json!({
        "flight": {
            "id": flight_id,
            "airline": airline.name,
            "airline_code": airline.code,
            "rating": airline.rating,
            "departure_time": "10:30",
            "arrival_time": "14:45",
            "duration": "4h 15m",
            "price": 299.99,
            "stops": 0,
            "seats_available": 24,
            "aircraft": "Boeing 737",
            "amenities": ["WiFi", "In-flight Entertainment", "Meals", "Extra Legroom"],
            "baggage": {
                "carry_on": "1 x 7kg",
                "checked": "2 x 23kg"
            }
        }
    }))
}

async fn get_airports(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "airports": state.catalog.airports }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_are_price_sorted_and_scaled_by_cabin() {
        let catalog = FlightCatalog::standard();

        let economy = generate_offers(&catalog, "JFK", "LHR", "2026-09-15", 1, CabinClass::Economy);
        assert_eq!(economy.len(), 8);
        assert!(economy.windows(2).all(|w| w[0].price <= w[1].price));
        assert!(economy.iter().all(|f| f.price >= 150.0 && f.price <= 500.0));

        let first = generate_offers(&catalog, "JFK", "LHR", "2026-09-15", 1, CabinClass::First);
        assert!(first.iter().all(|f| f.price >= 150.0 * 4.0));
    }

    #[test]
    fn offer_ids_carry_the_airline_code() {
        let catalog = FlightCatalog::standard();
        let offers = generate_offers(&catalog, "SIN", "NRT", "2026-10-01", 2, CabinClass::Business);

        for offer in offers {
            assert!(offer.id.starts_with(&offer.airline_code));
            assert!(catalog.airlines.iter().any(|a| a.code == offer.airline_code));
        }
    }
}
