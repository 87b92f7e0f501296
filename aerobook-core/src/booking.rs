use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::reference;
use crate::repository::{BookingRepository, StoreError};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    Economy,
    Business,
    First,
}

impl CabinClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }

    /// Price multiplier applied on top of the per-person economy fare.
    pub fn price_multiplier(&self) -> f64 {
        match self {
            CabinClass::Economy => 1.0,
            CabinClass::Business => 2.5,
            CabinClass::First => 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_reference: String,
    pub flight_id: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_date: NaiveDate,
    pub duration: String,
    pub passengers: u32,
    pub class_type: CabinClass,
    pub price: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload. Every field is optional at the schema level so missing
/// input surfaces as a validation error naming the field rather than a
/// deserialization rejection.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateBooking {
    pub flight_id: Option<String>,
    pub airline: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub departure_date: Option<String>,
    pub duration: Option<String>,
    pub passengers: Option<u32>,
    pub class_type: Option<CabinClass>,
    pub price: Option<f64>,
    pub passenger_name: Option<String>,
    pub passenger_email: Option<String>,
    pub passenger_phone: Option<String>,
}

/// Only passenger contact details are mutable after creation; anything else
/// in the payload is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateBooking {
    pub passenger_name: Option<String>,
    pub passenger_email: Option<String>,
    pub passenger_phone: Option<String>,
}

fn required<T>(value: Option<T>, field: &str) -> CoreResult<T> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

#[derive(Clone)]
pub struct BookingManager {
    repo: Arc<dyn BookingRepository>,
}

impl BookingManager {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    /// Validate the payload, mint a unique reference and persist the booking
    /// with status `confirmed`. A duplicate-reference failure at commit time
    /// is retried with a freshly minted code.
    pub async fn create(&self, owner: Uuid, req: CreateBooking) -> CoreResult<Booking> {
        let flight_id = required(req.flight_id, "flight_id")?;
        let airline = required(req.airline, "airline")?;
        let origin = required(req.origin, "origin")?;
        let destination = required(req.destination, "destination")?;
        let departure_time = required(req.departure_time, "departure_time")?;
        let arrival_time = required(req.arrival_time, "arrival_time")?;
        let departure_date = required(req.departure_date, "departure_date")?;
        let passengers = required(req.passengers, "passengers")?;
        let class_type = required(req.class_type, "class_type")?;
        let price = required(req.price, "price")?;
        let passenger_name = required(req.passenger_name, "passenger_name")?;
        let passenger_email = required(req.passenger_email, "passenger_email")?;
        let passenger_phone = required(req.passenger_phone, "passenger_phone")?;

        let departure_date = NaiveDate::parse_from_str(&departure_date, "%Y-%m-%d")
            .map_err(|_| CoreError::Validation("Invalid date format".to_string()))?;

        if passengers < 1 {
            return Err(CoreError::Validation(
                "passengers must be at least 1".to_string(),
            ));
        }

        let total_price = price * passengers as f64;

        loop {
            let repo = Arc::clone(&self.repo);
            let booking_reference = reference::ensure_unique(
                || reference::generate(reference::BOOKING_PREFIX, reference::BOOKING_DIGITS),
                move |code| {
                    let repo = Arc::clone(&repo);
                    async move { repo.reference_exists(&code).await }
                },
            )
            .await?;

            let now = Utc::now();
            let booking = Booking {
                id: Uuid::new_v4(),
                user_id: owner,
                booking_reference,
                flight_id: flight_id.clone(),
                airline: airline.clone(),
                origin: origin.clone(),
                destination: destination.clone(),
                departure_time: departure_time.clone(),
                arrival_time: arrival_time.clone(),
                departure_date,
                duration: req.duration.clone().unwrap_or_default(),
                passengers,
                class_type,
                price,
                total_price,
                status: BookingStatus::Confirmed,
                passenger_name: passenger_name.clone(),
                passenger_email: passenger_email.clone(),
                passenger_phone: passenger_phone.clone(),
                created_at: now,
                updated_at: now,
            };

            match self.repo.insert(&booking).await {
                Ok(()) => {
                    info!(reference = %booking.booking_reference, "booking created");
                    return Ok(booking);
                }
                // Lost the race between the existence probe and commit;
                // re-mint and try again.
                Err(StoreError::Duplicate(constraint)) => {
                    warn!(constraint, "booking reference collided at commit, reminting");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> CoreResult<Booking> {
        self.repo
            .find_for_owner(id, owner)
            .await?
            .ok_or_else(|| CoreError::NotFound("Booking not found".to_string()))
    }

    /// Public lookup by reference code, used for guest access.
    pub async fn get_by_reference(&self, reference: &str) -> CoreResult<Booking> {
        self.repo
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| CoreError::NotFound("Booking not found".to_string()))
    }

    pub async fn list(
        &self,
        owner: Uuid,
        status: Option<BookingStatus>,
    ) -> CoreResult<Vec<Booking>> {
        Ok(self.repo.list_for_owner(owner, status).await?)
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, req: UpdateBooking) -> CoreResult<Booking> {
        let mut booking = self.get(owner, id).await?;

        if let Some(name) = req.passenger_name {
            booking.passenger_name = name;
        }
        if let Some(email) = req.passenger_email {
            booking.passenger_email = email;
        }
        if let Some(phone) = req.passenger_phone {
            booking.passenger_phone = phone;
        }
        booking.updated_at = Utc::now();

        self.repo.update(&booking).await?;
        Ok(booking)
    }

    pub async fn cancel(&self, owner: Uuid, id: Uuid) -> CoreResult<Booking> {
        let mut booking = self.get(owner, id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Err(CoreError::Conflict("Booking already cancelled".to_string()));
        }

        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();

        self.repo.update(&booking).await?;
        info!(reference = %booking.booking_reference, "booking cancelled");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBookingRepository;

    fn valid_request() -> CreateBooking {
        CreateBooking {
            flight_id: Some("SW1004".to_string()),
            airline: Some("SkyWings".to_string()),
            origin: Some("JFK".to_string()),
            destination: Some("LHR".to_string()),
            departure_time: Some("08:30".to_string()),
            arrival_time: Some("14:45".to_string()),
            departure_date: Some("2026-09-15".to_string()),
            duration: Some("6h 15m".to_string()),
            passengers: Some(3),
            class_type: Some(CabinClass::Economy),
            price: Some(200.0),
            passenger_name: Some("Ada Lovelace".to_string()),
            passenger_email: Some("ada@example.com".to_string()),
            passenger_phone: Some("+44 20 7946 0000".to_string()),
        }
    }

    fn manager() -> BookingManager {
        BookingManager::new(Arc::new(MemoryBookingRepository::new()))
    }

    #[tokio::test]
    async fn create_computes_total_and_confirms() {
        let manager = manager();
        let owner = Uuid::new_v4();

        let booking = manager.create(owner, valid_request()).await.unwrap();

        assert_eq!(booking.total_price, 600.0);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.booking_reference.starts_with("BK"));
        assert_eq!(booking.booking_reference.len(), 8);
        assert!(booking.booking_reference[2..]
            .chars()
            .all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn create_rejects_missing_field() {
        let manager = manager();
        let mut req = valid_request();
        req.passenger_email = None;

        let err = manager.create(Uuid::new_v4(), req).await.unwrap_err();
        match err {
            CoreError::Validation(msg) => assert_eq!(msg, "passenger_email is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_bad_date() {
        let manager = manager();
        let mut req = valid_request();
        req.departure_date = Some("15/09/2026".to_string());

        let err = manager.create(Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn cancel_is_single_shot() {
        let manager = manager();
        let owner = Uuid::new_v4();
        let booking = manager.create(owner, valid_request()).await.unwrap();

        let cancelled = manager.cancel(owner, booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let err = manager.cancel(owner, booking.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn owner_mismatch_reads_as_not_found() {
        let manager = manager();
        let owner = Uuid::new_v4();
        let booking = manager.create(owner, valid_request()).await.unwrap();

        let stranger = Uuid::new_v4();
        let err = manager.get(stranger, booking.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));

        // Indistinguishable from a genuinely absent id.
        let err = manager.get(owner, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_touches_contact_fields_only() {
        let manager = manager();
        let owner = Uuid::new_v4();
        let booking = manager.create(owner, valid_request()).await.unwrap();

        let updated = manager
            .update(
                owner,
                booking.id,
                UpdateBooking {
                    passenger_name: Some("Grace Hopper".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.passenger_name, "Grace Hopper");
        assert_eq!(updated.passenger_email, booking.passenger_email);
        assert_eq!(updated.total_price, booking.total_price);
        assert_eq!(updated.booking_reference, booking.booking_reference);
    }

    #[tokio::test]
    async fn duplicate_commit_is_retried_with_a_fresh_code() {
        use crate::repository::StoreResult;
        use std::sync::atomic::{AtomicBool, Ordering};

        /// Fails the first insert with a unique violation, mimicking a lost
        /// race between the existence probe and the commit.
        struct RacyRepo {
            inner: MemoryBookingRepository,
            tripped: AtomicBool,
        }

        #[async_trait::async_trait]
        impl crate::repository::BookingRepository for RacyRepo {
            async fn insert(&self, booking: &Booking) -> StoreResult<()> {
                if !self.tripped.swap(true, Ordering::SeqCst) {
                    return Err(StoreError::Duplicate(
                        "bookings_booking_reference_key".to_string(),
                    ));
                }
                self.inner.insert(booking).await
            }

            async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Booking>> {
                self.inner.find_for_owner(id, owner).await
            }

            async fn find_by_reference(&self, r: &str) -> StoreResult<Option<Booking>> {
                self.inner.find_by_reference(r).await
            }

            async fn list_for_owner(
                &self,
                owner: Uuid,
                status: Option<BookingStatus>,
            ) -> StoreResult<Vec<Booking>> {
                self.inner.list_for_owner(owner, status).await
            }

            async fn update(&self, booking: &Booking) -> StoreResult<()> {
                self.inner.update(booking).await
            }

            async fn reference_exists(&self, r: &str) -> StoreResult<bool> {
                self.inner.reference_exists(r).await
            }
        }

        let manager = BookingManager::new(Arc::new(RacyRepo {
            inner: MemoryBookingRepository::new(),
            tripped: AtomicBool::new(false),
        }));

        let booking = manager
            .create(Uuid::new_v4(), valid_request())
            .await
            .unwrap();
        assert!(booking.booking_reference.starts_with("BK"));
    }

    #[tokio::test]
    async fn list_filters_by_status_newest_first() {
        let manager = manager();
        let owner = Uuid::new_v4();

        let first = manager.create(owner, valid_request()).await.unwrap();
        let second = manager.create(owner, valid_request()).await.unwrap();
        manager.cancel(owner, first.id).await.unwrap();

        let confirmed = manager
            .list(owner, Some(BookingStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, second.id);

        let all = manager.list(owner, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);

        // Other owners see nothing.
        let other = manager.list(Uuid::new_v4(), None).await.unwrap();
        assert!(other.is_empty());
    }
}
