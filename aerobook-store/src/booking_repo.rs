use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use aerobook_core::booking::{Booking, BookingStatus, CabinClass};
use aerobook_core::repository::{BookingRepository, StoreError, StoreResult};

use crate::map_store_err;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    booking_reference: String,
    flight_id: String,
    airline: String,
    origin: String,
    destination: String,
    departure_time: String,
    arrival_time: String,
    departure_date: NaiveDate,
    duration: String,
    passengers: i32,
    class_type: String,
    price: f64,
    total_price: f64,
    status: String,
    passenger_name: String,
    passenger_email: String,
    passenger_phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> StoreResult<Booking> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Backend(format!("unknown booking status: {}", self.status)))?;
        let class_type = match self.class_type.as_str() {
            "economy" => CabinClass::Economy,
            "business" => CabinClass::Business,
            "first" => CabinClass::First,
            other => return Err(StoreError::Backend(format!("unknown cabin class: {other}"))),
        };

        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            booking_reference: self.booking_reference,
            flight_id: self.flight_id,
            airline: self.airline,
            origin: self.origin,
            destination: self.destination,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            departure_date: self.departure_date,
            duration: self.duration,
            passengers: self.passengers as u32,
            class_type,
            price: self.price,
            total_price: self.total_price,
            status,
            passenger_name: self.passenger_name,
            passenger_email: self.passenger_email,
            passenger_phone: self.passenger_phone,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, booking_reference, flight_id, airline, origin, \
     destination, departure_time, arrival_time, departure_date, duration, passengers, \
     class_type, price, total_price, status, passenger_name, passenger_email, \
     passenger_phone, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, booking_reference, flight_id, airline, origin, destination,
                departure_time, arrival_time, departure_date, duration, passengers,
                class_type, price, total_price, status, passenger_name, passenger_email,
                passenger_phone, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(&booking.booking_reference)
        .bind(&booking.flight_id)
        .bind(&booking.airline)
        .bind(&booking.origin)
        .bind(&booking.destination)
        .bind(&booking.departure_time)
        .bind(&booking.arrival_time)
        .bind(booking.departure_date)
        .bind(&booking.duration)
        .bind(booking.passengers as i32)
        .bind(booking.class_type.as_str())
        .bind(booking.price)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(&booking.passenger_name)
        .bind(&booking.passenger_email)
        .bind(&booking.passenger_phone)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_store_err)?;

        Ok(())
    }

    async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM bookings WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_store_err)?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM bookings WHERE booking_reference = $1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_store_err)?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        status: Option<BookingStatus>,
    ) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM bookings \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(owner)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_store_err)?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn update(&self, booking: &Booking) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET passenger_name = $2, passenger_email = $3, passenger_phone = $4,
                status = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(booking.id)
        .bind(&booking.passenger_name)
        .bind(&booking.passenger_email)
        .bind(&booking.passenger_phone)
        .bind(booking.status.as_str())
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_store_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn reference_exists(&self, reference: &str) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE booking_reference = $1)",
        )
        .bind(reference)
        .fetch_one(&self.pool)
        .await
        .map_err(map_store_err)
    }
}
