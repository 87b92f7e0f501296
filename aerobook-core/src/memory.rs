//! In-memory repository implementations backing tests and the development
//! server. They enforce the same unique constraints the relational store
//! declares, so duplicate-code commit behavior is observable without a
//! database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus};
use crate::enquiry::Enquiry;
use crate::repository::{
    BookingRepository, EnquiryRepository, StoreError, StoreResult, TicketRepository,
    UserRepository,
};
use crate::support::{SupportTicket, TicketStatus};
use crate::user::User;

#[derive(Default)]
pub struct MemoryBookingRepository {
    records: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        if records
            .values()
            .any(|b| b.booking_reference == booking.booking_reference)
        {
            return Err(StoreError::Duplicate(
                "bookings_booking_reference_key".to_string(),
            ));
        }
        records.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Booking>> {
        let records = self.records.lock().unwrap();
        Ok(records.get(&id).filter(|b| b.user_id == owner).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> StoreResult<Option<Booking>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .find(|b| b.booking_reference == reference)
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        status: Option<BookingStatus>,
    ) -> StoreResult<Vec<Booking>> {
        let records = self.records.lock().unwrap();
        let mut bookings: Vec<Booking> = records
            .values()
            .filter(|b| b.user_id == owner)
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update(&self, booking: &Booking) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn reference_exists(&self, reference: &str) -> StoreResult<bool> {
        let records = self.records.lock().unwrap();
        Ok(records.values().any(|b| b.booking_reference == reference))
    }
}

#[derive(Default)]
pub struct MemoryTicketRepository {
    records: Mutex<HashMap<Uuid, SupportTicket>>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn insert(&self, ticket: &SupportTicket) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        if records
            .values()
            .any(|t| t.ticket_number == ticket.ticket_number)
        {
            return Err(StoreError::Duplicate(
                "support_tickets_ticket_number_key".to_string(),
            ));
        }
        records.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<SupportTicket>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&id)
            .filter(|t| t.user_id == Some(owner))
            .cloned())
    }

    async fn find_by_number(&self, number: &str) -> StoreResult<Option<SupportTicket>> {
        let records = self.records.lock().unwrap();
        Ok(records.values().find(|t| t.ticket_number == number).cloned())
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        status: Option<TicketStatus>,
    ) -> StoreResult<Vec<SupportTicket>> {
        let records = self.records.lock().unwrap();
        let mut tickets: Vec<SupportTicket> = records
            .values()
            .filter(|t| t.user_id == Some(owner))
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    async fn update(&self, ticket: &SupportTicket) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&ticket.id) {
            Some(existing) => {
                *existing = ticket.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn number_exists(&self, number: &str) -> StoreResult<bool> {
        let records = self.records.lock().unwrap();
        Ok(records.values().any(|t| t.ticket_number == number))
    }
}

#[derive(Default)]
pub struct MemoryEnquiryRepository {
    records: Mutex<HashMap<Uuid, Enquiry>>,
}

impl MemoryEnquiryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnquiryRepository for MemoryEnquiryRepository {
    async fn insert(&self, enquiry: &Enquiry) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        records.insert(enquiry.id, enquiry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Enquiry>> {
        let records = self.records.lock().unwrap();
        Ok(records.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    records: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        if records.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("users_email_key".to_string()));
        }
        records.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let records = self.records.lock().unwrap();
        Ok(records.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let records = self.records.lock().unwrap();
        Ok(records.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}
