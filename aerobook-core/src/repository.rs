use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus};
use crate::enquiry::Enquiry;
use crate::support::{SupportTicket, TicketStatus};
use crate::user::User;

/// Errors surfaced by the record store. `Duplicate` carries the violated
/// constraint so callers minting reference codes can re-mint and retry
/// instead of failing the whole request.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Duplicate(String),
    #[error("record not found")]
    NotFound,
    #[error("store backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository trait for booking persistence.
///
/// `find_for_owner` is the single authorized-lookup primitive: absence and
/// ownership mismatch are indistinguishable to callers.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> StoreResult<()>;

    async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Booking>>;

    async fn find_by_reference(&self, reference: &str) -> StoreResult<Option<Booking>>;

    async fn list_for_owner(
        &self,
        owner: Uuid,
        status: Option<BookingStatus>,
    ) -> StoreResult<Vec<Booking>>;

    async fn update(&self, booking: &Booking) -> StoreResult<()>;

    async fn reference_exists(&self, reference: &str) -> StoreResult<bool>;
}

/// Repository trait for support ticket persistence.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &SupportTicket) -> StoreResult<()>;

    async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<SupportTicket>>;

    async fn find_by_number(&self, number: &str) -> StoreResult<Option<SupportTicket>>;

    async fn list_for_owner(
        &self,
        owner: Uuid,
        status: Option<TicketStatus>,
    ) -> StoreResult<Vec<SupportTicket>>;

    async fn update(&self, ticket: &SupportTicket) -> StoreResult<()>;

    async fn number_exists(&self, number: &str) -> StoreResult<bool>;
}

/// Repository trait for enquiry persistence.
#[async_trait]
pub trait EnquiryRepository: Send + Sync {
    async fn insert(&self, enquiry: &Enquiry) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Enquiry>>;
}

/// Repository trait for user accounts. `insert` reports `Duplicate` when the
/// email is already registered.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn update(&self, user: &User) -> StoreResult<()>;
}
