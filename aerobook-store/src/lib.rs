pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod enquiry_repo;
pub mod support_repo;
pub mod user_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use enquiry_repo::PgEnquiryRepository;
pub use support_repo::PgTicketRepository;
pub use user_repo::PgUserRepository;

use aerobook_core::repository::StoreError;

/// Translate driver errors into the gateway error taxonomy. Unique-constraint
/// violations are distinguished so insert paths can re-mint reference codes.
pub(crate) fn map_store_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(db.constraint().unwrap_or("unique").to_string())
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        _ => StoreError::Backend(err.to_string()),
    }
}
