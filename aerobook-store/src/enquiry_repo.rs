use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use aerobook_core::enquiry::{Enquiry, EnquiryStatus};
use aerobook_core::repository::{EnquiryRepository, StoreError, StoreResult};

use crate::map_store_err;

pub struct PgEnquiryRepository {
    pool: PgPool,
}

impl PgEnquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EnquiryRow {
    id: Uuid,
    name: String,
    email: String,
    subject: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl EnquiryRow {
    fn into_enquiry(self) -> StoreResult<Enquiry> {
        let status = match self.status.as_str() {
            "new" => EnquiryStatus::New,
            "read" => EnquiryStatus::Read,
            "responded" => EnquiryStatus::Responded,
            other => {
                return Err(StoreError::Backend(format!(
                    "unknown enquiry status: {other}"
                )))
            }
        };

        Ok(Enquiry {
            id: self.id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            status,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl EnquiryRepository for PgEnquiryRepository {
    async fn insert(&self, enquiry: &Enquiry) -> StoreResult<()> {
        let status = match enquiry.status {
            EnquiryStatus::New => "new",
            EnquiryStatus::Read => "read",
            EnquiryStatus::Responded => "responded",
        };

        sqlx::query(
            r#"
            INSERT INTO enquiries (id, name, email, subject, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(enquiry.id)
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.subject)
        .bind(&enquiry.message)
        .bind(status)
        .bind(enquiry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_store_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Enquiry>> {
        let row = sqlx::query_as::<_, EnquiryRow>(
            "SELECT id, name, email, subject, message, status, created_at \
             FROM enquiries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_store_err)?;

        row.map(EnquiryRow::into_enquiry).transpose()
    }
}
