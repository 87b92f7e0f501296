use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use aerobook_core::repository::{StoreError, StoreResult, TicketRepository};
use aerobook_core::support::{SupportTicket, TicketPriority, TicketStatus};

use crate::map_store_err;

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    user_id: Option<Uuid>,
    ticket_number: String,
    subject: String,
    description: String,
    priority: String,
    status: String,
    booking_reference: Option<String>,
    contact_name: Option<String>,
    contact_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl TicketRow {
    fn into_ticket(self) -> StoreResult<SupportTicket> {
        let status = TicketStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Backend(format!("unknown ticket status: {}", self.status)))?;
        let priority = TicketPriority::parse(&self.priority).ok_or_else(|| {
            StoreError::Backend(format!("unknown ticket priority: {}", self.priority))
        })?;

        Ok(SupportTicket {
            id: self.id,
            user_id: self.user_id,
            ticket_number: self.ticket_number,
            subject: self.subject,
            description: self.description,
            priority,
            status,
            booking_reference: self.booking_reference,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
            resolved_at: self.resolved_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, ticket_number, subject, description, priority, \
     status, booking_reference, contact_name, contact_email, created_at, updated_at, \
     resolved_at";

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn insert(&self, ticket: &SupportTicket) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO support_tickets (
                id, user_id, ticket_number, subject, description, priority, status,
                booking_reference, contact_name, contact_email, created_at, updated_at,
                resolved_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(ticket.id)
        .bind(ticket.user_id)
        .bind(&ticket.ticket_number)
        .bind(&ticket.subject)
        .bind(&ticket.description)
        .bind(ticket.priority.as_str())
        .bind(ticket.status.as_str())
        .bind(&ticket.booking_reference)
        .bind(&ticket.contact_name)
        .bind(&ticket.contact_email)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .bind(ticket.resolved_at)
        .execute(&self.pool)
        .await
        .map_err(map_store_err)?;

        Ok(())
    }

    async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<SupportTicket>> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM support_tickets WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_store_err)?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn find_by_number(&self, number: &str) -> StoreResult<Option<SupportTicket>> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM support_tickets WHERE ticket_number = $1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_store_err)?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        status: Option<TicketStatus>,
    ) -> StoreResult<Vec<SupportTicket>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM support_tickets \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(owner)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_store_err)?;

        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn update(&self, ticket: &SupportTicket) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE support_tickets
            SET description = $2, priority = $3, status = $4, updated_at = $5,
                resolved_at = $6
            WHERE id = $1
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.description)
        .bind(ticket.priority.as_str())
        .bind(ticket.status.as_str())
        .bind(ticket.updated_at)
        .bind(ticket.resolved_at)
        .execute(&self.pool)
        .await
        .map_err(map_store_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn number_exists(&self, number: &str) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM support_tickets WHERE ticket_number = $1)",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_store_err)
    }
}
