use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::reference;
use crate::repository::{StoreError, TicketRepository};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TicketStatus::Open),
            "in_progress" => Some(TicketStatus::InProgress),
            "resolved" => Some(TicketStatus::Resolved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TicketPriority::Low),
            "medium" => Some(TicketPriority::Medium),
            "high" => Some(TicketPriority::High),
            "urgent" => Some(TicketPriority::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub ticket_number: String,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    /// Free-form link to a booking; not validated against booking records.
    pub booking_reference: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateTicket {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TicketPriority>,
    pub booking_reference: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

/// Submitters may only touch description and priority after creation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateTicket {
    pub description: Option<String>,
    pub priority: Option<TicketPriority>,
}

fn required(value: Option<String>, field: &str) -> CoreResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

#[derive(Clone)]
pub struct SupportManager {
    repo: Arc<dyn TicketRepository>,
}

impl SupportManager {
    pub fn new(repo: Arc<dyn TicketRepository>) -> Self {
        Self { repo }
    }

    /// Create a ticket. Anonymous submitters (no resolved identity) must
    /// provide contact name and email so the ticket can be followed up.
    pub async fn create(&self, owner: Option<Uuid>, req: CreateTicket) -> CoreResult<SupportTicket> {
        let subject = required(req.subject, "subject")?;
        let description = required(req.description, "description")?;

        if owner.is_none() {
            let has_contact = req
                .contact_name
                .as_deref()
                .is_some_and(|name| !name.is_empty())
                && req
                    .contact_email
                    .as_deref()
                    .is_some_and(|email| !email.is_empty());
            if !has_contact {
                return Err(CoreError::Validation(
                    "Contact name and email required".to_string(),
                ));
            }
        }

        loop {
            let repo = Arc::clone(&self.repo);
            let ticket_number = reference::ensure_unique(
                || reference::generate(reference::TICKET_PREFIX, reference::TICKET_DIGITS),
                move |code| {
                    let repo = Arc::clone(&repo);
                    async move { repo.number_exists(&code).await }
                },
            )
            .await?;

            let now = Utc::now();
            let ticket = SupportTicket {
                id: Uuid::new_v4(),
                user_id: owner,
                ticket_number,
                subject: subject.clone(),
                description: description.clone(),
                priority: req.priority.unwrap_or(TicketPriority::Medium),
                status: TicketStatus::Open,
                booking_reference: req.booking_reference.clone(),
                contact_name: req.contact_name.clone(),
                contact_email: req.contact_email.clone(),
                created_at: now,
                updated_at: now,
                resolved_at: None,
            };

            match self.repo.insert(&ticket).await {
                Ok(()) => {
                    info!(number = %ticket.ticket_number, "support ticket created");
                    return Ok(ticket);
                }
                Err(StoreError::Duplicate(constraint)) => {
                    warn!(constraint, "ticket number collided at commit, reminting");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> CoreResult<SupportTicket> {
        self.repo
            .find_for_owner(id, owner)
            .await?
            .ok_or_else(|| CoreError::NotFound("Ticket not found".to_string()))
    }

    /// Public lookup by ticket number.
    pub async fn get_by_number(&self, number: &str) -> CoreResult<SupportTicket> {
        self.repo
            .find_by_number(number)
            .await?
            .ok_or_else(|| CoreError::NotFound("Ticket not found".to_string()))
    }

    pub async fn list(
        &self,
        owner: Uuid,
        status: Option<TicketStatus>,
    ) -> CoreResult<Vec<SupportTicket>> {
        Ok(self.repo.list_for_owner(owner, status).await?)
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, req: UpdateTicket) -> CoreResult<SupportTicket> {
        let mut ticket = self.get(owner, id).await?;

        if let Some(description) = req.description {
            ticket.description = description;
        }
        if let Some(priority) = req.priority {
            ticket.priority = priority;
        }
        ticket.updated_at = Utc::now();

        self.repo.update(&ticket).await?;
        Ok(ticket)
    }
}
