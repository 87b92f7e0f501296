use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::repository::EnquiryRepository;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    New,
    Read,
    Responded,
}

/// Anonymous contact-form submission. No owner, no lifecycle beyond
/// creation and lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: EnquiryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateEnquiry {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

fn required(value: Option<String>, field: &str) -> CoreResult<String> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

#[derive(Clone)]
pub struct EnquiryManager {
    repo: Arc<dyn EnquiryRepository>,
}

impl EnquiryManager {
    pub fn new(repo: Arc<dyn EnquiryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, req: CreateEnquiry) -> CoreResult<Enquiry> {
        let enquiry = Enquiry {
            id: Uuid::new_v4(),
            name: required(req.name, "name")?,
            email: required(req.email, "email")?,
            subject: required(req.subject, "subject")?,
            message: required(req.message, "message")?,
            status: EnquiryStatus::New,
            created_at: Utc::now(),
        };

        self.repo.insert(&enquiry).await?;
        info!(id = %enquiry.id, "enquiry submitted");
        Ok(enquiry)
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Enquiry> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Enquiry not found".to_string()))
    }
}
