use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub frequent_flyer_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of an account; never exposes the credential hash.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub frequent_flyer_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth,
            address: self.address.clone(),
            frequent_flyer_number: self.frequent_flyer_number.clone(),
            created_at: self.created_at,
        }
    }

    /// Apply a profile update. Email and credentials are not mutable here.
    pub fn apply_update(&mut self, update: UpdateProfile) -> CoreResult<()> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(ffn) = update.frequent_flyer_number {
            self.frequent_flyer_number = Some(ffn);
        }
        if let Some(dob) = update.date_of_birth {
            let parsed = NaiveDate::parse_from_str(&dob, "%Y-%m-%d")
                .map_err(|_| CoreError::Validation("Invalid date format".to_string()))?;
            self.date_of_birth = Some(parsed);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub frequent_flyer_number: Option<String>,
    pub date_of_birth: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            name: "Ada Lovelace".to_string(),
            phone: None,
            date_of_birth: None,
            address: None,
            frequent_flyer_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn update_parses_date_and_keeps_email() {
        let mut user = sample_user();
        user.apply_update(UpdateProfile {
            name: Some("Ada King".to_string()),
            date_of_birth: Some("1815-12-10".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(user.name, "Ada King");
        assert_eq!(
            user.date_of_birth,
            Some(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap())
        );
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn update_rejects_malformed_date() {
        let mut user = sample_user();
        let err = user
            .apply_update(UpdateProfile {
                date_of_birth: Some("10/12/1815".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn profile_never_carries_the_hash() {
        let user = sample_user();
        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
