//! Identity context: JWT issuance and the extractors that resolve the
//! authenticated caller (or its absence) per request.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

pub fn issue_token(user_id: Uuid, email: &str, auth: &AuthConfig) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("token encoding failed: {e}")))
}

fn bearer_identity(parts: &Parts, auth: &AuthConfig) -> Option<Uuid> {
    let header = parts.headers.get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    Uuid::parse_str(&data.claims.sub).ok()
}

/// Authenticated caller. Extraction fails with 401 when the bearer token is
/// missing, expired or malformed.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_identity(parts, &state.auth)
            .map(AuthUser)
            .ok_or_else(|| AppError::Auth("Authentication required".to_string()))
    }
}

/// Optimistically resolved caller. Anything short of a valid token counts as
/// anonymous rather than an error; used where authentication is optional.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Uuid>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(bearer_identity(parts, &state.auth)))
    }
}
