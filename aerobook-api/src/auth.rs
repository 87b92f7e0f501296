use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use aerobook_core::repository::{StoreError, UserRepository};
use aerobook_core::user::{Profile, User};
use aerobook_core::CoreError;

use crate::error::AppError;
use crate::identity::issue_token;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct AuthResponse {
    message: String,
    token: String,
    user: Profile,
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    phone: Option<String>,
    date_of_birth: Option<String>,
    address: Option<String>,
    frequent_flyer_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "{field} is required"
        )))),
    }
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = required(req.email, "email")?;
    let password = required(req.password, "password")?;
    let name = required(req.name, "name")?;

    if password.len() < 6 {
        return Err(AppError::Core(CoreError::Validation(
            "Password must be at least 6 characters".to_string(),
        )));
    }

    let date_of_birth = req
        .date_of_birth
        .filter(|d| !d.is_empty())
        .map(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .map_err(|_| AppError::Core(CoreError::Validation("Invalid date format".to_string())))
        })
        .transpose()?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: email.clone(),
        password_hash: hash_password(&password)?,
        name,
        phone: req.phone,
        date_of_birth,
        address: req.address,
        frequent_flyer_number: req.frequent_flyer_number,
        created_at: now,
        updated_at: now,
    };

    match state.users.insert(&user).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::Core(CoreError::Conflict(
                "Email already registered".to_string(),
            )))
        }
        Err(err) => return Err(AppError::Core(err.into())),
    }

    let token = issue_token(user.id, &user.email, &state.auth)?;
    info!(email = %user.email, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            token,
            user: user.profile(),
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required(req.email, "email")?;
    let password = required(req.password, "password")?;

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| AppError::Core(e.into()))?
        .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

    if !verify_password(&password, &user.password_hash) {
        return Err(AppError::Auth("Invalid email or password".to_string()));
    }

    let token = issue_token(user.id, &user.email, &state.auth)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.profile(),
    }))
}
