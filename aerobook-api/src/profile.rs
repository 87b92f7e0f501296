use axum::{
    extract::{Json, State},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};

use aerobook_core::repository::UserRepository;
use aerobook_core::user::{Profile, UpdateProfile};
use aerobook_core::CoreError;

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::identity::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ProfileResponse {
    profile: Profile,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChangePasswordRequest {
    current_password: Option<String>,
    new_password: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/profile/password", put(change_password))
}

async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::Core(e.into()))?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User not found".to_string())))?;

    Ok(Json(ProfileResponse {
        profile: user.profile(),
    }))
}

async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(update): Json<UpdateProfile>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::Core(e.into()))?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User not found".to_string())))?;

    user.apply_update(update)?;
    state
        .users
        .update(&user)
        .await
        .map_err(|e| AppError::Core(e.into()))?;

    Ok(Json(ProfileResponse {
        profile: user.profile(),
    }))
}

async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (current, new) = match (req.current_password, req.new_password) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Current and new password required".to_string(),
            )))
        }
    };

    let mut user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::Core(e.into()))?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User not found".to_string())))?;

    if !verify_password(&current, &user.password_hash) {
        return Err(AppError::Auth("Current password is incorrect".to_string()));
    }

    user.password_hash = hash_password(&new)?;
    user.updated_at = chrono::Utc::now();
    state
        .users
        .update(&user)
        .await
        .map_err(|e| AppError::Core(e.into()))?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
