use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use tally_db::Database;
use tally_gateway::Dispatcher;
use tally_types::api::{AuthResponse, LoginRequest, RegisterRequest, UserSummary};

use crate::error::ApiError;
use crate::token;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Absent secret means every token-dependent operation fails closed with
    /// a 500 — verification is never silently skipped.
    pub jwt_secret: Option<String>,
    pub dispatcher: Dispatcher,
}

impl AppStateInner {
    pub fn secret(&self) -> Result<&str, ApiError> {
        self.jwt_secret.as_deref().ok_or(ApiError::MissingSecret)
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::validation("Username must be a non-empty string"));
    }
    if req.password.len() < 3 {
        return Err(ApiError::validation(
            "Password must be at least 3 characters",
        ));
    }

    // Fail closed before any side effects: registration issues a token.
    state.secret()?;

    // Friendly pre-check; the UNIQUE constraint below is the safety net.
    let db = state.clone();
    let name = username.clone();
    let existing = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&name))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;
    if existing.is_some() {
        return Err(ApiError::conflict("Username already exists"));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(anyhow::anyhow!("password hashing failed: {e}")))?
        .to_string();

    let user_id = Uuid::new_v4();

    let db = state.clone();
    let name = username.clone();
    tokio::task::spawn_blocking(move || {
        db.db.create_user(&user_id.to_string(), &name, &password_hash)
    })
    .await
    .map_err(ApiError::internal)?
    .map_err(|e| ApiError::from_store(e, "Username already exists"))?;

    let token = token::issue(state.secret()?, user_id, &username).map_err(ApiError::internal)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserSummary {
                id: user_id,
                username,
            },
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_string();

    let db = state.clone();
    let name = username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&name))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?
        // Same response for unknown user and wrong password.
        .ok_or(ApiError::BadCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::internal(anyhow::anyhow!("stored hash unparseable: {e}")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::BadCredentials)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::internal(anyhow::anyhow!("corrupt user id '{}': {e}", user.id)))?;

    let token = token::issue(state.secret()?, user_id, &user.username).map_err(ApiError::internal)?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary {
            id: user_id,
            username: user.username,
        },
    }))
}
