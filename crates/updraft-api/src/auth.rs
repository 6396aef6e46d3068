use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use updraft_db::Database;
use updraft_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Usernames granted the admin claim at registration time.
    pub admin_users: Vec<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::BadRequest(
            "Username must be between 3 and 32 characters",
        ));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters",
        ));
    }

    let taken = {
        let db = state.clone();
        let username = req.username.clone();
        tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username)).await??
    };
    if taken.is_some() {
        return Err(ApiError::Conflict);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Store(anyhow::anyhow!("password hashing failed: {e}")))?
        .to_string();

    let user_id = Uuid::new_v4();
    let is_admin = state.admin_users.iter().any(|u| u == &req.username);

    {
        let db = state.clone();
        let id = user_id.to_string();
        let username = req.username.clone();
        tokio::task::spawn_blocking(move || {
            db.db.create_user(&id, &username, &password_hash, is_admin)
        })
        .await??;
    }

    let token = create_token(&state.jwt_secret, user_id, &req.username, is_admin)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = {
        let db = state.clone();
        let username = req.username.clone();
        tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username)).await??
    }
    .ok_or(ApiError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Store(anyhow::anyhow!("stored hash unreadable: {e}")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::Store(anyhow::anyhow!("corrupt user id '{}': {e}", user.id)))?;

    let token = create_token(&state.jwt_secret, user_id, &user.username, user.is_admin)?;

    Ok(Json(LoginResponse {
        user_id,
        username: user.username,
        token,
    }))
}

fn create_token(
    secret: &str,
    user_id: Uuid,
    username: &str,
    is_admin: bool,
) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        is_admin,
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Store(anyhow::anyhow!("token signing failed: {e}")))
}
