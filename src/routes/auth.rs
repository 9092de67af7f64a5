use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::entities::{flat, user};
use crate::error::ApiError;
use crate::models::{now_timestamp, ROLE_LANDLORD, ROLE_TENANT};
use crate::session::{SessionUser, SESSION_COOKIE};
use crate::state::AppState;

// ─── Request types ───

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ─── Session helpers ───

/// Resolve the session cookie to its cached user, or fail with 401.
pub fn current_user(state: &AppState, jar: &CookieJar) -> Result<SessionUser, ApiError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;
    state
        .sessions
        .get(cookie.value())
        .ok_or(ApiError::Unauthorized)
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Hash error: {e}")))
}

// ─── Routes ───

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();
    let role = req.role.unwrap_or_else(|| ROLE_TENANT.to_string());

    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "username, email and password are required".to_string(),
        ));
    }
    if role != ROLE_TENANT && role != ROLE_LANDLORD {
        return Err(ApiError::Validation(
            "Role must be tenant or landlord".to_string(),
        ));
    }

    // Check duplicate
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Validation("Username already taken".to_string()));
    }

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set(username.clone()),
        email: Set(email),
        password_hash: Set(hash_password(&req.password)?),
        role: Set(role),
        created_at: Set(now_timestamp()),
    };
    user::Entity::insert(new_user).exec(&state.db).await?;

    tracing::info!(user = %username, "Registered new account");
    Ok(Json(json!({ "message": "Registration successful!" })))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let username = req.username.trim();

    let account = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&state.db)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|_| ApiError::Internal("Hash parse error".to_string()))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = state.sessions.put(SessionUser {
        id: account.id.clone(),
        username: account.username.clone(),
        email: account.email.clone(),
        role: account.role.clone(),
    });

    tracing::info!(user = %account.username, "Logged in");
    Ok((
        jar.add(session_cookie(token)),
        Json(json!({
            "message": "Login successful!",
            "user": {
                "id": account.id,
                "username": account.username,
                "role": account.role,
            }
        })),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.delete(cookie.value());
    }
    (
        clear_session_cookie(jar),
        Json(json!({ "message": "Logged out" })),
    )
}

pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&state, &jar)?;
    Ok(Json(json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "role": user.role,
    })))
}

pub async fn delete_account(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let user = current_user(&state, &jar)?;

    // Row deletions are transactional; image files go only after the commit.
    let mut orphaned_images: Vec<String> = Vec::new();
    let txn = state.db.begin().await?;

    if user.is_landlord() {
        let owned = flat::Entity::find()
            .filter(flat::Column::LandlordId.eq(&user.id))
            .all(&txn)
            .await?;
        orphaned_images = owned.into_iter().filter_map(|f| f.image_path).collect();

        flat::Entity::delete_many()
            .filter(flat::Column::LandlordId.eq(&user.id))
            .exec(&txn)
            .await?;
    }

    user::Entity::delete_by_id(user.id.clone()).exec(&txn).await?;
    txn.commit().await?;

    for path in &orphaned_images {
        state.uploads.remove(path).await;
    }

    state.sessions.delete_for_user(&user.id);

    tracing::info!(user = %user.username, flats = orphaned_images.len(), "Account deleted");
    Ok((
        clear_session_cookie(jar),
        Json(json!({ "message": "Your account has been deleted successfully." })),
    ))
}
