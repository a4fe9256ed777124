/// Authentication and account endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - register a new account
/// - `POST /v1/auth/login` - authenticate and receive a bearer token
/// - `GET  /v1/auth/profile` - fetch the caller's account
/// - `PUT  /v1/auth/profile` - update the caller's name/avatar
/// - `POST /v1/auth/logout` - stateless acknowledgement
///
/// Tokens are signed with the configured secret and carry the user's id,
/// email, and role set; handlers downstream rebuild the acting identity
/// from them without touching the store.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use taskhub_shared::auth::jwt::{create_token, Claims};
use taskhub_shared::auth::password::{hash_password, verify_password};
use taskhub_shared::auth::policy::Actor;
use taskhub_shared::models::user::{Role, UpdateProfile, User};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Account body returned by auth endpoints; never includes credentials
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register / login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The account
    pub user: UserResponse,

    /// Signed bearer token
    pub token: String,
}

fn issue_token(user: &User, state: &AppState) -> Result<String, ApiError> {
    let claims = Claims::with_expiration(
        user.id,
        user.email.clone(),
        user.roles.clone(),
        Duration::hours(i64::from(state.config.auth.token_ttl_hours)),
    );

    Ok(create_token(&claims, state.jwt_secret())?)
}

/// Register a new account
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    if state
        .store
        .find_user_by_email(&req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = User::new(req.name, req.email, password_hash);

    // the unique index backstops the check above under concurrent registration
    state.store.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, "user registered");

    let token = issue_token(&user, &state)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Authenticate with email and password
///
/// Unknown email and wrong password return the same message so the
/// endpoint cannot be used to enumerate accounts.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials
/// - `422 Unprocessable Entity`: validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = issue_token(&user, &state)?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Fetch the caller's account
pub async fn profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .store
        .find_user(actor.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Update the caller's name and avatar
///
/// An explicit `null` avatar clears it; an absent key leaves it alone.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<UpdateProfile>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let user = state
        .store
        .update_user(actor.id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Stateless logout acknowledgement
///
/// Tokens are not tracked server-side; clients discard theirs.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
