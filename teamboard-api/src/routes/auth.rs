/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register and receive tokens
/// - `POST /api/auth/login` - Login with username or email
/// - `POST /api/auth/refresh` - Exchange a refresh token for an access token
/// - `GET /api/auth/me` - Current profile
/// - `PUT /api/auth/me` - Update current profile

use axum::extract::State;
use serde::{Deserialize, Serialize};
use teamboard_shared::auth::middleware::AuthContext;
use teamboard_shared::models::user::User;
use teamboard_shared::services::users::{
    self, LoginInput, RegisterInput, Session, UpdateProfileInput,
};
use teamboard_shared::services::ServiceError;

use crate::{
    app::AppState,
    error::{AppJson, ApiResult},
    response::{self, Reply},
};

/// Refresh token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "jdoe",
///   "email": "jdoe@example.com",
///   "password": "secret123",
///   "firstName": "John"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the user and a token pair:
///
/// ```json
/// {
///   "success": true,
///   "message": "User registered successfully",
///   "data": { "user": { ... }, "accessToken": "eyJ...", "refreshToken": "eyJ...", "expiresIn": 86400 }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or username/email taken
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterInput>,
) -> ApiResult<Reply<Session>> {
    let user = users::register(state.store(), input).await?;
    let tokens = state.jwt.issue_pair(user.id).map_err(ServiceError::from)?;

    Ok(response::created(
        "User registered successfully",
        Session { user, tokens },
    ))
}

/// Login with username or email
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginInput>,
) -> ApiResult<Reply<Session>> {
    let session = users::login(state.store(), &state.jwt, input).await?;
    Ok(response::ok("Login successful", session))
}

/// Exchange a refresh token for a new access token
///
/// # Errors
///
/// - `401 Unauthorized`: Token invalid, expired or not a refresh token
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshRequest>,
) -> ApiResult<Reply<RefreshResponse>> {
    let access_token = users::refresh(&state.jwt, &req.refresh_token)?;
    Ok(response::ok(
        "Token refreshed successfully",
        RefreshResponse { access_token },
    ))
}

pub async fn me(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Reply<User>> {
    let user = users::profile(state.store(), auth.user_id).await?;
    Ok(response::ok("Profile retrieved successfully", user))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(input): AppJson<UpdateProfileInput>,
) -> ApiResult<Reply<User>> {
    let user = users::update_profile(state.store(), auth.user_id, input).await?;
    Ok(response::ok("Profile updated successfully", user))
}
