/// Registration, login and profile operations

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::{double_option, ServiceError};
use crate::auth::authorization::Resource;
use crate::auth::jwt::{JwtConfig, TokenPair};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    pub password: String,

    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    /// Username or email
    #[serde(alias = "email", alias = "username")]
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<Option<String>>,

    pub password: Option<String>,
}

/// Tokens and profile returned by a successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,

    #[serde(flatten)]
    pub tokens: TokenPair,
}

fn map_duplicate(e: StoreError) -> ServiceError {
    match e {
        StoreError::Duplicate(field @ ("username" | "email")) => {
            ServiceError::Conflict(format!("User with this {field} already exists"))
        }
        other => other.into(),
    }
}

impl RegisterInput {
    /// Strips surrounding whitespace so the length rules apply to what is stored
    fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }
}

/// Creates a new account
pub async fn register(store: &dyn Store, input: RegisterInput) -> Result<User, ServiceError> {
    let input = input.normalized();
    input.validate()?;

    let password_hash = hash_password(&input.password)?;
    let user = store
        .create_user(CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
        })
        .await
        .map_err(map_duplicate)?;

    info!(user_id = %user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Verifies credentials and issues an access/refresh token pair
///
/// Unknown users and wrong passwords fail identically.
pub async fn login(
    store: &dyn Store,
    jwt: &JwtConfig,
    input: LoginInput,
) -> Result<Session, ServiceError> {
    input.validate()?;

    let invalid = || ServiceError::Unauthorized("Invalid credentials".to_string());

    let user = store
        .find_user_by_login(input.login.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&input.password, &user.password_hash)? {
        debug!(user_id = %user.id, "Password mismatch");
        return Err(invalid());
    }

    let tokens = jwt.issue_pair(user.id)?;

    info!(user_id = %user.id, "User logged in");
    Ok(Session { user, tokens })
}

/// Exchanges a refresh token for a new access token
pub fn refresh(jwt: &JwtConfig, refresh_token: &str) -> Result<String, ServiceError> {
    jwt.refresh(refresh_token)
        .map_err(|_| ServiceError::Unauthorized("Invalid or expired refresh token".to_string()))
}

/// Returns the actor's own account
pub async fn profile(store: &dyn Store, actor: Uuid) -> Result<User, ServiceError> {
    store
        .find_user(actor)
        .await?
        .ok_or(ServiceError::NotFound(Resource::User))
}

/// Partially updates the actor's own account
pub async fn update_profile(
    store: &dyn Store,
    actor: Uuid,
    mut input: UpdateProfileInput,
) -> Result<User, ServiceError> {
    input.email = input.email.map(|e| e.trim().to_lowercase());
    input.validate()?;

    let password_hash = match &input.password {
        Some(password) => {
            validate_password_strength(password)
                .map_err(|message| ServiceError::invalid("password", message))?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let update = UpdateUser {
        email: input.email,
        password_hash,
        first_name: input.first_name,
        last_name: input.last_name,
    };

    if update.is_empty() {
        return profile(store, actor).await;
    }

    let user = store
        .update_user(actor, update)
        .await
        .map_err(map_duplicate)?
        .ok_or(ServiceError::NotFound(Resource::User))?;

    info!(user_id = %user.id, "Profile updated");
    Ok(user)
}
