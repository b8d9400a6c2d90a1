/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and length checks
/// - [`jwt`]: JWT access/refresh token issuance and validation
/// - [`middleware`]: Bearer token authentication for Axum and [`middleware::AuthContext`]
/// - [`authorization`]: Project-scoped access-control evaluator
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::auth::password::{hash_password, verify_password};
/// use teamboard_shared::auth::jwt::JwtConfig;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let jwt = JwtConfig::new("a-secret-key-that-is-at-least-32-bytes");
/// let tokens = jwt.issue_pair(Uuid::new_v4())?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
