/// Access-controlled operations
///
/// Each function takes the store, the acting user and validated input, runs
/// the access-control check for the governing project and only then touches
/// the store. Input types derive `validator::Validate` and `Deserialize`
/// (camelCase) so the HTTP layer can use them as request bodies directly.
///
/// # Errors
///
/// All operations return [`ServiceError`]:
///
/// - `Validation`: per-field messages
/// - `NotFound`: the target or its governing project is missing
/// - `Forbidden`: membership missing or role too low
/// - `Conflict`: duplicate username/email, already a member
/// - `Unauthorized`: bad credentials or token
/// - `Store`, `Password`, `Jwt`: unexpected failures

use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::authorization::{AuthzError, Resource};
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

pub mod comments;
pub mod memberships;
pub mod projects;
pub mod tasks;
pub mod users;

/// A validation failure on one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

impl ServiceError {
    /// Single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => ServiceError::Conflict(format!("{field} already exists")),
            other => ServiceError::Store(other),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(e: AuthzError) -> Self {
        match e {
            AuthzError::NotFound(resource) => ServiceError::NotFound(resource),
            AuthzError::Forbidden => ServiceError::Forbidden,
            AuthzError::Store(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ServiceError::Validation(details)
    }
}

/// Deserializes a field that distinguishes "absent" from explicit `null`
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent → `None`, `null` → `Some(None)`, value → `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
    }

    #[derive(Debug, Validate)]
    struct Input {
        #[validate(length(min = 3, message = "Name is too short"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_double_option() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.description, None);

        let null: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let value: Patch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(value.description, Some(Some("x".to_string())));
    }

    #[test]
    fn test_validation_errors_conversion() {
        let input = Input {
            name: "ab".to_string(),
            email: "nope".to_string(),
        };
        let err = ServiceError::from(input.validate().unwrap_err());

        let ServiceError::Validation(details) = err else {
            panic!("expected validation error");
        };
        assert_eq!(details.len(), 2);
        assert_eq!(details[0], FieldError::new("email", "email is invalid"));
        assert_eq!(details[1], FieldError::new("name", "Name is too short"));
    }

    #[test]
    fn test_store_duplicate_becomes_conflict() {
        let err = ServiceError::from(StoreError::Duplicate("email"));
        assert!(matches!(err, ServiceError::Conflict(msg) if msg == "email already exists"));
    }

    #[test]
    fn test_authz_conversion() {
        assert!(matches!(
            ServiceError::from(AuthzError::NotFound(Resource::Task)),
            ServiceError::NotFound(Resource::Task)
        ));
        assert!(matches!(
            ServiceError::from(AuthzError::Forbidden),
            ServiceError::Forbidden
        ));
    }
}
