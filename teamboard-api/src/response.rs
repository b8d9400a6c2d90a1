/// Response envelope
///
/// Every JSON response, success or failure, has the same shape:
///
/// ```json
/// {
///   "success": true,
///   "message": "Projects retrieved successfully",
///   "data": [ ... ],
///   "pagination": { "currentPage": 1, "totalPages": 3, "totalItems": 25, "pageSize": 10 }
/// }
/// ```
///
/// `data`, `errors` and `pagination` are omitted when empty.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use teamboard_shared::pagination::{Page, PageMeta};
use teamboard_shared::services::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
}

impl<T> Envelope<T> {
    fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            errors: None,
            pagination: None,
        }
    }
}

impl Envelope<()> {
    /// Failure envelope with optional per-field errors
    pub fn failure(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
            pagination: None,
        }
    }
}

/// A status code plus an envelope
#[derive(Debug)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: Envelope<T>,
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// 200 with data
pub fn ok<T>(message: impl Into<String>, data: T) -> Reply<T> {
    Reply {
        status: StatusCode::OK,
        body: Envelope::success(message, Some(data)),
    }
}

/// 201 with the created resource
pub fn created<T>(message: impl Into<String>, data: T) -> Reply<T> {
    Reply {
        status: StatusCode::CREATED,
        body: Envelope::success(message, Some(data)),
    }
}

/// 200 with a message only
pub fn done(message: impl Into<String>) -> Reply<()> {
    Reply {
        status: StatusCode::OK,
        body: Envelope::success(message, None),
    }
}

/// 200 with one page of items and its metadata
pub fn paged<T>(message: impl Into<String>, page: Page<T>) -> Reply<Vec<T>> {
    let mut body = Envelope::success(message, Some(page.items));
    body.pagination = Some(page.meta);

    Reply {
        status: StatusCode::OK,
        body,
    }
}
