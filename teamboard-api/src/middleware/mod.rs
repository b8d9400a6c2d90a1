/// Middleware for the API server
///
/// - `security`: security response headers
///
/// Bearer-token authentication lives in `teamboard_shared::auth::middleware`
/// and is layered onto the protected routes in [`crate::app`].

pub mod security;
