/// API route handlers
///
/// Handlers are thin: they extract the actor, path, query and body, call the
/// matching `teamboard_shared::services` operation and wrap the result in the
/// response envelope.
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh and profile
/// - `projects`: Project CRUD and listing
/// - `members`: Team roster
/// - `tasks`: Task CRUD and listing
/// - `comments`: Comments on tasks

pub mod auth;
pub mod comments;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;
