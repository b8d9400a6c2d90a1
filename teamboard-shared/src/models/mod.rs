/// Database models for Teamboard
///
/// Each model carries its own sqlx CRUD operations. Access control is not
/// applied here; see [`crate::services`].
///
/// # Models
///
/// - `user`: User accounts and public profiles
/// - `project`: Projects, the unit of access control
/// - `membership`: User-project relationships with roles
/// - `task`: Tasks scoped to a project
/// - `comment`: Comments scoped to a task

pub mod comment;
pub mod membership;
pub mod project;
pub mod task;
pub mod user;
