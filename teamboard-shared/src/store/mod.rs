/// Persistence seam for Teamboard
///
/// The [`Store`] trait abstracts over where records live. Two implementations
/// ship with the crate:
///
/// - [`PgStore`]: PostgreSQL via sqlx, delegating to the model CRUD functions
/// - [`MemoryStore`]: process-local tables behind a `tokio::sync::RwLock`,
///   used for tests and for running without a database
///
/// Stores perform no access control. Every method is a plain data operation;
/// permission checks happen in [`crate::services`] before a store is touched.
///
/// # Atomicity
///
/// `create_project` writes the project and its owner membership together, and
/// `delete_project` removes the project with all of its tasks, comments and
/// memberships together. Both backends guarantee that no intermediate state is
/// observable.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::comment::{Comment, CreateComment};
use crate::models::membership::{CreateMembership, Membership, TeamMember};
use crate::models::project::{CreateProject, Project, ProjectQuery, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskQuery, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::pagination::Page;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated; carries the offending field
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

// Unique constraint names from the initial migration
const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[
    ("users_username_key", "username"),
    ("users_email_key", "email"),
    ("memberships_project_id_user_id_key", "membership"),
];

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let field = db_err
                    .constraint()
                    .and_then(|name| {
                        UNIQUE_CONSTRAINTS
                            .iter()
                            .find(|(constraint, _)| *constraint == name)
                            .map(|(_, field)| *field)
                    })
                    .unwrap_or("record");
                return StoreError::Duplicate(field);
            }
        }
        StoreError::Database(e)
    }
}

/// Storage operations for users, projects, memberships, tasks and comments
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backing storage is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    // Users

    /// Inserts a user; username and email are unique case-insensitively
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Looks a user up by username or email, case-insensitively
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError>;

    // Projects

    /// Inserts a project and its owner membership atomically
    async fn create_project(&self, data: CreateProject) -> Result<Project, StoreError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    async fn update_project(
        &self,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError>;

    /// Deletes a project with its tasks, comments and memberships atomically
    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Lists projects the user owns or is a member of
    async fn list_projects_for_user(
        &self,
        user_id: Uuid,
        query: &ProjectQuery,
    ) -> Result<Page<Project>, StoreError>;

    // Memberships

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;

    async fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>, StoreError>;

    /// Inserts a membership; at most one per (project, user)
    async fn create_membership(&self, data: CreateMembership) -> Result<Membership, StoreError>;

    async fn delete_membership(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Lists a project's members with profiles, ordered by join time
    async fn list_members(&self, project_id: Uuid) -> Result<Vec<TeamMember>, StoreError>;

    // Tasks

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> Result<Option<Task>, StoreError>;

    /// Deletes a task and its comments
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn list_tasks(
        &self,
        project_id: Uuid,
        query: &TaskQuery,
    ) -> Result<Page<Task>, StoreError>;

    // Comments

    async fn create_comment(&self, data: CreateComment) -> Result<Comment, StoreError>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError>;

    async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, StoreError>;

    async fn delete_comment(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Lists a task's comments, oldest first
    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>, StoreError>;
}
