/// PostgreSQL-backed [`Store`]
///
/// A thin adapter over the model CRUD functions. Unique violations are
/// classified into [`StoreError::Duplicate`] by the `From<sqlx::Error>` impl.
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use teamboard_shared::store::{PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::db::pool::health_check;
use crate::models::comment::{Comment, CreateComment};
use crate::models::membership::{CreateMembership, Membership, TeamMember};
use crate::models::project::{CreateProject, Project, ProjectQuery, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskQuery, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::pagination::Page;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_login(&self.pool, login).await?)
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        Ok(User::update(&self.pool, id, data).await?)
    }

    async fn create_project(&self, data: CreateProject) -> Result<Project, StoreError> {
        Ok(Project::create_with_owner(&self.pool, data).await?)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn update_project(
        &self,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        Ok(Project::update(&self.pool, id, data).await?)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Project::delete(&self.pool, id).await?)
    }

    async fn list_projects_for_user(
        &self,
        user_id: Uuid,
        query: &ProjectQuery,
    ) -> Result<Page<Project>, StoreError> {
        let (projects, total) = Project::list_for_user(&self.pool, user_id, query).await?;
        Ok(Page::new(projects, query.page, total.max(0) as u64))
    }

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(Membership::find(&self.pool, project_id, user_id).await?)
    }

    async fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>, StoreError> {
        Ok(Membership::find_by_id(&self.pool, id).await?)
    }

    async fn create_membership(&self, data: CreateMembership) -> Result<Membership, StoreError> {
        Ok(Membership::create(&self.pool, data).await?)
    }

    async fn delete_membership(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Membership::delete(&self.pool, id).await?)
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<TeamMember>, StoreError> {
        Ok(Membership::list_by_project(&self.pool, project_id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> Result<Option<Task>, StoreError> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn list_tasks(
        &self,
        project_id: Uuid,
        query: &TaskQuery,
    ) -> Result<Page<Task>, StoreError> {
        let (tasks, total) = Task::list_by_project(&self.pool, project_id, query).await?;
        Ok(Page::new(tasks, query.page, total.max(0) as u64))
    }

    async fn create_comment(&self, data: CreateComment) -> Result<Comment, StoreError> {
        Ok(Comment::create(&self.pool, data).await?)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        Ok(Comment::find_by_id(&self.pool, id).await?)
    }

    async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, StoreError> {
        Ok(Comment::update_content(&self.pool, id, content).await?)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Comment::delete(&self.pool, id).await?)
    }

    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        Ok(Comment::list_by_task(&self.pool, task_id).await?)
    }
}
