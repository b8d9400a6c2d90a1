/// Task operations
///
/// An assignee must hold a membership on the task's project at the time of
/// assignment.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{double_option, ServiceError};
use crate::auth::authorization::{authorize_project, authorize_task, Action, Resource};
use crate::models::project::Project;
use crate::models::task::{CreateTask, Task, TaskPriority, TaskQuery, TaskStatus, UpdateTask};
use crate::pagination::{normalize_search, Page};
use crate::store::Store;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    #[validate(length(min = 1, max = 200, message = "Task title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[validate(length(min = 1, max = 200, message = "Task title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<Option<String>>,

    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,

    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl CreateTaskInput {
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self
    }
}

impl UpdateTaskInput {
    fn normalized(mut self) -> Self {
        self.title = self.title.map(|title| title.trim().to_string());
        self
    }
}

async fn ensure_assignee_is_member(
    store: &dyn Store,
    project: &Project,
    assignee_id: Uuid,
) -> Result<(), ServiceError> {
    let is_member = assignee_id == project.owner_id
        || store.find_membership(project.id, assignee_id).await?.is_some();

    if !is_member {
        return Err(ServiceError::invalid(
            "assigneeId",
            "Assignee must be a member of the project",
        ));
    }

    Ok(())
}

/// Creates a task in a project, stamped with the actor as creator
pub async fn create_task(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    input: CreateTaskInput,
) -> Result<Task, ServiceError> {
    let project = authorize_project(store, actor, project_id, Action::CreateTask).await?;
    let input = input.normalized();
    input.validate()?;

    if let Some(assignee_id) = input.assignee_id {
        ensure_assignee_is_member(store, &project, assignee_id).await?;
    }

    let task = store
        .create_task(CreateTask {
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            project_id: project.id,
            assignee_id: input.assignee_id,
            created_by: actor,
            due_date: input.due_date,
        })
        .await?;

    info!(task_id = %task.id, project_id = %project.id, actor = %actor, "Task created");
    Ok(task)
}

pub async fn get_task(store: &dyn Store, actor: Uuid, task_id: Uuid) -> Result<Task, ServiceError> {
    let (task, _) = authorize_task(store, actor, task_id, Action::ViewTask).await?;
    Ok(task)
}

pub async fn update_task(
    store: &dyn Store,
    actor: Uuid,
    task_id: Uuid,
    input: UpdateTaskInput,
) -> Result<Task, ServiceError> {
    let (task, project) = authorize_task(store, actor, task_id, Action::UpdateTask).await?;
    let input = input.normalized();
    input.validate()?;

    if let Some(Some(assignee_id)) = input.assignee_id {
        ensure_assignee_is_member(store, &project, assignee_id).await?;
    }

    let task = store
        .update_task(
            task.id,
            UpdateTask {
                title: input.title,
                description: input.description,
                status: input.status,
                priority: input.priority,
                assignee_id: input.assignee_id,
                due_date: input.due_date,
            },
        )
        .await?
        .ok_or(ServiceError::NotFound(Resource::Task))?;

    info!(task_id = %task.id, actor = %actor, "Task updated");
    Ok(task)
}

/// Deletes a task and its comments
pub async fn delete_task(store: &dyn Store, actor: Uuid, task_id: Uuid) -> Result<(), ServiceError> {
    let (task, _) = authorize_task(store, actor, task_id, Action::DeleteTask).await?;

    if !store.delete_task(task.id).await? {
        return Err(ServiceError::NotFound(Resource::Task));
    }

    info!(task_id = %task.id, actor = %actor, "Task deleted");
    Ok(())
}

pub async fn list_tasks(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    mut query: TaskQuery,
) -> Result<Page<Task>, ServiceError> {
    let project = authorize_project(store, actor, project_id, Action::ViewTask).await?;

    query.search = normalize_search(query.search);
    Ok(store.list_tasks(project.id, &query).await?)
}
