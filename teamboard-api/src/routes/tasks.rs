/// Task endpoints
///
/// # Endpoints
///
/// - `GET /api/projects/:projectId/tasks` - List a project's tasks (member+)
/// - `POST /api/projects/:projectId/tasks` - Create a task (member+)
/// - `GET /api/tasks/:taskId` - Task detail (member+)
/// - `PUT /api/tasks/:taskId` - Partial update (member+)
/// - `DELETE /api/tasks/:taskId` - Delete with comments (admin+, or the
///   creator/assignee)
///
/// # Query parameters (list)
///
/// `search` (title or status), `status`, `priority`, `assigneeId`, `sortBy`
/// (`createdAt`, `updatedAt`, `title`, `status`, `priority`, `dueDate`),
/// `sortOrder`, `page`, `limit`.

use axum::extract::State;
use serde::Deserialize;
use teamboard_shared::auth::middleware::AuthContext;
use teamboard_shared::models::task::{Task, TaskPriority, TaskQuery, TaskSortField, TaskStatus};
use teamboard_shared::pagination::{PageRequest, PaginationError, SortOrder, DEFAULT_PAGE_SIZE};
use teamboard_shared::services::tasks::{self, CreateTaskInput, UpdateTaskInput};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiResult, AppJson, AppPath, AppQuery},
    response::{self, Reply},
};

/// Query string for `GET /api/projects/:projectId/tasks`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub sort_by: Option<TaskSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TryFrom<TaskListParams> for TaskQuery {
    type Error = PaginationError;

    fn try_from(params: TaskListParams) -> Result<Self, Self::Error> {
        Ok(TaskQuery {
            search: params.search,
            status: params.status,
            priority: params.priority,
            assignee_id: params.assignee_id,
            sort_by: params.sort_by.unwrap_or_default(),
            sort_order: params.sort_order.unwrap_or_default(),
            page: PageRequest::new(
                params.page.unwrap_or(1),
                params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            )?,
        })
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<TaskListParams>,
) -> ApiResult<Reply<Vec<Task>>> {
    let query = TaskQuery::try_from(params)?;
    let page = tasks::list_tasks(state.store(), auth.user_id, project_id, query).await?;

    Ok(response::paged("Tasks retrieved successfully", page))
}

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<Uuid>,
    AppJson(input): AppJson<CreateTaskInput>,
) -> ApiResult<Reply<Task>> {
    let task = tasks::create_task(state.store(), auth.user_id, project_id, input).await?;
    Ok(response::created("Task created successfully", task))
}

pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(task_id): AppPath<Uuid>,
) -> ApiResult<Reply<Task>> {
    let task = tasks::get_task(state.store(), auth.user_id, task_id).await?;
    Ok(response::ok("Task retrieved successfully", task))
}

pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(task_id): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateTaskInput>,
) -> ApiResult<Reply<Task>> {
    let task = tasks::update_task(state.store(), auth.user_id, task_id, input).await?;
    Ok(response::ok("Task updated successfully", task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(task_id): AppPath<Uuid>,
) -> ApiResult<Reply<()>> {
    tasks::delete_task(state.store(), auth.user_id, task_id).await?;
    Ok(response::done("Task deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_map_filters() {
        let assignee = Uuid::new_v4();
        let params = TaskListParams {
            status: Some(TaskStatus::Completed),
            assignee_id: Some(assignee),
            sort_by: Some(TaskSortField::DueDate),
            sort_order: Some(SortOrder::Asc),
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };

        let query = TaskQuery::try_from(params).unwrap();
        assert_eq!(query.status, Some(TaskStatus::Completed));
        assert_eq!(query.assignee_id, Some(assignee));
        assert_eq!(query.sort_by, TaskSortField::DueDate);
        assert_eq!(query.page.offset(), 50);
    }

    #[test]
    fn test_params_reject_page_zero() {
        let params = TaskListParams {
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(
            TaskQuery::try_from(params).unwrap_err(),
            PaginationError::InvalidPage
        );
    }
}
