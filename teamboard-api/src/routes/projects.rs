/// Project endpoints
///
/// # Endpoints
///
/// - `GET /api/projects` - List projects the caller owns or belongs to
/// - `POST /api/projects` - Create a project (caller becomes owner)
/// - `GET /api/projects/:projectId` - Project detail (member+)
/// - `PUT /api/projects/:projectId` - Partial update (admin+)
/// - `DELETE /api/projects/:projectId` - Delete with all tasks, comments and
///   memberships (owner)
///
/// # Query parameters (list)
///
/// `search`, `status`, `sortBy` (`createdAt`, `updatedAt`, `name`, `status`),
/// `sortOrder` (`asc`, `desc`), `page`, `limit`.

use axum::extract::State;
use serde::Deserialize;
use teamboard_shared::auth::middleware::AuthContext;
use teamboard_shared::models::project::{Project, ProjectQuery, ProjectSortField, ProjectStatus};
use teamboard_shared::pagination::{PageRequest, PaginationError, SortOrder, DEFAULT_PAGE_SIZE};
use teamboard_shared::services::projects::{self, CreateProjectInput, UpdateProjectInput};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiResult, AppJson, AppPath, AppQuery},
    response::{self, Reply},
};

/// Query string for `GET /api/projects`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListParams {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub sort_by: Option<ProjectSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TryFrom<ProjectListParams> for ProjectQuery {
    type Error = PaginationError;

    fn try_from(params: ProjectListParams) -> Result<Self, Self::Error> {
        Ok(ProjectQuery {
            search: params.search,
            status: params.status,
            sort_by: params.sort_by.unwrap_or_default(),
            sort_order: params.sort_order.unwrap_or_default(),
            page: PageRequest::new(
                params.page.unwrap_or(1),
                params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            )?,
        })
    }
}

pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
    AppQuery(params): AppQuery<ProjectListParams>,
) -> ApiResult<Reply<Vec<Project>>> {
    let query = ProjectQuery::try_from(params)?;
    let page = projects::list_projects(state.store(), auth.user_id, query).await?;

    Ok(response::paged("Projects retrieved successfully", page))
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(input): AppJson<CreateProjectInput>,
) -> ApiResult<Reply<Project>> {
    let project = projects::create_project(state.store(), auth.user_id, input).await?;
    Ok(response::created("Project created successfully", project))
}

pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<Uuid>,
) -> ApiResult<Reply<Project>> {
    let project = projects::get_project(state.store(), auth.user_id, project_id).await?;
    Ok(response::ok("Project retrieved successfully", project))
}

pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateProjectInput>,
) -> ApiResult<Reply<Project>> {
    let project = projects::update_project(state.store(), auth.user_id, project_id, input).await?;
    Ok(response::ok("Project updated successfully", project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<Uuid>,
) -> ApiResult<Reply<()>> {
    projects::delete_project(state.store(), auth.user_id, project_id).await?;
    Ok(response::done("Project deleted successfully"))
}
