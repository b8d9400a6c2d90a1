/// Project operations
///
/// Creation is open to any authenticated user and makes them the owner.
/// Everything else is governed by the actor's role on the project.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{double_option, ServiceError};
use crate::auth::authorization::{authorize_project, Action, Resource};
use crate::models::project::{CreateProject, Project, ProjectQuery, ProjectStatus, UpdateProject};
use crate::pagination::{normalize_search, Page};
use crate::store::Store;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    #[validate(length(min = 1, max = 100, message = "Project name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    #[validate(length(min = 1, max = 100, message = "Project name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<Option<String>>,

    pub status: Option<ProjectStatus>,
}

impl CreateProjectInput {
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

impl UpdateProjectInput {
    fn normalized(mut self) -> Self {
        self.name = self.name.map(|name| name.trim().to_string());
        self
    }
}

/// Creates a project owned by the actor
pub async fn create_project(
    store: &dyn Store,
    actor: Uuid,
    input: CreateProjectInput,
) -> Result<Project, ServiceError> {
    let input = input.normalized();
    input.validate()?;

    let project = store
        .create_project(CreateProject {
            name: input.name,
            description: input.description,
            status: input.status.unwrap_or_default(),
            owner_id: actor,
        })
        .await?;

    info!(project_id = %project.id, owner_id = %actor, "Project created");
    Ok(project)
}

pub async fn get_project(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
) -> Result<Project, ServiceError> {
    Ok(authorize_project(store, actor, project_id, Action::ViewProject).await?)
}

pub async fn update_project(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    input: UpdateProjectInput,
) -> Result<Project, ServiceError> {
    let project = authorize_project(store, actor, project_id, Action::UpdateProject).await?;
    let input = input.normalized();
    input.validate()?;

    let project = store
        .update_project(
            project.id,
            UpdateProject {
                name: input.name,
                description: input.description,
                status: input.status,
            },
        )
        .await?
        .ok_or(ServiceError::NotFound(Resource::Project))?;

    info!(project_id = %project.id, actor = %actor, "Project updated");
    Ok(project)
}

/// Deletes a project with all of its tasks, comments and memberships
pub async fn delete_project(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
) -> Result<(), ServiceError> {
    let project = authorize_project(store, actor, project_id, Action::DeleteProject).await?;

    if !store.delete_project(project.id).await? {
        return Err(ServiceError::NotFound(Resource::Project));
    }

    info!(project_id = %project.id, actor = %actor, "Project deleted");
    Ok(())
}

/// Lists projects the actor owns or is a member of
pub async fn list_projects(
    store: &dyn Store,
    actor: Uuid,
    mut query: ProjectQuery,
) -> Result<Page<Project>, ServiceError> {
    query.search = normalize_search(query.search);
    Ok(store.list_projects_for_user(actor, &query).await?)
}
