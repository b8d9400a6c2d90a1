/// Team roster operations
///
/// # Rules
///
/// - Adding requires Admin+. The `owner` role cannot be granted here; a
///   project's owner is fixed when the project is created.
/// - Removing requires Admin+ and never applies to an owner.
/// - Removing a member keeps the tasks and comments they wrote.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::auth::authorization::{authorize_membership, authorize_project, Action, Resource};
use crate::models::membership::{default_role, CreateMembership, MembershipRole, TeamMember};
use crate::models::user::UserProfile;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberInput {
    pub user_id: Uuid,

    #[serde(default = "default_role")]
    pub role: MembershipRole,
}

/// Adds a user to a project
///
/// Checks run in order: project exists, actor is Admin+, role is grantable,
/// target user exists, target is not already a member.
pub async fn add_member(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    input: AddMemberInput,
) -> Result<TeamMember, ServiceError> {
    let project = authorize_project(store, actor, project_id, Action::AddMember).await?;

    if input.role == MembershipRole::Owner {
        return Err(ServiceError::invalid(
            "role",
            "Role must be either admin or member",
        ));
    }

    let user = store
        .find_user(input.user_id)
        .await?
        .ok_or(ServiceError::NotFound(Resource::User))?;

    let membership = store
        .create_membership(CreateMembership {
            project_id: project.id,
            user_id: user.id,
            role: input.role,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => {
                ServiceError::Conflict("User is already a member of this project".to_string())
            }
            other => other.into(),
        })?;

    info!(
        project_id = %project.id,
        user_id = %user.id,
        role = %membership.role,
        actor = %actor,
        "Member added"
    );
    Ok(TeamMember::new(membership, UserProfile::from(user)))
}

/// Removes a membership from a project
pub async fn remove_member(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    membership_id: Uuid,
) -> Result<(), ServiceError> {
    let membership = authorize_membership(store, actor, project_id, membership_id).await?;

    if !store.delete_membership(membership.id).await? {
        return Err(ServiceError::NotFound(Resource::Membership));
    }

    info!(
        project_id = %membership.project_id,
        user_id = %membership.user_id,
        actor = %actor,
        "Member removed"
    );
    Ok(())
}

/// Lists a project's members with their profiles, oldest first
pub async fn list_members(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
) -> Result<Vec<TeamMember>, ServiceError> {
    let project = authorize_project(store, actor, project_id, Action::ListMembers).await?;
    Ok(store.list_members(project.id).await?)
}
