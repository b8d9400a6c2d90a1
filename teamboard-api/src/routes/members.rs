/// Team roster endpoints
///
/// # Endpoints
///
/// - `GET /api/projects/:projectId/members` - List members with profiles (member+)
/// - `POST /api/projects/:projectId/members` - Add a member (admin+)
/// - `DELETE /api/projects/:projectId/members/:membershipId` - Remove a
///   non-owner member (admin+)
///
/// # Request (add)
///
/// ```json
/// { "userId": "uuid", "role": "member" }
/// ```
///
/// `role` is `admin` or `member` and defaults to `member`.

use axum::extract::State;
use teamboard_shared::auth::middleware::AuthContext;
use teamboard_shared::models::membership::TeamMember;
use teamboard_shared::services::memberships::{self, AddMemberInput};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiResult, AppJson, AppPath},
    response::{self, Reply},
};

pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<Uuid>,
) -> ApiResult<Reply<Vec<TeamMember>>> {
    let members = memberships::list_members(state.store(), auth.user_id, project_id).await?;
    Ok(response::ok("Team members retrieved successfully", members))
}

pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(project_id): AppPath<Uuid>,
    AppJson(input): AppJson<AddMemberInput>,
) -> ApiResult<Reply<TeamMember>> {
    let member = memberships::add_member(state.store(), auth.user_id, project_id, input).await?;
    Ok(response::created("Team member added successfully", member))
}

pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath((project_id, membership_id)): AppPath<(Uuid, Uuid)>,
) -> ApiResult<Reply<()>> {
    memberships::remove_member(state.store(), auth.user_id, project_id, membership_id).await?;
    Ok(response::done("Team member removed successfully"))
}
