/// Comment endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks/:taskId/comments` - List comments, oldest first (member+)
/// - `POST /api/tasks/:taskId/comments` - Comment on a task (member+)
/// - `PUT /api/comments/:commentId` - Edit own comment
/// - `DELETE /api/comments/:commentId` - Delete own comment, or any as admin+

use axum::extract::State;
use teamboard_shared::auth::middleware::AuthContext;
use teamboard_shared::models::comment::Comment;
use teamboard_shared::services::comments::{self, CommentInput};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiResult, AppJson, AppPath},
    response::{self, Reply},
};

pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(task_id): AppPath<Uuid>,
) -> ApiResult<Reply<Vec<Comment>>> {
    let comments = comments::list_comments(state.store(), auth.user_id, task_id).await?;
    Ok(response::ok("Comments retrieved successfully", comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(task_id): AppPath<Uuid>,
    AppJson(input): AppJson<CommentInput>,
) -> ApiResult<Reply<Comment>> {
    let comment = comments::create_comment(state.store(), auth.user_id, task_id, input).await?;
    Ok(response::created("Comment created successfully", comment))
}

pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(comment_id): AppPath<Uuid>,
    AppJson(input): AppJson<CommentInput>,
) -> ApiResult<Reply<Comment>> {
    let comment = comments::update_comment(state.store(), auth.user_id, comment_id, input).await?;
    Ok(response::ok("Comment updated successfully", comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    AppPath(comment_id): AppPath<Uuid>,
) -> ApiResult<Reply<()>> {
    comments::delete_comment(state.store(), auth.user_id, comment_id).await?;
    Ok(response::done("Comment deleted successfully"))
}
