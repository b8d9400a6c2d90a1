/// Comment operations
///
/// Only the author may edit a comment. The author or an Admin+ may delete
/// it. Authors who have left the project lose both rights.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::ServiceError;
use crate::auth::authorization::{authorize_comment, authorize_task, Action, Resource};
use crate::models::comment::{Comment, CreateComment};
use crate::store::Store;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, max = 1000, message = "Comment must be between 1 and 1000 characters"))]
    pub content: String,
}

impl CommentInput {
    fn trimmed(mut self) -> Result<String, ServiceError> {
        self.content = self.content.trim().to_string();
        self.validate()?;
        Ok(self.content)
    }
}

pub async fn create_comment(
    store: &dyn Store,
    actor: Uuid,
    task_id: Uuid,
    input: CommentInput,
) -> Result<Comment, ServiceError> {
    let (task, _) = authorize_task(store, actor, task_id, Action::CreateComment).await?;
    let content = input.trimmed()?;

    let comment = store
        .create_comment(CreateComment {
            task_id: task.id,
            author_id: actor,
            content,
        })
        .await?;

    info!(comment_id = %comment.id, task_id = %task.id, actor = %actor, "Comment created");
    Ok(comment)
}

pub async fn update_comment(
    store: &dyn Store,
    actor: Uuid,
    comment_id: Uuid,
    input: CommentInput,
) -> Result<Comment, ServiceError> {
    let (comment, _) = authorize_comment(store, actor, comment_id, Action::UpdateComment).await?;
    let content = input.trimmed()?;

    Ok(store
        .update_comment(comment.id, content)
        .await?
        .ok_or(ServiceError::NotFound(Resource::Comment))?)
}

pub async fn delete_comment(
    store: &dyn Store,
    actor: Uuid,
    comment_id: Uuid,
) -> Result<(), ServiceError> {
    let (comment, _) = authorize_comment(store, actor, comment_id, Action::DeleteComment).await?;

    if !store.delete_comment(comment.id).await? {
        return Err(ServiceError::NotFound(Resource::Comment));
    }

    info!(comment_id = %comment.id, actor = %actor, "Comment deleted");
    Ok(())
}

/// Lists a task's comments, oldest first
pub async fn list_comments(
    store: &dyn Store,
    actor: Uuid,
    task_id: Uuid,
) -> Result<Vec<Comment>, ServiceError> {
    let (task, _) = authorize_task(store, actor, task_id, Action::ViewComment).await?;
    Ok(store.list_comments(task.id).await?)
}
