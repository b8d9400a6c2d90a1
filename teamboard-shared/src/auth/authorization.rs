/// Project-scoped access control
///
/// Every protected resource resolves to exactly one governing project:
///
/// - Project: itself
/// - Task: its `project_id`
/// - Comment: its task's `project_id`
/// - Membership: its `project_id`
///
/// The actor's permissions on the resource are those of their membership on
/// that project.
///
/// # Permission Model
///
/// Roles are ordered `Owner > Admin > Member`; no membership means no role.
/// The user named by `Project::owner_id` is always treated as `Owner`, even
/// without a membership row.
///
/// | Action | Rule |
/// |---|---|
/// | View project, list members, view tasks, view comments | Member+ |
/// | Update project | Admin+ |
/// | Delete project | Owner |
/// | Add member | Admin+ |
/// | Remove member | Admin+, target is not an owner |
/// | Create task, update task | Member+ |
/// | Delete task | Admin+, or Member who created or is assigned the task |
/// | Create comment | Member+ |
/// | Update comment | Member+ and author |
/// | Delete comment | Member+ and (author or Admin+) |
///
/// # Outcomes
///
/// - A missing resource or governing project yields `NotFound`.
/// - Missing or insufficient membership yields `Forbidden`, never `NotFound`.
///
/// [`evaluate`] is a pure function over an already-resolved
/// [`AccessContext`]. The `authorize_*` functions load that context from a
/// [`Store`] and return the resolved records on success.
///
/// # Example
///
/// ```
/// use teamboard_shared::auth::authorization::{evaluate, AccessContext, Action, Decision};
/// use teamboard_shared::models::membership::MembershipRole;
/// use uuid::Uuid;
///
/// let actor = Uuid::new_v4();
/// let ctx = AccessContext::new(actor, Uuid::new_v4(), Some(MembershipRole::Member));
///
/// assert_eq!(evaluate(Action::ViewProject, &ctx), Decision::Allow);
/// assert!(!evaluate(Action::UpdateProject, &ctx).is_allowed());
/// ```

use tracing::debug;
use uuid::Uuid;

use crate::models::comment::Comment;
use crate::models::membership::{Membership, MembershipRole};
use crate::models::project::Project;
use crate::models::task::Task;
use crate::store::{Store, StoreError};

/// Kinds of record an operation may fail to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Project,
    Membership,
    Task,
    Comment,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::User => "User",
            Resource::Project => "Project",
            Resource::Membership => "Membership",
            Resource::Task => "Task",
            Resource::Comment => "Comment",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations subject to access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewProject,
    UpdateProject,
    DeleteProject,
    ListMembers,
    AddMember,
    RemoveMember,
    /// View one task or list a project's tasks
    ViewTask,
    CreateTask,
    UpdateTask,
    DeleteTask,
    /// View one comment or list a task's comments
    ViewComment,
    CreateComment,
    UpdateComment,
    DeleteComment,
}

impl Action {
    pub const ALL: [Action; 14] = [
        Action::ViewProject,
        Action::UpdateProject,
        Action::DeleteProject,
        Action::ListMembers,
        Action::AddMember,
        Action::RemoveMember,
        Action::ViewTask,
        Action::CreateTask,
        Action::UpdateTask,
        Action::DeleteTask,
        Action::ViewComment,
        Action::CreateComment,
        Action::UpdateComment,
        Action::DeleteComment,
    ];

    /// Lowest role that may perform the action on any resource
    ///
    /// Some actions also let a lower role through for resources it authored;
    /// see [`evaluate`].
    pub fn required_role(&self) -> MembershipRole {
        match self {
            Action::DeleteProject => MembershipRole::Owner,
            Action::UpdateProject
            | Action::AddMember
            | Action::RemoveMember
            | Action::DeleteTask
            | Action::DeleteComment => MembershipRole::Admin,
            Action::ViewProject
            | Action::ListMembers
            | Action::ViewTask
            | Action::CreateTask
            | Action::UpdateTask
            | Action::ViewComment
            | Action::CreateComment
            | Action::UpdateComment => MembershipRole::Member,
        }
    }
}

/// Why access was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotFound(Resource),
    Forbidden,
}

/// Outcome of an access-control evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), AuthzError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotFound(resource)) => Err(AuthzError::NotFound(resource)),
            Decision::Deny(DenyReason::Forbidden) => Err(AuthzError::Forbidden),
        }
    }
}

/// Everything the rule table needs to decide, already loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessContext {
    /// User attempting the action
    pub actor: Uuid,

    /// `owner_id` of the governing project
    pub project_owner: Uuid,

    /// Actor's membership role on the governing project
    pub membership_role: Option<MembershipRole>,

    /// Task creator or comment author
    pub author: Option<Uuid>,

    /// Task assignee
    pub assignee: Option<Uuid>,

    /// Effective role of the membership being removed
    pub target_role: Option<MembershipRole>,
}

impl AccessContext {
    pub fn new(actor: Uuid, project_owner: Uuid, membership_role: Option<MembershipRole>) -> Self {
        Self {
            actor,
            project_owner,
            membership_role,
            author: None,
            assignee: None,
            target_role: None,
        }
    }

    pub fn with_author(mut self, author: Option<Uuid>) -> Self {
        self.author = author;
        self
    }

    pub fn with_assignee(mut self, assignee: Option<Uuid>) -> Self {
        self.assignee = assignee;
        self
    }

    pub fn with_target_role(mut self, target_role: MembershipRole) -> Self {
        self.target_role = Some(target_role);
        self
    }

    /// Membership role, raised to `Owner` for the project's owner pointer
    pub fn effective_role(&self) -> Option<MembershipRole> {
        if self.actor == self.project_owner {
            Some(MembershipRole::Owner)
        } else {
            self.membership_role
        }
    }

    fn is_author(&self) -> bool {
        self.author == Some(self.actor)
    }

    fn is_assignee(&self) -> bool {
        self.assignee == Some(self.actor)
    }
}

/// Decides whether the actor in `ctx` may perform `action`
///
/// Pure; performs no I/O.
pub fn evaluate(action: Action, ctx: &AccessContext) -> Decision {
    let Some(role) = ctx.effective_role() else {
        return Decision::Deny(DenyReason::Forbidden);
    };
    let meets = |required: MembershipRole| role.has_permission(&required);

    let allowed = match action {
        Action::ViewProject
        | Action::ListMembers
        | Action::ViewTask
        | Action::CreateTask
        | Action::UpdateTask
        | Action::ViewComment
        | Action::CreateComment => meets(MembershipRole::Member),
        Action::UpdateProject | Action::AddMember => meets(MembershipRole::Admin),
        Action::DeleteProject => meets(MembershipRole::Owner),
        Action::RemoveMember => {
            meets(MembershipRole::Admin) && ctx.target_role != Some(MembershipRole::Owner)
        }
        Action::DeleteTask => meets(MembershipRole::Admin) || ctx.is_author() || ctx.is_assignee(),
        Action::UpdateComment => ctx.is_author(),
        Action::DeleteComment => meets(MembershipRole::Admin) || ctx.is_author(),
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::Forbidden)
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The resource or its governing project doesn't exist
    #[error("{0} not found")]
    NotFound(Resource),

    /// The actor lacks the required membership or role
    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Evaluates a resolved context, logging denials
fn enforce(action: Action, ctx: &AccessContext, project_id: Uuid) -> Result<(), AuthzError> {
    let decision = evaluate(action, ctx);
    if !decision.is_allowed() {
        debug!(actor = %ctx.actor, %project_id, ?action, ?decision, "Access denied");
    }
    decision.into_result()
}

async fn load_project(store: &dyn Store, project_id: Uuid) -> Result<Project, AuthzError> {
    store
        .find_project(project_id)
        .await?
        .ok_or(AuthzError::NotFound(Resource::Project))
}

async fn membership_role(
    store: &dyn Store,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<Option<MembershipRole>, AuthzError> {
    Ok(store
        .find_membership(project_id, user_id)
        .await?
        .map(|m| m.role))
}

/// Authorizes a project-level action and returns the project
pub async fn authorize_project(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    action: Action,
) -> Result<Project, AuthzError> {
    let project = load_project(store, project_id).await?;
    let role = membership_role(store, project.id, actor).await?;

    enforce(action, &AccessContext::new(actor, project.owner_id, role), project.id)?;

    Ok(project)
}

/// Authorizes a task-level action and returns the task with its project
pub async fn authorize_task(
    store: &dyn Store,
    actor: Uuid,
    task_id: Uuid,
    action: Action,
) -> Result<(Task, Project), AuthzError> {
    let task = store
        .find_task(task_id)
        .await?
        .ok_or(AuthzError::NotFound(Resource::Task))?;
    let project = load_project(store, task.project_id).await?;
    let role = membership_role(store, project.id, actor).await?;

    let ctx = AccessContext::new(actor, project.owner_id, role)
        .with_author(task.created_by)
        .with_assignee(task.assignee_id);
    enforce(action, &ctx, project.id)?;

    Ok((task, project))
}

/// Authorizes a comment-level action and returns the comment with its task
pub async fn authorize_comment(
    store: &dyn Store,
    actor: Uuid,
    comment_id: Uuid,
    action: Action,
) -> Result<(Comment, Task), AuthzError> {
    let comment = store
        .find_comment(comment_id)
        .await?
        .ok_or(AuthzError::NotFound(Resource::Comment))?;
    let task = store
        .find_task(comment.task_id)
        .await?
        .ok_or(AuthzError::NotFound(Resource::Task))?;
    let project = load_project(store, task.project_id).await?;
    let role = membership_role(store, project.id, actor).await?;

    let ctx = AccessContext::new(actor, project.owner_id, role).with_author(Some(comment.author_id));
    enforce(action, &ctx, project.id)?;

    Ok((comment, task))
}

/// Authorizes removing a membership and returns it
///
/// The membership must belong to `project_id`; a membership on another
/// project is reported as not found.
pub async fn authorize_membership(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    membership_id: Uuid,
) -> Result<Membership, AuthzError> {
    let project = load_project(store, project_id).await?;
    let membership = store
        .find_membership_by_id(membership_id)
        .await?
        .filter(|m| m.project_id == project.id)
        .ok_or(AuthzError::NotFound(Resource::Membership))?;
    let role = membership_role(store, project.id, actor).await?;

    let target_role = if membership.user_id == project.owner_id {
        MembershipRole::Owner
    } else {
        membership.role
    };
    let ctx = AccessContext::new(actor, project.owner_id, role).with_target_role(target_role);
    enforce(Action::RemoveMember, &ctx, project.id)?;

    Ok(membership)
}
