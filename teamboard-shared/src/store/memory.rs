/// In-memory [`Store`]
///
/// All tables live behind a single `tokio::sync::RwLock`, so every write
/// (including the multi-table project create and delete) happens under one
/// exclusive lock and is atomic with respect to readers. Listing semantics
/// (filters, ordering, page slicing) come from the same query types the
/// PostgreSQL store uses.
///
/// Data is lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::comment::{Comment, CreateComment};
use crate::models::membership::{CreateMembership, Membership, MembershipRole, TeamMember};
use crate::models::project::{CreateProject, Project, ProjectQuery, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskQuery, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User, UserProfile};
use crate::pagination::Page;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    memberships: Vec<Membership>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

impl Tables {
    fn username_taken(&self, username: &str) -> bool {
        let username = username.to_lowercase();
        self.users.iter().any(|u| u.username.to_lowercase() == username)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        let email = email.to_lowercase();
        self.users
            .iter()
            .any(|u| Some(u.id) != except && u.email.to_lowercase() == email)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.username_taken(&data.username) {
            return Err(StoreError::Duplicate("username"));
        }
        if tables.email_taken(&data.email, None) {
            return Err(StoreError::Duplicate("email"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            first_name: data.first_name,
            last_name: data.last_name,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let login = login.to_lowercase();
        let tables = self.tables.read().await;
        let by_email = tables.users.iter().find(|u| u.email.to_lowercase() == login);
        Ok(by_email
            .or_else(|| tables.users.iter().find(|u| u.username.to_lowercase() == login))
            .cloned())
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(email) = &data.email {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::Duplicate("email"));
            }
        }

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = data.email {
            user.email = email;
        }
        if let Some(password_hash) = data.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(first_name) = data.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn create_project(&self, data: CreateProject) -> Result<Project, StoreError> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            status: data.status,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.memberships.push(Membership {
            id: Uuid::new_v4(),
            project_id: project.id,
            user_id: project.owner_id,
            role: MembershipRole::Owner,
            joined_at: now,
        });
        tables.projects.push(project.clone());

        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn update_project(
        &self,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(project) = tables.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        data.apply(project);
        project.updated_at = Utc::now();

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Ok(false);
        }

        let task_ids: Vec<Uuid> = tables
            .tasks
            .iter()
            .filter(|t| t.project_id == id)
            .map(|t| t.id)
            .collect();
        tables.comments.retain(|c| !task_ids.contains(&c.task_id));
        tables.tasks.retain(|t| t.project_id != id);
        tables.memberships.retain(|m| m.project_id != id);

        Ok(true)
    }

    async fn list_projects_for_user(
        &self,
        user_id: Uuid,
        query: &ProjectQuery,
    ) -> Result<Page<Project>, StoreError> {
        let tables = self.tables.read().await;

        let mut projects: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| {
                p.owner_id == user_id
                    || tables
                        .memberships
                        .iter()
                        .any(|m| m.project_id == p.id && m.user_id == user_id)
            })
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        projects.sort_by(|a, b| query.compare(a, b));

        Ok(Page::from_sorted(projects, query.page))
    }

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }

    async fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.memberships.iter().find(|m| m.id == id).cloned())
    }

    async fn create_membership(&self, data: CreateMembership) -> Result<Membership, StoreError> {
        let mut tables = self.tables.write().await;

        if tables
            .memberships
            .iter()
            .any(|m| m.project_id == data.project_id && m.user_id == data.user_id)
        {
            return Err(StoreError::Duplicate("membership"));
        }

        let membership = Membership {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            user_id: data.user_id,
            role: data.role,
            joined_at: Utc::now(),
        };
        tables.memberships.push(membership.clone());

        Ok(membership)
    }

    async fn delete_membership(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let before = tables.memberships.len();
        tables.memberships.retain(|m| m.id != id);

        Ok(tables.memberships.len() < before)
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<TeamMember>, StoreError> {
        let tables = self.tables.read().await;

        let mut members: Vec<TeamMember> = tables
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .filter_map(|m| {
                let user = tables.users.iter().find(|u| u.id == m.user_id)?;
                Some(TeamMember::new(m.clone(), UserProfile::from(user.clone())))
            })
            .collect();
        // Stable: equal join times keep insertion order
        members.sort_by_key(|m| m.joined_at);

        Ok(members)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            project_id: data.project_id,
            assignee_id: data.assignee_id,
            created_by: Some(data.created_by),
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        data.apply(task);
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        if tables.tasks.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|c| c.task_id != id);

        Ok(true)
    }

    async fn list_tasks(
        &self,
        project_id: Uuid,
        query: &TaskQuery,
    ) -> Result<Page<Task>, StoreError> {
        let tables = self.tables.read().await;

        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id && query.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| query.compare(a, b));

        Ok(Page::from_sorted(tasks, query.page))
    }

    async fn create_comment(&self, data: CreateComment) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            task_id: data.task_id,
            author_id: data.author_id,
            content: data.content,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());

        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<Comment>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.content = content;
        comment.updated_at = Utc::now();

        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);

        Ok(tables.comments.len() < before)
    }

    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let tables = self.tables.read().await;

        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);

        Ok(comments)
    }
}
