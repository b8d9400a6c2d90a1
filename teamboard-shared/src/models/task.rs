/// Task model and database operations
///
/// Tasks belong to exactly one project and may be assigned to one member of
/// that project. Access to a task is governed by the actor's role on its
/// project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in-progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
/// use teamboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write release notes".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     priority: TaskPriority::High,
///     project_id: Uuid::new_v4(),
///     assignee_id: None,
///     created_by: Uuid::new_v4(),
///     due_date: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::pagination::{like_pattern, matches_search, PageRequest, SortOrder};

/// Task progress status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority, lowest first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Progress status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Owning project
    pub project_id: Uuid,

    /// Member the task is assigned to
    pub assignee_id: Option<Uuid>,

    /// User who created the task
    pub created_by: Option<Uuid>,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub project_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub created_by: Uuid,
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating an existing task
///
/// All fields are optional. Only non-None fields will be updated.
/// Nullable columns use `Some(None)` to clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Option<Uuid>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTask {
    /// Applies the update to an in-memory copy
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Columns a task listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Priority,
    DueDate,
}

/// Search, filter, sort and page parameters for listing a project's tasks
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// Case-insensitive substring of the title or status
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub sort_by: TaskSortField,
    pub sort_order: SortOrder,
    pub page: PageRequest,
}

impl TaskQuery {
    /// Returns true if `task` passes the search and filters
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if self.assignee_id.is_some() && self.assignee_id != task.assignee_id {
            return false;
        }
        match &self.search {
            Some(term) => {
                matches_search(&task.title, term) || matches_search(task.status.as_str(), term)
            }
            None => true,
        }
    }

    /// Total order used for listing; ties fall back to creation time then id
    ///
    /// Missing due dates sort before any date when ascending.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let primary = match self.sort_by {
            TaskSortField::CreatedAt => Ordering::Equal,
            TaskSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            TaskSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            TaskSortField::Status => a.status.cmp(&b.status),
            TaskSortField::Priority => a.priority.cmp(&b.priority),
            TaskSortField::DueDate => a.due_date.cmp(&b.due_date),
        };

        self.sort_order.apply(
            primary
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id)),
        )
    }

    /// Appends the `WHERE` clause and its bind values
    fn push_filters(&self, builder: &mut QueryBuilder<'_, Postgres>, project_id: Uuid) {
        builder.push(" WHERE project_id = ").push_bind(project_id);

        if let Some(term) = &self.search {
            let pattern = like_pattern(term);
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR status::text ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = self.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = self.priority {
            builder.push(" AND priority = ").push_bind(priority);
        }
        if let Some(assignee_id) = self.assignee_id {
            builder.push(" AND assignee_id = ").push_bind(assignee_id);
        }
    }

    fn order_clause(&self) -> String {
        let dir = self.sort_order.as_sql();
        let primary = match self.sort_by {
            TaskSortField::CreatedAt => None,
            TaskSortField::UpdatedAt => Some(format!("updated_at {dir}")),
            TaskSortField::Title => Some(format!("LOWER(title) {dir}")),
            TaskSortField::Status => Some(format!("status {dir}")),
            TaskSortField::Priority => Some(format!("priority {dir}")),
            TaskSortField::DueDate => Some(match self.sort_order {
                SortOrder::Asc => "due_date ASC NULLS FIRST".to_string(),
                SortOrder::Desc => "due_date DESC NULLS LAST".to_string(),
            }),
        };

        match primary {
            Some(primary) => format!("ORDER BY {primary}, created_at {dir}, id {dir}"),
            None => format!("ORDER BY created_at {dir}, id {dir}"),
        }
    }
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the project doesn't exist (foreign key violation)
    /// or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, project_id,
                               assignee_id, created_by, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, status, priority, project_id,
                      assignee_id, created_by, due_date, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.project_id)
        .bind(data.assignee_id)
        .bind(data.created_by)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, project_id,
                   assignee_id, created_by, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates an existing task
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at` timestamp
    /// is automatically set to the current time.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, priority, project_id, \
             assignee_id, created_by, due_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Lists a project's tasks
    ///
    /// Returns the requested page and the total number of matching tasks.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        query: &TaskQuery,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks");
        query.push_filters(&mut count, project_id);
        let (total,) = count.build_query_as::<(i64,)>().fetch_one(pool).await?;

        let mut list = QueryBuilder::<Postgres>::new(
            "SELECT id, title, description, status, priority, project_id, assignee_id, \
             created_by, due_date, created_at, updated_at FROM tasks",
        );
        query.push_filters(&mut list, project_id);
        list.push(" ")
            .push(query.order_clause())
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit()))
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);
        let tasks = list.build_query_as::<Task>().fetch_all(pool).await?;

        Ok((tasks, total))
    }

    /// Deletes a task
    ///
    /// This also deletes all of the task's comments due to CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(title: &str, age_minutes: i64) -> Task {
        let created = Utc::now() - Duration::minutes(age_minutes);
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            project_id: Uuid::new_v4(),
            assignee_id: None,
            created_by: None,
            due_date: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in-progress\"");
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"high\"");
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
        assert!(serde_json::from_str::<TaskPriority>("\"urgent\"").is_err());
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_priority_order() {
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::Medium < TaskPriority::High);
    }

    #[test]
    fn test_update_apply_clears_nullable_fields() {
        let mut t = task("t", 0);
        t.assignee_id = Some(Uuid::new_v4());
        t.due_date = Some(Utc::now());

        UpdateTask {
            assignee_id: Some(None),
            due_date: Some(None),
            priority: Some(TaskPriority::Low),
            ..Default::default()
        }
        .apply(&mut t);

        assert_eq!(t.assignee_id, None);
        assert_eq!(t.due_date, None);
        assert_eq!(t.priority, TaskPriority::Low);
        assert_eq!(t.title, "t");
    }

    #[test]
    fn test_search_matches_title_or_status() {
        let query = TaskQuery {
            search: Some("PROGRESS".to_string()),
            ..Default::default()
        };
        let mut t = task("Write docs", 0);
        assert!(!query.matches(&t));
        t.status = TaskStatus::InProgress;
        assert!(query.matches(&t));

        let query = TaskQuery {
            search: Some("docs".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&t));
    }

    #[test]
    fn test_filters() {
        let assignee = Uuid::new_v4();
        let mut t = task("t", 0);
        t.assignee_id = Some(assignee);

        let query = TaskQuery {
            assignee_id: Some(assignee),
            priority: Some(TaskPriority::Medium),
            ..Default::default()
        };
        assert!(query.matches(&t));

        let query = TaskQuery {
            assignee_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!query.matches(&t));
    }

    #[test]
    fn test_due_date_nulls_sort_first_ascending() {
        let query = TaskQuery {
            sort_by: TaskSortField::DueDate,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let undated = task("a", 0);
        let mut dated = task("b", 0);
        dated.due_date = Some(Utc::now());

        assert_eq!(query.compare(&undated, &dated), Ordering::Less);
        assert!(query.order_clause().contains("NULLS FIRST"));
    }

    #[test]
    fn test_filters_number_placeholders_in_order() {
        let query = TaskQuery {
            search: Some("x".to_string()),
            priority: Some(TaskPriority::High),
            assignee_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks");
        query.push_filters(&mut builder, Uuid::new_v4());

        let sql = builder.sql();
        assert!(sql.contains("WHERE project_id = $1"));
        assert!(sql.contains("title ILIKE $2 OR status::text ILIKE $3"));
        assert!(sql.contains("priority = $4"));
        assert!(sql.contains("assignee_id = $5"));
        assert!(!sql.contains("status = $"));
    }
}
