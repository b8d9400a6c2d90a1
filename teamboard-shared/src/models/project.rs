/// Project model and database operations
///
/// A project is the unit of access control: tasks, comments and the team
/// roster all hang off exactly one project, and every permission check
/// resolves to the actor's membership on that project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('active', 'completed', 'on-hold');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     description TEXT,
///     status project_status NOT NULL DEFAULT 'active',
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Ownership
///
/// `owner_id` is a denormalized pointer to the creator. The canonical record
/// is the `owner` membership row, which [`Project::create_with_owner`] inserts
/// in the same transaction as the project.
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::models::project::{CreateProject, Project, ProjectStatus};
/// use teamboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create_with_owner(&pool, CreateProject {
///     name: "Website relaunch".to_string(),
///     description: None,
///     status: ProjectStatus::Active,
///     owner_id: Uuid::new_v4(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::cmp::Ordering;
use uuid::Uuid;

use super::membership::MembershipRole;
use crate::pagination::{like_pattern, matches_search, PageRequest, SortOrder};

/// Project lifecycle status
///
/// Declaration order is the sort order (matches the database enum).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "project_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// User who created the project
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,

    /// Creator, who also receives the `owner` membership
    pub owner_id: Uuid,
}

/// Input for updating an existing project
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    pub status: Option<ProjectStatus>,
}

impl UpdateProject {
    /// Applies the update to an in-memory copy
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}

/// Columns a project listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Status,
}

impl ProjectSortField {
    fn sql_column(&self) -> &'static str {
        match self {
            ProjectSortField::CreatedAt => "p.created_at",
            ProjectSortField::UpdatedAt => "p.updated_at",
            ProjectSortField::Name => "LOWER(p.name)",
            ProjectSortField::Status => "p.status",
        }
    }
}

/// Search, filter, sort and page parameters for listing projects
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    /// Case-insensitive substring of the project name
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub sort_by: ProjectSortField,
    pub sort_order: SortOrder,
    pub page: PageRequest,
}

impl ProjectQuery {
    /// Returns true if `project` passes the search and filters
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(status) = self.status {
            if project.status != status {
                return false;
            }
        }
        match &self.search {
            Some(term) => matches_search(&project.name, term),
            None => true,
        }
    }

    /// Total order used for listing; ties fall back to creation time then id
    pub fn compare(&self, a: &Project, b: &Project) -> Ordering {
        let primary = match self.sort_by {
            ProjectSortField::CreatedAt => Ordering::Equal,
            ProjectSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            ProjectSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            ProjectSortField::Status => a.status.cmp(&b.status),
        };

        self.sort_order.apply(
            primary
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id)),
        )
    }

    /// Appends the `WHERE` clause and its bind values
    fn push_filters(&self, builder: &mut QueryBuilder<'_, Postgres>, user_id: Uuid) {
        builder
            .push(" WHERE (p.owner_id = ")
            .push_bind(user_id)
            .push(" OR EXISTS (SELECT 1 FROM memberships m WHERE m.project_id = p.id AND m.user_id = ")
            .push_bind(user_id)
            .push("))");

        if let Some(term) = &self.search {
            builder.push(" AND p.name ILIKE ").push_bind(like_pattern(term));
        }
        if let Some(status) = self.status {
            builder.push(" AND p.status = ").push_bind(status);
        }
    }

    fn order_clause(&self) -> String {
        let dir = self.sort_order.as_sql();
        match self.sort_by {
            ProjectSortField::CreatedAt => format!("ORDER BY p.created_at {dir}, p.id {dir}"),
            field => format!(
                "ORDER BY {} {dir}, p.created_at {dir}, p.id {dir}",
                field.sql_column()
            ),
        }
    }
}

const PROJECT_COLUMNS: &str =
    "p.id, p.name, p.description, p.status, p.owner_id, p.created_at, p.updated_at";

impl Project {
    /// Creates a project together with its owner membership
    ///
    /// Both rows are written in a single transaction, so a project is never
    /// visible without its owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner doesn't exist (foreign key violation)
    /// or the database connection fails.
    pub async fn create_with_owner(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, status, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.status)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO memberships (project_id, user_id, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(MembershipRole::Owner)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, status, owner_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Updates an existing project
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at` timestamp
    /// is automatically set to the current time.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, status, owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project and everything scoped to it
    ///
    /// Comments, tasks and memberships are removed in the same transaction
    /// as the project row. Returns false if the project didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM comments
            WHERE task_id IN (SELECT id FROM tasks WHERE project_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM memberships WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists projects the user owns or is a member of
    ///
    /// Returns the requested page and the total number of matching projects.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        query: &ProjectQuery,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects p");
        query.push_filters(&mut count, user_id);
        let (total,) = count.build_query_as::<(i64,)>().fetch_one(pool).await?;

        let mut list = QueryBuilder::<Postgres>::new(format!("SELECT {PROJECT_COLUMNS} FROM projects p"));
        query.push_filters(&mut list, user_id);
        list.push(" ")
            .push(query.order_clause())
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit()))
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);
        let projects = list.build_query_as::<Project>().fetch_all(pool).await?;

        Ok((projects, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn project(name: &str, status: ProjectStatus, age_minutes: i64) -> Project {
        let created = Utc::now() - Duration::minutes(age_minutes);
        Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            status,
            owner_id: Uuid::new_v4(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&ProjectStatus::OnHold).unwrap(), "\"on-hold\"");
        let status: ProjectStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, ProjectStatus::Completed);
        assert!(serde_json::from_str::<ProjectStatus>("\"archived\"").is_err());
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let json = serde_json::to_value(project("Alpha", ProjectStatus::Active, 0)).unwrap();
        assert!(json.get("ownerId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_update_apply_clears_description() {
        let mut p = project("Alpha", ProjectStatus::Active, 0);
        p.description = Some("old".to_string());

        UpdateProject {
            description: Some(None),
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        }
        .apply(&mut p);

        assert_eq!(p.description, None);
        assert_eq!(p.status, ProjectStatus::OnHold);
        assert_eq!(p.name, "Alpha");
    }

    #[test]
    fn test_query_matches() {
        let query = ProjectQuery {
            search: Some("ALP".to_string()),
            status: Some(ProjectStatus::Active),
            ..Default::default()
        };

        assert!(query.matches(&project("Project Alpha", ProjectStatus::Active, 0)));
        assert!(!query.matches(&project("Project Alpha", ProjectStatus::Completed, 0)));
        assert!(!query.matches(&project("Beta", ProjectStatus::Active, 0)));
    }

    #[test]
    fn test_default_order_is_newest_first() {
        let query = ProjectQuery::default();
        let old = project("old", ProjectStatus::Active, 10);
        let new = project("new", ProjectStatus::Active, 1);

        assert_eq!(query.compare(&new, &old), Ordering::Less);
    }

    #[test]
    fn test_sort_by_name_is_case_insensitive() {
        let query = ProjectQuery {
            sort_by: ProjectSortField::Name,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let a = project("alpha", ProjectStatus::Active, 0);
        let b = project("Beta", ProjectStatus::Active, 0);

        assert_eq!(query.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_filters_number_placeholders_in_order() {
        let query = ProjectQuery {
            search: Some("x".to_string()),
            status: Some(ProjectStatus::Active),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects p");
        query.push_filters(&mut builder, Uuid::new_v4());
        let sql = builder.sql();
        assert!(sql.contains("p.owner_id = $1"));
        assert!(sql.contains("m.user_id = $2"));
        assert!(sql.contains("p.name ILIKE $3"));
        assert!(sql.contains("p.status = $4"));

        let query = ProjectQuery {
            status: Some(ProjectStatus::Active),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects p");
        query.push_filters(&mut builder, Uuid::new_v4());
        assert!(builder.sql().contains("p.status = $3"));
    }

    #[test]
    fn test_sort_field_wire_format() {
        let field: ProjectSortField = serde_json::from_str("\"updatedAt\"").unwrap();
        assert_eq!(field, ProjectSortField::UpdatedAt);
        assert!(serde_json::from_str::<ProjectSortField>("\"ownerId\"").is_err());
    }
}
