/// Membership model and database operations
///
/// This module provides the Membership model for user-project relationships with RBAC.
/// It implements a many-to-many relationship between users and projects with role-based
/// access control.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE membership_role AS ENUM ('owner', 'admin', 'member');
///
/// CREATE TABLE memberships (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id),
///     role membership_role NOT NULL DEFAULT 'member',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
///     CONSTRAINT memberships_project_id_user_id_key UNIQUE (project_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: Full control, delete project
/// - **admin**: Manage team roster, update project
/// - **member**: Create and manage tasks and comments
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::models::membership::{Membership, CreateMembership, MembershipRole};
/// use teamboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project_id = Uuid::new_v4();
/// let user_id = Uuid::new_v4();
///
/// // Add a user to a project as an admin
/// let membership = Membership::create(&pool, CreateMembership {
///     project_id,
///     user_id,
///     role: MembershipRole::Admin,
/// }).await?;
///
/// let found = Membership::find(&pool, project_id, user_id).await?;
/// assert_eq!(found.map(|m| m.id), Some(membership.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserProfile;

/// RBAC roles for project memberships
///
/// Declaration order matches the database enum and the privilege order
/// (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Full control: delete project, manage all members
    Owner,

    /// Can manage the team roster and update the project
    Admin,

    /// Can create and manage tasks and comments
    Member,
}

impl MembershipRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Owner => "owner",
            MembershipRole::Admin => "admin",
            MembershipRole::Member => "member",
        }
    }

    /// Checks if this role has permission level of the required role
    ///
    /// Hierarchy: Owner > Admin > Member
    pub fn has_permission(&self, required: &MembershipRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    /// Returns numeric permission level for comparison
    pub fn permission_level(&self) -> u8 {
        match self {
            MembershipRole::Owner => 3,
            MembershipRole::Admin => 2,
            MembershipRole::Member => 1,
        }
    }
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership model representing a user's role on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Membership ID
    pub id: Uuid,

    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: MembershipRole,

    /// When the user joined the project
    pub joined_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign (defaults to Member)
    #[serde(default = "default_role")]
    pub role: MembershipRole,
}

pub(crate) fn default_role() -> MembershipRole {
    MembershipRole::Member
}

/// A membership joined with the member's public profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Membership ID
    pub id: Uuid,

    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: MembershipRole,

    /// When the user joined the project
    pub joined_at: DateTime<Utc>,

    /// Member profile (no credentials)
    pub user: UserProfile,
}

impl TeamMember {
    /// Combines a membership row with the member's profile
    pub fn new(membership: Membership, user: UserProfile) -> Self {
        Self {
            id: membership.id,
            project_id: membership.project_id,
            user_id: membership.user_id,
            role: membership.role,
            joined_at: membership.joined_at,
            user,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TeamMemberRow {
    id: Uuid,
    project_id: Uuid,
    user_id: Uuid,
    role: MembershipRole,
    joined_at: DateTime<Utc>,
    username: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    user_created_at: DateTime<Utc>,
    user_updated_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            user_id: row.user_id,
            role: row.role,
            joined_at: row.joined_at,
            user: UserProfile {
                id: row.user_id,
                username: row.username,
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
                created_at: row.user_created_at,
                updated_at: row.user_updated_at,
            },
        }
    }
}

impl Membership {
    /// Creates a new membership (adds user to project)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Membership already exists (unique constraint violation)
    /// - Project or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, user_id, role, joined_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a membership by its ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, project_id, user_id, role, joined_at
            FROM memberships
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a specific membership by project and user
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use teamboard_shared::models::membership::Membership;
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, project_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// if let Some(membership) = Membership::find(&pool, project_id, user_id).await? {
    ///     println!("User role: {}", membership.role);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, project_id, user_id, role, joined_at
            FROM memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Deletes a membership (removes user from project)
    ///
    /// Returns true if the membership was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memberships WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of a project with their public profiles
    ///
    /// Ordered by join time, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT m.id, m.project_id, m.user_id, m.role, m.joined_at,
                   u.username, u.email, u.first_name, u.last_name,
                   u.created_at AS user_created_at, u.updated_at AS user_updated_at
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1
            ORDER BY m.joined_at ASC, m.id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TeamMember::from).collect())
    }
}
