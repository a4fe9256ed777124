/// Project model and lifecycle inputs
///
/// A project groups tasks and carries a member set that controls who may
/// see it. The creator is recorded immutably and is always part of the
/// member set.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM (
///     'planning', 'active', 'on_hold', 'completed', 'cancelled'
/// );
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     description VARCHAR(1000),
///     status project_status NOT NULL DEFAULT 'planning',
///     progress INTEGER NOT NULL DEFAULT 0 CHECK (progress BETWEEN 0 AND 100),
///     members UUID[] NOT NULL DEFAULT '{}',
///     due_date TIMESTAMPTZ,
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```
/// use taskhub_shared::models::project::{CreateProject, Project, ProjectStatus};
/// use uuid::Uuid;
///
/// let creator = Uuid::new_v4();
/// let teammate = Uuid::new_v4();
///
/// let project = Project::new(
///     CreateProject {
///         name: "Q3 roadmap".to_string(),
///         description: Some("Planning board".to_string()),
///         status: ProjectStatus::Planning,
///         due_date: None,
///         members: vec![teammate, teammate, creator],
///     },
///     creator,
/// );
///
/// // members are deduplicated and always include the creator
/// assert_eq!(project.members, vec![creator, teammate]);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Maximum length of a project name
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length of a project description
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Being scoped, default for new projects
    Planning,

    /// Actively worked on
    Active,

    /// Paused
    OnHold,

    /// Finished
    Completed,

    /// Abandoned
    Cancelled,
}

impl ProjectStatus {
    /// All statuses in declaration order
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::Active,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name (1-100 characters)
    pub name: String,

    /// Optional description (up to 1000 characters)
    pub description: Option<String>,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// Completion percentage, 0-100
    pub progress: i32,

    /// Users who may view the project; always contains the creator
    pub members: Vec<Uuid>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// User who created the project; immutable after creation
    pub created_by: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProject {
    /// Project name
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// Initial status (defaults to planning)
    #[serde(default = "default_status")]
    pub status: ProjectStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Initial members; the creator is added and duplicates are dropped
    #[serde(default)]
    pub members: Vec<Uuid>,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Planning
}

/// Input for updating an existing project
///
/// Absent fields are left unchanged. `description` and `due_date` accept an
/// explicit `null` to clear the stored value. The id, creation timestamp,
/// and creator are never patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description; explicit `null` clears it
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<ProjectStatus>,

    /// New progress (0-100)
    pub progress: Option<i32>,

    /// New due date; explicit `null` clears it
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// Replacement member set; normalized to keep the creator present
    pub members: Option<Vec<Uuid>>,
}

/// Filters for listing projects
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Keep only projects with this status
    pub status: Option<ProjectStatus>,

    /// Case-insensitive substring match against name or description
    pub search: Option<String>,
}

impl Project {
    /// Creates a new project owned by `created_by`.
    ///
    /// The member set is normalized so the creator is always present and
    /// duplicates are dropped; progress starts at zero.
    pub fn new(input: CreateProject, created_by: Uuid) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            status: input.status,
            progress: 0,
            members: Self::normalize_members(created_by, input.members),
            due_date: input.due_date,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Deduplicates a member list and guarantees the creator is in it.
    ///
    /// The creator comes first; remaining members keep their input order.
    pub fn normalize_members(created_by: Uuid, members: Vec<Uuid>) -> Vec<Uuid> {
        let mut normalized = vec![created_by];
        for member in members {
            if !normalized.contains(&member) {
                normalized.push(member);
            }
        }
        normalized
    }

    /// Checks whether a user is in the member set
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }

    /// Applies a patch in place and bumps `updated_at`.
    ///
    /// Used by stores that hold whole entities; the SQL store applies the
    /// same semantics column by column.
    pub fn apply(&mut self, patch: UpdateProject) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(members) = patch.members {
            self.members = members;
        }
        self.updated_at = Utc::now();
    }
}
