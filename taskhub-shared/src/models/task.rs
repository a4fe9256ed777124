/// Task model and lifecycle inputs
///
/// Tasks are the unit of work. Every task has a required assignee and an
/// immutable creator; those two identities define who may see and change
/// it. A task may optionally hang off a project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM (
///     'todo', 'in_progress', 'in_review', 'completed', 'cancelled'
/// );
///
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(1000),
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     assignee_id UUID NOT NULL REFERENCES users(id),
///     project_id UUID REFERENCES projects(id) ON DELETE SET NULL,
///     tags TEXT[] NOT NULL DEFAULT '{}',
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
/// use taskhub_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
/// use uuid::Uuid;
///
/// let creator = Uuid::new_v4();
/// let assignee = Uuid::new_v4();
///
/// let task = Task::new(
///     CreateTask {
///         title: "Fix login redirect".to_string(),
///         description: None,
///         status: TaskStatus::Todo,
///         priority: TaskPriority::High,
///         assignee_id: assignee,
///         project_id: None,
///         tags: vec!["bug".to_string()],
///         due_date: None,
///     },
///     creator,
/// );
///
/// assert_eq!(task.created_by, creator);
/// assert_eq!(task.assignee_id, assignee);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Maximum length of a task title
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum length of a task description
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started, default for new tasks
    Todo,

    /// Being worked on
    InProgress,

    /// Waiting on review
    InReview,

    /// Done
    Completed,

    /// Abandoned
    Cancelled,
}

impl TaskStatus {
    /// All statuses in declaration order
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::InReview => "in_review",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// All priorities in declaration order
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title (1-200 characters)
    pub title: String,

    /// Optional description (up to 1000 characters)
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// User responsible for the task; required
    pub assignee_id: Uuid,

    /// Optional owning project
    pub project_id: Option<Uuid>,

    /// Free-text labels
    pub tags: Vec<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// User who created the task; immutable after creation
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// Initial status (defaults to todo)
    #[serde(default = "default_status")]
    pub status: TaskStatus,

    /// Priority (defaults to medium)
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    /// User the task is assigned to
    pub assignee_id: Uuid,

    /// Optional owning project
    pub project_id: Option<Uuid>,

    /// Free-text labels
    #[serde(default)]
    pub tags: Vec<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Input for updating an existing task
///
/// Only these fields are patchable; absent fields stay unchanged.
/// `description`, `project_id`, and `due_date` accept explicit `null`
/// to clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description; explicit `null` clears it
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// Reassign the task
    pub assignee_id: Option<Uuid>,

    /// Move to another project; explicit `null` detaches it
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub project_id: Option<Option<Uuid>>,

    /// Replacement tag list
    pub tags: Option<Vec<String>>,

    /// New due date; explicit `null` clears it
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Filters for listing tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Keep only tasks with this status
    pub status: Option<TaskStatus>,

    /// Keep only tasks with this priority
    pub priority: Option<TaskPriority>,

    /// Keep only tasks in this project
    pub project_id: Option<Uuid>,

    /// Case-insensitive substring match against title or description
    pub search: Option<String>,
}

/// Number of tasks holding one status
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

/// Number of tasks holding one priority
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriorityCount {
    pub priority: TaskPriority,
    pub count: i64,
}

/// Aggregated task counts over a user's visible tasks
///
/// Groups with zero tasks are omitted; groups appear in enum declaration
/// order so the output is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStats {
    /// Counts grouped by status
    pub status_counts: Vec<StatusCount>,

    /// Counts grouped by priority
    pub priority_counts: Vec<PriorityCount>,
}

impl Task {
    /// Creates a new task recorded as created by `created_by`.
    pub fn new(input: CreateTask, created_by: Uuid) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            assignee_id: input.assignee_id,
            project_id: input.project_id,
            tags: input.tags,
            due_date: input.due_date,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: UpdateTask) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.assignee_id = assignee_id;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        self.updated_at = Utc::now();
    }
}
