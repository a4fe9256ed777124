/// Persistence interface for users, projects, and tasks
///
/// A single set of async traits describes everything the lifecycle
/// services need from durable storage. Two implementations exist:
///
/// - [`postgres::PgStore`]: production store over a sqlx connection pool
/// - [`memory::InMemoryStore`]: hashmap-backed twin with identical
///   observable semantics, used by the test suites and local development
///
/// Services receive the store as an explicitly constructed
/// `Arc<dyn Store>`; nothing in the crate reaches for a process-global
/// client.
///
/// Responsibility split: the services enforce every length/enum bound
/// before calling in here, while the store enforces uniqueness and
/// referential constraints and reports them as [`StoreError`]s.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::project::{Project, ProjectFilter, UpdateProject};
use crate::models::task::{Task, TaskFilter, TaskStats, UpdateTask};
use crate::models::user::{UpdateProfile, User};
use crate::page::PageParams;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated; names the offending field
    #[error("duplicate value for unique field {0}")]
    Duplicate(&'static str),

    /// Backend failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable storage for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new account; fails with `Duplicate` on a taken email
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Finds an account by ID
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Finds an account by email, case-insensitively
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Applies a profile patch and bumps `updated_at`; `None` if absent
    async fn update_user(&self, id: Uuid, patch: UpdateProfile) -> Result<Option<User>, StoreError>;
}

/// Durable storage for projects
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persists a new project
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError>;

    /// Finds a project by ID, with no visibility filtering
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Lists projects where `user_id` is the creator or a member.
    ///
    /// Filter predicates AND together on top of that scope; ordering is
    /// creation time descending with id ascending as the tie-break.
    /// Returns the window plus the total match count.
    async fn list_projects(
        &self,
        user_id: Uuid,
        filter: &ProjectFilter,
        page: PageParams,
    ) -> Result<(Vec<Project>, u64), StoreError>;

    /// Applies a patch field-by-field and bumps `updated_at`; `None` if absent
    async fn update_project(
        &self,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError>;

    /// Removes a project; `true` if a row was deleted
    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Durable storage for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new task
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError>;

    /// Finds a task by ID, with no visibility filtering
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Lists tasks where `user_id` is the assignee or the creator.
    ///
    /// Same filter/ordering contract as [`ProjectStore::list_projects`].
    async fn list_tasks(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        page: PageParams,
    ) -> Result<(Vec<Task>, u64), StoreError>;

    /// Applies a patch field-by-field and bumps `updated_at`; `None` if absent
    async fn update_task(&self, id: Uuid, patch: UpdateTask) -> Result<Option<Task>, StoreError>;

    /// Removes a task; `true` if a row was deleted
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Counts tasks grouped by status and priority over the
    /// assignee-or-creator scope of `user_id`
    async fn task_stats(&self, user_id: Uuid) -> Result<TaskStats, StoreError>;
}

/// The full persistence surface consumed by the services
#[async_trait]
pub trait Store: UserStore + ProjectStore + TaskStore {
    /// Cheap connectivity probe for health reporting
    async fn ping(&self) -> Result<(), StoreError>;
}
