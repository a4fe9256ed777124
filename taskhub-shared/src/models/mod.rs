/// Domain models for TaskHub
///
/// This module contains the core entities and their input/patch types.
///
/// # Models
///
/// - `user`: User accounts, roles, and profile updates
/// - `project`: Projects with membership and progress tracking
/// - `task`: Tasks with status/priority, assignee, and tags
///
/// Entities carry plain `Uuid` references to related records (creator,
/// assignee, members); the persistence store owns canonical state and
/// in-memory values are transient projections of it.
///
/// # Example
///
/// ```
/// use taskhub_shared::models::project::{CreateProject, Project, ProjectStatus};
/// use uuid::Uuid;
///
/// let creator = Uuid::new_v4();
/// let project = Project::new(
///     CreateProject {
///         name: "Launch checklist".to_string(),
///         description: None,
///         status: ProjectStatus::Planning,
///         due_date: None,
///         members: vec![],
///     },
///     creator,
/// );
///
/// assert_eq!(project.progress, 0);
/// assert!(project.members.contains(&creator));
/// ```

pub mod project;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserializes a patch field that distinguishes "absent" from "explicit null".
///
/// Plain `Option<T>` cannot tell a missing key from a `null` value, so patch
/// types use `Option<Option<T>>` for clearable fields:
///
/// - key absent        → `None` (leave the field unchanged)
/// - key set to `null` → `Some(None)` (clear the field)
/// - key set to value  → `Some(Some(value))`
///
/// Use together with `#[serde(default)]` so absent keys fall back to `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
