/// Visibility and mutation policy for projects and tasks
///
/// Every predicate here is a pure function over the acting identity and
/// the entity it targets: no I/O, no failures. Callers decide how a
/// `false` answer surfaces: the read paths report not-found so outsiders
/// cannot probe for existence, while the project update path reports
/// forbidden because visibility was already established.
///
/// # Rules
///
/// | operation        | project                     | task                  |
/// |------------------|-----------------------------|-----------------------|
/// | view             | creator or member           | creator or assignee   |
/// | mutate           | creator or admin role       | creator or assignee   |
/// | delete           | creator only                | creator only          |
///
/// The admin role widens project mutation only. Task mutation deliberately
/// has no admin override, and deletion is creator-only for both entities.
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::policy::{can_view_project, Actor};
/// use taskhub_shared::models::project::{CreateProject, Project, ProjectStatus};
/// use taskhub_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let creator = Actor::new(Uuid::new_v4(), vec![Role::Member]);
/// let outsider = Actor::new(Uuid::new_v4(), vec![Role::Member]);
///
/// let project = Project::new(
///     CreateProject {
///         name: "Alpha".to_string(),
///         description: None,
///         status: ProjectStatus::Planning,
///         due_date: None,
///         members: vec![],
///     },
///     creator.id,
/// );
///
/// assert!(can_view_project(&creator, &project));
/// assert!(!can_view_project(&outsider, &project));
/// ```

use uuid::Uuid;

use crate::models::project::Project;
use crate::models::task::Task;
use crate::models::user::Role;

/// The authenticated identity performing an operation
///
/// Built by the HTTP layer from validated token claims and passed down
/// into every service call.
#[derive(Debug, Clone)]
pub struct Actor {
    /// User ID
    pub id: Uuid,

    /// Role set carried by the credential
    pub roles: Vec<Role>,
}

impl Actor {
    /// Creates an actor from an id and role set
    pub fn new(id: Uuid, roles: Vec<Role>) -> Self {
        Self { id, roles }
    }

    /// Checks whether the actor holds a role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Actor is the creator or a member of the project
pub fn can_view_project(actor: &Actor, project: &Project) -> bool {
    project.created_by == actor.id || project.is_member(actor.id)
}

/// Actor is the creator or holds the admin role
pub fn can_mutate_project(actor: &Actor, project: &Project) -> bool {
    project.created_by == actor.id || actor.has_role(Role::Admin)
}

/// Actor is the creator; the admin role does not override deletion
pub fn can_delete_project(actor: &Actor, project: &Project) -> bool {
    project.created_by == actor.id
}

/// Actor is the assignee or the creator of the task
pub fn can_view_task(actor: &Actor, task: &Task) -> bool {
    task.assignee_id == actor.id || task.created_by == actor.id
}

/// Same circle as visibility; no admin override for tasks
pub fn can_mutate_task(actor: &Actor, task: &Task) -> bool {
    can_view_task(actor, task)
}

/// Actor is the creator; assignees may not delete
pub fn can_delete_task(actor: &Actor, task: &Task) -> bool {
    task.created_by == actor.id
}
