/// Project lifecycle service
///
/// Create/read/update/delete for projects plus membership management,
/// gated by the access policy:
///
/// - reads are scoped to creator-or-member; everything else sees
///   not-found, never a hint that the project exists
/// - updates require the creator or the admin role and report forbidden,
///   because the visibility check already ran
/// - deletion and membership changes are creator-only and report
///   not-found for everyone else
/// - the creator is always a member: enforced at creation, re-enforced on
///   member-set patches, and removal of the creator is rejected
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskhub_shared::auth::policy::Actor;
/// use taskhub_shared::models::project::{CreateProject, ProjectStatus};
/// use taskhub_shared::models::user::Role;
/// use taskhub_shared::services::projects::ProjectService;
/// use taskhub_shared::store::memory::InMemoryStore;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = ProjectService::new(Arc::new(InMemoryStore::new()));
/// let actor = Actor::new(Uuid::new_v4(), vec![Role::Member]);
///
/// let project = service
///     .create(&actor, CreateProject {
///         name: "Alpha".to_string(),
///         description: None,
///         status: ProjectStatus::Planning,
///         due_date: None,
///         members: vec![],
///     })
///     .await?;
///
/// assert_eq!(project.members, vec![actor.id]);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::policy::{self, Actor};
use crate::error::{CoreError, CoreResult};
use crate::models::project::{
    CreateProject, Project, ProjectFilter, UpdateProject, DESCRIPTION_MAX_LEN, NAME_MAX_LEN,
};
use crate::page::{Page, PageParams, DEFAULT_PROJECT_PAGE_SIZE};
use crate::store::Store;

/// Project lifecycle manager over a dependency-injected store
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    /// Creates a service bound to a store handle
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a project owned by the actor.
    ///
    /// The actor becomes the creator and is folded into the member set;
    /// progress starts at zero.
    pub async fn create(&self, actor: &Actor, input: CreateProject) -> CoreResult<Project> {
        validate_name(&input.name)?;
        validate_description(input.description.as_deref())?;

        let project = Project::new(input, actor.id);
        self.store.insert_project(&project).await?;

        tracing::info!(project_id = %project.id, created_by = %actor.id, "project created");

        Ok(project)
    }

    /// Fetches a project the actor may view.
    ///
    /// Absent and invisible projects are indistinguishable: both report
    /// not-found.
    pub async fn get(&self, actor: &Actor, id: Uuid) -> CoreResult<Project> {
        self.store
            .find_project(id)
            .await?
            .filter(|project| policy::can_view_project(actor, project))
            .ok_or(CoreError::NotFound("project"))
    }

    /// Lists projects visible to the actor, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: ProjectFilter,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> CoreResult<Page<Project>> {
        let params = PageParams::new(page, limit, DEFAULT_PROJECT_PAGE_SIZE);
        let (items, total) = self.store.list_projects(actor.id, &filter, params).await?;

        Ok(Page::new(items, total, params))
    }

    /// Applies a patch to a project the actor may mutate.
    ///
    /// Identity fields (id, creation time, creator) are not patchable by
    /// construction. A member-set patch is normalized so the creator stays
    /// in it.
    pub async fn update(&self, actor: &Actor, id: Uuid, mut patch: UpdateProject) -> CoreResult<Project> {
        let project = self.get(actor, id).await?;

        if !policy::can_mutate_project(actor, &project) {
            return Err(CoreError::Forbidden("not allowed to modify this project"));
        }

        if let Some(name) = patch.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(description) = &patch.description {
            validate_description(description.as_deref())?;
        }
        if let Some(progress) = patch.progress {
            if !(0..=100).contains(&progress) {
                return Err(CoreError::validation("progress", "must be between 0 and 100"));
            }
        }
        if let Some(members) = patch.members.take() {
            patch.members = Some(Project::normalize_members(project.created_by, members));
        }

        self.store
            .update_project(id, patch)
            .await?
            .ok_or(CoreError::NotFound("project"))
    }

    /// Deletes a project.
    ///
    /// Creator-only; members and admins get the same not-found answer as
    /// outsiders rather than a forbidden that confirms existence.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> CoreResult<()> {
        let project = self
            .store
            .find_project(id)
            .await?
            .filter(|project| policy::can_delete_project(actor, project))
            .ok_or(CoreError::NotFound("project"))?;

        self.store.delete_project(project.id).await?;

        tracing::info!(project_id = %project.id, deleted_by = %actor.id, "project deleted");

        Ok(())
    }

    /// Adds a user to the member set. Creator-only.
    pub async fn add_member(&self, actor: &Actor, id: Uuid, user_id: Uuid) -> CoreResult<Project> {
        let project = self.owned_by(actor, id).await?;

        if project.is_member(user_id) {
            return Err(CoreError::Conflict("user is already a project member".to_string()));
        }

        let mut members = project.members.clone();
        members.push(user_id);

        self.apply_members(id, members).await
    }

    /// Removes a user from the member set. Creator-only; removing the
    /// creator is rejected and leaves the project untouched.
    pub async fn remove_member(&self, actor: &Actor, id: Uuid, user_id: Uuid) -> CoreResult<Project> {
        let project = self.owned_by(actor, id).await?;

        if user_id == project.created_by {
            return Err(CoreError::validation("user_id", "project creator cannot be removed"));
        }

        let members = project
            .members
            .iter()
            .copied()
            .filter(|member| *member != user_id)
            .collect();

        self.apply_members(id, members).await
    }

    /// Fetches a project only when the actor created it
    async fn owned_by(&self, actor: &Actor, id: Uuid) -> CoreResult<Project> {
        self.store
            .find_project(id)
            .await?
            .filter(|project| project.created_by == actor.id)
            .ok_or(CoreError::NotFound("project"))
    }

    async fn apply_members(&self, id: Uuid, members: Vec<Uuid>) -> CoreResult<Project> {
        let patch = UpdateProject {
            members: Some(members),
            ..Default::default()
        };

        self.store
            .update_project(id, patch)
            .await?
            .ok_or(CoreError::NotFound("project"))
    }
}

fn validate_name(name: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name", "must not be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(CoreError::validation("name", "must be at most 100 characters"));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> CoreResult<()> {
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(CoreError::validation(
                "description",
                "must be at most 1000 characters",
            ));
        }
    }
    Ok(())
}
