/// Task lifecycle service
///
/// Create/read/update/delete for tasks plus status/priority statistics,
/// gated by the access policy:
///
/// - reads and mutations are limited to the assignee and the creator;
///   no admin override exists for tasks
/// - deletion is creator-only and reports not-found for everyone else,
///   the assignee included
/// - only the whitelisted patch fields are ever copied from a patch;
///   description, project link, and due date clear on explicit null

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::policy::{self, Actor};
use crate::error::{CoreError, CoreResult};
use crate::models::task::{
    CreateTask, Task, TaskFilter, TaskStats, UpdateTask, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
};
use crate::page::{Page, PageParams, DEFAULT_TASK_PAGE_SIZE};
use crate::store::Store;

/// Task lifecycle manager over a dependency-injected store
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    /// Creates a service bound to a store handle
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a task recorded as created by the actor.
    ///
    /// The assignee is part of the typed input and therefore always
    /// present; status and priority carry their defaults when omitted.
    pub async fn create(&self, actor: &Actor, input: CreateTask) -> CoreResult<Task> {
        validate_title(&input.title)?;
        validate_description(input.description.as_deref())?;

        let task = Task::new(input, actor.id);
        self.store.insert_task(&task).await?;

        tracing::info!(
            task_id = %task.id,
            assignee_id = %task.assignee_id,
            created_by = %actor.id,
            "task created"
        );

        Ok(task)
    }

    /// Fetches a task the actor may view (assignee or creator).
    pub async fn get(&self, actor: &Actor, id: Uuid) -> CoreResult<Task> {
        self.store
            .find_task(id)
            .await?
            .filter(|task| policy::can_view_task(actor, task))
            .ok_or(CoreError::NotFound("task"))
    }

    /// Lists tasks visible to the actor, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: TaskFilter,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> CoreResult<Page<Task>> {
        let params = PageParams::new(page, limit, DEFAULT_TASK_PAGE_SIZE);
        let (items, total) = self.store.list_tasks(actor.id, &filter, params).await?;

        Ok(Page::new(items, total, params))
    }

    /// Applies a patch to a task the actor may mutate.
    pub async fn update(&self, actor: &Actor, id: Uuid, patch: UpdateTask) -> CoreResult<Task> {
        let task = self.get(actor, id).await?;

        if !policy::can_mutate_task(actor, &task) {
            return Err(CoreError::Forbidden("not allowed to modify this task"));
        }

        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(description) = &patch.description {
            validate_description(description.as_deref())?;
        }

        self.store
            .update_task(id, patch)
            .await?
            .ok_or(CoreError::NotFound("task"))
    }

    /// Deletes a task.
    ///
    /// Creator-only; the assignee gets the same not-found answer as an
    /// outsider rather than a forbidden that confirms existence.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> CoreResult<()> {
        let task = self
            .store
            .find_task(id)
            .await?
            .filter(|task| policy::can_delete_task(actor, task))
            .ok_or(CoreError::NotFound("task"))?;

        self.store.delete_task(task.id).await?;

        tracing::info!(task_id = %task.id, deleted_by = %actor.id, "task deleted");

        Ok(())
    }

    /// Counts the actor's visible tasks grouped by status and priority.
    pub async fn stats(&self, actor: &Actor) -> CoreResult<TaskStats> {
        Ok(self.store.task_stats(actor.id).await?)
    }
}

fn validate_title(title: &str) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::validation("title", "must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(CoreError::validation("title", "must be at most 200 characters"));
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
