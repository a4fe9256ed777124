/// Task endpoints
///
/// Thin adapters over the task lifecycle service.
///
/// # Endpoints
///
/// - `GET    /v1/tasks` - list visible tasks (paginated)
/// - `POST   /v1/tasks` - create a task
/// - `GET    /v1/tasks/stats` - status/priority counts over visible tasks
/// - `GET    /v1/tasks/:id` - fetch one task
/// - `PUT    /v1/tasks/:id` - patch a task
/// - `DELETE /v1/tasks/:id` - delete a task (creator only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskhub_shared::auth::policy::Actor;
use taskhub_shared::models::task::{
    CreateTask, Task, TaskFilter, TaskPriority, TaskStats, TaskStatus, UpdateTask,
};
use taskhub_shared::page::Page;
use uuid::Uuid;
use validator::Validate;

use crate::{app::AppState, error::ApiResult};

/// Query parameters for listing tasks
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// 1-based page number (default 1)
    pub page: Option<u32>,

    /// Page size (default 20, capped)
    pub limit: Option<u32>,

    /// Keep only tasks with this status
    pub status: Option<TaskStatus>,

    /// Keep only tasks with this priority
    pub priority: Option<TaskPriority>,

    /// Keep only tasks in this project
    pub project_id: Option<Uuid>,

    /// Case-insensitive substring match on title/description
    pub search: Option<String>,
}

/// List tasks visible to the caller
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Page<Task>>> {
    let filter = TaskFilter {
        status: query.status,
        priority: query.priority,
        project_id: query.project_id,
        search: query.search,
    };

    let page = state
        .tasks
        .list(&actor, filter, query.page, query.limit)
        .await?;

    Ok(Json(page))
}

/// Create a task recorded as created by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = state.tasks.create(&actor, req).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Status and priority counts over the caller's visible tasks
pub async fn task_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<TaskStats>> {
    let stats = state.tasks.stats(&actor).await?;

    Ok(Json(stats))
}

/// Fetch one task the caller may view
pub async fn get_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.get(&actor, id).await?;

    Ok(Json(task))
}

/// Patch a task the caller may mutate
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.update(&actor, id, patch).await?;

    Ok(Json(task))
}

/// Delete a task the caller created
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(&actor, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
