/// Project endpoints
///
/// Thin adapters over the project lifecycle service; every authorization
/// decision lives in the service, handlers only shape requests and
/// responses.
///
/// # Endpoints
///
/// - `GET    /v1/projects` - list visible projects (paginated)
/// - `POST   /v1/projects` - create a project
/// - `GET    /v1/projects/:id` - fetch one project
/// - `PUT    /v1/projects/:id` - patch a project
/// - `DELETE /v1/projects/:id` - delete a project (creator only)
/// - `POST   /v1/projects/:id/members` - add a member (creator only)
/// - `DELETE /v1/projects/:id/members/:user_id` - remove a member (creator only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskhub_shared::auth::policy::Actor;
use taskhub_shared::models::project::{CreateProject, Project, ProjectFilter, ProjectStatus, UpdateProject};
use taskhub_shared::page::Page;
use uuid::Uuid;
use validator::Validate;

use crate::{app::AppState, error::ApiResult};

/// Query parameters for listing projects
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    /// 1-based page number (default 1)
    pub page: Option<u32>,

    /// Page size (default 10, capped)
    pub limit: Option<u32>,

    /// Keep only projects with this status
    pub status: Option<ProjectStatus>,

    /// Case-insensitive substring match on name/description
    pub search: Option<String>,
}

/// Body for adding a project member
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,
}

/// List projects visible to the caller
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<Page<Project>>> {
    let filter = ProjectFilter {
        status: query.status,
        search: query.search,
    };

    let page = state
        .projects
        .list(&actor, filter, query.page, query.limit)
        .await?;

    Ok(Json(page))
}

/// Create a project owned by the caller
pub async fn create_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = state.projects.create(&actor, req).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Fetch one project the caller may view
pub async fn get_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.get(&actor, id).await?;

    Ok(Json(project))
}

/// Patch a project the caller may mutate
pub async fn update_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateProject>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.update(&actor, id, patch).await?;

    Ok(Json(project))
}

/// Delete a project the caller created
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.projects.delete(&actor, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add a member to a project the caller created
pub async fn add_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.add_member(&actor, id, req.user_id).await?;

    Ok(Json(project))
}

/// Remove a member from a project the caller created
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.remove_member(&actor, id, user_id).await?;

    Ok(Json(project))
}
