// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project HTTP handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use bugline_common_core::{Project, ProjectId, ProjectPatch};
use bugline_server_api::{CreateProjectRequest, ErrorResponse};

use crate::{
	api::AppState, auth_middleware::RequireAuth, error::ServerError, extract::ApiJson,
	validation::parse_id,
};

#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "Projects the caller belongs to", body = Vec<Project>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "projects"
)]
/// GET /projects
pub async fn list_projects(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, ServerError> {
	Ok(Json(state.store.list_projects(current_user.id()).await?))
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created; caller is its admin", body = Project),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "projects"
)]
/// POST /projects
pub async fn create_project(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let project = state
		.store
		.create_project(
			current_user.id(),
			payload.name.as_deref(),
			payload.description.as_deref(),
		)
		.await?;
	Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "projects"
)]
/// GET /projects/{id}
pub async fn get_project(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Project>, ServerError> {
	let id: ProjectId = parse_id(&id)?;
	Ok(Json(state.store.get_project(current_user.id(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/projects/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = ProjectPatch,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "projects"
)]
/// PUT|PATCH /projects/{id} - Sparse update; absent fields are untouched.
pub async fn update_project(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	ApiJson(patch): ApiJson<ProjectPatch>,
) -> Result<Json<Project>, ServerError> {
	let id: ProjectId = parse_id(&id)?;
	Ok(Json(
		state.store.update_project(current_user.id(), id, patch).await?,
	))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Deleted project", body = Project),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Only the creating admin may delete", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "projects"
)]
/// DELETE /projects/{id}
pub async fn delete_project(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Project>, ServerError> {
	let id: ProjectId = parse_id(&id)?;
	Ok(Json(state.store.delete_project(current_user.id(), id).await?))
}
