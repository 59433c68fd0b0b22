// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bug and assignment HTTP handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use bugline_common_core::{Bug, BugId, BugPatch, ProjectId};
use bugline_server_api::{AssigneesRequest, CreateBugRequest, ErrorResponse};

use crate::{
	api::AppState,
	auth_middleware::RequireAuth,
	error::ServerError,
	extract::ApiJson,
	store::CreateBug,
	validation::{parse_id, validate_user_ids},
};

#[utoipa::path(
    get,
    path = "/projects/{id}/bugs",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Bugs, newest first", body = Vec<Bug>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// GET /projects/{id}/bugs
pub async fn list_bugs(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
) -> Result<Json<Vec<Bug>>, ServerError> {
	let project_id: ProjectId = parse_id(&project_id)?;
	Ok(Json(state.store.list_bugs(current_user.id(), project_id).await?))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/bugs",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = CreateBugRequest,
    responses(
        (status = 201, description = "Bug filed", body = Bug),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// POST /projects/{id}/bugs
pub async fn create_bug(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
	ApiJson(payload): ApiJson<CreateBugRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let project_id: ProjectId = parse_id(&project_id)?;
	let input = CreateBug {
		title: payload.title,
		description: payload.description,
		status: payload.status,
		priority: payload.priority,
	};
	let bug = state
		.store
		.create_bug(current_user.id(), project_id, input)
		.await?;
	Ok((StatusCode::CREATED, Json(bug)))
}

#[utoipa::path(
    get,
    path = "/bugs/{id}",
    params(("id" = i64, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Bug", body = Bug),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// GET /bugs/{id}
pub async fn get_bug(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Bug>, ServerError> {
	let id: BugId = parse_id(&id)?;
	Ok(Json(state.store.get_bug(current_user.id(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/bugs/{id}",
    params(("id" = i64, Path, description = "Bug ID")),
    request_body = BugPatch,
    responses(
        (status = 200, description = "Updated bug", body = Bug),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not author, assignee or admin", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// PUT|PATCH /bugs/{id} - Sparse update; absent fields are untouched.
pub async fn update_bug(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	ApiJson(patch): ApiJson<BugPatch>,
) -> Result<Json<Bug>, ServerError> {
	let id: BugId = parse_id(&id)?;
	Ok(Json(state.store.update_bug(current_user.id(), id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/bugs/{id}",
    params(("id" = i64, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Deleted bug", body = Bug),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not author, assignee or admin", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// DELETE /bugs/{id}
pub async fn delete_bug(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Bug>, ServerError> {
	let id: BugId = parse_id(&id)?;
	Ok(Json(state.store.delete_bug(current_user.id(), id).await?))
}

#[utoipa::path(
    post,
    path = "/bugs/{id}/assignees",
    params(("id" = i64, Path, description = "Bug ID")),
    request_body = AssigneesRequest,
    responses(
        (status = 200, description = "Bug with new assignees", body = Bug),
        (status = 400, description = "Invalid, duplicate, non-member or already assigned users", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// POST /bugs/{id}/assignees
pub async fn assign_users(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	ApiJson(payload): ApiJson<AssigneesRequest>,
) -> Result<Json<Bug>, ServerError> {
	let id: BugId = parse_id(&id)?;
	let user_ids = validate_user_ids(payload.user_ids.as_deref())?;
	Ok(Json(
		state.store.assign_users(current_user.id(), id, &user_ids).await?,
	))
}

#[utoipa::path(
    delete,
    path = "/bugs/{id}/assignees",
    params(("id" = i64, Path, description = "Bug ID")),
    request_body = AssigneesRequest,
    responses(
        (status = 200, description = "Bug without the given assignees", body = Bug),
        (status = 400, description = "Invalid ids or user not assigned", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// DELETE /bugs/{id}/assignees
pub async fn unassign_users(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	ApiJson(payload): ApiJson<AssigneesRequest>,
) -> Result<Json<Bug>, ServerError> {
	let id: BugId = parse_id(&id)?;
	let user_ids = validate_user_ids(payload.user_ids.as_deref())?;
	Ok(Json(
		state.store.unassign_users(current_user.id(), id, &user_ids).await?,
	))
}

#[utoipa::path(
    delete,
    path = "/bugs/{id}/assignees/all",
    params(("id" = i64, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Bug with no assignees", body = Bug),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "bugs"
)]
/// DELETE /bugs/{id}/assignees/all
pub async fn unassign_all(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Bug>, ServerError> {
	let id: BugId = parse_id(&id)?;
	Ok(Json(state.store.unassign_all(current_user.id(), id).await?))
}
