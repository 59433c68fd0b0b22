// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project membership HTTP handlers. Targets are addressed by email.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use bugline_common_core::{Member, ProjectId};
use bugline_server_api::{AddMemberRequest, ChangeRoleRequest, ErrorResponse, RemoveMemberRequest};

use crate::{
	api::AppState, auth_middleware::RequireAuth, error::ServerError, extract::ApiJson,
	validation::parse_id,
};

#[utoipa::path(
    post,
    path = "/project-membership/add/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = Member),
        (status = 400, description = "Invalid email or role", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Project or user not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse)
    ),
    tag = "membership"
)]
/// POST /project-membership/add/{id}
pub async fn add_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
	ApiJson(payload): ApiJson<AddMemberRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let project_id: ProjectId = parse_id(&project_id)?;
	let member = state
		.store
		.add_member(
			current_user.id(),
			project_id,
			payload.email.as_deref(),
			payload.role.as_deref(),
		)
		.await?;
	Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    delete,
    path = "/project-membership/remove/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = RemoveMemberRequest,
    responses(
        (status = 200, description = "Member removed", body = Member),
        (status = 400, description = "Last admin or project creator", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Project, user or membership not found", body = ErrorResponse)
    ),
    tag = "membership"
)]
/// DELETE /project-membership/remove/{id}
pub async fn remove_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
	ApiJson(payload): ApiJson<RemoveMemberRequest>,
) -> Result<Json<Member>, ServerError> {
	let project_id: ProjectId = parse_id(&project_id)?;
	Ok(Json(
		state
			.store
			.remove_member(current_user.id(), project_id, payload.email.as_deref())
			.await?,
	))
}

#[utoipa::path(
    patch,
    path = "/project-membership/update-role/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = Member),
        (status = 400, description = "Invalid role, last admin or project creator", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Project, user or membership not found", body = ErrorResponse)
    ),
    tag = "membership"
)]
/// PATCH /project-membership/update-role/{id}
pub async fn change_role(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
	ApiJson(payload): ApiJson<ChangeRoleRequest>,
) -> Result<Json<Member>, ServerError> {
	let project_id: ProjectId = parse_id(&project_id)?;
	Ok(Json(
		state
			.store
			.change_role(
				current_user.id(),
				project_id,
				payload.email.as_deref(),
				payload.role.as_deref(),
			)
			.await?,
	))
}

#[utoipa::path(
    get,
    path = "/project-membership/members/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Members in join order", body = Vec<Member>),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "membership"
)]
/// GET /project-membership/members/{id}
pub async fn list_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
) -> Result<Json<Vec<Member>>, ServerError> {
	let project_id: ProjectId = parse_id(&project_id)?;
	Ok(Json(
		state.store.list_members(current_user.id(), project_id).await?,
	))
}
