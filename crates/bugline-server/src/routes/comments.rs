// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Comment HTTP handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use bugline_common_core::{BugId, Comment, CommentId, CommentPatch};
use bugline_server_api::{CreateCommentRequest, ErrorResponse};

use crate::{
	api::AppState, auth_middleware::RequireAuth, error::ServerError, extract::ApiJson,
	validation::parse_id,
};

#[utoipa::path(
    get,
    path = "/bugs/{id}/comments",
    params(("id" = i64, Path, description = "Bug ID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<Comment>),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "comments"
)]
/// GET /bugs/{id}/comments
pub async fn list_comments(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(bug_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ServerError> {
	let bug_id: BugId = parse_id(&bug_id)?;
	Ok(Json(state.store.list_comments(current_user.id(), bug_id).await?))
}

#[utoipa::path(
    post,
    path = "/bugs/{id}/comments",
    params(("id" = i64, Path, description = "Bug ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment posted", body = Comment),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    tag = "comments"
)]
/// POST /bugs/{id}/comments
pub async fn create_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(bug_id): Path<String>,
	ApiJson(payload): ApiJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let bug_id: BugId = parse_id(&bug_id)?;
	let comment = state
		.store
		.create_comment(current_user.id(), bug_id, payload.content.as_deref())
		.await?;
	Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    get,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    tag = "comments"
)]
/// GET /comments/{id}
pub async fn get_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Comment>, ServerError> {
	let id: CommentId = parse_id(&id)?;
	Ok(Json(state.store.get_comment(current_user.id(), id).await?))
}

#[utoipa::path(
    put,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = CommentPatch,
    responses(
        (status = 200, description = "Edited comment", body = Comment),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Only the author may edit", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    tag = "comments"
)]
/// PUT|PATCH /comments/{id}
pub async fn update_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	ApiJson(patch): ApiJson<CommentPatch>,
) -> Result<Json<Comment>, ServerError> {
	let id: CommentId = parse_id(&id)?;
	Ok(Json(
		state.store.update_comment(current_user.id(), id, patch).await?,
	))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Deleted comment", body = Comment),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Only the author may delete", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    tag = "comments"
)]
/// DELETE /comments/{id}
pub async fn delete_comment(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Comment>, ServerError> {
	let id: CommentId = parse_id(&id)?;
	Ok(Json(state.store.delete_comment(current_user.id(), id).await?))
}
