// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, Json};
use bugline_common_core::{User, UserPatch};
use bugline_server_api::ErrorResponse;
use bugline_server_db::UserStore;

use crate::{
	api::AppState, auth_middleware::RequireAuth, error::ServerError, extract::ApiJson,
};

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All registered users", body = Vec<User>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "users"
)]
/// GET /users - Directory used to pick assignees and members.
pub async fn list_users(
	RequireAuth(_current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ServerError> {
	Ok(Json(state.user_repo.list_users().await?))
}

#[utoipa::path(
    put,
    path = "/users",
    request_body = UserPatch,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "users"
)]
/// PUT|PATCH /users - Change the caller's own name or email.
pub async fn update_me(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<User>, ServerError> {
	Ok(Json(
		state.store.update_profile(current_user.id(), patch).await?,
	))
}
