// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration and identity endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bugline_common_core::User;
use bugline_server_api::{ErrorResponse, RegisterRequest, RegisterResponse};
use bugline_server_auth::generate_access_token;

use crate::{
	api::AppState,
	auth_middleware::RequireAuth,
	error::ServerError,
	extract::ApiJson,
	validation::{require_email, require_text},
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid name or email", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /auth/register - Create a user and issue their access token.
pub async fn register(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let name = require_text("Name", payload.name.as_deref())?;
	let email = require_email(payload.email.as_deref())?;

	let (token, token_hash) = generate_access_token();
	let user = state.user_repo.register(&name, &email, &token_hash).await?;

	tracing::info!(user_id = %user.id, "user registered");
	Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// GET /auth/me
pub async fn me(RequireAuth(current_user): RequireAuth) -> Json<User> {
	Json(current_user.user)
}
