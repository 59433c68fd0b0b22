// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer-token authentication for handlers.
//!
//! [`DbIdentityProvider`] resolves opaque access tokens against the
//! `access_tokens` table. [`RequireAuth`] rejects requests that carry no
//! resolvable credential with `401`.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use bugline_common_core::User;
use bugline_server_auth::{
	authenticate_headers, hash_token, is_access_token, CurrentUser, IdentityError, IdentityProvider,
};
use bugline_server_db::{UserRepository, UserStore};

use crate::{api::AppState, error::ServerError};

/// Identity provider backed by hashed access tokens in SQLite.
#[derive(Clone)]
pub struct DbIdentityProvider {
	users: UserRepository,
}

impl DbIdentityProvider {
	pub fn new(users: UserRepository) -> Self {
		Self { users }
	}
}

#[async_trait]
impl IdentityProvider for DbIdentityProvider {
	async fn authenticate(&self, token: &str) -> Result<Option<User>, IdentityError> {
		if !is_access_token(token) {
			return Ok(None);
		}
		self
			.users
			.get_user_by_token_hash(&hash_token(token))
			.await
			.map_err(|e| IdentityError(e.to_string()))
	}
}

/// Extractor that requires an authenticated caller.
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let ctx = authenticate_headers(state.identity.as_ref(), &parts.headers)
			.await
			.map_err(|e| ServerError::Internal(format!("identity lookup failed: {e}")))?;

		match ctx.current_user {
			Some(current_user) => Ok(RequireAuth(current_user)),
			None => Err(ServerError::NotAuthenticated),
		}
	}
}
