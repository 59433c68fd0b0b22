// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authentication.
//!
//! An [`IdentityProvider`] turns the bearer credential on a request into a
//! [`CurrentUser`]; handlers see the outcome as an [`AuthContext`].
//!
//! ```text
//! Request → Authorization: Bearer bl_… → IdentityProvider → AuthContext
//! ```
//!
//! Token values are never logged.

use async_trait::async_trait;
use bugline_common_core::{User, UserId};
use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::instrument;

/// Error raised by an identity provider backend.
#[derive(Debug, thiserror::Error)]
#[error("identity lookup failed: {0}")]
pub struct IdentityError(pub String);

/// Resolves an opaque bearer credential to the user it belongs to.
///
/// Returns `Ok(None)` for unknown or revoked credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	async fn authenticate(&self, token: &str) -> Result<Option<User>, IdentityError>;
}

/// The user a request was authenticated as.
#[derive(Debug, Clone)]
pub struct CurrentUser {
	pub user: User,
}

impl CurrentUser {
	pub fn new(user: User) -> Self {
		Self { user }
	}

	pub fn id(&self) -> UserId {
		self.user.id
	}
}

/// Who, if anyone, a request is authenticated as.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	pub fn unauthenticated() -> Self {
		Self { current_user: None }
	}

	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			current_user: Some(current_user),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.current_user.is_some()
	}

	/// The authenticated user, or [`AuthRequired`].
	pub fn require_user(&self) -> Result<&CurrentUser, AuthRequired> {
		self.current_user.as_ref().ok_or(AuthRequired)
	}
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("authentication required")]
pub struct AuthRequired;

/// The credential from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Any other scheme, an empty token
/// or a non-UTF-8 header yields `None`.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let (scheme, credential) = value.trim().split_once(' ')?;
	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}
	let credential = credential.trim();
	(!credential.is_empty()).then(|| credential.to_string())
}

/// Resolve the request headers to an [`AuthContext`].
pub async fn authenticate_headers(
	provider: &dyn IdentityProvider,
	headers: &HeaderMap,
) -> Result<AuthContext, IdentityError> {
	let Some(token) = extract_bearer_token(headers) else {
		return Ok(AuthContext::unauthenticated());
	};

	match provider.authenticate(&token).await? {
		Some(user) => {
			tracing::trace!(user_id = %user.id, "bearer token resolved");
			Ok(AuthContext::authenticated(CurrentUser::new(user)))
		}
		None => {
			tracing::debug!("bearer token did not resolve to a user");
			Ok(AuthContext::unauthenticated())
		}
	}
}
