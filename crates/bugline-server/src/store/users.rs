// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bugline_common_core::{User, UserId, UserPatch};
use bugline_server_db::{begin_write, user};

use super::ResourceStore;
use crate::error::ServerError;
use crate::validation::normalize_user_patch;

impl ResourceStore {
	/// Change the actor's own name or email.
	///
	/// Only the caller's own profile is reachable, so no decision is needed.
	#[tracing::instrument(skip(self, patch), fields(actor = %actor))]
	pub async fn update_profile(&self, actor: UserId, patch: UserPatch) -> Result<User, ServerError> {
		let patch = normalize_user_patch(patch)?;

		let mut tx = begin_write(&self.pool).await?;
		user::update_user(&mut tx, actor, &patch).await?;
		let updated = user::get_user(&mut tx, actor)
			.await?
			.ok_or_else(|| ServerError::NotFound(format!("User {actor} not found")))?;
		tx.commit().await?;

		tracing::info!(user_id = %actor, "profile updated");
		Ok(updated)
	}
}
