// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bugline_common_core::{BugId, Comment, CommentId, CommentPatch, UserId};
use bugline_server_auth::{Action, ResourceAttrs};
use bugline_server_db::{begin_write, comment, SqliteConnection};

use super::bugs::authorize_on_bug;
use super::{authorize, subject_in, ResourceStore};
use crate::error::ServerError;
use crate::validation::{normalize_comment_patch, require_text};

async fn authorize_on_comment(
	conn: &mut SqliteConnection,
	actor: UserId,
	id: CommentId,
	action: Action,
) -> Result<Comment, ServerError> {
	let (found, project_id) = comment::get_comment_with_project(conn, id)
		.await?
		.ok_or_else(|| ServerError::NotFound(format!("Comment {id} not found")))?;
	let subject = subject_in(conn, project_id, actor).await?;
	authorize(&subject, action, &ResourceAttrs::comment(project_id, found.author_id))?;
	Ok(found)
}

async fn require_comment(conn: &mut SqliteConnection, id: CommentId) -> Result<Comment, ServerError> {
	comment::get_comment(conn, id)
		.await?
		.ok_or_else(|| ServerError::NotFound(format!("Comment {id} not found")))
}

impl ResourceStore {
	/// Comments on a bug, oldest first.
	#[tracing::instrument(skip(self), fields(actor = %actor, bug_id = %bug_id))]
	pub async fn list_comments(&self, actor: UserId, bug_id: BugId) -> Result<Vec<Comment>, ServerError> {
		let mut conn = self.pool.acquire().await?;
		authorize_on_bug(&mut conn, actor, bug_id, Action::Read).await?;
		Ok(comment::list_comments(&mut conn, bug_id).await?)
	}

	#[tracing::instrument(skip(self), fields(actor = %actor, comment_id = %id))]
	pub async fn get_comment(&self, actor: UserId, id: CommentId) -> Result<Comment, ServerError> {
		let mut conn = self.pool.acquire().await?;
		authorize_on_comment(&mut conn, actor, id, Action::Read).await
	}

	#[tracing::instrument(skip(self, content), fields(actor = %actor, bug_id = %bug_id))]
	pub async fn create_comment(
		&self,
		actor: UserId,
		bug_id: BugId,
		content: Option<&str>,
	) -> Result<Comment, ServerError> {
		let content = require_text("Content", content)?;

		let mut tx = begin_write(&self.pool).await?;
		authorize_on_bug(&mut tx, actor, bug_id, Action::CreateComment).await?;
		let created = comment::create_comment(&mut tx, bug_id, actor, &content).await?;
		tx.commit().await?;

		tracing::info!(comment_id = %created.id, "comment created");
		Ok(created)
	}

	#[tracing::instrument(skip(self, patch), fields(actor = %actor, comment_id = %id))]
	pub async fn update_comment(
		&self,
		actor: UserId,
		id: CommentId,
		patch: CommentPatch,
	) -> Result<Comment, ServerError> {
		let content = normalize_comment_patch(patch)?;

		let mut tx = begin_write(&self.pool).await?;
		authorize_on_comment(&mut tx, actor, id, Action::UpdateComment).await?;
		comment::update_comment(&mut tx, id, &content).await?;
		let updated = require_comment(&mut tx, id).await?;
		tx.commit().await?;
		Ok(updated)
	}

	#[tracing::instrument(skip(self), fields(actor = %actor, comment_id = %id))]
	pub async fn delete_comment(&self, actor: UserId, id: CommentId) -> Result<Comment, ServerError> {
		let mut tx = begin_write(&self.pool).await?;
		let existing = authorize_on_comment(&mut tx, actor, id, Action::DeleteComment).await?;
		comment::delete_comment(&mut tx, id).await?;
		tx.commit().await?;
		Ok(existing)
	}
}
