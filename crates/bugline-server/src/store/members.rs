// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership management: the registry's mutations behind `ManageMembers`.
//!
//! Members are addressed by email. On top of the registry's last-admin rule,
//! the project creator can be neither removed nor demoted.

use bugline_common_core::{Member, Project, ProjectId, ProjectRole, User, UserId};
use bugline_server_auth::{Action, ResourceAttrs};
use bugline_server_db::{begin_write, membership, user, SqliteConnection};

use super::{authorize, require_project, subject_in, ResourceStore};
use crate::error::ServerError;
use crate::validation::{parse_role, require_email};

pub const CREATOR_MUST_REMAIN_ADMIN: &str = "The project creator must remain an admin member";

/// Load the project and require `ManageMembers` (or `Read`) for `actor`.
async fn authorize_on_members(
	conn: &mut SqliteConnection,
	actor: UserId,
	project_id: ProjectId,
	action: Action,
) -> Result<Project, ServerError> {
	let found = require_project(conn, project_id).await?;
	let subject = subject_in(conn, project_id, actor).await?;
	authorize(
		&subject,
		action,
		&ResourceAttrs::membership(project_id, found.author_id),
	)?;
	Ok(found)
}

async fn require_user_by_email(conn: &mut SqliteConnection, email: &str) -> Result<User, ServerError> {
	user::get_user_by_email(conn, email)
		.await?
		.ok_or_else(|| ServerError::NotFound(format!("User with email {email} not found")))
}

async fn require_member(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user: &User,
) -> Result<Member, ServerError> {
	membership::get_member(conn, project_id, user.id)
		.await?
		.ok_or_else(|| {
			ServerError::NotFound(format!(
				"{} is not a member of project {project_id}",
				user.email
			))
		})
}

impl ResourceStore {
	/// Members of a project, in join order.
	#[tracing::instrument(skip(self), fields(actor = %actor, project_id = %project_id))]
	pub async fn list_members(&self, actor: UserId, project_id: ProjectId) -> Result<Vec<Member>, ServerError> {
		let mut conn = self.pool.acquire().await?;
		authorize_on_members(&mut conn, actor, project_id, Action::Read).await?;
		Ok(membership::list_members(&mut conn, project_id).await?)
	}

	/// Add a registered user to a project. Role defaults to `MEMBER`.
	#[tracing::instrument(skip(self, email, role), fields(actor = %actor, project_id = %project_id))]
	pub async fn add_member(
		&self,
		actor: UserId,
		project_id: ProjectId,
		email: Option<&str>,
		role: Option<&str>,
	) -> Result<Member, ServerError> {
		let email = require_email(email)?;
		let role = role.map(parse_role).transpose()?.unwrap_or(ProjectRole::Member);

		let mut tx = begin_write(&self.pool).await?;
		authorize_on_members(&mut tx, actor, project_id, Action::ManageMembers).await?;
		let target = require_user_by_email(&mut tx, &email).await?;
		membership::add_member(&mut tx, project_id, target.id, role).await?;
		let added = require_member(&mut tx, project_id, &target).await?;
		tx.commit().await?;

		tracing::info!(user_id = %target.id, role = %role, "member added");
		Ok(added)
	}

	/// Remove a member. Returns the membership as it was before removal.
	#[tracing::instrument(skip(self, email), fields(actor = %actor, project_id = %project_id))]
	pub async fn remove_member(
		&self,
		actor: UserId,
		project_id: ProjectId,
		email: Option<&str>,
	) -> Result<Member, ServerError> {
		let email = require_email(email)?;

		let mut tx = begin_write(&self.pool).await?;
		let found = authorize_on_members(&mut tx, actor, project_id, Action::ManageMembers).await?;
		let target = require_user_by_email(&mut tx, &email).await?;
		let existing = require_member(&mut tx, project_id, &target).await?;

		membership::remove_member(&mut tx, project_id, target.id).await?;
		// Dropping `tx` uncommitted rolls the removal back.
		if target.id == found.author_id {
			return Err(ServerError::Validation(CREATOR_MUST_REMAIN_ADMIN.to_string()));
		}
		tx.commit().await?;

		tracing::info!(user_id = %target.id, "member removed");
		Ok(existing)
	}

	/// Promote or demote a member.
	#[tracing::instrument(skip(self, email, role), fields(actor = %actor, project_id = %project_id))]
	pub async fn change_role(
		&self,
		actor: UserId,
		project_id: ProjectId,
		email: Option<&str>,
		role: Option<&str>,
	) -> Result<Member, ServerError> {
		let email = require_email(email)?;
		let role = match role {
			Some(raw) => parse_role(raw)?,
			None => return Err(ServerError::Validation("Role is required".to_string())),
		};

		let mut tx = begin_write(&self.pool).await?;
		let found = authorize_on_members(&mut tx, actor, project_id, Action::ManageMembers).await?;
		let target = require_user_by_email(&mut tx, &email).await?;
		require_member(&mut tx, project_id, &target).await?;

		membership::change_role(&mut tx, project_id, target.id, role).await?;
		if target.id == found.author_id && role != ProjectRole::Admin {
			return Err(ServerError::Validation(CREATOR_MUST_REMAIN_ADMIN.to_string()));
		}
		let changed = require_member(&mut tx, project_id, &target).await?;
		tx.commit().await?;

		tracing::info!(user_id = %target.id, role = %role, "member role changed");
		Ok(changed)
	}
}
