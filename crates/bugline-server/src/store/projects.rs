// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bugline_common_core::{Project, ProjectId, ProjectPatch, UserId};
use bugline_server_auth::{Action, ResourceAttrs, SubjectAttrs};
use bugline_server_db::{begin_write, project};

use super::{authorize, require_project, subject_in, ResourceStore};
use crate::error::ServerError;
use crate::validation::{normalize_project_patch, optional_text, require_text};

impl ResourceStore {
	/// Projects the actor belongs to.
	#[tracing::instrument(skip(self), fields(actor = %actor))]
	pub async fn list_projects(&self, actor: UserId) -> Result<Vec<Project>, ServerError> {
		let mut conn = self.pool.acquire().await?;
		Ok(project::list_projects_for_user(&mut conn, actor).await?)
	}

	#[tracing::instrument(skip(self, name, description), fields(actor = %actor))]
	pub async fn create_project(
		&self,
		actor: UserId,
		name: Option<&str>,
		description: Option<&str>,
	) -> Result<Project, ServerError> {
		let name = require_text("Name", name)?;
		let description = optional_text(description);

		authorize(
			&SubjectAttrs::new(actor),
			Action::CreateProject,
			&ResourceAttrs::new_project(),
		)?;

		let mut tx = begin_write(&self.pool).await?;
		let created = project::create_project(&mut tx, &name, &description, actor).await?;
		tx.commit().await?;

		tracing::info!(project_id = %created.id, "project created");
		Ok(created)
	}

	#[tracing::instrument(skip(self), fields(actor = %actor, project_id = %id))]
	pub async fn get_project(&self, actor: UserId, id: ProjectId) -> Result<Project, ServerError> {
		let mut conn = self.pool.acquire().await?;
		let found = require_project(&mut conn, id).await?;
		let subject = subject_in(&mut conn, id, actor).await?;
		authorize(&subject, Action::Read, &ResourceAttrs::project(id, found.author_id))?;
		Ok(found)
	}

	#[tracing::instrument(skip(self, patch), fields(actor = %actor, project_id = %id))]
	pub async fn update_project(
		&self,
		actor: UserId,
		id: ProjectId,
		patch: ProjectPatch,
	) -> Result<Project, ServerError> {
		let patch = normalize_project_patch(patch)?;

		let mut tx = begin_write(&self.pool).await?;
		let existing = require_project(&mut tx, id).await?;
		let subject = subject_in(&mut tx, id, actor).await?;
		authorize(
			&subject,
			Action::UpdateProject,
			&ResourceAttrs::project(id, existing.author_id),
		)?;

		project::update_project(&mut tx, id, &patch).await?;
		let updated = require_project(&mut tx, id).await?;
		tx.commit().await?;
		Ok(updated)
	}

	/// Delete a project and everything it owns. Returns the deleted project.
	#[tracing::instrument(skip(self), fields(actor = %actor, project_id = %id))]
	pub async fn delete_project(&self, actor: UserId, id: ProjectId) -> Result<Project, ServerError> {
		let mut tx = begin_write(&self.pool).await?;
		let existing = require_project(&mut tx, id).await?;
		let subject = subject_in(&mut tx, id, actor).await?;
		authorize(
			&subject,
			Action::DeleteProject,
			&ResourceAttrs::project(id, existing.author_id),
		)?;

		project::delete_project(&mut tx, id).await?;
		tx.commit().await?;

		tracing::info!(project_id = %id, "project deleted");
		Ok(existing)
	}
}
