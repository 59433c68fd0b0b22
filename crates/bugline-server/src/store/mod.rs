// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization-gated resource operations.
//!
//! Every mutation follows the same shape:
//!
//! 1. validate the input shape (no database access)
//! 2. open a transaction and load the authorization context
//! 3. ask the decision engine
//! 4. apply the mutation in the same transaction
//! 5. re-read the canonical entity, commit and return it
//!
//! Reads follow steps 2, 3 and 5 on a plain connection.

mod bugs;
mod comments;
mod members;
mod projects;
mod users;

use bugline_common_core::{Project, ProjectId, UserId};
use bugline_server_auth::{evaluate, Action, Decision, DenyReason, ResourceAttrs, SubjectAttrs};
use bugline_server_db::{membership, project, SqliteConnection, SqlitePool};

use crate::error::ServerError;

pub use bugs::CreateBug;

/// Projects, bugs, comments, assignments and memberships behind the
/// authorization engine.
#[derive(Clone)]
pub struct ResourceStore {
	pool: SqlitePool,
}

impl ResourceStore {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}

/// Load the caller's current role in `project_id`.
async fn subject_in(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	actor: UserId,
) -> Result<SubjectAttrs, ServerError> {
	let role = membership::role_of(conn, project_id, actor).await?;
	Ok(SubjectAttrs::new(actor).with_role(role))
}

async fn require_project(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
) -> Result<Project, ServerError> {
	project::get_project(conn, project_id)
		.await?
		.ok_or_else(|| ServerError::NotFound(format!("Project {project_id} not found")))
}

/// Turn a decision into a result.
fn authorize(
	subject: &SubjectAttrs,
	action: Action,
	resource: &ResourceAttrs,
) -> Result<(), ServerError> {
	match evaluate(Some(subject), action, resource) {
		Decision::Allow => Ok(()),
		Decision::Deny(DenyReason::NotAuthenticated) => Err(ServerError::NotAuthenticated),
		Decision::Deny(reason) => {
			tracing::info!(
				user_id = %subject.user_id,
				action = ?action,
				resource_type = ?resource.resource_type,
				reason = %reason,
				"access denied"
			);
			Err(ServerError::AccessDenied(reason))
		}
		Decision::Invalid(message) => Err(ServerError::Validation(message)),
	}
}
