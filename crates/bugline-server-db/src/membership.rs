// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership registry: who belongs to which project, and with what role.
//!
//! This layer enforces data invariants only. It guarantees at most one
//! membership per (project, user) and never lets a project lose its last
//! admin. It does not check who is asking; that is the authorization
//! engine's job one layer up.

use std::collections::HashMap;

use bugline_common_core::{Member, ProjectId, ProjectRole, UserId};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use crate::error::{DbError, Result};
use crate::types::{now, parse_column, parse_timestamp};

pub const LAST_ADMIN_MESSAGE: &str = "A project must keep at least one admin";

// =============================================================================
// Memberships
// =============================================================================

/// Role of `user_id` in `project_id`, or `None` if not a member.
#[tracing::instrument(skip(conn), fields(project_id = %project_id, user_id = %user_id))]
pub async fn role_of(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user_id: UserId,
) -> Result<Option<ProjectRole>> {
	let role: Option<String> =
		sqlx::query_scalar("SELECT role FROM project_members WHERE project_id = ? AND user_id = ?")
			.bind(project_id.into_inner())
			.bind(user_id.into_inner())
			.fetch_optional(&mut *conn)
			.await?;

	role.map(|r| parse_column(&r, "role")).transpose()
}

/// Roles for several users at once. Users who are not members are absent
/// from the map.
pub async fn roles_of(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user_ids: &[UserId],
) -> Result<HashMap<UserId, ProjectRole>> {
	let mut roles = HashMap::with_capacity(user_ids.len());
	for &user_id in user_ids {
		if let Some(role) = role_of(conn, project_id, user_id).await? {
			roles.insert(user_id, role);
		}
	}
	Ok(roles)
}

/// Add a member to a project.
///
/// # Errors
/// `DbError::Conflict` if the user already has a membership.
#[tracing::instrument(skip(conn), fields(project_id = %project_id, user_id = %user_id, role = %role))]
pub async fn add_member(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user_id: UserId,
	role: ProjectRole,
) -> Result<()> {
	if role_of(conn, project_id, user_id).await?.is_some() {
		return Err(DbError::Conflict(format!(
			"User {user_id} is already a member of project {project_id}"
		)));
	}

	sqlx::query(
		r#"
		INSERT INTO project_members (project_id, user_id, role, created_at)
		VALUES (?, ?, ?, ?)
		"#,
	)
	.bind(project_id.into_inner())
	.bind(user_id.into_inner())
	.bind(role.as_str())
	.bind(now())
	.execute(&mut *conn)
	.await
	.map_err(|e| {
		DbError::conflict_on_unique(
			e,
			format!("User {user_id} is already a member of project {project_id}"),
		)
	})?;

	tracing::debug!(project_id = %project_id, user_id = %user_id, role = %role, "member added to project");
	Ok(())
}

/// Remove a member, returning the role they held.
///
/// # Errors
/// - `DbError::NotFound` if there is no such membership
/// - `DbError::Validation` if the member is the last admin
#[tracing::instrument(skip(conn), fields(project_id = %project_id, user_id = %user_id))]
pub async fn remove_member(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user_id: UserId,
) -> Result<ProjectRole> {
	let role = require_role(conn, project_id, user_id).await?;
	if role == ProjectRole::Admin && count_admins(conn, project_id).await? <= 1 {
		return Err(DbError::Validation(LAST_ADMIN_MESSAGE.to_string()));
	}

	sqlx::query("DELETE FROM project_members WHERE project_id = ? AND user_id = ?")
		.bind(project_id.into_inner())
		.bind(user_id.into_inner())
		.execute(&mut *conn)
		.await?;

	tracing::debug!(project_id = %project_id, user_id = %user_id, "member removed from project");
	Ok(role)
}

/// Promote or demote a member.
///
/// # Errors
/// - `DbError::NotFound` if there is no such membership
/// - `DbError::Validation` if this would demote the last admin
#[tracing::instrument(skip(conn), fields(project_id = %project_id, user_id = %user_id, role = %role))]
pub async fn change_role(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user_id: UserId,
	role: ProjectRole,
) -> Result<()> {
	let current = require_role(conn, project_id, user_id).await?;
	if current == role {
		return Ok(());
	}
	if current == ProjectRole::Admin && count_admins(conn, project_id).await? <= 1 {
		return Err(DbError::Validation(LAST_ADMIN_MESSAGE.to_string()));
	}

	sqlx::query("UPDATE project_members SET role = ? WHERE project_id = ? AND user_id = ?")
		.bind(role.as_str())
		.bind(project_id.into_inner())
		.bind(user_id.into_inner())
		.execute(&mut *conn)
		.await?;

	tracing::debug!(project_id = %project_id, user_id = %user_id, from = %current, to = %role, "member role changed");
	Ok(())
}

#[tracing::instrument(skip(conn), fields(project_id = %project_id))]
pub async fn count_admins(conn: &mut SqliteConnection, project_id: ProjectId) -> Result<i64> {
	let count: i64 = sqlx::query_scalar(
		"SELECT COUNT(*) FROM project_members WHERE project_id = ? AND role = 'ADMIN'",
	)
	.bind(project_id.into_inner())
	.fetch_one(&mut *conn)
	.await?;
	Ok(count)
}

pub async fn get_member(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user_id: UserId,
) -> Result<Option<Member>> {
	let row = sqlx::query(
		r#"
		SELECT pm.project_id, pm.user_id, pm.role, pm.created_at, u.name, u.email
		FROM project_members pm
		JOIN users u ON u.id = pm.user_id
		WHERE pm.project_id = ? AND pm.user_id = ?
		"#,
	)
	.bind(project_id.into_inner())
	.bind(user_id.into_inner())
	.fetch_optional(&mut *conn)
	.await?;

	row.as_ref().map(row_to_member).transpose()
}

/// Members of a project in join order.
#[tracing::instrument(skip(conn), fields(project_id = %project_id))]
pub async fn list_members(conn: &mut SqliteConnection, project_id: ProjectId) -> Result<Vec<Member>> {
	let rows = sqlx::query(
		r#"
		SELECT pm.project_id, pm.user_id, pm.role, pm.created_at, u.name, u.email
		FROM project_members pm
		JOIN users u ON u.id = pm.user_id
		WHERE pm.project_id = ?
		ORDER BY pm.id
		"#,
	)
	.bind(project_id.into_inner())
	.fetch_all(&mut *conn)
	.await?;

	rows.iter().map(row_to_member).collect()
}

async fn require_role(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	user_id: UserId,
) -> Result<ProjectRole> {
	role_of(conn, project_id, user_id).await?.ok_or_else(|| {
		DbError::NotFound(format!(
			"User {user_id} is not a member of project {project_id}"
		))
	})
}

fn row_to_member(row: &SqliteRow) -> Result<Member> {
	let role: String = row.get("role");
	let created_at: String = row.get("created_at");

	Ok(Member {
		project_id: ProjectId::new(row.get("project_id")),
		user_id: UserId::new(row.get("user_id")),
		role: parse_column(&role, "role")?,
		name: row.get("name"),
		email: row.get("email"),
		joined_at: parse_timestamp(&created_at, "created_at")?,
	})
}
