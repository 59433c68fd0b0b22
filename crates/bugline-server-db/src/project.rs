// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project queries.
//!
//! Functions take a connection so callers can compose them inside a single
//! transaction with the authorization lookups that gate them.

use bugline_common_core::{Project, ProjectId, ProjectPatch, ProjectRole, UserId};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use crate::error::{DbError, Result};
use crate::membership;
use crate::types::{now, parse_timestamp};

/// Insert a project and make `author_id` its sole admin.
///
/// Must run inside a transaction so the project never exists without its
/// admin membership.
#[tracing::instrument(skip(conn, description), fields(author_id = %author_id))]
pub async fn create_project(
	conn: &mut SqliteConnection,
	name: &str,
	description: &str,
	author_id: UserId,
) -> Result<Project> {
	let ts = now();
	let result = sqlx::query(
		r#"
		INSERT INTO projects (name, description, author_id, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?)
		"#,
	)
	.bind(name)
	.bind(description)
	.bind(author_id.into_inner())
	.bind(&ts)
	.bind(&ts)
	.execute(&mut *conn)
	.await?;

	let id = ProjectId::new(result.last_insert_rowid());
	membership::add_member(conn, id, author_id, ProjectRole::Admin).await?;

	tracing::debug!(project_id = %id, "project created");
	get_project(conn, id)
		.await?
		.ok_or_else(|| DbError::Internal(format!("project {id} vanished after insert")))
}

#[tracing::instrument(skip(conn), fields(project_id = %id))]
pub async fn get_project(conn: &mut SqliteConnection, id: ProjectId) -> Result<Option<Project>> {
	let row = sqlx::query(
		r#"
		SELECT id, name, description, author_id, created_at, updated_at
		FROM projects
		WHERE id = ?
		"#,
	)
	.bind(id.into_inner())
	.fetch_optional(&mut *conn)
	.await?;

	row.as_ref().map(row_to_project).transpose()
}

/// Projects the user is a member of.
#[tracing::instrument(skip(conn), fields(user_id = %user_id))]
pub async fn list_projects_for_user(
	conn: &mut SqliteConnection,
	user_id: UserId,
) -> Result<Vec<Project>> {
	let rows = sqlx::query(
		r#"
		SELECT p.id, p.name, p.description, p.author_id, p.created_at, p.updated_at
		FROM projects p
		JOIN project_members pm ON pm.project_id = p.id
		WHERE pm.user_id = ?
		ORDER BY p.id
		"#,
	)
	.bind(user_id.into_inner())
	.fetch_all(&mut *conn)
	.await?;

	rows.iter().map(row_to_project).collect()
}

/// Apply the fields present in `patch`.
#[tracing::instrument(skip(conn, patch), fields(project_id = %id))]
pub async fn update_project(
	conn: &mut SqliteConnection,
	id: ProjectId,
	patch: &ProjectPatch,
) -> Result<()> {
	let result = sqlx::query(
		r#"
		UPDATE projects
		SET name = COALESCE(?, name),
			description = COALESCE(?, description),
			updated_at = ?
		WHERE id = ?
		"#,
	)
	.bind(patch.name.as_deref())
	.bind(patch.description.as_deref())
	.bind(now())
	.bind(id.into_inner())
	.execute(&mut *conn)
	.await?;

	if result.rows_affected() == 0 {
		return Err(DbError::NotFound(format!("Project {id} not found")));
	}
	tracing::debug!(project_id = %id, "project updated");
	Ok(())
}

/// Delete a project. Members, bugs, assignments and comments cascade.
#[tracing::instrument(skip(conn), fields(project_id = %id))]
pub async fn delete_project(conn: &mut SqliteConnection, id: ProjectId) -> Result<bool> {
	let result = sqlx::query("DELETE FROM projects WHERE id = ?")
		.bind(id.into_inner())
		.execute(&mut *conn)
		.await?;

	let deleted = result.rows_affected() > 0;
	tracing::debug!(project_id = %id, deleted, "project deleted");
	Ok(deleted)
}

fn row_to_project(row: &SqliteRow) -> Result<Project> {
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Project {
		id: ProjectId::new(row.get("id")),
		name: row.get("name"),
		description: row.get("description"),
		author_id: UserId::new(row.get("author_id")),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
