// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bug and assignment queries.

use std::collections::HashMap;

use bugline_common_core::{Bug, BugId, BugPatch, BugPriority, BugStatus, ProjectId, UserId};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use crate::error::{DbError, Result};
use crate::types::{now, parse_column, parse_timestamp};

/// Fields for a new bug, already validated and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBug {
	pub title: String,
	pub description: String,
	pub status: BugStatus,
	pub priority: BugPriority,
}

#[tracing::instrument(skip(conn, bug), fields(project_id = %project_id, author_id = %author_id))]
pub async fn create_bug(
	conn: &mut SqliteConnection,
	project_id: ProjectId,
	author_id: UserId,
	bug: &NewBug,
) -> Result<Bug> {
	let ts = now();
	let result = sqlx::query(
		r#"
		INSERT INTO bugs (title, description, status, priority, project_id, author_id, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(&bug.title)
	.bind(&bug.description)
	.bind(bug.status.as_str())
	.bind(bug.priority.as_str())
	.bind(project_id.into_inner())
	.bind(author_id.into_inner())
	.bind(&ts)
	.bind(&ts)
	.execute(&mut *conn)
	.await?;

	let id = BugId::new(result.last_insert_rowid());
	tracing::debug!(bug_id = %id, "bug created");
	get_bug(conn, id)
		.await?
		.ok_or_else(|| DbError::Internal(format!("bug {id} vanished after insert")))
}

/// Load a bug with its assignees.
#[tracing::instrument(skip(conn), fields(bug_id = %id))]
pub async fn get_bug(conn: &mut SqliteConnection, id: BugId) -> Result<Option<Bug>> {
	let row = sqlx::query(
		r#"
		SELECT id, title, description, status, priority, project_id, author_id, created_at, updated_at
		FROM bugs
		WHERE id = ?
		"#,
	)
	.bind(id.into_inner())
	.fetch_optional(&mut *conn)
	.await?;

	let Some(row) = row else {
		return Ok(None);
	};
	let assignees = list_assignees(conn, id).await?;
	row_to_bug(&row, assignees).map(Some)
}

/// Bugs in a project, newest first.
#[tracing::instrument(skip(conn), fields(project_id = %project_id))]
pub async fn list_bugs(conn: &mut SqliteConnection, project_id: ProjectId) -> Result<Vec<Bug>> {
	let rows = sqlx::query(
		r#"
		SELECT id, title, description, status, priority, project_id, author_id, created_at, updated_at
		FROM bugs
		WHERE project_id = ?
		ORDER BY id DESC
		"#,
	)
	.bind(project_id.into_inner())
	.fetch_all(&mut *conn)
	.await?;

	let edges: Vec<(i64, i64)> = sqlx::query_as(
		r#"
		SELECT ba.bug_id, ba.user_id
		FROM bug_assignees ba
		JOIN bugs b ON b.id = ba.bug_id
		WHERE b.project_id = ?
		ORDER BY ba.user_id
		"#,
	)
	.bind(project_id.into_inner())
	.fetch_all(&mut *conn)
	.await?;

	let mut by_bug: HashMap<i64, Vec<UserId>> = HashMap::new();
	for (bug_id, user_id) in edges {
		by_bug.entry(bug_id).or_default().push(UserId::new(user_id));
	}

	rows
		.iter()
		.map(|row| {
			let id: i64 = row.get("id");
			row_to_bug(row, by_bug.remove(&id).unwrap_or_default())
		})
		.collect()
}

/// Apply the fields present in `patch`.
#[tracing::instrument(skip(conn, patch), fields(bug_id = %id))]
pub async fn update_bug(conn: &mut SqliteConnection, id: BugId, patch: &BugPatch) -> Result<()> {
	let result = sqlx::query(
		r#"
		UPDATE bugs
		SET title = COALESCE(?, title),
			description = COALESCE(?, description),
			status = COALESCE(?, status),
			priority = COALESCE(?, priority),
			updated_at = ?
		WHERE id = ?
		"#,
	)
	.bind(patch.title.as_deref())
	.bind(patch.description.as_deref())
	.bind(patch.status.map(|s| s.as_str()))
	.bind(patch.priority.map(|p| p.as_str()))
	.bind(now())
	.bind(id.into_inner())
	.execute(&mut *conn)
	.await?;

	if result.rows_affected() == 0 {
		return Err(DbError::NotFound(format!("Bug {id} not found")));
	}
	tracing::debug!(bug_id = %id, "bug updated");
	Ok(())
}

/// Delete a bug. Assignments and comments cascade.
#[tracing::instrument(skip(conn), fields(bug_id = %id))]
pub async fn delete_bug(conn: &mut SqliteConnection, id: BugId) -> Result<bool> {
	let result = sqlx::query("DELETE FROM bugs WHERE id = ?")
		.bind(id.into_inner())
		.execute(&mut *conn)
		.await?;
	Ok(result.rows_affected() > 0)
}

// =============================================================================
// Assignments
// =============================================================================

/// Assignee ids for a bug, sorted ascending.
pub async fn list_assignees(conn: &mut SqliteConnection, bug_id: BugId) -> Result<Vec<UserId>> {
	let ids: Vec<i64> =
		sqlx::query_scalar("SELECT user_id FROM bug_assignees WHERE bug_id = ? ORDER BY user_id")
			.bind(bug_id.into_inner())
			.fetch_all(&mut *conn)
			.await?;
	Ok(ids.into_iter().map(UserId::new).collect())
}

/// Add assignment edges. Callers check for duplicates first; a duplicate edge
/// surfaces as `DbError::Conflict`.
#[tracing::instrument(skip(conn), fields(bug_id = %bug_id, count = user_ids.len()))]
pub async fn add_assignees(
	conn: &mut SqliteConnection,
	bug_id: BugId,
	user_ids: &[UserId],
) -> Result<()> {
	let ts = now();
	for user_id in user_ids {
		sqlx::query("INSERT INTO bug_assignees (bug_id, user_id, assigned_at) VALUES (?, ?, ?)")
			.bind(bug_id.into_inner())
			.bind(user_id.into_inner())
			.bind(&ts)
			.execute(&mut *conn)
			.await
			.map_err(|e| {
				DbError::conflict_on_unique(e, format!("User {user_id} is already assigned"))
			})?;
	}
	touch_bug(conn, bug_id).await
}

#[tracing::instrument(skip(conn), fields(bug_id = %bug_id, count = user_ids.len()))]
pub async fn remove_assignees(
	conn: &mut SqliteConnection,
	bug_id: BugId,
	user_ids: &[UserId],
) -> Result<()> {
	for user_id in user_ids {
		sqlx::query("DELETE FROM bug_assignees WHERE bug_id = ? AND user_id = ?")
			.bind(bug_id.into_inner())
			.bind(user_id.into_inner())
			.execute(&mut *conn)
			.await?;
	}
	touch_bug(conn, bug_id).await
}

/// Remove every assignee, returning how many were removed.
#[tracing::instrument(skip(conn), fields(bug_id = %bug_id))]
pub async fn clear_assignees(conn: &mut SqliteConnection, bug_id: BugId) -> Result<u64> {
	let result = sqlx::query("DELETE FROM bug_assignees WHERE bug_id = ?")
		.bind(bug_id.into_inner())
		.execute(&mut *conn)
		.await?;
	touch_bug(conn, bug_id).await?;
	Ok(result.rows_affected())
}

async fn touch_bug(conn: &mut SqliteConnection, bug_id: BugId) -> Result<()> {
	sqlx::query("UPDATE bugs SET updated_at = ? WHERE id = ?")
		.bind(now())
		.bind(bug_id.into_inner())
		.execute(&mut *conn)
		.await?;
	Ok(())
}

fn row_to_bug(row: &SqliteRow, assignees: Vec<UserId>) -> Result<Bug> {
	let status: String = row.get("status");
	let priority: String = row.get("priority");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Bug {
		id: BugId::new(row.get("id")),
		title: row.get("title"),
		description: row.get("description"),
		status: parse_column(&status, "status")?,
		priority: parse_column(&priority, "priority")?,
		project_id: ProjectId::new(row.get("project_id")),
		author_id: UserId::new(row.get("author_id")),
		assignees,
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
