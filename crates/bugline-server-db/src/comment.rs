// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Comment queries.

use bugline_common_core::{BugId, Comment, CommentId, ProjectId, UserId};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

use crate::error::{DbError, Result};
use crate::types::{now, parse_timestamp};

#[tracing::instrument(skip(conn, content), fields(bug_id = %bug_id, author_id = %author_id))]
pub async fn create_comment(
	conn: &mut SqliteConnection,
	bug_id: BugId,
	author_id: UserId,
	content: &str,
) -> Result<Comment> {
	let ts = now();
	let result = sqlx::query(
		r#"
		INSERT INTO comments (content, author_id, bug_id, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?)
		"#,
	)
	.bind(content)
	.bind(author_id.into_inner())
	.bind(bug_id.into_inner())
	.bind(&ts)
	.bind(&ts)
	.execute(&mut *conn)
	.await?;

	let id = CommentId::new(result.last_insert_rowid());
	tracing::debug!(comment_id = %id, "comment created");
	get_comment(conn, id)
		.await?
		.ok_or_else(|| DbError::Internal(format!("comment {id} vanished after insert")))
}

#[tracing::instrument(skip(conn), fields(comment_id = %id))]
pub async fn get_comment(conn: &mut SqliteConnection, id: CommentId) -> Result<Option<Comment>> {
	let row = sqlx::query(
		r#"
		SELECT id, content, author_id, bug_id, created_at, updated_at
		FROM comments
		WHERE id = ?
		"#,
	)
	.bind(id.into_inner())
	.fetch_optional(&mut *conn)
	.await?;

	row.as_ref().map(row_to_comment).transpose()
}

/// Load a comment together with the project that owns its bug.
pub async fn get_comment_with_project(
	conn: &mut SqliteConnection,
	id: CommentId,
) -> Result<Option<(Comment, ProjectId)>> {
	let row = sqlx::query(
		r#"
		SELECT c.id, c.content, c.author_id, c.bug_id, c.created_at, c.updated_at, b.project_id
		FROM comments c
		JOIN bugs b ON b.id = c.bug_id
		WHERE c.id = ?
		"#,
	)
	.bind(id.into_inner())
	.fetch_optional(&mut *conn)
	.await?;

	let Some(row) = row else {
		return Ok(None);
	};
	let project_id = ProjectId::new(row.get("project_id"));
	Ok(Some((row_to_comment(&row)?, project_id)))
}

/// Comments on a bug, oldest first.
#[tracing::instrument(skip(conn), fields(bug_id = %bug_id))]
pub async fn list_comments(conn: &mut SqliteConnection, bug_id: BugId) -> Result<Vec<Comment>> {
	let rows = sqlx::query(
		r#"
		SELECT id, content, author_id, bug_id, created_at, updated_at
		FROM comments
		WHERE bug_id = ?
		ORDER BY id
		"#,
	)
	.bind(bug_id.into_inner())
	.fetch_all(&mut *conn)
	.await?;

	rows.iter().map(row_to_comment).collect()
}

#[tracing::instrument(skip(conn, content), fields(comment_id = %id))]
pub async fn update_comment(conn: &mut SqliteConnection, id: CommentId, content: &str) -> Result<()> {
	let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
		.bind(content)
		.bind(now())
		.bind(id.into_inner())
		.execute(&mut *conn)
		.await?;

	if result.rows_affected() == 0 {
		return Err(DbError::NotFound(format!("Comment {id} not found")));
	}
	Ok(())
}

#[tracing::instrument(skip(conn), fields(comment_id = %id))]
pub async fn delete_comment(conn: &mut SqliteConnection, id: CommentId) -> Result<bool> {
	let result = sqlx::query("DELETE FROM comments WHERE id = ?")
		.bind(id.into_inner())
		.execute(&mut *conn)
		.await?;
	Ok(result.rows_affected() > 0)
}

fn row_to_comment(row: &SqliteRow) -> Result<Comment> {
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Comment {
		id: CommentId::new(row.get("id")),
		content: row.get("content"),
		author_id: UserId::new(row.get("author_id")),
		bug_id: BugId::new(row.get("bug_id")),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
