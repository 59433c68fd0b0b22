// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User and access token repository.

use async_trait::async_trait;
use bugline_common_core::{User, UserId, UserPatch};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::Row;

use crate::error::{DbError, Result};
use crate::types::{now, parse_timestamp};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, name: &str, email: &str) -> Result<User>;
	async fn get_user(&self, id: UserId) -> Result<Option<User>>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
	async fn list_users(&self) -> Result<Vec<User>>;
	async fn create_access_token(&self, user_id: UserId, token_hash: &str) -> Result<()>;
	async fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>>;
}

/// Repository for users and their access tokens.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Register a user and issue their first access token atomically.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn register(&self, name: &str, email: &str, token_hash: &str) -> Result<User> {
		let mut tx = crate::pool::begin_write(&self.pool).await?;
		let user = create_user(&mut tx, name, email).await?;
		create_access_token(&mut tx, user.id, token_hash).await?;
		tx.commit().await?;
		Ok(user)
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, name: &str, email: &str) -> Result<User> {
		let mut conn = self.pool.acquire().await?;
		create_user(&mut conn, name, email).await
	}

	async fn get_user(&self, id: UserId) -> Result<Option<User>> {
		let mut conn = self.pool.acquire().await?;
		get_user(&mut conn, id).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
		let mut conn = self.pool.acquire().await?;
		get_user_by_email(&mut conn, email).await
	}

	async fn list_users(&self) -> Result<Vec<User>> {
		let mut conn = self.pool.acquire().await?;
		list_users(&mut conn).await
	}

	async fn create_access_token(&self, user_id: UserId, token_hash: &str) -> Result<()> {
		let mut conn = self.pool.acquire().await?;
		create_access_token(&mut conn, user_id, token_hash).await
	}

	async fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>> {
		let mut conn = self.pool.acquire().await?;
		get_user_by_token_hash(&mut conn, token_hash).await
	}
}

// =============================================================================
// Users
// =============================================================================

/// Insert a user. `email` must already be normalized.
///
/// # Errors
/// `DbError::Conflict` if the email is already registered.
#[tracing::instrument(skip(conn))]
pub async fn create_user(conn: &mut SqliteConnection, name: &str, email: &str) -> Result<User> {
	let ts = now();
	let result = sqlx::query(
		r#"
		INSERT INTO users (name, email, created_at, updated_at)
		VALUES (?, ?, ?, ?)
		"#,
	)
	.bind(name)
	.bind(email)
	.bind(&ts)
	.bind(&ts)
	.execute(&mut *conn)
	.await
	.map_err(|e| DbError::conflict_on_unique(e, format!("User with email {email} already exists")))?;

	let id = UserId::new(result.last_insert_rowid());
	tracing::debug!(user_id = %id, "user created");
	get_user(conn, id)
		.await?
		.ok_or_else(|| DbError::Internal(format!("user {id} vanished after insert")))
}

#[tracing::instrument(skip(conn), fields(user_id = %id))]
pub async fn get_user(conn: &mut SqliteConnection, id: UserId) -> Result<Option<User>> {
	let row = sqlx::query(
		r#"
		SELECT id, name, email, created_at, updated_at
		FROM users
		WHERE id = ?
		"#,
	)
	.bind(id.into_inner())
	.fetch_optional(&mut *conn)
	.await?;

	row.as_ref().map(row_to_user).transpose()
}

#[tracing::instrument(skip(conn))]
pub async fn get_user_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<User>> {
	let row = sqlx::query(
		r#"
		SELECT id, name, email, created_at, updated_at
		FROM users
		WHERE email = ?
		"#,
	)
	.bind(email)
	.fetch_optional(&mut *conn)
	.await?;

	row.as_ref().map(row_to_user).transpose()
}

/// Overwrite the fields present in `patch`. Values must already be normalized.
///
/// # Errors
/// `DbError::NotFound` for an unknown user, `DbError::Conflict` if the new
/// email belongs to someone else.
#[tracing::instrument(skip(conn, patch), fields(user_id = %id))]
pub async fn update_user(conn: &mut SqliteConnection, id: UserId, patch: &UserPatch) -> Result<()> {
	let result = sqlx::query(
		r#"
		UPDATE users
		SET name = COALESCE(?, name),
			email = COALESCE(?, email),
			updated_at = ?
		WHERE id = ?
		"#,
	)
	.bind(patch.name.as_deref())
	.bind(patch.email.as_deref())
	.bind(now())
	.bind(id.into_inner())
	.execute(&mut *conn)
	.await
	.map_err(|e| {
		let email = patch.email.as_deref().unwrap_or_default();
		DbError::conflict_on_unique(e, format!("User with email {email} already exists"))
	})?;

	if result.rows_affected() == 0 {
		return Err(DbError::NotFound(format!("User {id} not found")));
	}
	tracing::debug!(user_id = %id, "user updated");
	Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn list_users(conn: &mut SqliteConnection) -> Result<Vec<User>> {
	let rows = sqlx::query(
		r#"
		SELECT id, name, email, created_at, updated_at
		FROM users
		ORDER BY id
		"#,
	)
	.fetch_all(&mut *conn)
	.await?;

	rows.iter().map(row_to_user).collect()
}

// =============================================================================
// Access tokens
// =============================================================================

#[tracing::instrument(skip(conn, token_hash), fields(user_id = %user_id))]
pub async fn create_access_token(
	conn: &mut SqliteConnection,
	user_id: UserId,
	token_hash: &str,
) -> Result<()> {
	sqlx::query(
		r#"
		INSERT INTO access_tokens (user_id, token_hash, created_at)
		VALUES (?, ?, ?)
		"#,
	)
	.bind(user_id.into_inner())
	.bind(token_hash)
	.bind(now())
	.execute(&mut *conn)
	.await?;

	tracing::debug!(user_id = %user_id, "access token issued");
	Ok(())
}

/// Resolve a token hash to its user, recording the use.
#[tracing::instrument(skip(conn, token_hash))]
pub async fn get_user_by_token_hash(
	conn: &mut SqliteConnection,
	token_hash: &str,
) -> Result<Option<User>> {
	let row = sqlx::query(
		r#"
		SELECT u.id, u.name, u.email, u.created_at, u.updated_at
		FROM access_tokens t
		JOIN users u ON u.id = t.user_id
		WHERE t.token_hash = ?
		"#,
	)
	.bind(token_hash)
	.fetch_optional(&mut *conn)
	.await?;

	let Some(row) = row else {
		return Ok(None);
	};

	sqlx::query("UPDATE access_tokens SET last_used_at = ? WHERE token_hash = ?")
		.bind(now())
		.bind(token_hash)
		.execute(&mut *conn)
		.await?;

	row_to_user(&row).map(Some)
}

pub(crate) fn row_to_user(row: &SqliteRow) -> Result<User> {
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: UserId::new(row.get("id")),
		name: row.get("name"),
		email: row.get("email"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
