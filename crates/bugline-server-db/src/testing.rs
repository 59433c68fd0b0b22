// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory database helpers for tests.

use bugline_common_core::{Project, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::{project, user};

/// Create a single-connection in-memory pool with the full schema applied.
///
/// The pool holds exactly one connection and never recycles it, since each
/// SQLite `:memory:` connection is its own database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.min_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	crate::run_migrations(&pool)
		.await
		.expect("Failed to apply schema");
	pool
}

/// Insert a user named `name` with email `<name>@example.com`.
pub async fn seed_user(pool: &SqlitePool, name: &str) -> User {
	let mut conn = pool.acquire().await.unwrap();
	user::create_user(&mut conn, name, &format!("{}@example.com", name.to_lowercase()))
		.await
		.unwrap()
}

/// Create a project owned by `author`, who becomes its sole admin.
pub async fn seed_project(pool: &SqlitePool, author: &User, name: &str) -> Project {
	let mut tx = crate::pool::begin_write(pool).await.unwrap();
	let project = project::create_project(&mut tx, name, "", author.id)
		.await
		.unwrap();
	tx.commit().await.unwrap();
	project
}
