// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	/// A requested change would break a data invariant (e.g. leave a project
	/// without an admin).
	#[error("Validation: {0}")]
	Validation(String),

	#[error("Internal: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl DbError {
	/// Convert a unique-constraint violation into [`DbError::Conflict`].
	pub fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> Self {
		let is_unique = err
			.as_database_error()
			.is_some_and(|db_err| db_err.is_unique_violation());
		if is_unique {
			DbError::Conflict(message.into())
		} else {
			DbError::Sqlx(err)
		}
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
