// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column conversion helpers shared by the repositories.

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::error::DbError;

/// Current time in the stored text format.
pub(crate) fn now() -> String {
	Utc::now().to_rfc3339()
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	Ok(
		DateTime::parse_from_rfc3339(value)
			.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))?
			.with_timezone(&Utc),
	)
}

/// Parse a stored enum column (role, status, priority).
pub(crate) fn parse_column<T>(value: &str, column: &str) -> Result<T, DbError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	value
		.parse()
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}
