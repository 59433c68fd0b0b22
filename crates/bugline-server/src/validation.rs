// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Input shape validation shared by handlers and the resource store.
//!
//! Everything here runs before any authorization lookup or persistence access.

use std::collections::HashSet;
use std::str::FromStr;

use bugline_common_core::{BugPatch, CommentPatch, ProjectPatch, ProjectRole, UserId, UserPatch};

use crate::error::ServerError;

/// Sanitize an email address by trimming whitespace and lowercasing.
pub fn sanitize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

/// Require a sanitized, plausibly shaped email.
pub fn require_email(email: Option<&str>) -> Result<String, ServerError> {
	let email = sanitize_email(email.unwrap_or_default());
	if email.is_empty() {
		return Err(ServerError::Validation("Email is required".to_string()));
	}
	match email.split_once('@') {
		Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
		_ => Err(ServerError::Validation(format!("Invalid email address: {email}"))),
	}
}

/// Trim a required text field, rejecting missing or blank values.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, ServerError> {
	let trimmed = value.map(str::trim).unwrap_or_default();
	if trimmed.is_empty() {
		return Err(ServerError::Validation(format!("{field} is required")));
	}
	Ok(trimmed.to_string())
}

/// Trim an optional text field; absent becomes empty.
pub fn optional_text(value: Option<&str>) -> String {
	value.map(str::trim).unwrap_or_default().to_string()
}

/// Parse a path segment as a positive id.
pub fn parse_id<T>(raw: &str) -> Result<T, ServerError>
where
	T: FromStr<Err = bugline_common_core::IdParseError>,
{
	raw.parse::<T>()
		.map_err(|e| ServerError::Validation(e.to_string()))
}

/// Parse a role name, case-insensitively.
pub fn parse_role(raw: &str) -> Result<ProjectRole, ServerError> {
	raw.parse::<ProjectRole>()
		.map_err(|_| ServerError::Validation(format!("Invalid role: {raw}. Expected ADMIN or MEMBER")))
}

/// Validate an assignment target list: non-empty, positive and free of
/// duplicates.
pub fn validate_user_ids(raw: Option<&[i64]>) -> Result<Vec<UserId>, ServerError> {
	let raw = raw.unwrap_or_default();
	if raw.is_empty() {
		return Err(ServerError::Validation("userIds must not be empty".to_string()));
	}

	let mut seen = HashSet::with_capacity(raw.len());
	let mut ids = Vec::with_capacity(raw.len());
	for &id in raw {
		if id <= 0 {
			return Err(ServerError::Validation(format!("Invalid user id: {id}")));
		}
		if !seen.insert(id) {
			return Err(ServerError::Validation(format!("Duplicate user id: {id}")));
		}
		ids.push(UserId::new(id));
	}
	Ok(ids)
}

/// Normalize a bug patch: trim text, reject empty patches and blank titles.
pub fn normalize_bug_patch(patch: BugPatch) -> Result<BugPatch, ServerError> {
	if patch.is_empty() {
		return Err(ServerError::Validation("No fields to update".to_string()));
	}
	let title = match patch.title.as_deref() {
		Some(title) => Some(require_text("Title", Some(title))?),
		None => None,
	};
	Ok(BugPatch {
		title,
		description: patch.description.as_deref().map(|d| d.trim().to_string()),
		..patch
	})
}

pub fn normalize_project_patch(patch: ProjectPatch) -> Result<ProjectPatch, ServerError> {
	if patch.is_empty() {
		return Err(ServerError::Validation("No fields to update".to_string()));
	}
	let name = match patch.name.as_deref() {
		Some(name) => Some(require_text("Name", Some(name))?),
		None => None,
	};
	Ok(ProjectPatch {
		name,
		description: patch.description.as_deref().map(|d| d.trim().to_string()),
	})
}

pub fn normalize_comment_patch(patch: CommentPatch) -> Result<String, ServerError> {
	if patch.is_empty() {
		return Err(ServerError::Validation("No fields to update".to_string()));
	}
	require_text("Content", patch.content.as_deref())
}

/// Trim the name and normalize the email of a profile update.
pub fn normalize_user_patch(patch: UserPatch) -> Result<UserPatch, ServerError> {
	if patch.is_empty() {
		return Err(ServerError::Validation("No fields to update".to_string()));
	}
	let name = match patch.name.as_deref() {
		Some(name) => Some(require_text("Name", Some(name))?),
		None => None,
	};
	let email = match patch.email.as_deref() {
		Some(email) => Some(require_email(Some(email))?),
		None => None,
	};
	Ok(UserPatch { name, email })
}
