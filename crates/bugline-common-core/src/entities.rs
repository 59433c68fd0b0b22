// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Canonical entities as returned by the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BugId, CommentId, ProjectId, UserId};
use crate::types::{BugPriority, BugStatus, ProjectRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: UserId,
	pub name: String,
	pub email: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Project {
	pub id: ProjectId,
	pub name: String,
	pub description: String,
	/// The user who created the project. Only they may delete it.
	pub author_id: UserId,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A membership joined with the member's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Member {
	pub project_id: ProjectId,
	pub user_id: UserId,
	pub role: ProjectRole,
	pub name: String,
	pub email: String,
	pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Bug {
	pub id: BugId,
	pub title: String,
	pub description: String,
	pub status: BugStatus,
	pub priority: BugPriority,
	pub project_id: ProjectId,
	pub author_id: UserId,
	/// Sorted by user id.
	pub assignees: Vec<UserId>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Bug {
	pub fn is_assigned(&self, user_id: UserId) -> bool {
		self.assignees.contains(&user_id)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	pub id: CommentId,
	pub content: String,
	pub author_id: UserId,
	pub bug_id: BugId,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
