// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sparse update records.
//!
//! Each field is `Option<T>`: `None` leaves the stored value untouched. Absent
//! fields are omitted from the wire form so a patch carrying only `status`
//! serializes as `{"status":"done"}`.

use serde::{Deserialize, Serialize};

use crate::entities::{Bug, Comment, Project};
use crate::types::{BugPriority, BugStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BugPatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<BugStatus>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub priority: Option<BugPriority>,
}

impl BugPatch {
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.description.is_none()
			&& self.status.is_none()
			&& self.priority.is_none()
	}

	pub fn status(status: BugStatus) -> Self {
		Self {
			status: Some(status),
			..Default::default()
		}
	}

	pub fn priority(priority: BugPriority) -> Self {
		Self {
			priority: Some(priority),
			..Default::default()
		}
	}

	/// Overwrite exactly the fields present in the patch.
	pub fn apply_to(&self, bug: &mut Bug) {
		if let Some(title) = &self.title {
			bug.title = title.clone();
		}
		if let Some(description) = &self.description {
			bug.description = description.clone();
		}
		if let Some(status) = self.status {
			bug.status = status;
		}
		if let Some(priority) = self.priority {
			bug.priority = priority;
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

impl ProjectPatch {
	pub fn is_empty(&self) -> bool {
		self.name.is_none() && self.description.is_none()
	}

	pub fn apply_to(&self, project: &mut Project) {
		if let Some(name) = &self.name {
			project.name = name.clone();
		}
		if let Some(description) = &self.description {
			project.description = description.clone();
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CommentPatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
}

impl CommentPatch {
	pub fn content(content: impl Into<String>) -> Self {
		Self {
			content: Some(content.into()),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.content.is_none()
	}

	pub fn apply_to(&self, comment: &mut Comment) {
		if let Some(content) = &self.content {
			comment.content = content.clone();
		}
	}
}

/// Profile fields a user may change on their own account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}

impl UserPatch {
	pub fn is_empty(&self) -> bool {
		self.name.is_none() && self.email.is_none()
	}
}
