// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role and workflow enums shared by server and client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when an enum value cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}': expected one of {expected}")]
pub struct EnumParseError {
	pub kind: &'static str,
	pub value: String,
	pub expected: &'static str,
}

// =============================================================================
// Project Roles
// =============================================================================

/// Role a user holds within a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectRole {
	/// Manages the project and its membership.
	Admin,
	/// Files and works on bugs.
	Member,
}

impl ProjectRole {
	/// Returns all available project roles.
	pub fn all() -> &'static [ProjectRole] {
		&[ProjectRole::Admin, ProjectRole::Member]
	}

	/// Returns true if this role has at least the permissions of the given role.
	pub fn has_permission_of(&self, other: &ProjectRole) -> bool {
		matches!(
			(self, other),
			(ProjectRole::Admin, _) | (ProjectRole::Member, ProjectRole::Member)
		)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ProjectRole::Admin => "ADMIN",
			ProjectRole::Member => "MEMBER",
		}
	}
}

impl fmt::Display for ProjectRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ProjectRole {
	type Err = EnumParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"ADMIN" => Ok(ProjectRole::Admin),
			"MEMBER" => Ok(ProjectRole::Member),
			_ => Err(EnumParseError {
				kind: "role",
				value: s.to_string(),
				expected: "ADMIN, MEMBER",
			}),
		}
	}
}

// =============================================================================
// Bug Status
// =============================================================================

/// Workflow state of a bug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
	#[default]
	Todo,
	InProgress,
	InReview,
	Done,
}

impl BugStatus {
	pub fn all() -> &'static [BugStatus] {
		&[
			BugStatus::Todo,
			BugStatus::InProgress,
			BugStatus::InReview,
			BugStatus::Done,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			BugStatus::Todo => "todo",
			BugStatus::InProgress => "in_progress",
			BugStatus::InReview => "in_review",
			BugStatus::Done => "done",
		}
	}
}

impl fmt::Display for BugStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BugStatus {
	type Err = EnumParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		BugStatus::all()
			.iter()
			.copied()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| EnumParseError {
				kind: "status",
				value: s.to_string(),
				expected: "todo, in_progress, in_review, done",
			})
	}
}

// =============================================================================
// Bug Priority
// =============================================================================

/// Triage priority of a bug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BugPriority {
	Low,
	#[default]
	Medium,
	High,
	Top,
}

impl BugPriority {
	pub fn all() -> &'static [BugPriority] {
		&[
			BugPriority::Low,
			BugPriority::Medium,
			BugPriority::High,
			BugPriority::Top,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			BugPriority::Low => "low",
			BugPriority::Medium => "medium",
			BugPriority::High => "high",
			BugPriority::Top => "top",
		}
	}
}

impl fmt::Display for BugPriority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BugPriority {
	type Err = EnumParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		BugPriority::all()
			.iter()
			.copied()
			.find(|priority| priority.as_str() == s)
			.ok_or_else(|| EnumParseError {
				kind: "priority",
				value: s.to_string(),
				expected: "low, medium, high, top",
			})
	}
}
