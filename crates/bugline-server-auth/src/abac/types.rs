// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for ABAC policy evaluation.
//!
//! - [`SubjectAttrs`]: the caller and the role they currently hold in the target project
//! - [`ResourceAttrs`]: the project, bug or comment being acted on
//! - [`Action`]: the operation being attempted
//! - [`Decision`]: the verdict
//!
//! All attributes are loaded fresh for each request before evaluation. Policy
//! functions never touch the database.

use bugline_common_core::{ProjectId, ProjectRole, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attributes describing the subject (user) requesting access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAttrs {
	pub user_id: UserId,
	/// Role in the project the resource belongs to. `None` for non-members.
	pub project_role: Option<ProjectRole>,
}

impl SubjectAttrs {
	/// Creates a subject with no project membership.
	pub fn new(user_id: UserId) -> Self {
		Self {
			user_id,
			project_role: None,
		}
	}

	/// Builder: set the subject's role in the target project.
	pub fn with_role(mut self, role: Option<ProjectRole>) -> Self {
		self.project_role = role;
		self
	}

	pub fn is_member(&self) -> bool {
		self.project_role.is_some()
	}

	pub fn is_admin(&self) -> bool {
		matches!(self.project_role, Some(ProjectRole::Admin))
	}
}

/// A user named by the request (e.g. an assignee) and their current role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUserAttr {
	pub user_id: UserId,
	pub role: Option<ProjectRole>,
}

/// Attributes describing the resource being accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAttrs {
	pub resource_type: ResourceType,
	/// `None` only when creating a new project.
	pub project_id: Option<ProjectId>,
	pub project_creator: Option<UserId>,
	/// Author of the bug or comment.
	pub author_id: Option<UserId>,
	pub assignees: Vec<UserId>,
	pub target_users: Vec<TargetUserAttr>,
}

impl ResourceAttrs {
	fn empty(resource_type: ResourceType) -> Self {
		Self {
			resource_type,
			project_id: None,
			project_creator: None,
			author_id: None,
			assignees: Vec::new(),
			target_users: Vec::new(),
		}
	}

	/// Creates resource attributes for a project that does not exist yet.
	pub fn new_project() -> Self {
		Self::empty(ResourceType::Project)
	}

	/// Creates resource attributes for an existing project.
	pub fn project(project_id: ProjectId, creator: UserId) -> Self {
		Self {
			project_id: Some(project_id),
			project_creator: Some(creator),
			..Self::empty(ResourceType::Project)
		}
	}

	/// Creates resource attributes for the membership list of a project.
	pub fn membership(project_id: ProjectId, creator: UserId) -> Self {
		Self {
			project_id: Some(project_id),
			project_creator: Some(creator),
			..Self::empty(ResourceType::Membership)
		}
	}

	/// Creates resource attributes for a bug.
	pub fn bug(project_id: ProjectId, author_id: UserId, assignees: Vec<UserId>) -> Self {
		Self {
			project_id: Some(project_id),
			author_id: Some(author_id),
			assignees,
			..Self::empty(ResourceType::Bug)
		}
	}

	/// Creates resource attributes for a comment.
	pub fn comment(project_id: ProjectId, author_id: UserId) -> Self {
		Self {
			project_id: Some(project_id),
			author_id: Some(author_id),
			..Self::empty(ResourceType::Comment)
		}
	}

	/// Builder: attach the users the request targets.
	pub fn with_targets(mut self, targets: Vec<TargetUserAttr>) -> Self {
		self.target_users = targets;
		self
	}

	pub fn is_author(&self, user_id: UserId) -> bool {
		self.author_id == Some(user_id)
	}

	pub fn is_assignee(&self, user_id: UserId) -> bool {
		self.assignees.contains(&user_id)
	}

	pub fn is_creator(&self, user_id: UserId) -> bool {
		self.project_creator == Some(user_id)
	}
}

/// Types of resources that can be protected by ABAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	Project,
	Membership,
	Bug,
	Comment,
}

/// Actions that can be performed on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Read,
	CreateProject,
	UpdateProject,
	DeleteProject,
	ManageMembers,
	CreateBug,
	UpdateBug,
	DeleteBug,
	AssignUsers,
	UnassignUsers,
	CreateComment,
	UpdateComment,
	DeleteComment,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
	NotAuthenticated,
	NotAMember,
	InsufficientRole,
	NotOwner,
}

impl DenyReason {
	pub fn as_str(&self) -> &'static str {
		match self {
			DenyReason::NotAuthenticated => "not_authenticated",
			DenyReason::NotAMember => "not_a_member",
			DenyReason::InsufficientRole => "insufficient_role",
			DenyReason::NotOwner => "not_owner",
		}
	}

	pub fn message(&self) -> &'static str {
		match self {
			DenyReason::NotAuthenticated => "Authentication required",
			DenyReason::NotAMember => "You are not a member of this project",
			DenyReason::InsufficientRole => "Your project role does not permit this action",
			DenyReason::NotOwner => "Only the owner of this resource may do that",
		}
	}
}

impl fmt::Display for DenyReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	Allow,
	Deny(DenyReason),
	/// The caller may act, but the request references something illegal
	/// (e.g. assigning a non-member).
	Invalid(String),
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, Decision::Allow)
	}
}
