// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project and membership access policies.

use crate::abac::{Action, Decision, DenyReason, ResourceAttrs, SubjectAttrs};

/// Evaluates project access policies for an existing member.
pub fn evaluate_project(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> Decision {
	match action {
		Action::Read => Decision::Allow,
		Action::UpdateProject => require_admin(subject),
		Action::DeleteProject => {
			if !subject.is_admin() {
				return Decision::Deny(DenyReason::InsufficientRole);
			}
			if !resource.is_creator(subject.user_id) {
				return Decision::Deny(DenyReason::NotOwner);
			}
			Decision::Allow
		}
		// Bugs are filed against the project resource because the bug does
		// not exist yet.
		Action::CreateBug => Decision::Allow,
		_ => Decision::Deny(DenyReason::InsufficientRole),
	}
}

/// Evaluates membership management policies for an existing member.
pub fn evaluate_membership(
	subject: &SubjectAttrs,
	action: Action,
	_resource: &ResourceAttrs,
) -> Decision {
	match action {
		Action::Read => Decision::Allow,
		Action::ManageMembers => require_admin(subject),
		_ => Decision::Deny(DenyReason::InsufficientRole),
	}
}

fn require_admin(subject: &SubjectAttrs) -> Decision {
	if subject.is_admin() {
		Decision::Allow
	} else {
		Decision::Deny(DenyReason::InsufficientRole)
	}
}
