// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bug access policies.

use crate::abac::{Action, Decision, DenyReason, ResourceAttrs, SubjectAttrs};

pub const ASSIGNEES_MUST_BE_MEMBERS: &str = "All assigned users must be project members";

/// Evaluates bug access policies for an existing member.
pub fn evaluate_bug(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> Decision {
	match action {
		Action::Read | Action::CreateComment => Decision::Allow,
		Action::UpdateBug | Action::DeleteBug => {
			let user_id = subject.user_id;
			if resource.is_author(user_id) || resource.is_assignee(user_id) || subject.is_admin() {
				Decision::Allow
			} else {
				Decision::Deny(DenyReason::InsufficientRole)
			}
		}
		Action::AssignUsers => {
			if resource.target_users.iter().all(|t| t.role.is_some()) {
				Decision::Allow
			} else {
				Decision::Invalid(ASSIGNEES_MUST_BE_MEMBERS.to_string())
			}
		}
		Action::UnassignUsers => Decision::Allow,
		_ => Decision::Deny(DenyReason::InsufficientRole),
	}
}
