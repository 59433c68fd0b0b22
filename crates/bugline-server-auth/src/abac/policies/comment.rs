// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Comment access policies. Edits are author-only; project admins get no override.

use crate::abac::{Action, Decision, DenyReason, ResourceAttrs, SubjectAttrs};

pub fn evaluate_comment(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> Decision {
	match action {
		Action::Read => Decision::Allow,
		Action::UpdateComment | Action::DeleteComment => {
			if resource.is_author(subject.user_id) {
				Decision::Allow
			} else {
				Decision::Deny(DenyReason::NotOwner)
			}
		}
		_ => Decision::Deny(DenyReason::InsufficientRole),
	}
}
