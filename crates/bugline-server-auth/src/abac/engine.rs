// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ABAC policy evaluation engine.
//!
//! [`evaluate`] runs a two-phase check:
//!
//! 1. **Membership gate**: unauthenticated callers and non-members are denied
//!    for everything except creating a new project
//! 2. **Resource-specific policy**: delegates to the project, bug or comment
//!    policy module
//!
//! Decisions are pure functions of their inputs and are never cached, since a
//! membership may change between two calls.

use super::policies::{bug, comment, project};
use super::types::{Action, Decision, DenyReason, ResourceAttrs, ResourceType, SubjectAttrs};
use tracing::instrument;

/// Evaluates whether a subject may perform an action on a resource.
///
/// `subject` is `None` when the request carried no valid credential.
///
/// # Tracing
///
/// Instrumented at debug level; the decision is logged together with the
/// user, action and resource type.
#[instrument(
    level = "debug",
    skip(subject, resource),
    fields(
        user_id = ?subject.map(|s| s.user_id),
        action = ?action,
        resource_type = ?resource.resource_type,
    )
)]
pub fn evaluate(subject: Option<&SubjectAttrs>, action: Action, resource: &ResourceAttrs) -> Decision {
	let decision = decide(subject, action, resource);
	tracing::debug!(?decision, "authorization decision");
	decision
}

/// Convenience wrapper returning only whether the action is allowed.
pub fn is_allowed(subject: &SubjectAttrs, action: Action, resource: &ResourceAttrs) -> bool {
	evaluate(Some(subject), action, resource).is_allowed()
}

fn decide(subject: Option<&SubjectAttrs>, action: Action, resource: &ResourceAttrs) -> Decision {
	let Some(subject) = subject else {
		return Decision::Deny(DenyReason::NotAuthenticated);
	};

	if action == Action::CreateProject {
		return Decision::Allow;
	}

	if resource.project_id.is_none() || !subject.is_member() {
		return Decision::Deny(DenyReason::NotAMember);
	}

	match resource.resource_type {
		ResourceType::Project => project::evaluate_project(subject, action, resource),
		ResourceType::Membership => project::evaluate_membership(subject, action, resource),
		ResourceType::Bug => bug::evaluate_bug(subject, action, resource),
		ResourceType::Comment => comment::evaluate_comment(subject, action, resource),
	}
}
