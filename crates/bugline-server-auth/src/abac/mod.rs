// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-based access control for projects, bugs and comments.

pub mod engine;
pub mod policies;
pub mod types;

pub use engine::{evaluate, is_allowed};
pub use policies::bug::ASSIGNEES_MUST_BE_MEMBERS;
pub use types::{
	Action, Decision, DenyReason, ResourceAttrs, ResourceType, SubjectAttrs, TargetUserAttr,
};
