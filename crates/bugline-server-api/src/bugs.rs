// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bugline_common_core::{BugPriority, BugStatus};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub use bugline_common_core::BugPatch as UpdateBugRequest;

/// Request to file a bug in a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateBugRequest {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<BugStatus>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub priority: Option<BugPriority>,
}

/// Body of the assign and unassign endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AssigneesRequest {
	#[serde(default)]
	pub user_ids: Option<Vec<i64>>,
}

impl AssigneesRequest {
	pub fn new(user_ids: impl IntoIterator<Item = i64>) -> Self {
		Self {
			user_ids: Some(user_ids.into_iter().collect()),
		}
	}
}
