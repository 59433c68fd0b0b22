// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identifier newtypes.
//!
//! Every persisted entity is keyed by a positive integer issued by the
//! database. Each entity kind gets its own wrapper so a [`BugId`] can never be
//! passed where a [`ProjectId`] is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when an identifier cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id '{value}': must be a positive integer")]
pub struct IdParseError {
	pub kind: &'static str,
	pub value: String,
}

macro_rules! define_id_type {
	($name:ident, $kind:literal, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
		#[serde(transparent)]
		pub struct $name(i64);

		impl $name {
			/// Wrap a raw database id.
			pub const fn new(id: i64) -> Self {
				Self(id)
			}

			/// Get the inner integer value.
			pub const fn into_inner(self) -> i64 {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<i64> for $name {
			fn from(id: i64) -> Self {
				Self(id)
			}
		}

		impl From<$name> for i64 {
			fn from(id: $name) -> Self {
				id.0
			}
		}

		impl FromStr for $name {
			type Err = IdParseError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s.trim().parse::<i64>() {
					Ok(v) if v > 0 => Ok(Self(v)),
					_ => Err(IdParseError {
						kind: $kind,
						value: s.to_string(),
					}),
				}
			}
		}
	};
}

define_id_type!(UserId, "user", "Unique identifier for a user.");
define_id_type!(ProjectId, "project", "Unique identifier for a project.");
define_id_type!(BugId, "bug", "Unique identifier for a bug.");
define_id_type!(CommentId, "comment", "Unique identifier for a comment.");
