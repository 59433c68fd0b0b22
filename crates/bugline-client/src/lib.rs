// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client library for the Bugline API.
//!
//! [`ApiClient`] is a thin typed wrapper over the HTTP routes.
//! [`MutationCoordinator`] layers optimistic local state on top of any
//! [`Transport`], rolling back when the server refuses a change.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use coordinator::{
	BugDraft, ClientState, CommentDraft, Entry, MutationContext, MutationCoordinator, MutationId,
	MutationKind, MutationRecord, MutationState, ProjectDraft, Resource, TempId,
};
pub use error::{ApiError, ClientError, Result};
pub use transport::Transport;
