// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and authorization for the Bugline server.
//!
//! - [`abac`]: the pure authorization decision engine
//! - [`middleware`]: bearer credential extraction and the [`IdentityProvider`] seam
//! - [`access_token`]: generation and hashing of opaque access tokens

pub mod abac;
pub mod access_token;
pub mod middleware;

pub use abac::{
	evaluate, is_allowed, Action, Decision, DenyReason, ResourceAttrs, ResourceType, SubjectAttrs,
	TargetUserAttr,
};
pub use access_token::{generate_access_token, hash_token, is_access_token, ACCESS_TOKEN_PREFIX};
pub use middleware::{
	authenticate_headers, extract_bearer_token, AuthContext, AuthRequired, CurrentUser,
	IdentityError, IdentityProvider,
};
