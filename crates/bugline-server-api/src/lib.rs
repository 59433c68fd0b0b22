// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response types shared by the Bugline server and its clients.
//!
//! Entity bodies (`User`, `Project`, `Member`, `Bug`, `Comment`) and sparse
//! patches live in `bugline-common-core` and are re-exported here.

pub mod auth;
pub mod bugs;
pub mod comments;
pub mod error;
pub mod health;
pub mod membership;
pub mod projects;

pub use auth::{RegisterRequest, RegisterResponse};
pub use bugs::{AssigneesRequest, CreateBugRequest, UpdateBugRequest};
pub use comments::{CreateCommentRequest, UpdateCommentRequest};
pub use error::ErrorResponse;
pub use health::HealthResponse;
pub use membership::{AddMemberRequest, ChangeRoleRequest, RemoveMemberRequest};
pub use projects::{CreateProjectRequest, UpdateProjectRequest};

pub use bugline_common_core::{Bug, Comment, Member, Project, User};
