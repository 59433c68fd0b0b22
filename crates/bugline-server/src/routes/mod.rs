// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers, one module per resource.

pub mod auth;
pub mod bugs;
pub mod comments;
pub mod docs;
pub mod health;
pub mod membership;
pub mod projects;
pub mod users;
