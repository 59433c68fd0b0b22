// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bugline issue tracker server.
//!
//! Serves projects, bugs, comments and memberships over JSON/HTTP. Every
//! mutation is authorized against the caller's current project role and
//! applied inside a single SQLite transaction.

pub mod api;
pub mod api_docs;
pub mod auth_middleware;
pub mod error;
pub mod extract;
pub mod routes;
pub mod store;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use bugline_server_config::ServerConfig;
pub use error::ServerError;
pub use store::ResourceStore;
