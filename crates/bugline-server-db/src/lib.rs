// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the Bugline server.
//!
//! Query functions take a `&mut SqliteConnection` so that the server can run
//! an authorization lookup and the mutation it gates inside one transaction.
//! Transactions that write open with [`begin_write`]. [`UserRepository`]
//! wraps the user queries for pool-level callers.

pub mod bug;
pub mod comment;
pub mod error;
pub mod membership;
pub mod pool;
pub mod project;
pub mod testing;
mod types;
pub mod user;

pub use bug::NewBug;
pub use error::{DbError, Result};
pub use membership::LAST_ADMIN_MESSAGE;
pub use pool::{begin_write, create_pool, run_migrations, BUSY_TIMEOUT};
pub use user::{UserRepository, UserStore};

pub use sqlx::sqlite::{SqliteConnection, SqlitePool};
