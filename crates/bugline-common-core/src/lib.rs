// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain types shared by the Bugline server and client.

pub mod entities;
pub mod ids;
pub mod patch;
pub mod types;

pub use entities::*;
pub use ids::*;
pub use patch::*;
pub use types::*;
