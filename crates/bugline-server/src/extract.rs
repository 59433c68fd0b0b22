// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request extractors that report failures in the server's error format.

use axum::extract::FromRequest;

use crate::error::ServerError;

/// JSON body extractor whose rejections become `400 validation_error`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);
