// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

/// A non-success response decoded from the server's error body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status} {kind}: {message}")]
pub struct ApiError {
	pub status: u16,
	/// Stable kind from the `error` field, e.g. `access_denied`.
	pub kind: String,
	pub message: String,
	/// Deny reason, present on 403 responses.
	pub reason: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
	#[error("API error: {0}")]
	Api(#[from] ApiError),

	#[error("transport error: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("request timed out after {0:?}")]
	Timeout(Duration),

	#[error("invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("mutation context has no {0}")]
	MissingContext(&'static str),
}

impl ClientError {
	/// The API error, if the server answered.
	pub fn api(&self) -> Option<&ApiError> {
		match self {
			ClientError::Api(err) => Some(err),
			_ => None,
		}
	}

	pub fn status(&self) -> Option<u16> {
		self.api().map(|err| err.status)
	}
}

pub type Result<T> = std::result::Result<T, ClientError>;
