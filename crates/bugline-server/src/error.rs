// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error taxonomy and its HTTP mapping.

use axum::{
	extract::rejection::JsonRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use bugline_server_auth::DenyReason;
use bugline_server_db::DbError;

pub use bugline_server_api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("{0}")]
	Validation(String),

	#[error("Authentication required")]
	NotAuthenticated,

	#[error("{}", .0.message())]
	AccessDenied(DenyReason),

	#[error("{0}")]
	NotFound(String),

	#[error("{0}")]
	Conflict(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl ServerError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			ServerError::Validation(_) => StatusCode::BAD_REQUEST,
			ServerError::NotAuthenticated => StatusCode::UNAUTHORIZED,
			ServerError::AccessDenied(_) => StatusCode::FORBIDDEN,
			ServerError::NotFound(_) => StatusCode::NOT_FOUND,
			ServerError::Conflict(_) => StatusCode::CONFLICT,
			ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Stable machine-readable kind carried in the `error` field.
	pub fn kind(&self) -> &'static str {
		match self {
			ServerError::Validation(_) => "validation_error",
			ServerError::NotAuthenticated => "not_authenticated",
			ServerError::AccessDenied(_) => "access_denied",
			ServerError::NotFound(_) => "not_found",
			ServerError::Conflict(_) => "conflict",
			ServerError::Internal(_) => "internal_error",
		}
	}

	fn to_response_body(&self) -> ErrorResponse {
		match self {
			ServerError::Internal(detail) => {
				tracing::error!(error = %detail, "internal server error");
				ErrorResponse::new(self.kind(), "Internal server error")
			}
			ServerError::AccessDenied(reason) => {
				ErrorResponse::new(self.kind(), reason.message()).with_reason(reason.as_str())
			}
			other => ErrorResponse::new(other.kind(), other.to_string()),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		(self.status_code(), Json(self.to_response_body())).into_response()
	}
}

impl From<DbError> for ServerError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::NotFound(msg) => ServerError::NotFound(msg),
			DbError::Conflict(msg) => ServerError::Conflict(msg),
			DbError::Validation(msg) => ServerError::Validation(msg),
			other => ServerError::Internal(other.to_string()),
		}
	}
}

impl From<sqlx::Error> for ServerError {
	fn from(err: sqlx::Error) -> Self {
		DbError::from(err).into()
	}
}

impl From<JsonRejection> for ServerError {
	fn from(rejection: JsonRejection) -> Self {
		ServerError::Validation(rejection.body_text())
	}
}
