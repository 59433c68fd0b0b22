// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for identity routes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{run_authz_cases, AuthzCase, TestApp, TestUser};

#[tokio::test]
async fn identity_routes_require_a_token() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let forged = TestUser {
		user: f.carol.user.clone(),
		token: "bl_not-a-real-token".to_string(),
	};
	let wrong_prefix = TestUser {
		user: f.carol.user.clone(),
		token: "sk_123".to_string(),
	};

	let cases = [
		AuthzCase {
			name: "me_with_token",
			method: Method::GET,
			path: "/auth/me".to_string(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "me_without_token",
			method: Method::GET,
			path: "/auth/me".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "me_with_unknown_token",
			method: Method::GET,
			path: "/auth/me".to_string(),
			user: Some(forged),
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "me_with_foreign_token",
			method: Method::GET,
			path: "/auth/me".to_string(),
			user: Some(wrong_prefix),
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "list_users_with_token",
			method: Method::GET,
			path: "/users".to_string(),
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "list_users_without_token",
			method: Method::GET,
			path: "/users".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "update_own_profile",
			method: Method::PUT,
			path: "/users".to_string(),
			user: Some(f.carol.clone()),
			body: Some(json!({"name": "Caroline"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "update_profile_without_token",
			method: Method::PUT,
			path: "/users".to_string(),
			user: None,
			body: Some(json!({"name": "Mallory"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "update_profile_to_taken_email",
			method: Method::PATCH,
			path: "/users".to_string(),
			user: Some(f.carol.clone()),
			body: Some(json!({"email": "Alice@example.com"})),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "update_profile_with_no_fields",
			method: Method::PUT,
			path: "/users".to_string(),
			user: Some(f.carol.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn public_routes_need_no_token() {
	let app = TestApp::new().await;
	let cases = [
		AuthzCase {
			name: "health",
			method: Method::GET,
			path: "/health".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "openapi_document",
			method: Method::GET,
			path: "/api-docs/openapi.json".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "register",
			method: Method::POST,
			path: "/auth/register".to_string(),
			user: None,
			body: Some(json!({"name": "Dave", "email": "dave@example.com"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "register_duplicate_email",
			method: Method::POST,
			path: "/auth/register".to_string(),
			user: None,
			body: Some(json!({"name": "Dave Again", "email": "DAVE@example.com"})),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "register_invalid_email",
			method: Method::POST,
			path: "/auth/register".to_string(),
			user: None,
			body: Some(json!({"name": "Eve", "email": "not-an-email"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "register_missing_name",
			method: Method::POST,
			path: "/auth/register".to_string(),
			user: None,
			body: Some(json!({"email": "eve@example.com"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}
