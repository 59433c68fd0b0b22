// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for membership routes.
//!
//! Any member may list members; only ADMINs may add, remove or re-role them.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn listing_members_requires_membership() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/project-membership/members/{}", f.project.id);
	let cases = [
		AuthzCase {
			name: "member_can_list_members",
			method: Method::GET,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_list_members",
			method: Method::GET,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unauthenticated_cannot_list_members",
			method: Method::GET,
			path,
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn managing_members_requires_admin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let add = format!("/project-membership/add/{}", f.project.id);
	let remove = format!("/project-membership/remove/{}", f.project.id);
	let update = format!("/project-membership/update-role/{}", f.project.id);
	let cases = [
		AuthzCase {
			name: "member_cannot_add_member",
			method: Method::POST,
			path: add.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"email": f.carol.user.email})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "outsider_cannot_add_themselves",
			method: Method::POST,
			path: add.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"email": f.carol.user.email})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unknown_email_is_not_found",
			method: Method::POST,
			path: add.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"email": "nobody@example.com"})),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "invalid_role_is_rejected",
			method: Method::POST,
			path: add.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"email": f.carol.user.email, "role": "OWNER"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_can_add_member",
			method: Method::POST,
			path: add.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"email": f.carol.user.email, "role": "member"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "adding_existing_member_conflicts",
			method: Method::POST,
			path: add,
			user: Some(f.alice.clone()),
			body: Some(json!({"email": f.bob.user.email})),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "member_cannot_change_roles",
			method: Method::PATCH,
			path: update.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"email": f.bob.user.email, "role": "ADMIN"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "missing_role_is_rejected",
			method: Method::PATCH,
			path: update.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"email": f.bob.user.email})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_can_promote_member",
			method: Method::PATCH,
			path: update.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"email": f.bob.user.email, "role": "ADMIN"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "creator_cannot_be_demoted",
			method: Method::PATCH,
			path: update,
			user: Some(f.bob.clone()),
			body: Some(json!({"email": f.alice.user.email, "role": "MEMBER"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "member_cannot_remove_member",
			method: Method::DELETE,
			path: remove.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"email": f.bob.user.email})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "creator_cannot_be_removed",
			method: Method::DELETE,
			path: remove.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"email": f.alice.user.email})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "removing_non_member_is_not_found",
			method: Method::DELETE,
			path: remove.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"email": "nobody@example.com"})),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_can_remove_member",
			method: Method::DELETE,
			path: remove,
			user: Some(f.alice.clone()),
			body: Some(json!({"email": f.carol.user.email})),
			expected_status: StatusCode::OK,
		},
	];
	run_authz_cases(&app, &cases).await;
}
