// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for project routes.
//!
//! - Any authenticated user may create a project
//! - Reading a project requires membership
//! - Updating requires ADMIN; deleting requires ADMIN and being the creator

use axum::http::{Method, StatusCode};
use bugline_common_core::ProjectRole;
use bugline_server_db::membership;
use serde_json::json;

use crate::common::{run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn create_and_list_projects() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let cases = [
		AuthzCase {
			name: "outsider_can_create_project",
			method: Method::POST,
			path: "/projects".to_string(),
			user: Some(f.carol.clone()),
			body: Some(json!({"name": "Carol's tracker"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "unauthenticated_cannot_create_project",
			method: Method::POST,
			path: "/projects".to_string(),
			user: None,
			body: Some(json!({"name": "Anonymous"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "blank_project_name_is_rejected",
			method: Method::POST,
			path: "/projects".to_string(),
			user: Some(f.carol.clone()),
			body: Some(json!({"name": "   "})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "member_can_list_projects",
			method: Method::GET,
			path: "/projects".to_string(),
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unauthenticated_cannot_list_projects",
			method: Method::GET,
			path: "/projects".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn get_project_requires_membership() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/projects/{}", f.project.id);
	let cases = [
		AuthzCase {
			name: "admin_can_get_project",
			method: Method::GET,
			path: path.clone(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member_can_get_project",
			method: Method::GET,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_get_project",
			method: Method::GET,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unauthenticated_cannot_get_project",
			method: Method::GET,
			path,
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "missing_project_is_not_found",
			method: Method::GET,
			path: "/projects/9999".to_string(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "malformed_project_id_is_bad_request",
			method: Method::GET,
			path: "/projects/tracker".to_string(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn update_project_requires_admin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/projects/{}", f.project.id);
	let cases = [
		AuthzCase {
			name: "member_cannot_update_project",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"description": "Bob was here"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "outsider_cannot_update_project",
			method: Method::PUT,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"name": "Carol's now"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "empty_update_is_rejected_before_authorization",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_can_update_project",
			method: Method::PATCH,
			path,
			user: Some(f.alice.clone()),
			body: Some(json!({"description": "All the bugs"})),
			expected_status: StatusCode::OK,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn delete_project_requires_creator() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	// A second admin who did not create the project.
	{
		let mut conn = app.state.pool.acquire().await.unwrap();
		membership::change_role(&mut conn, f.project.id, f.bob.user.id, ProjectRole::Admin)
			.await
			.unwrap();
	}

	let path = format!("/projects/{}", f.project.id);
	let cases = [
		AuthzCase {
			name: "outsider_cannot_delete_project",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "non_creator_admin_cannot_delete_project",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "creator_can_delete_project",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "deleted_project_is_gone",
			method: Method::GET,
			path,
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}
