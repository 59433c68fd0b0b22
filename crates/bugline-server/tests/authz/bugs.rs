// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for bug routes.
//!
//! - Any member may read and file bugs
//! - Updating or deleting a bug requires being its author, a current
//!   assignee, or an ADMIN
//! - Assignment targets must be project members

use axum::http::{Method, StatusCode};
use bugline_common_core::ProjectRole;
use bugline_server_db::membership;
use serde_json::json;

use crate::common::{run_authz_cases, AuthzCase, TestApp, TestUser};

/// Register Dave and make him a plain member of the fixture project.
async fn add_dave(app: &TestApp) -> TestUser {
	let dave = app.register("Dave").await;
	let mut conn = app.state.pool.acquire().await.unwrap();
	membership::add_member(
		&mut conn,
		app.fixtures.project.id,
		dave.user.id,
		ProjectRole::Member,
	)
	.await
	.unwrap();
	dave
}

#[tokio::test]
async fn reading_bugs_requires_membership() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let list = format!("/projects/{}/bugs", f.project.id);
	let get = format!("/bugs/{}", f.bug.id);
	let cases = [
		AuthzCase {
			name: "member_can_list_bugs",
			method: Method::GET,
			path: list.clone(),
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_list_bugs",
			method: Method::GET,
			path: list.clone(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unauthenticated_cannot_list_bugs",
			method: Method::GET,
			path: list,
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "bugs_of_missing_project_are_not_found",
			method: Method::GET,
			path: "/projects/9999/bugs".to_string(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_can_get_bug",
			method: Method::GET,
			path: get.clone(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_get_bug",
			method: Method::GET,
			path: get,
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "missing_bug_is_not_found",
			method: Method::GET,
			path: "/bugs/9999".to_string(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "malformed_bug_id_is_bad_request",
			method: Method::GET,
			path: "/bugs/-3".to_string(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn filing_bugs_requires_membership() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/projects/{}/bugs", f.project.id);
	let cases = [
		AuthzCase {
			name: "member_can_file_bug",
			method: Method::POST,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"title": "Login fails", "priority": "high"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "outsider_cannot_file_bug",
			method: Method::POST,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"title": "Drive-by"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "missing_title_is_rejected",
			method: Method::POST,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"description": "no title"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "unknown_status_is_rejected",
			method: Method::POST,
			path,
			user: Some(f.bob.clone()),
			body: Some(json!({"title": "Odd", "status": "blocked"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn updating_bugs_requires_author_assignee_or_admin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let dave = add_dave(&app).await;
	let path = format!("/bugs/{}", f.bug.id);
	let assignees = format!("/bugs/{}/assignees", f.bug.id);
	let cases = [
		AuthzCase {
			name: "author_can_update_bug",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"status": "in_progress"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_can_update_bug",
			method: Method::PUT,
			path: path.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"priority": "top"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unrelated_member_cannot_update_bug",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(dave.clone()),
			body: Some(json!({"title": "Mine now"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "outsider_cannot_update_bug",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"status": "done"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "empty_patch_is_rejected_before_authorization",
			method: Method::PATCH,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "member_can_assign_member",
			method: Method::POST,
			path: assignees,
			user: Some(f.bob.clone()),
			body: Some(json!({"userIds": [dave.user.id]})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "assignee_can_update_bug",
			method: Method::PATCH,
			path,
			user: Some(dave),
			body: Some(json!({"status": "in_review"})),
			expected_status: StatusCode::OK,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn deleting_bugs_requires_author_assignee_or_admin() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let dave = add_dave(&app).await;
	let path = format!("/bugs/{}", f.bug.id);
	let cases = [
		AuthzCase {
			name: "outsider_cannot_delete_bug",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unrelated_member_cannot_delete_bug",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(dave),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_can_delete_bug",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "deleted_bug_is_gone",
			method: Method::GET,
			path,
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn assignment_rules() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let assignees = format!("/bugs/{}/assignees", f.bug.id);
	let all = format!("/bugs/{}/assignees/all", f.bug.id);
	let cases = [
		AuthzCase {
			name: "outsider_cannot_assign",
			method: Method::POST,
			path: assignees.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"userIds": [f.bob.user.id]})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "non_member_target_is_rejected",
			method: Method::POST,
			path: assignees.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"userIds": [f.carol.user.id]})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "empty_user_ids_are_rejected",
			method: Method::POST,
			path: assignees.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"userIds": []})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "duplicate_user_ids_are_rejected",
			method: Method::POST,
			path: assignees.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"userIds": [f.bob.user.id, f.bob.user.id]})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_can_assign_members",
			method: Method::POST,
			path: assignees.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"userIds": [f.alice.user.id, f.bob.user.id]})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_unassign",
			method: Method::DELETE,
			path: assignees.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"userIds": [f.bob.user.id]})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unassigning_a_non_assignee_is_rejected",
			method: Method::DELETE,
			path: assignees.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"userIds": [f.carol.user.id]})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "member_can_unassign",
			method: Method::DELETE,
			path: assignees,
			user: Some(f.bob.clone()),
			body: Some(json!({"userIds": [f.bob.user.id]})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_unassign_all",
			method: Method::DELETE,
			path: all.clone(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_unassign_all",
			method: Method::DELETE,
			path: all,
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];
	run_authz_cases(&app, &cases).await;
}
