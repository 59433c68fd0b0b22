// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for comment routes.
//!
//! Any member may read and write comments. Only the author may edit or
//! delete one, project admins included.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn reading_and_writing_comments_requires_membership() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let list = format!("/bugs/{}/comments", f.bug.id);
	let get = format!("/comments/{}", f.comment.id);
	let cases = [
		AuthzCase {
			name: "member_can_list_comments",
			method: Method::GET,
			path: list.clone(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_list_comments",
			method: Method::GET,
			path: list.clone(),
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_get_comment",
			method: Method::GET,
			path: get.clone(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_get_comment",
			method: Method::GET,
			path: get,
			user: Some(f.carol.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "missing_comment_is_not_found",
			method: Method::GET,
			path: "/comments/9999".to_string(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "member_can_comment",
			method: Method::POST,
			path: list.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"content": "Looking into it"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "outsider_cannot_comment",
			method: Method::POST,
			path: list.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"content": "Me too"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "blank_comment_is_rejected",
			method: Method::POST,
			path: list,
			user: Some(f.alice.clone()),
			body: Some(json!({"content": "  "})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "comment_on_missing_bug_is_not_found",
			method: Method::POST,
			path: "/bugs/9999/comments".to_string(),
			user: Some(f.alice.clone()),
			body: Some(json!({"content": "Hello?"})),
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn editing_comments_is_author_only() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/comments/{}", f.comment.id);
	let cases = [
		AuthzCase {
			name: "admin_cannot_edit_others_comment",
			method: Method::PUT,
			path: path.clone(),
			user: Some(f.alice.clone()),
			body: Some(json!({"content": "Moderated"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "outsider_cannot_edit_comment",
			method: Method::PUT,
			path: path.clone(),
			user: Some(f.carol.clone()),
			body: Some(json!({"content": "Spam"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "empty_comment_patch_is_rejected",
			method: Method::PUT,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "author_can_edit_comment",
			method: Method::PUT,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: Some(json!({"content": "Happens on every save"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_cannot_delete_others_comment",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.alice.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "author_can_delete_comment",
			method: Method::DELETE,
			path: path.clone(),
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "deleted_comment_is_gone",
			method: Method::GET,
			path,
			user: Some(f.bob.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];
	run_authz_cases(&app, &cases).await;
}
