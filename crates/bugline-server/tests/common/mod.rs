// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared harness for router-level tests.
//!
//! Builds the full router over an in-memory database and seeds a project
//! owned by Alice, with Bob as a plain member and Carol as an outsider.

#![allow(dead_code)]

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	response::Response,
	Router,
};
use bugline_common_core::{
	Bug, BugPriority, BugStatus, Comment, Project, ProjectRole, User,
};
use bugline_server::{create_app_state, create_router, AppState};
use bugline_server_auth::generate_access_token;
use bugline_server_db::{bug, comment, membership, testing, NewBug};
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceExt;

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub token: String,
}

impl TestUser {
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.token)
	}
}

#[derive(Clone)]
pub struct Fixtures {
	/// Creator and sole admin of `project`.
	pub alice: TestUser,
	/// Plain member of `project`.
	pub bob: TestUser,
	/// Registered but not a member of `project`.
	pub carol: TestUser,
	pub project: Project,
	/// Filed by Bob, unassigned.
	pub bug: Bug,
	/// Written by Bob on `bug`.
	pub comment: Comment,
}

pub struct TestApp {
	pub router: Router,
	pub state: AppState,
	pub fixtures: Fixtures,
}

impl TestApp {
	pub async fn new() -> Self {
		let pool = testing::create_test_pool().await;
		let state = create_app_state(pool);
		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			state,
			fixtures,
		}
	}

	/// Register a fresh user with their own token.
	pub async fn register(&self, name: &str) -> TestUser {
		create_test_user(&self.state, name).await
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self.send(Method::GET, path, user, None).await
	}

	pub async fn post(&self, path: &str, user: Option<&TestUser>, body: impl Serialize) -> Response<Body> {
		self.send(Method::POST, path, user, Some(encode(body))).await
	}

	pub async fn put(&self, path: &str, user: Option<&TestUser>, body: impl Serialize) -> Response<Body> {
		self.send(Method::PUT, path, user, Some(encode(body))).await
	}

	pub async fn patch(&self, path: &str, user: Option<&TestUser>, body: impl Serialize) -> Response<Body> {
		self.send(Method::PATCH, path, user, Some(encode(body))).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self.send(Method::DELETE, path, user, None).await
	}

	/// DELETE carrying a JSON body, as the unassign and remove-member routes expect.
	pub async fn delete_with_body(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.send(Method::DELETE, path, user, Some(encode(body))).await
	}

	/// Send `body` verbatim as JSON, for malformed-input tests.
	pub async fn send_raw(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: &str,
	) -> Response<Body> {
		self.send(method, path, user, Some(body.to_string())).await
	}

	async fn send(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		json: Option<String>,
	) -> Response<Body> {
		let mut request = Request::builder().method(method).uri(path);
		if let Some(user) = user {
			request = request.header(header::AUTHORIZATION, user.bearer());
		}
		let body = match json {
			Some(json) => {
				request = request.header(header::CONTENT_TYPE, "application/json");
				Body::from(json)
			}
			None => Body::empty(),
		};
		self.router
			.clone()
			.oneshot(request.body(body).unwrap())
			.await
			.unwrap()
	}
}

fn encode(body: impl Serialize) -> String {
	serde_json::to_string(&body).unwrap()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&body).unwrap()
}

/// Assert the status and return the decoded body.
pub async fn expect_json<T: DeserializeOwned>(response: Response<Body>, status: StatusCode) -> T {
	let actual = response.status();
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	assert_eq!(
		actual,
		status,
		"unexpected status, body: {}",
		String::from_utf8_lossy(&body)
	);
	serde_json::from_slice(&body).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

/// Run every case, then fail once listing all mismatches.
pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	let mut failures = Vec::new();
	for case in cases {
		let json = case.body.as_ref().map(encode);
		let response = app
			.send(case.method.clone(), &case.path, case.user.as_ref(), json)
			.await;
		let status = response.status();
		if status != case.expected_status {
			let body = axum::body::to_bytes(response.into_body(), usize::MAX)
				.await
				.unwrap();
			failures.push(format!(
				"{} ({} {}): want {}, got {} {}",
				case.name,
				case.method,
				case.path,
				case.expected_status.as_u16(),
				status.as_u16(),
				String::from_utf8_lossy(&body)
			));
		}
	}
	assert!(failures.is_empty(), "authorization cases failed:\n{}", failures.join("\n"));
}

async fn create_test_user(state: &AppState, name: &str) -> TestUser {
	let (token, token_hash) = generate_access_token();
	let email = format!("{}@example.com", name.to_lowercase());
	let user = state
		.user_repo
		.register(name, &email, &token_hash)
		.await
		.unwrap();
	TestUser { user, token }
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let alice = create_test_user(state, "Alice").await;
	let bob = create_test_user(state, "Bob").await;
	let carol = create_test_user(state, "Carol").await;

	let project = testing::seed_project(&state.pool, &alice.user, "Tracker").await;

	let mut conn = state.pool.acquire().await.unwrap();
	membership::add_member(&mut conn, project.id, bob.user.id, ProjectRole::Member)
		.await
		.unwrap();

	let bug = bug::create_bug(
		&mut conn,
		project.id,
		bob.user.id,
		&NewBug {
			title: "Crash on save".to_string(),
			description: "Stack trace attached".to_string(),
			status: BugStatus::Todo,
			priority: BugPriority::Medium,
		},
	)
	.await
	.unwrap();

	let comment = comment::create_comment(&mut conn, bug.id, bob.user.id, "Happens every time")
		.await
		.unwrap();

	Fixtures {
		alice,
		bob,
		carol,
		project,
		bug,
		comment,
	}
}
