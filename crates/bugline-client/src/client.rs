// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed HTTP client for the Bugline server.

use bugline_common_core::{
	Bug, BugId, BugPatch, Comment, CommentId, CommentPatch, Member, Project, ProjectId,
	ProjectPatch, ProjectRole, User, UserId, UserPatch,
};
use bugline_server_api::{
	AddMemberRequest, AssigneesRequest, ChangeRoleRequest, CreateBugRequest, CreateCommentRequest,
	CreateProjectRequest, ErrorResponse, HealthResponse, RegisterRequest, RegisterResponse,
	RemoveMemberRequest,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, Result};

/// Client for the Bugline JSON API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
	base_url: Url,
	http: reqwest::Client,
	token: Option<String>,
	timeout: Duration,
}

impl ApiClient {
	pub fn new(config: ClientConfig) -> Result<Self> {
		let mut base_url = Url::parse(&config.base_url)?;
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());
			base_url.set_path(&path);
		}

		let http = reqwest::Client::builder()
			.user_agent(config.user_agent)
			.timeout(config.timeout)
			.build()?;

		Ok(Self {
			base_url,
			http,
			token: None,
			timeout: config.timeout,
		})
	}

	/// Attach the bearer credential sent with every request.
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());
		self
	}

	pub fn set_token(&mut self, token: Option<String>) {
		self.token = token;
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
		let url = self.base_url.join(path.trim_start_matches('/'))?;
		let mut req = self.http.request(method, url);
		if let Some(token) = &self.token {
			req = req.header("Authorization", format!("Bearer {token}"));
		}
		Ok(req)
	}

	async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
		let response = req.send().await.map_err(|err| self.transport_error(err))?;
		let response = check_status(response).await?;
		let body = response.bytes().await.map_err(|err| self.transport_error(err))?;
		Ok(serde_json::from_slice(&body)?)
	}

	async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
		let req = self.request(method.clone(), path)?;
		tracing::debug!(%method, path, "bugline request");
		self.send(req).await
	}

	async fn call_json<B: Serialize + ?Sized, T: DeserializeOwned>(
		&self,
		method: Method,
		path: &str,
		body: &B,
	) -> Result<T> {
		let req = self.request(method.clone(), path)?.json(body);
		tracing::debug!(%method, path, "bugline request");
		self.send(req).await
	}

	fn transport_error(&self, err: reqwest::Error) -> ClientError {
		if err.is_timeout() {
			ClientError::Timeout(self.timeout)
		} else {
			ClientError::Transport(err)
		}
	}

	// ---------------------------------------------------------------------
	// Users
	// ---------------------------------------------------------------------

	pub async fn health(&self) -> Result<HealthResponse> {
		self.call(Method::GET, "health").await
	}

	pub async fn register(&self, name: &str, email: &str) -> Result<RegisterResponse> {
		let body = RegisterRequest {
			name: Some(name.to_string()),
			email: Some(email.to_string()),
		};
		self.call_json(Method::POST, "auth/register", &body).await
	}

	pub async fn me(&self) -> Result<User> {
		self.call(Method::GET, "auth/me").await
	}

	pub async fn list_users(&self) -> Result<Vec<User>> {
		self.call(Method::GET, "users").await
	}

	/// Change the authenticated user's name or email.
	pub async fn update_me(&self, patch: &UserPatch) -> Result<User> {
		self.call_json(Method::PUT, "users", patch).await
	}

	// ---------------------------------------------------------------------
	// Projects
	// ---------------------------------------------------------------------

	pub async fn list_projects(&self) -> Result<Vec<Project>> {
		self.call(Method::GET, "projects").await
	}

	pub async fn create_project(&self, name: &str, description: Option<&str>) -> Result<Project> {
		let body = CreateProjectRequest {
			name: Some(name.to_string()),
			description: description.map(str::to_string),
		};
		self.call_json(Method::POST, "projects", &body).await
	}

	pub async fn get_project(&self, id: ProjectId) -> Result<Project> {
		self.call(Method::GET, &format!("projects/{id}")).await
	}

	pub async fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project> {
		self.call_json(Method::PATCH, &format!("projects/{id}"), patch)
			.await
	}

	pub async fn delete_project(&self, id: ProjectId) -> Result<Project> {
		self.call(Method::DELETE, &format!("projects/{id}")).await
	}

	// ---------------------------------------------------------------------
	// Bugs
	// ---------------------------------------------------------------------

	pub async fn list_bugs(&self, project_id: ProjectId) -> Result<Vec<Bug>> {
		self.call(Method::GET, &format!("projects/{project_id}/bugs"))
			.await
	}

	pub async fn create_bug(&self, project_id: ProjectId, request: &CreateBugRequest) -> Result<Bug> {
		self.call_json(Method::POST, &format!("projects/{project_id}/bugs"), request)
			.await
	}

	pub async fn get_bug(&self, id: BugId) -> Result<Bug> {
		self.call(Method::GET, &format!("bugs/{id}")).await
	}

	pub async fn update_bug(&self, id: BugId, patch: &BugPatch) -> Result<Bug> {
		self.call_json(Method::PATCH, &format!("bugs/{id}"), patch).await
	}

	pub async fn delete_bug(&self, id: BugId) -> Result<Bug> {
		self.call(Method::DELETE, &format!("bugs/{id}")).await
	}

	pub async fn assign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug> {
		let body = AssigneesRequest::new(user_ids.iter().map(|u| u.into_inner()));
		self.call_json(Method::POST, &format!("bugs/{id}/assignees"), &body)
			.await
	}

	pub async fn unassign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug> {
		let body = AssigneesRequest::new(user_ids.iter().map(|u| u.into_inner()));
		self.call_json(Method::DELETE, &format!("bugs/{id}/assignees"), &body)
			.await
	}

	pub async fn unassign_all(&self, id: BugId) -> Result<Bug> {
		self.call(Method::DELETE, &format!("bugs/{id}/assignees/all"))
			.await
	}

	// ---------------------------------------------------------------------
	// Comments
	// ---------------------------------------------------------------------

	pub async fn list_comments(&self, bug_id: BugId) -> Result<Vec<Comment>> {
		self.call(Method::GET, &format!("bugs/{bug_id}/comments")).await
	}

	pub async fn create_comment(&self, bug_id: BugId, content: &str) -> Result<Comment> {
		let body = CreateCommentRequest {
			content: Some(content.to_string()),
		};
		self.call_json(Method::POST, &format!("bugs/{bug_id}/comments"), &body)
			.await
	}

	pub async fn get_comment(&self, id: CommentId) -> Result<Comment> {
		self.call(Method::GET, &format!("comments/{id}")).await
	}

	pub async fn update_comment(&self, id: CommentId, patch: &CommentPatch) -> Result<Comment> {
		self.call_json(Method::PUT, &format!("comments/{id}"), patch)
			.await
	}

	pub async fn delete_comment(&self, id: CommentId) -> Result<Comment> {
		self.call(Method::DELETE, &format!("comments/{id}")).await
	}

	// ---------------------------------------------------------------------
	// Membership
	// ---------------------------------------------------------------------

	pub async fn list_members(&self, project_id: ProjectId) -> Result<Vec<Member>> {
		self.call(
			Method::GET,
			&format!("project-membership/members/{project_id}"),
		)
		.await
	}

	pub async fn add_member(
		&self,
		project_id: ProjectId,
		email: &str,
		role: Option<ProjectRole>,
	) -> Result<Member> {
		let body = AddMemberRequest {
			email: Some(email.to_string()),
			role: role.map(|r| r.as_str().to_string()),
		};
		self.call_json(
			Method::POST,
			&format!("project-membership/add/{project_id}"),
			&body,
		)
		.await
	}

	pub async fn remove_member(&self, project_id: ProjectId, email: &str) -> Result<Member> {
		let body = RemoveMemberRequest {
			email: Some(email.to_string()),
		};
		self.call_json(
			Method::DELETE,
			&format!("project-membership/remove/{project_id}"),
			&body,
		)
		.await
	}

	pub async fn change_role(
		&self,
		project_id: ProjectId,
		email: &str,
		role: ProjectRole,
	) -> Result<Member> {
		let body = ChangeRoleRequest {
			email: Some(email.to_string()),
			role: Some(role.as_str().to_string()),
		};
		self.call_json(
			Method::PATCH,
			&format!("project-membership/update-role/{project_id}"),
			&body,
		)
		.await
	}
}

/// Turn a non-success response into [`ClientError::Api`].
async fn check_status(response: Response) -> Result<Response> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let body = response.text().await.unwrap_or_default();
	let err = api_error_from_body(status.as_u16(), &body);
	tracing::debug!(status = err.status, kind = %err.kind, "bugline request failed");
	Err(err.into())
}

/// Decode `{error, message, reason?}`, falling back to the raw body.
pub(crate) fn api_error_from_body(status: u16, body: &str) -> ApiError {
	match serde_json::from_str::<ErrorResponse>(body) {
		Ok(parsed) => ApiError {
			status,
			kind: parsed.error,
			message: parsed.message,
			reason: parsed.reason,
		},
		Err(_) => ApiError {
			status,
			kind: "http_error".to_string(),
			message: if body.is_empty() {
				format!("HTTP {status}")
			} else {
				body.to_string()
			},
			reason: None,
		},
	}
}
