// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The request surface the mutation coordinator depends on.

use async_trait::async_trait;
use bugline_common_core::{
	Bug, BugId, BugPatch, Comment, CommentId, CommentPatch, Project, ProjectId, ProjectPatch,
	UserId,
};
use bugline_server_api::CreateBugRequest;

use crate::client::ApiClient;
use crate::error::Result;

/// Remote operations backing optimistic mutations.
///
/// [`ApiClient`] is the production implementation. Every call resolves to
/// the canonical entity as stored by the server.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn list_projects(&self) -> Result<Vec<Project>>;
	async fn create_project(&self, name: &str, description: Option<&str>) -> Result<Project>;
	async fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project>;
	async fn delete_project(&self, id: ProjectId) -> Result<Project>;

	async fn list_bugs(&self, project_id: ProjectId) -> Result<Vec<Bug>>;
	async fn create_bug(&self, project_id: ProjectId, request: &CreateBugRequest) -> Result<Bug>;
	async fn update_bug(&self, id: BugId, patch: &BugPatch) -> Result<Bug>;
	async fn delete_bug(&self, id: BugId) -> Result<Bug>;
	async fn assign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug>;
	async fn unassign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug>;
	async fn unassign_all(&self, id: BugId) -> Result<Bug>;

	async fn list_comments(&self, bug_id: BugId) -> Result<Vec<Comment>>;
	async fn create_comment(&self, bug_id: BugId, content: &str) -> Result<Comment>;
	async fn update_comment(&self, id: CommentId, patch: &CommentPatch) -> Result<Comment>;
	async fn delete_comment(&self, id: CommentId) -> Result<Comment>;
}

#[async_trait]
impl Transport for ApiClient {
	async fn list_projects(&self) -> Result<Vec<Project>> {
		ApiClient::list_projects(self).await
	}

	async fn create_project(&self, name: &str, description: Option<&str>) -> Result<Project> {
		ApiClient::create_project(self, name, description).await
	}

	async fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project> {
		ApiClient::update_project(self, id, patch).await
	}

	async fn delete_project(&self, id: ProjectId) -> Result<Project> {
		ApiClient::delete_project(self, id).await
	}

	async fn list_bugs(&self, project_id: ProjectId) -> Result<Vec<Bug>> {
		ApiClient::list_bugs(self, project_id).await
	}

	async fn create_bug(&self, project_id: ProjectId, request: &CreateBugRequest) -> Result<Bug> {
		ApiClient::create_bug(self, project_id, request).await
	}

	async fn update_bug(&self, id: BugId, patch: &BugPatch) -> Result<Bug> {
		ApiClient::update_bug(self, id, patch).await
	}

	async fn delete_bug(&self, id: BugId) -> Result<Bug> {
		ApiClient::delete_bug(self, id).await
	}

	async fn assign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug> {
		ApiClient::assign_users(self, id, user_ids).await
	}

	async fn unassign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug> {
		ApiClient::unassign_users(self, id, user_ids).await
	}

	async fn unassign_all(&self, id: BugId) -> Result<Bug> {
		ApiClient::unassign_all(self, id).await
	}

	async fn list_comments(&self, bug_id: BugId) -> Result<Vec<Comment>> {
		ApiClient::list_comments(self, bug_id).await
	}

	async fn create_comment(&self, bug_id: BugId, content: &str) -> Result<Comment> {
		ApiClient::create_comment(self, bug_id, content).await
	}

	async fn update_comment(&self, id: CommentId, patch: &CommentPatch) -> Result<Comment> {
		ApiClient::update_comment(self, id, patch).await
	}

	async fn delete_comment(&self, id: CommentId) -> Result<Comment> {
		ApiClient::delete_comment(self, id).await
	}
}
