// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`Transport`] with scripted outcomes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bugline_common_core::{
	Bug, BugId, BugPatch, Comment, CommentId, CommentPatch, Project, ProjectId, ProjectPatch,
	UserId,
};
use bugline_server_api::CreateBugRequest;
use chrono::Utc;
use tokio::sync::oneshot;

use crate::error::{ApiError, ClientError, Result};
use crate::transport::Transport;

/// How the next request is answered. Unscripted requests are accepted.
pub(crate) enum Plan {
	Reject(u16, &'static str),
	/// Never answer.
	Stall,
	/// Wait for the test: `true` accepts, `false` fails with a 500.
	Gate(oneshot::Receiver<bool>),
}

#[derive(Default)]
struct FakeServer {
	projects: Vec<Project>,
	bugs: Vec<Bug>,
	comments: Vec<Comment>,
	next_id: i64,
}

impl FakeServer {
	fn next_id(&mut self) -> i64 {
		self.next_id += 1;
		self.next_id
	}
}

#[derive(Default)]
pub(crate) struct FakeTransport {
	server: Mutex<FakeServer>,
	plans: Mutex<VecDeque<Plan>>,
	calls: AtomicUsize,
}

fn api_error(status: u16, kind: &str) -> ClientError {
	ClientError::Api(ApiError {
		status,
		kind: kind.to_string(),
		message: format!("scripted {kind}"),
		reason: None,
	})
}

fn not_found(what: &str) -> ClientError {
	api_error(404, &format!("not_found: {what}"))
}

impl FakeTransport {
	pub(crate) fn plan(&self, plan: Plan) {
		self.plans.lock().unwrap().push_back(plan);
	}

	pub(crate) fn plan_outcome(&self, accept: bool) {
		if !accept {
			self.plan(Plan::Reject(500, "internal_error"));
		}
	}

	/// Hold the next request until the returned sender fires.
	pub(crate) fn gate(&self) -> oneshot::Sender<bool> {
		let (tx, rx) = oneshot::channel();
		self.plan(Plan::Gate(rx));
		tx
	}

	pub(crate) fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub(crate) fn seed_project(&self, id: ProjectId, author_id: UserId) -> Project {
		let now = Utc::now();
		let project = Project {
			id,
			name: format!("Project {id}"),
			description: String::new(),
			author_id,
			created_at: now,
			updated_at: now,
		};
		let mut server = self.server.lock().unwrap();
		server.next_id = server.next_id.max(id.into_inner());
		server.projects.push(project.clone());
		project
	}

	pub(crate) fn seed_bug(&self, project_id: ProjectId, author_id: UserId, title: &str) -> Bug {
		let mut server = self.server.lock().unwrap();
		let bug = new_bug(server.next_id(), project_id, author_id, title);
		server.bugs.push(bug.clone());
		bug
	}

	pub(crate) fn bug(&self, id: BugId) -> Option<Bug> {
		self.server
			.lock()
			.unwrap()
			.bugs
			.iter()
			.find(|bug| bug.id == id)
			.cloned()
	}

	/// Bugs in a project, newest first.
	pub(crate) fn list_bugs_sync(&self, project_id: ProjectId) -> Vec<Bug> {
		let mut bugs: Vec<Bug> = self
			.server
			.lock()
			.unwrap()
			.bugs
			.iter()
			.filter(|bug| bug.project_id == project_id)
			.cloned()
			.collect();
		bugs.sort_by(|a, b| b.id.cmp(&a.id));
		bugs
	}

	async fn answer(&self) -> Result<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let plan = self.plans.lock().unwrap().pop_front();
		match plan {
			None => Ok(()),
			Some(Plan::Reject(status, kind)) => Err(api_error(status, kind)),
			Some(Plan::Stall) => std::future::pending().await,
			Some(Plan::Gate(rx)) => match rx.await {
				Ok(true) => Ok(()),
				_ => Err(api_error(500, "internal_error")),
			},
		}
	}

	fn update_bug_with(&self, id: BugId, f: impl FnOnce(&mut Bug)) -> Result<Bug> {
		let mut server = self.server.lock().unwrap();
		let bug = server
			.bugs
			.iter_mut()
			.find(|bug| bug.id == id)
			.ok_or_else(|| not_found("bug"))?;
		f(bug);
		bug.updated_at = Utc::now();
		Ok(bug.clone())
	}
}

fn new_bug(id: i64, project_id: ProjectId, author_id: UserId, title: &str) -> Bug {
	let now = Utc::now();
	Bug {
		id: BugId::new(id),
		title: title.to_string(),
		description: String::new(),
		status: Default::default(),
		priority: Default::default(),
		project_id,
		author_id,
		assignees: Vec::new(),
		created_at: now,
		updated_at: now,
	}
}

#[async_trait]
impl Transport for FakeTransport {
	async fn list_projects(&self) -> Result<Vec<Project>> {
		self.answer().await?;
		Ok(self.server.lock().unwrap().projects.clone())
	}

	async fn create_project(&self, name: &str, description: Option<&str>) -> Result<Project> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let now = Utc::now();
		let project = Project {
			id: ProjectId::new(server.next_id()),
			name: name.to_string(),
			description: description.unwrap_or_default().to_string(),
			author_id: UserId::new(1),
			created_at: now,
			updated_at: now,
		};
		server.projects.push(project.clone());
		Ok(project)
	}

	async fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let project = server
			.projects
			.iter_mut()
			.find(|project| project.id == id)
			.ok_or_else(|| not_found("project"))?;
		patch.apply_to(project);
		project.updated_at = Utc::now();
		Ok(project.clone())
	}

	async fn delete_project(&self, id: ProjectId) -> Result<Project> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let index = server
			.projects
			.iter()
			.position(|project| project.id == id)
			.ok_or_else(|| not_found("project"))?;
		Ok(server.projects.remove(index))
	}

	async fn list_bugs(&self, project_id: ProjectId) -> Result<Vec<Bug>> {
		self.answer().await?;
		Ok(self.list_bugs_sync(project_id))
	}

	async fn create_bug(&self, project_id: ProjectId, request: &CreateBugRequest) -> Result<Bug> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let id = server.next_id();
		let mut bug = new_bug(
			id,
			project_id,
			UserId::new(1),
			request.title.as_deref().unwrap_or_default(),
		);
		bug.description = request.description.clone().unwrap_or_default();
		bug.status = request.status.unwrap_or_default();
		bug.priority = request.priority.unwrap_or_default();
		server.bugs.push(bug.clone());
		Ok(bug)
	}

	async fn update_bug(&self, id: BugId, patch: &BugPatch) -> Result<Bug> {
		self.answer().await?;
		self.update_bug_with(id, |bug| patch.apply_to(bug))
	}

	async fn delete_bug(&self, id: BugId) -> Result<Bug> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let index = server
			.bugs
			.iter()
			.position(|bug| bug.id == id)
			.ok_or_else(|| not_found("bug"))?;
		server.comments.retain(|comment| comment.bug_id != id);
		Ok(server.bugs.remove(index))
	}

	async fn assign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug> {
		self.answer().await?;
		self.update_bug_with(id, |bug| {
			bug.assignees.extend_from_slice(user_ids);
			bug.assignees.sort();
			bug.assignees.dedup();
		})
	}

	async fn unassign_users(&self, id: BugId, user_ids: &[UserId]) -> Result<Bug> {
		self.answer().await?;
		self.update_bug_with(id, |bug| bug.assignees.retain(|u| !user_ids.contains(u)))
	}

	async fn unassign_all(&self, id: BugId) -> Result<Bug> {
		self.answer().await?;
		self.update_bug_with(id, |bug| bug.assignees.clear())
	}

	async fn list_comments(&self, bug_id: BugId) -> Result<Vec<Comment>> {
		self.answer().await?;
		let server = self.server.lock().unwrap();
		Ok(server
			.comments
			.iter()
			.filter(|comment| comment.bug_id == bug_id)
			.cloned()
			.collect())
	}

	async fn create_comment(&self, bug_id: BugId, content: &str) -> Result<Comment> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let now = Utc::now();
		let comment = Comment {
			id: CommentId::new(server.next_id()),
			content: content.to_string(),
			author_id: UserId::new(1),
			bug_id,
			created_at: now,
			updated_at: now,
		};
		server.comments.push(comment.clone());
		Ok(comment)
	}

	async fn update_comment(&self, id: CommentId, patch: &CommentPatch) -> Result<Comment> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let comment = server
			.comments
			.iter_mut()
			.find(|comment| comment.id == id)
			.ok_or_else(|| not_found("comment"))?;
		patch.apply_to(comment);
		comment.updated_at = Utc::now();
		Ok(comment.clone())
	}

	async fn delete_comment(&self, id: CommentId) -> Result<Comment> {
		self.answer().await?;
		let mut server = self.server.lock().unwrap();
		let index = server
			.comments
			.iter()
			.position(|comment| comment.id == id)
			.ok_or_else(|| not_found("comment"))?;
		Ok(server.comments.remove(index))
	}
}
