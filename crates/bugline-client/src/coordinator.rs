// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Optimistic mutation coordinator.
//!
//! Every mutation applies a tentative change to local state, sends the
//! request through a [`Transport`], and then settles: on success the local
//! value is replaced with the server's canonical entity, on failure the
//! tentative change is undone. Each mutation walks `Pending -> Committed` or
//! `Pending -> RolledBack`, and every state transition publishes exactly one
//! [`ClientState`] snapshot on a `tokio::sync::watch` channel.
//!
//! Mutations on the same resource are not queued. A failed update restores
//! the snapshot taken when *that* mutation started, so when two updates
//! overlap and both fail, whichever settles last decides the visible value.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bugline_common_core::{
	Bug, BugId, BugPatch, BugPriority, BugStatus, Comment, CommentId, CommentPatch, Project,
	ProjectId, ProjectPatch, UserId,
};
use bugline_server_api::CreateBugRequest;
use tokio::sync::watch;

use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// Settled mutation records kept for observers. Pending records are never pruned.
const MAX_SETTLED_RECORDS: usize = 32;

// =============================================================================
// Identity and context
// =============================================================================

/// Who is mutating, and in which project. Passed to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationContext {
	pub actor_id: UserId,
	pub project_id: Option<ProjectId>,
}

impl MutationContext {
	pub fn new(actor_id: UserId) -> Self {
		Self {
			actor_id,
			project_id: None,
		}
	}

	pub fn in_project(mut self, project_id: ProjectId) -> Self {
		self.project_id = Some(project_id);
		self
	}

	fn require_project(&self) -> Result<ProjectId> {
		self.project_id.ok_or(ClientError::MissingContext("project"))
	}
}

/// Client-local identifier of an entity the server has not yet acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TempId(u64);

impl TempId {
	pub fn into_inner(self) -> u64 {
		self.0
	}
}

impl fmt::Display for TempId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "tmp-{}", self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationId(u64);

impl fmt::Display for MutationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

// =============================================================================
// Entries
// =============================================================================

/// An entity kind the coordinator can hold locally.
pub trait Resource: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
	type Id: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;
	/// Local stand-in shown while a create is in flight.
	type Draft: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;
	/// Listing order the server returns. New entries go at the head when
	/// true and at the tail otherwise.
	const NEWEST_FIRST: bool;

	fn id(&self) -> Self::Id;
	fn entries(state: &ClientState) -> &[Entry<Self>];
	fn entries_mut(state: &mut ClientState) -> &mut Vec<Entry<Self>>;
}

/// A locally visible entity: either awaiting the server or canonical.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<R: Resource> {
	Tentative { temp_id: TempId, draft: R::Draft },
	Committed(R),
}

impl<R: Resource> Entry<R> {
	pub fn committed(&self) -> Option<&R> {
		match self {
			Entry::Committed(resource) => Some(resource),
			Entry::Tentative { .. } => None,
		}
	}

	fn committed_mut(&mut self) -> Option<&mut R> {
		match self {
			Entry::Committed(resource) => Some(resource),
			Entry::Tentative { .. } => None,
		}
	}

	fn into_committed(self) -> Option<R> {
		match self {
			Entry::Committed(resource) => Some(resource),
			Entry::Tentative { .. } => None,
		}
	}

	pub fn temp_id(&self) -> Option<TempId> {
		match self {
			Entry::Tentative { temp_id, .. } => Some(*temp_id),
			Entry::Committed(_) => None,
		}
	}

	pub fn is_tentative(&self) -> bool {
		matches!(self, Entry::Tentative { .. })
	}

	fn has_id(&self, id: R::Id) -> bool {
		self.committed().is_some_and(|resource| resource.id() == id)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
	pub name: String,
	pub description: String,
	pub author_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugDraft {
	pub project_id: ProjectId,
	pub author_id: UserId,
	pub title: String,
	pub description: String,
	pub status: BugStatus,
	pub priority: BugPriority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
	pub bug_id: BugId,
	pub author_id: UserId,
	pub content: String,
}

impl Resource for Project {
	type Id = ProjectId;
	type Draft = ProjectDraft;
	const NEWEST_FIRST: bool = false;

	fn id(&self) -> ProjectId {
		self.id
	}

	fn entries(state: &ClientState) -> &[Entry<Self>] {
		&state.projects
	}

	fn entries_mut(state: &mut ClientState) -> &mut Vec<Entry<Self>> {
		&mut state.projects
	}
}

impl Resource for Bug {
	type Id = BugId;
	type Draft = BugDraft;
	const NEWEST_FIRST: bool = true;

	fn id(&self) -> BugId {
		self.id
	}

	fn entries(state: &ClientState) -> &[Entry<Self>] {
		&state.bugs
	}

	fn entries_mut(state: &mut ClientState) -> &mut Vec<Entry<Self>> {
		&mut state.bugs
	}
}

impl Resource for Comment {
	type Id = CommentId;
	type Draft = CommentDraft;
	const NEWEST_FIRST: bool = false;

	fn id(&self) -> CommentId {
		self.id
	}

	fn entries(state: &ClientState) -> &[Entry<Self>] {
		&state.comments
	}

	fn entries_mut(state: &mut ClientState) -> &mut Vec<Entry<Self>> {
		&mut state.comments
	}
}

// =============================================================================
// Mutation records and state
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
	CreateProject,
	UpdateProject,
	DeleteProject,
	CreateBug,
	UpdateBug,
	DeleteBug,
	AssignUsers,
	UnassignUsers,
	UnassignAll,
	CreateComment,
	UpdateComment,
	DeleteComment,
}

impl MutationKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			MutationKind::CreateProject => "create_project",
			MutationKind::UpdateProject => "update_project",
			MutationKind::DeleteProject => "delete_project",
			MutationKind::CreateBug => "create_bug",
			MutationKind::UpdateBug => "update_bug",
			MutationKind::DeleteBug => "delete_bug",
			MutationKind::AssignUsers => "assign_users",
			MutationKind::UnassignUsers => "unassign_users",
			MutationKind::UnassignAll => "unassign_all",
			MutationKind::CreateComment => "create_comment",
			MutationKind::UpdateComment => "update_comment",
			MutationKind::DeleteComment => "delete_comment",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
	Pending,
	Committed,
	RolledBack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
	pub id: MutationId,
	pub kind: MutationKind,
	pub actor_id: UserId,
	pub state: MutationState,
}

/// Everything the coordinator shows locally. Published whole on every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
	pub projects: Vec<Entry<Project>>,
	/// Newest first, matching the server's listing order.
	pub bugs: Vec<Entry<Bug>>,
	pub comments: Vec<Entry<Comment>>,
	pub mutations: Vec<MutationRecord>,
	/// Incremented once per transition.
	pub version: u64,
}

impl ClientState {
	pub fn find<R: Resource>(&self, id: R::Id) -> Option<&R> {
		R::entries(self)
			.iter()
			.find_map(|entry| entry.committed().filter(|resource| resource.id() == id))
	}

	pub fn bug(&self, id: BugId) -> Option<&Bug> {
		self.find::<Bug>(id)
	}

	pub fn comment(&self, id: CommentId) -> Option<&Comment> {
		self.find::<Comment>(id)
	}

	pub fn project(&self, id: ProjectId) -> Option<&Project> {
		self.find::<Project>(id)
	}

	pub fn mutation(&self, id: MutationId) -> Option<&MutationRecord> {
		self.mutations.iter().find(|record| record.id == id)
	}

	pub fn pending_count(&self) -> usize {
		self.mutations
			.iter()
			.filter(|record| record.state == MutationState::Pending)
			.count()
	}

	fn settle_record(&mut self, id: MutationId, outcome: MutationState) {
		if let Some(record) = self.mutations.iter_mut().find(|record| record.id == id) {
			record.state = outcome;
		}

		let settled = self
			.mutations
			.iter()
			.filter(|record| record.state != MutationState::Pending)
			.count();
		let mut excess = settled.saturating_sub(MAX_SETTLED_RECORDS);
		self.mutations.retain(|record| {
			if excess > 0 && record.state != MutationState::Pending {
				excess -= 1;
				false
			} else {
				true
			}
		});
	}
}

/// Keep in-flight creates, replace everything else with the server's list.
/// In-flight creates stay where a fresh create would have put them.
fn replace_loaded<R: Resource>(state: &mut ClientState, loaded: Vec<R>) {
	let entries = R::entries_mut(state);
	let pending: Vec<Entry<R>> = entries.drain(..).filter(Entry::is_tentative).collect();
	let loaded = loaded.into_iter().map(Entry::Committed);
	if R::NEWEST_FIRST {
		entries.extend(pending);
		entries.extend(loaded);
	} else {
		entries.extend(loaded);
		entries.extend(pending);
	}
}

fn insert_new<R: Resource>(entries: &mut Vec<Entry<R>>, entry: Entry<R>) {
	if R::NEWEST_FIRST {
		entries.insert(0, entry);
	} else {
		entries.push(entry);
	}
}

// =============================================================================
// Coordinator
// =============================================================================

pub struct MutationCoordinator {
	transport: Arc<dyn Transport>,
	timeout: Duration,
	state: Mutex<ClientState>,
	snapshots: watch::Sender<Arc<ClientState>>,
	next_temp_id: AtomicU64,
	next_mutation_id: AtomicU64,
}

impl MutationCoordinator {
	/// `timeout` bounds every request; an elapsed timeout is a failure.
	pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
		let (snapshots, _) = watch::channel(Arc::new(ClientState::default()));
		Self {
			transport,
			timeout,
			state: Mutex::new(ClientState::default()),
			snapshots,
			next_temp_id: AtomicU64::new(0),
			next_mutation_id: AtomicU64::new(0),
		}
	}

	pub fn subscribe(&self) -> watch::Receiver<Arc<ClientState>> {
		self.snapshots.subscribe()
	}

	/// The most recently published state.
	pub fn snapshot(&self) -> Arc<ClientState> {
		self.snapshots.borrow().clone()
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Apply `f` and publish the result as one snapshot.
	fn transition<T>(&self, f: impl FnOnce(&mut ClientState) -> T) -> T {
		let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
		let out = f(&mut state);
		state.version += 1;
		self.snapshots.send_replace(Arc::new(state.clone()));
		out
	}

	fn begin<T>(
		&self,
		ctx: &MutationContext,
		kind: MutationKind,
		apply: impl FnOnce(&mut ClientState) -> T,
	) -> (MutationId, T) {
		let id = MutationId(self.next_mutation_id.fetch_add(1, Ordering::Relaxed) + 1);
		let out = self.transition(|state| {
			state.mutations.push(MutationRecord {
				id,
				kind,
				actor_id: ctx.actor_id,
				state: MutationState::Pending,
			});
			apply(state)
		});
		tracing::debug!(
			mutation_id = %id,
			kind = kind.as_str(),
			actor_id = %ctx.actor_id,
			"mutation pending"
		);
		(id, out)
	}

	fn commit(&self, id: MutationId, kind: MutationKind, apply: impl FnOnce(&mut ClientState)) {
		self.transition(|state| {
			apply(state);
			state.settle_record(id, MutationState::Committed);
		});
		tracing::debug!(mutation_id = %id, kind = kind.as_str(), "mutation committed");
	}

	fn roll_back(
		&self,
		id: MutationId,
		kind: MutationKind,
		error: &ClientError,
		apply: impl FnOnce(&mut ClientState),
	) {
		self.transition(|state| {
			apply(state);
			state.settle_record(id, MutationState::RolledBack);
		});
		tracing::warn!(mutation_id = %id, kind = kind.as_str(), error = %error, "mutation rolled back");
	}

	async fn bounded<T>(&self, request: impl Future<Output = Result<T>>) -> Result<T> {
		match tokio::time::timeout(self.timeout, request).await {
			Ok(result) => result,
			Err(_) => Err(ClientError::Timeout(self.timeout)),
		}
	}

	fn next_temp_id(&self) -> TempId {
		TempId(self.next_temp_id.fetch_add(1, Ordering::Relaxed) + 1)
	}

	async fn optimistic_create<R: Resource>(
		&self,
		ctx: &MutationContext,
		kind: MutationKind,
		draft: R::Draft,
		request: impl Future<Output = Result<R>>,
	) -> Result<R> {
		let temp_id = self.next_temp_id();
		let (mutation, ()) = self.begin(ctx, kind, |state| {
			insert_new(R::entries_mut(state), Entry::Tentative { temp_id, draft });
		});

		match self.bounded(request).await {
			Ok(canonical) => {
				let committed = canonical.clone();
				self.commit(mutation, kind, move |state| {
					let entries = R::entries_mut(state);
					let id = committed.id();
					entries.retain(|entry| !entry.has_id(id));
					match entries.iter().position(|entry| entry.temp_id() == Some(temp_id)) {
						Some(index) => entries[index] = Entry::Committed(committed),
						None => insert_new(entries, Entry::Committed(committed)),
					}
				});
				Ok(canonical)
			}
			Err(err) => {
				self.roll_back(mutation, kind, &err, |state| {
					R::entries_mut(state).retain(|entry| entry.temp_id() != Some(temp_id));
				});
				Err(err)
			}
		}
	}

	async fn optimistic_update<R: Resource>(
		&self,
		ctx: &MutationContext,
		kind: MutationKind,
		id: R::Id,
		apply: impl FnOnce(&mut R),
		request: impl Future<Output = Result<R>>,
	) -> Result<R> {
		let (mutation, snapshot) = self.begin(ctx, kind, |state| {
			let current = R::entries_mut(state)
				.iter_mut()
				.find_map(|entry| entry.committed_mut().filter(|resource| resource.id() == id))?;
			let before = current.clone();
			apply(current);
			Some(before)
		});

		match self.bounded(request).await {
			Ok(canonical) => {
				let committed = canonical.clone();
				self.commit(mutation, kind, move |state| {
					if let Some(slot) = R::entries_mut(state).iter_mut().find(|entry| entry.has_id(id)) {
						*slot = Entry::Committed(committed);
					}
				});
				Ok(canonical)
			}
			Err(err) => {
				self.roll_back(mutation, kind, &err, move |state| {
					let Some(before) = snapshot else {
						return;
					};
					if let Some(slot) = R::entries_mut(state).iter_mut().find(|entry| entry.has_id(id)) {
						*slot = Entry::Committed(before);
					}
				});
				Err(err)
			}
		}
	}

	async fn optimistic_delete<R: Resource>(
		&self,
		ctx: &MutationContext,
		kind: MutationKind,
		id: R::Id,
		request: impl Future<Output = Result<R>>,
	) -> Result<R> {
		let (mutation, removed) = self.begin(ctx, kind, |state| {
			let entries = R::entries_mut(state);
			let index = entries.iter().position(|entry| entry.has_id(id))?;
			entries.remove(index).into_committed().map(|value| (index, value))
		});

		match self.bounded(request).await {
			Ok(deleted) => {
				self.commit(mutation, kind, |state| {
					R::entries_mut(state).retain(|entry| !entry.has_id(id));
				});
				Ok(deleted)
			}
			Err(err) => {
				self.roll_back(mutation, kind, &err, move |state| {
					let Some((index, value)) = removed else {
						return;
					};
					let entries = R::entries_mut(state);
					if entries.iter().any(|entry| entry.has_id(id)) {
						return;
					}
					let index = index.min(entries.len());
					entries.insert(index, Entry::Committed(value));
				});
				Err(err)
			}
		}
	}

	// ---------------------------------------------------------------------
	// Loading
	// ---------------------------------------------------------------------

	pub async fn load_projects(&self) -> Result<Vec<Project>> {
		let projects = self.bounded(self.transport.list_projects()).await?;
		self.transition(|state| replace_loaded(state, projects.clone()));
		Ok(projects)
	}

	pub async fn load_bugs(&self, project_id: ProjectId) -> Result<Vec<Bug>> {
		let bugs = self.bounded(self.transport.list_bugs(project_id)).await?;
		self.transition(|state| replace_loaded(state, bugs.clone()));
		Ok(bugs)
	}

	pub async fn load_comments(&self, bug_id: BugId) -> Result<Vec<Comment>> {
		let comments = self.bounded(self.transport.list_comments(bug_id)).await?;
		self.transition(|state| replace_loaded(state, comments.clone()));
		Ok(comments)
	}

	// ---------------------------------------------------------------------
	// Projects
	// ---------------------------------------------------------------------

	pub async fn create_project(
		&self,
		ctx: &MutationContext,
		name: &str,
		description: Option<&str>,
	) -> Result<Project> {
		let draft = ProjectDraft {
			name: name.to_string(),
			description: description.unwrap_or_default().to_string(),
			author_id: ctx.actor_id,
		};
		self.optimistic_create(
			ctx,
			MutationKind::CreateProject,
			draft,
			self.transport.create_project(name, description),
		)
		.await
	}

	pub async fn update_project(
		&self,
		ctx: &MutationContext,
		id: ProjectId,
		patch: ProjectPatch,
	) -> Result<Project> {
		let local = patch.clone();
		self.optimistic_update(
			ctx,
			MutationKind::UpdateProject,
			id,
			move |project: &mut Project| local.apply_to(project),
			self.transport.update_project(id, &patch),
		)
		.await
	}

	pub async fn delete_project(&self, ctx: &MutationContext, id: ProjectId) -> Result<Project> {
		self.optimistic_delete(
			ctx,
			MutationKind::DeleteProject,
			id,
			self.transport.delete_project(id),
		)
		.await
	}

	// ---------------------------------------------------------------------
	// Bugs
	// ---------------------------------------------------------------------

	/// File a bug in the context's project.
	pub async fn create_bug(&self, ctx: &MutationContext, request: CreateBugRequest) -> Result<Bug> {
		let project_id = ctx.require_project()?;
		let draft = BugDraft {
			project_id,
			author_id: ctx.actor_id,
			title: request.title.clone().unwrap_or_default(),
			description: request.description.clone().unwrap_or_default(),
			status: request.status.unwrap_or_default(),
			priority: request.priority.unwrap_or_default(),
		};
		self.optimistic_create(
			ctx,
			MutationKind::CreateBug,
			draft,
			self.transport.create_bug(project_id, &request),
		)
		.await
	}

	pub async fn update_bug(&self, ctx: &MutationContext, id: BugId, patch: BugPatch) -> Result<Bug> {
		let local = patch.clone();
		self.optimistic_update(
			ctx,
			MutationKind::UpdateBug,
			id,
			move |bug: &mut Bug| local.apply_to(bug),
			self.transport.update_bug(id, &patch),
		)
		.await
	}

	pub async fn delete_bug(&self, ctx: &MutationContext, id: BugId) -> Result<Bug> {
		self.optimistic_delete(ctx, MutationKind::DeleteBug, id, self.transport.delete_bug(id))
			.await
	}

	pub async fn assign_users(
		&self,
		ctx: &MutationContext,
		id: BugId,
		user_ids: &[UserId],
	) -> Result<Bug> {
		let added = user_ids.to_vec();
		self.optimistic_update(
			ctx,
			MutationKind::AssignUsers,
			id,
			move |bug: &mut Bug| {
				for user_id in added {
					if !bug.is_assigned(user_id) {
						bug.assignees.push(user_id);
					}
				}
				bug.assignees.sort();
			},
			self.transport.assign_users(id, user_ids),
		)
		.await
	}

	pub async fn unassign_users(
		&self,
		ctx: &MutationContext,
		id: BugId,
		user_ids: &[UserId],
	) -> Result<Bug> {
		let removed = user_ids.to_vec();
		self.optimistic_update(
			ctx,
			MutationKind::UnassignUsers,
			id,
			move |bug: &mut Bug| bug.assignees.retain(|user_id| !removed.contains(user_id)),
			self.transport.unassign_users(id, user_ids),
		)
		.await
	}

	pub async fn unassign_all(&self, ctx: &MutationContext, id: BugId) -> Result<Bug> {
		self.optimistic_update(
			ctx,
			MutationKind::UnassignAll,
			id,
			|bug: &mut Bug| bug.assignees.clear(),
			self.transport.unassign_all(id),
		)
		.await
	}

	// ---------------------------------------------------------------------
	// Comments
	// ---------------------------------------------------------------------

	pub async fn create_comment(
		&self,
		ctx: &MutationContext,
		bug_id: BugId,
		content: &str,
	) -> Result<Comment> {
		let draft = CommentDraft {
			bug_id,
			author_id: ctx.actor_id,
			content: content.to_string(),
		};
		self.optimistic_create(
			ctx,
			MutationKind::CreateComment,
			draft,
			self.transport.create_comment(bug_id, content),
		)
		.await
	}

	pub async fn update_comment(
		&self,
		ctx: &MutationContext,
		id: CommentId,
		content: &str,
	) -> Result<Comment> {
		let patch = CommentPatch::content(content);
		let local = patch.clone();
		self.optimistic_update(
			ctx,
			MutationKind::UpdateComment,
			id,
			move |comment: &mut Comment| local.apply_to(comment),
			self.transport.update_comment(id, &patch),
		)
		.await
	}

	pub async fn delete_comment(&self, ctx: &MutationContext, id: CommentId) -> Result<Comment> {
		self.optimistic_delete(
			ctx,
			MutationKind::DeleteComment,
			id,
			self.transport.delete_comment(id),
		)
		.await
	}
}
