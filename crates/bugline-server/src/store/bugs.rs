// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bugline_common_core::{Bug, BugId, BugPatch, BugPriority, BugStatus, ProjectId, UserId};
use bugline_server_auth::{Action, ResourceAttrs, TargetUserAttr};
use bugline_server_db::{begin_write, bug, membership, NewBug, SqliteConnection};

use super::{authorize, require_project, subject_in, ResourceStore};
use crate::error::ServerError;
use crate::validation::{normalize_bug_patch, optional_text, require_text};

/// Fields accepted when filing a bug, before validation.
#[derive(Debug, Clone, Default)]
pub struct CreateBug {
	pub title: Option<String>,
	pub description: Option<String>,
	pub status: Option<BugStatus>,
	pub priority: Option<BugPriority>,
}

impl CreateBug {
	fn validate(self) -> Result<NewBug, ServerError> {
		Ok(NewBug {
			title: require_text("Title", self.title.as_deref())?,
			description: optional_text(self.description.as_deref()),
			status: self.status.unwrap_or_default(),
			priority: self.priority.unwrap_or_default(),
		})
	}
}

async fn require_bug(conn: &mut SqliteConnection, id: BugId) -> Result<Bug, ServerError> {
	bug::get_bug(conn, id)
		.await?
		.ok_or_else(|| ServerError::NotFound(format!("Bug {id} not found")))
}

fn bug_resource(found: &Bug) -> ResourceAttrs {
	ResourceAttrs::bug(found.project_id, found.author_id, found.assignees.clone())
}

/// Load a bug and check `action` against it for `actor`.
pub(super) async fn authorize_on_bug(
	conn: &mut SqliteConnection,
	actor: UserId,
	id: BugId,
	action: Action,
) -> Result<Bug, ServerError> {
	let found = require_bug(conn, id).await?;
	let resource = bug_resource(&found);
	let subject = subject_in(conn, found.project_id, actor).await?;
	authorize(&subject, action, &resource)?;
	Ok(found)
}

impl ResourceStore {
	/// Bugs in a project, newest first.
	#[tracing::instrument(skip(self), fields(actor = %actor, project_id = %project_id))]
	pub async fn list_bugs(&self, actor: UserId, project_id: ProjectId) -> Result<Vec<Bug>, ServerError> {
		let mut conn = self.pool.acquire().await?;
		let owner = require_project(&mut conn, project_id).await?;
		let subject = subject_in(&mut conn, project_id, actor).await?;
		authorize(
			&subject,
			Action::Read,
			&ResourceAttrs::project(project_id, owner.author_id),
		)?;
		Ok(bug::list_bugs(&mut conn, project_id).await?)
	}

	#[tracing::instrument(skip(self), fields(actor = %actor, bug_id = %id))]
	pub async fn get_bug(&self, actor: UserId, id: BugId) -> Result<Bug, ServerError> {
		let mut conn = self.pool.acquire().await?;
		authorize_on_bug(&mut conn, actor, id, Action::Read).await
	}

	#[tracing::instrument(skip(self, input), fields(actor = %actor, project_id = %project_id))]
	pub async fn create_bug(
		&self,
		actor: UserId,
		project_id: ProjectId,
		input: CreateBug,
	) -> Result<Bug, ServerError> {
		let new_bug = input.validate()?;

		let mut tx = begin_write(&self.pool).await?;
		let owner = require_project(&mut tx, project_id).await?;
		let subject = subject_in(&mut tx, project_id, actor).await?;
		authorize(
			&subject,
			Action::CreateBug,
			&ResourceAttrs::project(project_id, owner.author_id),
		)?;

		let created = bug::create_bug(&mut tx, project_id, actor, &new_bug).await?;
		tx.commit().await?;

		tracing::info!(bug_id = %created.id, "bug created");
		Ok(created)
	}

	/// Apply exactly the fields present in `patch`.
	#[tracing::instrument(skip(self, patch), fields(actor = %actor, bug_id = %id))]
	pub async fn update_bug(&self, actor: UserId, id: BugId, patch: BugPatch) -> Result<Bug, ServerError> {
		let patch = normalize_bug_patch(patch)?;

		let mut tx = begin_write(&self.pool).await?;
		authorize_on_bug(&mut tx, actor, id, Action::UpdateBug).await?;
		bug::update_bug(&mut tx, id, &patch).await?;
		let updated = require_bug(&mut tx, id).await?;
		tx.commit().await?;
		Ok(updated)
	}

	/// Delete a bug with its comments and assignments. Returns the deleted bug.
	#[tracing::instrument(skip(self), fields(actor = %actor, bug_id = %id))]
	pub async fn delete_bug(&self, actor: UserId, id: BugId) -> Result<Bug, ServerError> {
		let mut tx = begin_write(&self.pool).await?;
		let existing = authorize_on_bug(&mut tx, actor, id, Action::DeleteBug).await?;
		bug::delete_bug(&mut tx, id).await?;
		tx.commit().await?;

		tracing::info!(bug_id = %id, "bug deleted");
		Ok(existing)
	}

	/// Assign project members to a bug.
	///
	/// `user_ids` must already be validated as non-empty and duplicate free.
	#[tracing::instrument(skip(self, user_ids), fields(actor = %actor, bug_id = %id, count = user_ids.len()))]
	pub async fn assign_users(
		&self,
		actor: UserId,
		id: BugId,
		user_ids: &[UserId],
	) -> Result<Bug, ServerError> {
		let mut tx = begin_write(&self.pool).await?;
		let found = require_bug(&mut tx, id).await?;
		let roles = membership::roles_of(&mut tx, found.project_id, user_ids).await?;
		let targets = user_ids
			.iter()
			.map(|&user_id| TargetUserAttr {
				user_id,
				role: roles.get(&user_id).copied(),
			})
			.collect();
		let resource = bug_resource(&found).with_targets(targets);
		let subject = subject_in(&mut tx, found.project_id, actor).await?;
		authorize(&subject, Action::AssignUsers, &resource)?;

		if let Some(already) = user_ids.iter().find(|&&user_id| found.is_assigned(user_id)) {
			return Err(ServerError::Validation(format!("User {already} is already assigned")));
		}

		bug::add_assignees(&mut tx, id, user_ids).await?;
		let updated = require_bug(&mut tx, id).await?;
		tx.commit().await?;
		Ok(updated)
	}

	/// Remove specific assignees. Targets need not still be project members.
	#[tracing::instrument(skip(self, user_ids), fields(actor = %actor, bug_id = %id, count = user_ids.len()))]
	pub async fn unassign_users(
		&self,
		actor: UserId,
		id: BugId,
		user_ids: &[UserId],
	) -> Result<Bug, ServerError> {
		let mut tx = begin_write(&self.pool).await?;
		let found = authorize_on_bug(&mut tx, actor, id, Action::UnassignUsers).await?;

		if let Some(missing) = user_ids.iter().find(|&&user_id| !found.is_assigned(user_id)) {
			return Err(ServerError::Validation(format!("User {missing} is not assigned")));
		}

		bug::remove_assignees(&mut tx, id, user_ids).await?;
		let updated = require_bug(&mut tx, id).await?;
		tx.commit().await?;
		Ok(updated)
	}

	#[tracing::instrument(skip(self), fields(actor = %actor, bug_id = %id))]
	pub async fn unassign_all(&self, actor: UserId, id: BugId) -> Result<Bug, ServerError> {
		let mut tx = begin_write(&self.pool).await?;
		authorize_on_bug(&mut tx, actor, id, Action::UnassignUsers).await?;
		let removed = bug::clear_assignees(&mut tx, id).await?;
		let updated = require_bug(&mut tx, id).await?;
		tx.commit().await?;

		tracing::debug!(bug_id = %id, removed, "all assignees removed");
		Ok(updated)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::test_support::{fixture, Fixture};
	use bugline_server_auth::DenyReason;

	async fn file_bug(f: &Fixture, actor: UserId) -> Bug {
		f.store
			.create_bug(
				actor,
				f.project.id,
				CreateBug {
					title: Some(" Crash on save ".into()),
					..Default::default()
				},
			)
			.await
			.unwrap()
	}

	#[tokio::test]
	async fn test_create_bug_applies_defaults() {
		let f = fixture().await;
		let bug = file_bug(&f, f.bob.id).await;
		assert_eq!(bug.title, "Crash on save");
		assert_eq!(bug.description, "");
		assert_eq!(bug.status, BugStatus::Todo);
		assert_eq!(bug.priority, BugPriority::Medium);
		assert_eq!(bug.author_id, f.bob.id);
		assert!(bug.assignees.is_empty());
	}

	#[tokio::test]
	async fn test_create_bug_validates_before_authorizing() {
		let f = fixture().await;
		let err = f
			.store
			.create_bug(f.carol.id, f.project.id, CreateBug::default())
			.await
			.unwrap_err();
		assert!(matches!(err, ServerError::Validation(_)));

		let err = f
			.store
			.create_bug(
				f.carol.id,
				f.project.id,
				CreateBug {
					title: Some("Nope".into()),
					..Default::default()
				},
			)
			.await
			.unwrap_err();
		assert!(matches!(err, ServerError::AccessDenied(DenyReason::NotAMember)));
	}

	#[tokio::test]
	async fn test_author_updates_outsider_denied() {
		let f = fixture().await;
		let bug = file_bug(&f, f.bob.id).await;

		let updated = f
			.store
			.update_bug(f.bob.id, bug.id, BugPatch::status(BugStatus::InProgress))
			.await
			.unwrap();
		assert_eq!(updated.status, BugStatus::InProgress);
		assert_eq!(updated.title, bug.title);
		assert_eq!(updated.priority, bug.priority);

		let err = f
			.store
			.update_bug(f.carol.id, bug.id, BugPatch::status(BugStatus::Done))
			.await
			.unwrap_err();
		assert!(matches!(err, ServerError::AccessDenied(DenyReason::NotAMember)));
	}

	#[tokio::test]
	async fn test_plain_member_cannot_touch_others_bug_until_assigned() {
		let f = fixture().await;
		let bug = file_bug(&f, f.alice.id).await;

		let err = f
			.store
			.update_bug(f.bob.id, bug.id, BugPatch::priority(BugPriority::Top))
			.await
			.unwrap_err();
		assert!(matches!(err, ServerError::AccessDenied(DenyReason::InsufficientRole)));

		f.store.assign_users(f.alice.id, bug.id, &[f.bob.id]).await.unwrap();
		let updated = f
			.store
			.update_bug(f.bob.id, bug.id, BugPatch::priority(BugPriority::Top))
			.await
			.unwrap();
		assert_eq!(updated.priority, BugPriority::Top);

		let deleted = f.store.delete_bug(f.bob.id, bug.id).await.unwrap();
		assert_eq!(deleted.id, bug.id);
	}

	#[tokio::test]
	async fn test_admin_deletes_members_bug() {
		let f = fixture().await;
		let bug = file_bug(&f, f.bob.id).await;
		f.store.delete_bug(f.alice.id, bug.id).await.unwrap();

		let err = f.store.get_bug(f.alice.id, bug.id).await.unwrap_err();
		assert!(matches!(err, ServerError::NotFound(_)));
	}

	#[tokio::test]
	async fn test_assignment_rules() {
		let f = fixture().await;
		let bug = file_bug(&f, f.alice.id).await;

		let err = f
			.store
			.assign_users(f.alice.id, bug.id, &[f.carol.id])
			.await
			.unwrap_err();
		match err {
			ServerError::Validation(msg) => assert_eq!(msg, "All assigned users must be project members"),
			other => panic!("unexpected error: {other:?}"),
		}

		f.store
			.add_member(f.alice.id, f.project.id, Some("carol@example.com"), None)
			.await
			.unwrap();
		let assigned = f
			.store
			.assign_users(f.alice.id, bug.id, &[f.carol.id, f.bob.id])
			.await
			.unwrap();
		assert_eq!(assigned.assignees, vec![f.bob.id, f.carol.id]);

		let err = f
			.store
			.assign_users(f.alice.id, bug.id, &[f.carol.id])
			.await
			.unwrap_err();
		match err {
			ServerError::Validation(msg) => assert_eq!(msg, format!("User {} is already assigned", f.carol.id)),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_unassign_requires_current_assignment() {
		let f = fixture().await;
		let bug = file_bug(&f, f.alice.id).await;

		let err = f
			.store
			.unassign_users(f.alice.id, bug.id, &[f.bob.id])
			.await
			.unwrap_err();
		assert!(matches!(err, ServerError::Validation(_)));

		f.store.assign_users(f.alice.id, bug.id, &[f.bob.id]).await.unwrap();
		let updated = f.store.unassign_users(f.bob.id, bug.id, &[f.bob.id]).await.unwrap();
		assert!(updated.assignees.is_empty());
	}

	#[tokio::test]
	async fn test_unassign_former_member() {
		let f = fixture().await;
		let bug = file_bug(&f, f.alice.id).await;
		f.store.assign_users(f.alice.id, bug.id, &[f.bob.id]).await.unwrap();
		f.store
			.remove_member(f.alice.id, f.project.id, Some("bob@example.com"))
			.await
			.unwrap();

		let updated = f.store.unassign_users(f.alice.id, bug.id, &[f.bob.id]).await.unwrap();
		assert!(updated.assignees.is_empty());
	}

	#[tokio::test]
	async fn test_unassign_all() {
		let f = fixture().await;
		let bug = file_bug(&f, f.alice.id).await;
		f.store
			.assign_users(f.alice.id, bug.id, &[f.alice.id, f.bob.id])
			.await
			.unwrap();

		let err = f.store.unassign_all(f.carol.id, bug.id).await.unwrap_err();
		assert!(matches!(err, ServerError::AccessDenied(DenyReason::NotAMember)));

		let cleared = f.store.unassign_all(f.bob.id, bug.id).await.unwrap();
		assert!(cleared.assignees.is_empty());
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
	async fn test_concurrent_writes_on_file_database_are_serialized() {
		use bugline_server_db::testing::{seed_project, seed_user};

		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("bugline.db").display());
		let pool = bugline_server_db::create_pool(&url, 8).await.unwrap();
		bugline_server_db::run_migrations(&pool).await.unwrap();

		let alice = seed_user(&pool, "Alice").await;
		let project = seed_project(&pool, &alice, "Tracker").await;
		let store = ResourceStore::new(pool.clone());
		let mut helpers = Vec::new();
		for name in ["H1", "H2", "H3", "H4"] {
			let helper = seed_user(&pool, name).await;
			store
				.add_member(alice.id, project.id, Some(helper.email.as_str()), None)
				.await
				.unwrap();
			helpers.push(helper.id);
		}
		let bug = store
			.create_bug(
				alice.id,
				project.id,
				CreateBug {
					title: Some("Race".into()),
					..Default::default()
				},
			)
			.await
			.unwrap();

		let mut tasks = Vec::new();
		for i in 0..16 {
			let store = store.clone();
			tasks.push(tokio::spawn(async move {
				let patch = BugPatch {
					title: Some(format!("t{i}")),
					..Default::default()
				};
				store.update_bug(alice.id, bug.id, patch).await.map(|_| ())
			}));
		}
		for &helper in &helpers {
			let store = store.clone();
			tasks.push(tokio::spawn(async move {
				store.assign_users(alice.id, bug.id, &[helper]).await.map(|_| ())
			}));
		}

		for task in tasks {
			task.await.unwrap().unwrap();
		}

		let settled = store.get_bug(alice.id, bug.id).await.unwrap();
		assert!(settled.title.starts_with('t'));
		assert_eq!(settled.assignees, helpers);
	}

	#[tokio::test]
	async fn test_list_bugs_newest_first() {
		let f = fixture().await;
		let first = file_bug(&f, f.alice.id).await;
		let second = file_bug(&f, f.bob.id).await;

		let bugs = f.store.list_bugs(f.bob.id, f.project.id).await.unwrap();
		assert_eq!(bugs.iter().map(|b| b.id).collect::<Vec<_>>(), vec![second.id, first.id]);

		let err = f.store.list_bugs(f.carol.id, f.project.id).await.unwrap_err();
		assert!(matches!(err, ServerError::AccessDenied(DenyReason::NotAMember)));
	}
}
