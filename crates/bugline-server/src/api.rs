// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	routing::{delete, get, patch, post},
	Router,
};
use bugline_server_auth::IdentityProvider;
use bugline_server_db::{SqlitePool, UserRepository};

use crate::{auth_middleware::DbIdentityProvider, routes, store::ResourceStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub store: Arc<ResourceStore>,
	pub user_repo: Arc<UserRepository>,
	pub identity: Arc<dyn IdentityProvider>,
}

/// Build state backed by `pool`, resolving bearer tokens from the database.
pub fn create_app_state(pool: SqlitePool) -> AppState {
	let user_repo = UserRepository::new(pool.clone());
	AppState {
		store: Arc::new(ResourceStore::new(pool.clone())),
		identity: Arc::new(DbIdentityProvider::new(user_repo.clone())),
		user_repo: Arc::new(user_repo),
		pool,
	}
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		// Public
		.route("/health", get(routes::health::health_check))
		.route("/auth/register", post(routes::auth::register))
		.route("/api-docs/openapi.json", get(routes::docs::openapi_json))
		// Users
		.route("/auth/me", get(routes::auth::me))
		.route(
			"/users",
			get(routes::users::list_users)
				.put(routes::users::update_me)
				.patch(routes::users::update_me),
		)
		// Projects
		.route(
			"/projects",
			get(routes::projects::list_projects).post(routes::projects::create_project),
		)
		.route(
			"/projects/{id}",
			get(routes::projects::get_project)
				.put(routes::projects::update_project)
				.patch(routes::projects::update_project)
				.delete(routes::projects::delete_project),
		)
		// Bugs
		.route(
			"/projects/{id}/bugs",
			get(routes::bugs::list_bugs).post(routes::bugs::create_bug),
		)
		.route(
			"/bugs/{id}",
			get(routes::bugs::get_bug)
				.put(routes::bugs::update_bug)
				.patch(routes::bugs::update_bug)
				.delete(routes::bugs::delete_bug),
		)
		.route(
			"/bugs/{id}/assignees",
			post(routes::bugs::assign_users).delete(routes::bugs::unassign_users),
		)
		.route("/bugs/{id}/assignees/all", delete(routes::bugs::unassign_all))
		// Comments
		.route(
			"/bugs/{id}/comments",
			get(routes::comments::list_comments).post(routes::comments::create_comment),
		)
		.route(
			"/comments/{id}",
			get(routes::comments::get_comment)
				.put(routes::comments::update_comment)
				.patch(routes::comments::update_comment)
				.delete(routes::comments::delete_comment),
		)
		// Membership
		.route(
			"/project-membership/add/{id}",
			post(routes::membership::add_member),
		)
		.route(
			"/project-membership/remove/{id}",
			delete(routes::membership::remove_member),
		)
		.route(
			"/project-membership/update-role/{id}",
			patch(routes::membership::change_role),
		)
		.route(
			"/project-membership/members/{id}",
			get(routes::membership::list_members),
		)
		.with_state(state)
}
