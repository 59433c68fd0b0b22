// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI document for the HTTP API.

use bugline_common_core::{
	Bug, BugPatch, BugPriority, BugStatus, Comment, CommentPatch, Member, Project, ProjectPatch,
	ProjectRole, User, UserPatch,
};
use bugline_server_api::{
	AddMemberRequest, AssigneesRequest, ChangeRoleRequest, CreateBugRequest, CreateCommentRequest,
	CreateProjectRequest, ErrorResponse, HealthResponse, RegisterRequest, RegisterResponse,
	RemoveMemberRequest,
};
use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
	info(title = "Bugline API", description = "Multi-tenant issue tracker"),
	paths(
		routes::health::health_check,
		routes::auth::register,
		routes::auth::me,
		routes::users::list_users,
		routes::users::update_me,
		routes::projects::list_projects,
		routes::projects::create_project,
		routes::projects::get_project,
		routes::projects::update_project,
		routes::projects::delete_project,
		routes::bugs::list_bugs,
		routes::bugs::create_bug,
		routes::bugs::get_bug,
		routes::bugs::update_bug,
		routes::bugs::delete_bug,
		routes::bugs::assign_users,
		routes::bugs::unassign_users,
		routes::bugs::unassign_all,
		routes::comments::list_comments,
		routes::comments::create_comment,
		routes::comments::get_comment,
		routes::comments::update_comment,
		routes::comments::delete_comment,
		routes::membership::add_member,
		routes::membership::remove_member,
		routes::membership::change_role,
		routes::membership::list_members,
	),
	components(schemas(
		User,
		Project,
		Member,
		Bug,
		Comment,
		ProjectRole,
		BugStatus,
		BugPriority,
		BugPatch,
		ProjectPatch,
		CommentPatch,
		UserPatch,
		RegisterRequest,
		RegisterResponse,
		CreateProjectRequest,
		CreateBugRequest,
		AssigneesRequest,
		CreateCommentRequest,
		AddMemberRequest,
		RemoveMemberRequest,
		ChangeRoleRequest,
		ErrorResponse,
		HealthResponse,
	)),
	tags(
		(name = "health", description = "Service health"),
		(name = "auth", description = "Registration and identity"),
		(name = "users", description = "User directory and profile"),
		(name = "projects", description = "Projects"),
		(name = "bugs", description = "Bugs and assignments"),
		(name = "comments", description = "Bug comments"),
		(name = "membership", description = "Project membership"),
	)
)]
pub struct ApiDoc;
