//! Row fixtures shared by the repository tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use taskboard_core::roles::ROLE_MEMBER;
use taskboard_core::task::TaskStatus;
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, Project};
use taskboard_db::models::task::{CreateTask, Task};
use taskboard_db::models::user::{CreateUser, User};
use taskboard_db::models::workspace::{CreateWorkspace, Workspace};
use taskboard_db::repositories::{MemberRepo, ProjectRepo, TaskRepo, UserRepo, WorkspaceRepo};

pub async fn user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: Some("hash".to_string()),
            email_verified_at: Some(Utc::now()),
            image: None,
        },
    )
    .await
    .unwrap()
}

pub async fn workspace(pool: &PgPool, owner: DbId, name: &str) -> Workspace {
    WorkspaceRepo::create(
        pool,
        &CreateWorkspace {
            user_id: owner,
            name: name.to_string(),
            image: None,
            invite_code: "Abc12345".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn member(pool: &PgPool, workspace_id: DbId, user_id: DbId) {
    MemberRepo::add(pool, workspace_id, user_id, ROLE_MEMBER)
        .await
        .unwrap();
}

pub async fn project(pool: &PgPool, workspace_id: DbId, name: &str) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            workspace_id,
            name: name.to_string(),
            image: None,
        },
    )
    .await
    .unwrap()
}

pub async fn task(
    pool: &PgPool,
    project: &Project,
    assignee: DbId,
    name: &str,
    status: TaskStatus,
    position: i32,
) -> Task {
    TaskRepo::create(
        pool,
        &CreateTask {
            workspace_id: project.workspace_id,
            project_id: project.id,
            assignee_id: assignee,
            name: name.to_string(),
            description: None,
            status: status.as_str().to_string(),
            position,
            due_date: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap()
}
