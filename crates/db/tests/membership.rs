//! Integration tests for workspace membership.

mod common;

use sqlx::PgPool;
use taskboard_db::repositories::{MemberRepo, WorkspaceRepo};

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_and_members_are_members(pool: PgPool) {
    let owner = common::user(&pool, "ada@example.com").await;
    let bob = common::user(&pool, "bob@example.com").await;
    let eve = common::user(&pool, "eve@example.com").await;
    let ws = common::workspace(&pool, owner.id, "Acme").await;
    common::member(&pool, ws.id, bob.id).await;

    assert!(MemberRepo::is_member(&pool, ws.id, owner.id).await.unwrap());
    assert!(MemberRepo::is_member(&pool, ws.id, bob.id).await.unwrap());
    assert!(!MemberRepo::is_member(&pool, ws.id, eve.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_membership_is_rejected(pool: PgPool) {
    let owner = common::user(&pool, "ada@example.com").await;
    let bob = common::user(&pool, "bob@example.com").await;
    let ws = common::workspace(&pool, owner.id, "Acme").await;
    common::member(&pool, ws.id, bob.id).await;

    assert!(MemberRepo::add(&pool, ws.id, bob.id, "MEMBER").await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_listing_reports_owner_as_admin(pool: PgPool) {
    let owner = common::user(&pool, "ada@example.com").await;
    let bob = common::user(&pool, "bob@example.com").await;
    let ws = common::workspace(&pool, owner.id, "Acme").await;
    common::member(&pool, ws.id, bob.id).await;

    let members = MemberRepo::list_for_workspace(&pool, ws.id).await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].user_id, owner.id);
    assert_eq!(members[0].role, "ADMIN");
    assert_eq!(members[1].user_id, bob.id);
    assert_eq!(members[1].role, "MEMBER");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn joined_workspaces_are_listed(pool: PgPool) {
    let owner = common::user(&pool, "ada@example.com").await;
    let bob = common::user(&pool, "bob@example.com").await;
    let mine = common::workspace(&pool, bob.id, "Bob's").await;
    let joined = common::workspace(&pool, owner.id, "Acme").await;
    common::workspace(&pool, owner.id, "Private").await;
    common::member(&pool, joined.id, bob.id).await;

    let listed = WorkspaceRepo::list_for_user(&pool, bob.id).await.unwrap();
    let mut ids: Vec<_> = listed.iter().map(|w| w.id).collect();
    ids.sort();
    let mut expected = vec![mine.id, joined.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_owner_cannot_update_workspace(pool: PgPool) {
    let owner = common::user(&pool, "ada@example.com").await;
    let bob = common::user(&pool, "bob@example.com").await;
    let ws = common::workspace(&pool, owner.id, "Acme").await;

    let result = WorkspaceRepo::set_invite_code(&pool, ws.id, bob.id, "ZZZZZZZZ")
        .await
        .unwrap();
    assert!(result.is_none());
}
