//! Member listing and removal tests

use rstest::rstest;
use uuid::Uuid;

use crate::common::{
    seed_inactive_member, seed_member, seed_organization, seed_user, TestApp,
};
use imaging_central::models::Role;

#[tokio::test]
async fn test_member_listing_shows_active_members_oldest_first() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;
    let carol = seed_user(&app.state.db, "Carol", "carol@example.com").await;
    let dave = seed_user(&app.state.db, "Dave", "dave@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, Role::Member).await;
    seed_member(&app.state.db, &carol, &org, Role::Admin).await;
    seed_inactive_member(&app.state.db, &dave, &org, Role::Member).await;

    let response = app
        .get_auth(
            "/api/v1/organizations/acme-radiology/members",
            &app.token_for(&alice),
        )
        .await;
    response.assert_ok();

    let body: Vec<serde_json::Value> = response.json();
    let emails: Vec<&str> = body
        .iter()
        .filter_map(|m| m["user"]["email"].as_str())
        .collect();

    // Join order preserved, suspended members hidden
    assert_eq!(
        emails,
        vec!["alice@example.com", "bob@example.com", "carol@example.com"]
    );
    assert_eq!(body[0]["role"], "SUPER_ADMIN");
    assert_eq!(body[1]["role"], "MEMBER");
    assert_eq!(body[2]["role"], "ADMIN");
    assert!(body[0]["user"].get("password_hash").is_none());
}

#[rstest]
#[case::member(Role::Member)]
#[case::admin(Role::Admin)]
#[tokio::test]
async fn test_member_listing_requires_super_admin(#[case] role: Role) {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, role).await;

    let response = app
        .get_auth(
            "/api/v1/organizations/acme-radiology/members",
            &app.token_for(&bob),
        )
        .await;

    response.assert_forbidden();
    response.assert_message_contains("permission");
}

#[tokio::test]
async fn test_member_listing_hides_organization_from_outsiders() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let mallory = seed_user(&app.state.db, "Mallory", "mallory@example.com").await;

    seed_organization(&app.state.db, "Acme Radiology", &alice).await;

    app.get_auth(
        "/api/v1/organizations/acme-radiology/members",
        &app.token_for(&mallory),
    )
    .await
    .assert_unauthorized();
}

#[tokio::test]
async fn test_super_admin_can_remove_a_member() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    let bob_member = seed_member(&app.state.db, &bob, &org, Role::Member).await;

    let response = app
        .delete_auth(
            &format!(
                "/api/v1/organizations/acme-radiology/members/{}",
                bob_member.id
            ),
            &app.token_for(&alice),
        )
        .await;
    response.assert_no_content();

    // Bob is an outsider again
    app.get_auth(
        "/api/v1/organizations/acme-radiology/membership",
        &app.token_for(&bob),
    )
    .await
    .assert_unauthorized();
}

#[tokio::test]
async fn test_last_super_admin_cannot_be_removed() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;

    let (_, alice_member) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;

    let response = app
        .delete_auth(
            &format!(
                "/api/v1/organizations/acme-radiology/members/{}",
                alice_member.id
            ),
            &app.token_for(&alice),
        )
        .await;

    response.assert_conflict();
    response.assert_message_contains("last super admin");
}

#[tokio::test]
async fn test_super_admin_cannot_remove_themselves() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, alice_member) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, Role::SuperAdmin).await;

    // Another super admin exists, so the refusal is about self-removal
    let response = app
        .delete_auth(
            &format!(
                "/api/v1/organizations/acme-radiology/members/{}",
                alice_member.id
            ),
            &app.token_for(&alice),
        )
        .await;

    response.assert_conflict();
    response.assert_message_contains("cannot remove yourself");
}

#[tokio::test]
async fn test_removing_one_of_two_super_admins_is_allowed() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    let bob_member = seed_member(&app.state.db, &bob, &org, Role::SuperAdmin).await;

    app.delete_auth(
        &format!(
            "/api/v1/organizations/acme-radiology/members/{}",
            bob_member.id
        ),
        &app.token_for(&alice),
    )
    .await
    .assert_no_content();

    // Alice remains as the final super admin and is now irremovable
    let response = app
        .get_auth(
            "/api/v1/organizations/acme-radiology/membership",
            &app.token_for(&alice),
        )
        .await;
    response.assert_ok();
}

#[tokio::test]
async fn test_removal_requires_super_admin() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, alice_member) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, Role::Member).await;

    let response = app
        .delete_auth(
            &format!(
                "/api/v1/organizations/acme-radiology/members/{}",
                alice_member.id
            ),
            &app.token_for(&bob),
        )
        .await;

    response.assert_forbidden();
}

#[tokio::test]
async fn test_removal_of_unknown_or_foreign_member_is_not_found() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;
    let token = app.token_for(&alice);

    seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    let (_, bob_member) = seed_organization(&app.state.db, "Bob Clinic", &bob).await;

    // A random id
    app.delete_auth(
        &format!(
            "/api/v1/organizations/acme-radiology/members/{}",
            Uuid::new_v4()
        ),
        &token,
    )
    .await
    .assert_not_found();

    // A real member id, but of another organization
    app.delete_auth(
        &format!(
            "/api/v1/organizations/acme-radiology/members/{}",
            bob_member.id
        ),
        &token,
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_removal_of_inactive_member_is_not_found() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let carol = seed_user(&app.state.db, "Carol", "carol@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    let carol_member = seed_inactive_member(&app.state.db, &carol, &org, Role::SuperAdmin).await;

    // Suspended rows are invisible to removal, even super-admin ones
    app.delete_auth(
        &format!(
            "/api/v1/organizations/acme-radiology/members/{}",
            carol_member.id
        ),
        &app.token_for(&alice),
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_removal_rejects_malformed_member_id() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;

    seed_organization(&app.state.db, "Acme Radiology", &alice).await;

    let response = app
        .delete_auth(
            "/api/v1/organizations/acme-radiology/members/not-a-uuid",
            &app.token_for(&alice),
        )
        .await;

    response.assert_bad_request();
    response.assert_message_contains("Invalid member ID");
}
