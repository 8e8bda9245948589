//! Organization lifecycle tests

use serde_json::json;

use crate::common::{
    count_org_rows, seed_equipment, seed_inactive_member, seed_invite, seed_member,
    seed_organization, seed_user, TestApp,
};
use imaging_central::models::Role;

#[tokio::test]
async fn test_create_organization_makes_caller_super_admin() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let token = app.token_for(&alice);

    let response = app
        .post_json_auth(
            "/api/v1/organizations",
            json!({"name": "Acme Radiology"}),
            &token,
        )
        .await;

    response.assert_created();

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Acme Radiology");
    assert_eq!(body["slug"], "acme-radiology");

    let membership = app
        .get_auth("/api/v1/organizations/acme-radiology/membership", &token)
        .await;
    membership.assert_ok();

    let membership_body: serde_json::Value = membership.json();
    assert_eq!(membership_body["role"], "SUPER_ADMIN");
    assert_eq!(membership_body["organization_id"], body["id"]);
}

#[tokio::test]
async fn test_create_organization_rejects_duplicate_name() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    app.post_json_auth(
        "/api/v1/organizations",
        json!({"name": "Acme Radiology"}),
        &app.token_for(&alice),
    )
    .await
    .assert_created();

    // Same slug, regardless of who asks
    let response = app
        .post_json_auth(
            "/api/v1/organizations",
            json!({"name": "Acme Radiology"}),
            &app.token_for(&bob),
        )
        .await;

    response.assert_conflict();
    response.assert_message_contains("already exists");
}

#[tokio::test]
async fn test_create_organization_validates_name() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let token = app.token_for(&alice);

    // Too short for the request contract
    app.post_json_auth("/api/v1/organizations", json!({"name": "a"}), &token)
        .await
        .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    // Long enough, but slugifies to nothing
    app.post_json_auth("/api/v1/organizations", json!({"name": "!!! ???"}), &token)
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn test_list_organizations_only_shows_own_memberships() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    seed_organization(&app.state.db, "Zenith Imaging", &alice).await;
    seed_organization(&app.state.db, "Aurora Scans", &alice).await;
    seed_organization(&app.state.db, "Bob Clinic", &bob).await;

    let response = app
        .get_auth("/api/v1/organizations", &app.token_for(&alice))
        .await;
    response.assert_ok();

    let body: Vec<serde_json::Value> = response.json();
    let names: Vec<&str> = body.iter().filter_map(|o| o["name"].as_str()).collect();

    // Sorted by name, and Bob's organization is absent
    assert_eq!(names, vec!["Aurora Scans", "Zenith Imaging"]);
}

#[tokio::test]
async fn test_get_organization_does_not_reveal_existence_to_outsiders() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let mallory = seed_user(&app.state.db, "Mallory", "mallory@example.com").await;

    seed_organization(&app.state.db, "Acme Radiology", &alice).await;

    let existing = app
        .get_auth(
            "/api/v1/organizations/acme-radiology",
            &app.token_for(&mallory),
        )
        .await;
    existing.assert_unauthorized();

    let missing = app
        .get_auth(
            "/api/v1/organizations/no-such-tenant",
            &app.token_for(&mallory),
        )
        .await;
    missing.assert_unauthorized();

    // A non-member cannot tell a real organization from a missing one
    let a: serde_json::Value = existing.json();
    let b: serde_json::Value = missing.json();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_inactive_member_is_treated_as_outsider() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_inactive_member(&app.state.db, &bob, &org, Role::Member).await;

    let response = app
        .get_auth("/api/v1/organizations/acme-radiology", &app.token_for(&bob))
        .await;

    response.assert_unauthorized();
    response.assert_message_contains("not a member");
}

#[tokio::test]
async fn test_member_can_read_organization_and_own_membership() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, Role::Member).await;

    let detail = app
        .get_auth("/api/v1/organizations/acme-radiology", &app.token_for(&bob))
        .await;
    detail.assert_ok();
    let body: serde_json::Value = detail.json();
    assert_eq!(body["slug"], "acme-radiology");

    let membership = app
        .get_auth(
            "/api/v1/organizations/acme-radiology/membership",
            &app.token_for(&bob),
        )
        .await;
    membership.assert_ok();
    let membership_body: serde_json::Value = membership.json();
    assert_eq!(membership_body["role"], "MEMBER");
}

#[tokio::test]
async fn test_rename_keeps_slug_stable() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    let token = app.token_for(&alice);

    let response = app
        .put_json_auth(
            "/api/v1/organizations/acme-radiology",
            json!({"name": "Acme Diagnostic Imaging"}),
            &token,
        )
        .await;
    response.assert_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Acme Diagnostic Imaging");
    assert_eq!(body["slug"], "acme-radiology");

    // The old slug keeps resolving after the rename
    app.get_auth("/api/v1/organizations/acme-radiology", &token)
        .await
        .assert_ok();
}

#[tokio::test]
async fn test_rename_requires_super_admin() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, Role::Member).await;

    let response = app
        .put_json_auth(
            "/api/v1/organizations/acme-radiology",
            json!({"name": "Hostile Takeover"}),
            &app.token_for(&bob),
        )
        .await;

    response.assert_forbidden();
    response.assert_message_contains("permission");
}

#[tokio::test]
async fn test_delete_organization_cascades_to_tenant_data() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, Role::Member).await;
    seed_invite(&app.state.db, "carol@example.com", &org, Role::Member).await;
    seed_equipment(&app.state.db, "CT Scanner", &org).await;

    let token = app.token_for(&alice);
    let response = app
        .delete_auth("/api/v1/organizations/acme-radiology", &token)
        .await;
    response.assert_ok();
    assert!(response.json::<bool>());

    // Everything scoped to the tenant is gone with it
    assert_eq!(count_org_rows(&app.state.db, "members", org.id).await, 0);
    assert_eq!(count_org_rows(&app.state.db, "invites", org.id).await, 0);
    assert_eq!(count_org_rows(&app.state.db, "equipment", org.id).await, 0);

    // And the slug no longer resolves for anyone
    app.get_auth("/api/v1/organizations/acme-radiology", &token)
        .await
        .assert_unauthorized();
}

#[tokio::test]
async fn test_delete_organization_requires_super_admin() {
    let app = TestApp::new().await;
    let alice = seed_user(&app.state.db, "Alice", "alice@example.com").await;
    let bob = seed_user(&app.state.db, "Bob", "bob@example.com").await;

    let (org, _) = seed_organization(&app.state.db, "Acme Radiology", &alice).await;
    seed_member(&app.state.db, &bob, &org, Role::Member).await;

    app.delete_auth("/api/v1/organizations/acme-radiology", &app.token_for(&bob))
        .await
        .assert_forbidden();
}
