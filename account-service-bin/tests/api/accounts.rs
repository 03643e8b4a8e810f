use serde_json::{Value, json};
use uuid::Uuid;

use crate::helpers::{TestApp, random_email};

#[tokio::test]
async fn delete_account_requires_an_admin() {
    let app = TestApp::new().await;
    let email = random_email();
    let id = app.seed_verified_account(&email, "Passw0rd!").await;
    let (access, _) = app.login_tokens(&email, "Passw0rd!").await;

    let response = app.delete_account(id.as_uuid(), &access).await;

    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Forbidden");
}

#[tokio::test]
async fn delete_account_requires_a_token() {
    let app = TestApp::new().await;
    let email = random_email();
    let id = app.seed_verified_account(&email, "Passw0rd!").await;

    let response = app
        .http_client
        .delete(format!("{}/api/v1/accounts/{}", app.address, id.as_uuid()))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Missing token");
}

#[tokio::test]
async fn deleted_account_is_locked_out_until_restored() {
    let app = TestApp::new().await;

    let admin_email = random_email();
    app.seed_admin(&admin_email, "AdminPassw0rd!").await;
    let (admin_access, _) = app.login_tokens(&admin_email, "AdminPassw0rd!").await;

    let victim_email = random_email();
    let victim_id = app.seed_verified_account(&victim_email, "Passw0rd!").await;
    let (victim_access, victim_refresh) = app.login_tokens(&victim_email, "Passw0rd!").await;

    let response = app.delete_account(victim_id.as_uuid(), &admin_access).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "Delete Account successfully");

    // Password login is shut off
    let response = app
        .post_login(&json!({ "email": victim_email, "password": "Passw0rd!" }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot login");

    // So is the refresh session the victim still holds
    let response = app
        .post_refresh_token(&json!({
            "accessToken": victim_access,
            "refreshToken": victim_refresh,
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .put_restore_account(victim_id.as_uuid(), &admin_access)
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Restore Account successfully");

    let response = app
        .post_login(&json!({ "email": victim_email, "password": "Passw0rd!" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn deleted_caller_is_blocked_mid_session() {
    let app = TestApp::new().await;

    let admin_email = random_email();
    app.seed_admin(&admin_email, "AdminPassw0rd!").await;
    let (admin_access, _) = app.login_tokens(&admin_email, "AdminPassw0rd!").await;

    let victim_email = random_email();
    let victim_id = app.seed_verified_account(&victim_email, "Passw0rd!").await;
    let (victim_access, _) = app.login_tokens(&victim_email, "Passw0rd!").await;

    let response = app.delete_account(victim_id.as_uuid(), &admin_access).await;
    assert_eq!(response.status().as_u16(), 200);

    // The access token is still cryptographically valid but the account
    // behind it is gone
    let response = app
        .post_change_password(
            &json!({
                "oldPassword": "Passw0rd!",
                "newPassword": "NewPassw0rd!",
                "confirmPassword": "NewPassw0rd!",
            }),
            Some(&victim_access),
        )
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Account has been deleted");
    assert_eq!(body["isBlocking"], true);
}

#[tokio::test]
async fn delete_unknown_account_is_not_found() {
    let app = TestApp::new().await;
    let admin_email = random_email();
    app.seed_admin(&admin_email, "AdminPassw0rd!").await;
    let (admin_access, _) = app.login_tokens(&admin_email, "AdminPassw0rd!").await;

    let response = app.delete_account(Uuid::new_v4(), &admin_access).await;

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn restore_unknown_account_is_not_found() {
    let app = TestApp::new().await;
    let admin_email = random_email();
    app.seed_admin(&admin_email, "AdminPassw0rd!").await;
    let (admin_access, _) = app.login_tokens(&admin_email, "AdminPassw0rd!").await;

    let response = app.put_restore_account(Uuid::new_v4(), &admin_access).await;

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User not found");
}
