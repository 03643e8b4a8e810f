use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{GOOGLE_CLIENT_ID, TestApp, code_in, random_email, register_body};

#[tokio::test]
async fn register_creates_account_and_sends_verification_email() {
    let app = TestApp::new().await;
    let email = random_email();

    let response = app.post_register(&register_body(&email, "Passw0rd!")).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], true);
    assert_eq!(
        body["message"],
        "Account has been created successfully, please verify your Email"
    );
    assert_eq!(body["emailVerificationRequired"], true);

    let sent = app.email_client.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, email);
    assert_eq!(sent[0].subject, "Verify your Email");
    assert!(sent[0].html);
    assert!(sent[0].content.contains("verification code"));
}

#[tokio::test]
async fn register_with_mismatched_passwords_is_rejected() {
    let app = TestApp::new().await;
    let mut body = register_body(&random_email(), "Passw0rd!");
    body["confirmPassword"] = json!("Different1!");

    let response = app.post_register(&body).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(
        body["message"],
        "Invalid input: Password and confirm password does not match"
    );
}

#[tokio::test]
async fn register_with_taken_email_is_rejected() {
    let app = TestApp::new().await;
    let email = random_email();

    let response = app.post_register(&register_body(&email, "Passw0rd!")).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.post_register(&register_body(&email, "0therPassw0rd!")).await;

    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn login_before_verification_still_issues_tokens() {
    let app = TestApp::new().await;
    let email = random_email();
    app.post_register(&register_body(&email, "Passw0rd!")).await;

    let response = app
        .post_login(&json!({ "email": email, "password": "Passw0rd!" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Login successfully");
    assert_eq!(body["emailVerificationRequired"], true);
    assert!(body["data"]["accessToken"].as_str().is_some());
    assert!(body["data"]["refreshToken"].as_str().is_some());
    assert!(body["data"]["accessTokenExpiryTime"].as_str().is_some());
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;

    let response = app
        .post_login(&json!({ "email": email, "password": "WrongPassw0rd!" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Cannot login");
}

#[tokio::test]
async fn login_with_unknown_email_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post_login(&json!({ "email": random_email(), "password": "Passw0rd!" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot login");
}

#[tokio::test]
async fn verify_email_confirms_the_account() {
    let app = TestApp::new().await;
    let email = random_email();
    app.post_register(&register_body(&email, "Passw0rd!")).await;

    let sent = app.email_client.sent().await;
    let code = code_in(&sent[0].content);

    // A wrong code does not confirm anything
    let response = app.get_verify_email(&email, "000000").await;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot verify Email");

    let response = app.get_verify_email(&email, &code).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "Verify Email successfully");

    // Verification flag drops off subsequent logins
    let response = app
        .post_login(&json!({ "email": email, "password": "Passw0rd!" }))
        .await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["emailVerificationRequired"], false);
}

#[tokio::test]
async fn verify_email_for_unknown_account_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get_verify_email(&random_email(), "123456").await;

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn repeated_logins_share_the_refresh_session() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;

    let (_, first_refresh) = app.login_tokens(&email, "Passw0rd!").await;
    let (_, second_refresh) = app.login_tokens(&email, "Passw0rd!").await;

    assert_eq!(first_refresh, second_refresh);
}

#[tokio::test]
async fn refresh_token_rotates_the_session() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;
    let (access, refresh) = app.login_tokens(&email, "Passw0rd!").await;

    let response = app
        .post_refresh_token(&json!({ "accessToken": access, "refreshToken": refresh }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Refresh Token successfully");
    let rotated = body["data"]["refreshToken"].as_str().unwrap().to_string();
    let new_access = body["data"]["accessToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // The replaced secret is dead
    let response = app
        .post_refresh_token(&json!({ "accessToken": new_access, "refreshToken": refresh }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid Access Token or Refresh Token");

    // The rotated secret works
    let response = app
        .post_refresh_token(&json!({ "accessToken": new_access, "refreshToken": rotated }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn refresh_token_with_forged_access_token_is_rejected() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;
    let (_, refresh) = app.login_tokens(&email, "Passw0rd!").await;

    let response = app
        .post_refresh_token(&json!({ "accessToken": "not-a-jwt", "refreshToken": refresh }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid Access Token or Refresh Token");
}

#[tokio::test]
async fn cookie_transport_moves_the_refresh_token_out_of_the_body() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;

    let response = app
        .post_login(&json!({
            "email": email,
            "password": "Passw0rd!",
            "useCookie": true,
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let set_cookie = response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .find(|v| v.starts_with("refreshToken="))
        .expect("No refreshToken cookie set");

    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));
    assert!(set_cookie.contains("Path=/"));

    let cookie_value = set_cookie
        .trim_start_matches("refreshToken=")
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["refreshToken"].is_null());
    let access = body["data"]["accessToken"].as_str().unwrap().to_string();

    // The cookie alone is enough to refresh, and the rotated secret comes
    // back as a cookie again
    let response = app
        .post_refresh_token_with_cookie(
            &json!({ "accessToken": access, "useCookie": true }),
            &cookie_value,
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let rotated_cookie = response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .find(|v| v.starts_with("refreshToken="))
        .expect("No refreshToken cookie set on refresh");
    assert_ne!(rotated_cookie, set_cookie);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Refresh Token successfully");
    assert!(body["data"]["refreshToken"].is_null());
}

#[tokio::test]
async fn refresh_token_without_any_secret_is_rejected() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;
    let (access, _) = app.login_tokens(&email, "Passw0rd!").await;

    let response = app
        .post_refresh_token(&json!({ "accessToken": access }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid Access Token or Refresh Token");
}

#[tokio::test]
async fn resend_verification_email_reissues_the_code() {
    let app = TestApp::new().await;
    let email = random_email();
    app.post_register(&register_body(&email, "Passw0rd!")).await;

    let response = app
        .post_resend_verification_email(&json!({ "email": email }), None)
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Resend Verification Email successfully");
    assert_eq!(body["emailVerificationRequired"], true);

    let sent = app.email_client.sent().await;
    assert_eq!(sent.len(), 2);

    // The reissued code is the one that verifies
    let code = code_in(&sent[1].content);
    let response = app.get_verify_email(&email, &code).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn resend_verification_email_hides_unknown_accounts() {
    let app = TestApp::new().await;

    let response = app
        .post_resend_verification_email(&json!({ "email": random_email() }), None)
        .await;

    // Same answer as for a real pending account, and nothing goes out
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Resend Verification Email successfully");
    assert!(app.email_client.sent().await.is_empty());
}

#[tokio::test]
async fn resend_verification_email_reports_already_verified_accounts() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;

    let response = app
        .post_resend_verification_email(&json!({ "email": email }), None)
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "Email has been verified");
    assert!(app.email_client.sent().await.is_empty());
}

#[tokio::test]
async fn resend_verification_email_for_someone_elses_address_is_forbidden() {
    let app = TestApp::new().await;
    let pending_email = random_email();
    app.post_register(&register_body(&pending_email, "Passw0rd!"))
        .await;

    let caller_email = random_email();
    app.seed_verified_account(&caller_email, "Passw0rd!").await;
    let (access, _) = app.login_tokens(&caller_email, "Passw0rd!").await;

    let response = app
        .post_resend_verification_email(&json!({ "email": pending_email }), Some(&access))
        .await;

    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Cannot resend Verification Email");
    assert_eq!(body["emailVerificationRequired"], true);
}

#[tokio::test]
async fn change_password_requires_a_token() {
    let app = TestApp::new().await;

    let response = app
        .post_change_password(
            &json!({
                "oldPassword": "Passw0rd!",
                "newPassword": "NewPassw0rd!",
                "confirmPassword": "NewPassw0rd!",
            }),
            None,
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Missing token");
}

#[tokio::test]
async fn change_password_with_wrong_old_password_is_rejected() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;
    let (access, _) = app.login_tokens(&email, "Passw0rd!").await;

    let response = app
        .post_change_password(
            &json!({
                "oldPassword": "WrongPassw0rd!",
                "newPassword": "NewPassw0rd!",
                "confirmPassword": "NewPassw0rd!",
            }),
            Some(&access),
        )
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot change Password");
}

#[tokio::test]
async fn change_password_with_mismatched_confirmation_is_rejected() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;
    let (access, _) = app.login_tokens(&email, "Passw0rd!").await;

    let response = app
        .post_change_password(
            &json!({
                "oldPassword": "Passw0rd!",
                "newPassword": "NewPassw0rd!",
                "confirmPassword": "S0methingElse!",
            }),
            Some(&access),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Invalid input: New password and confirm password does not match"
    );
}

#[tokio::test]
async fn change_password_rotates_the_credentials() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;
    let (access, _) = app.login_tokens(&email, "Passw0rd!").await;

    let response = app
        .post_change_password(
            &json!({
                "oldPassword": "Passw0rd!",
                "newPassword": "NewPassw0rd!",
                "confirmPassword": "NewPassw0rd!",
            }),
            Some(&access),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Change Password successfully");

    let response = app
        .post_login(&json!({ "email": email, "password": "Passw0rd!" }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post_login(&json!({ "email": email, "password": "NewPassw0rd!" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn forgot_password_answers_the_same_for_unknown_accounts() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;

    let response = app.post_forgot_password(&json!({ "email": email })).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "An Email has been sent, please check your inbox"
    );

    let response = app
        .post_forgot_password(&json!({ "email": random_email() }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "An Email has been sent, please check your inbox"
    );

    // Only the real account got mail
    let sent = app.email_client.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, email);
    assert_eq!(sent[0].subject, "Reset your Password");
}

#[tokio::test]
async fn reset_password_with_emailed_token_sets_a_new_password() {
    let app = TestApp::new().await;
    let email = random_email();
    app.seed_verified_account(&email, "Passw0rd!").await;

    app.post_forgot_password(&json!({ "email": email })).await;
    let sent = app.email_client.sent().await;
    let token = code_in(&sent[0].content);

    let response = app
        .post_reset_password(&json!({
            "email": email,
            "token": token,
            "password": "NewPassw0rd!",
            "confirmPassword": "NewPassw0rd!",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Reset Password successfully");

    let response = app
        .post_login(&json!({ "email": email, "password": "NewPassw0rd!" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // The token is single use
    let response = app
        .post_reset_password(&json!({
            "email": email,
            "token": token,
            "password": "An0therPassw0rd!",
            "confirmPassword": "An0therPassw0rd!",
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot reset Password");
}

#[tokio::test]
async fn reset_password_with_mismatched_confirmation_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post_reset_password(&json!({
            "email": random_email(),
            "token": "whatever",
            "password": "NewPassw0rd!",
            "confirmPassword": "S0methingElse!",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Invalid input: Password and Confirm Password does not match"
    );
}

#[tokio::test]
async fn login_google_provisions_a_federated_account() {
    let app = TestApp::new().await;
    let email = random_email();

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .and(query_param("id_token", "valid-google-id-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "aud": GOOGLE_CLIENT_ID,
            "sub": "110169484474386276334",
            "email": email,
            "email_verified": "true",
            "given_name": "Jane",
            "family_name": "Doe",
            "picture": "https://lh3.googleusercontent.com/a/photo.jpg",
        })))
        .mount(&app.google_server)
        .await;

    let response = app
        .post_login_google(&json!({ "idToken": "valid-google-id-token" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Login successfully");
    // The provider vouched for the address
    assert_eq!(body["emailVerificationRequired"], false);
    assert!(body["data"]["accessToken"].as_str().is_some());
    assert!(body["data"]["refreshToken"].as_str().is_some());

    // A second federated login resolves the same account
    let response = app
        .post_login_google(&json!({ "idToken": "valid-google-id-token" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn login_google_with_foreign_audience_is_rejected() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "aud": "someone-else.apps.googleusercontent.com",
            "sub": "110169484474386276334",
            "email": random_email(),
            "email_verified": "true",
        })))
        .mount(&app.google_server)
        .await;

    let response = app
        .post_login_google(&json!({ "idToken": "stolen-token" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_google_with_rejected_token_is_rejected() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_token",
        })))
        .mount(&app.google_server)
        .await;

    let response = app
        .post_login_google(&json!({ "idToken": "expired-token" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}
