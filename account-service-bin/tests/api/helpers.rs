use account_adapters::{
    GoogleIdentityProvider, MockEmailClient,
    config::{
        settings::{
            AccountServiceSetting, ApplicationSetting, EmailClientSetting, GoogleSetting,
            JwtSetting, PasswordResetSetting, PostgresSetting, VerificationSetting,
        },
        test::APP_ADDRESS,
    },
    persistence::InMemoryAccountStore,
};
use account_core::{
    Account, AccountId, AccountStore, Email, Password, PendingVerification, Profile, Role,
    VerificationCode,
};
use account_service_lib::AccountService;
use chrono::{Duration, Utc};
use fake::{Fake, faker::internet::en::SafeEmail};
use secrecy::Secret;
use serde_json::Value;
use uuid::Uuid;
use wiremock::MockServer;

pub const GOOGLE_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub account_store: InMemoryAccountStore,
    pub email_client: MockEmailClient,
    pub google_server: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let account_store = InMemoryAccountStore::new();
        let email_client = MockEmailClient::new();
        let google_server = MockServer::start().await;

        let settings = test_settings();

        let identity_provider = GoogleIdentityProvider::new(
            reqwest::Client::new(),
            format!("{}/tokeninfo", google_server.uri()),
            GOOGLE_CLIENT_ID.to_string(),
        );

        let service = AccountService::new(
            account_store.clone(),
            email_client.clone(),
            identity_provider,
            &settings,
        );

        let listener = tokio::net::TcpListener::bind(APP_ADDRESS)
            .await
            .expect("Failed to bind ephemeral port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(service.run_standalone(listener, None));

        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build reqwest client");

        Self {
            address,
            http_client,
            account_store,
            email_client,
            google_server,
        }
    }

    pub async fn post_register(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/api/v1/authentication/register", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}/api/v1/authentication/login", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_refresh_token(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!(
                "{}/api/v1/authentication/refresh-token",
                self.address
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Refresh with the secret in the `refreshToken` cookie rather than the
    /// body. The cookie header is set by hand because the test client talks
    /// plain http and the cookie is marked Secure.
    pub async fn post_refresh_token_with_cookie(
        &self,
        body: &Value,
        cookie_value: &str,
    ) -> reqwest::Response {
        self.http_client
            .post(format!(
                "{}/api/v1/authentication/refresh-token",
                self.address
            ))
            .header(
                reqwest::header::COOKIE,
                format!("refreshToken={cookie_value}"),
            )
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_verify_email(&self, email: &str, code: &str) -> reqwest::Response {
        self.http_client
            .get(format!(
                "{}/api/v1/authentication/verify-email",
                self.address
            ))
            .query(&[("email", email), ("verificationCode", code)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_resend_verification_email(
        &self,
        body: &Value,
        bearer: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self
            .http_client
            .post(format!(
                "{}/api/v1/authentication/resend-verification-email",
                self.address
            ))
            .json(body);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_change_password(
        &self,
        body: &Value,
        bearer: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self
            .http_client
            .post(format!(
                "{}/api/v1/authentication/change-password",
                self.address
            ))
            .json(body);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_forgot_password(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!(
                "{}/api/v1/authentication/forgot-password",
                self.address
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_reset_password(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!(
                "{}/api/v1/authentication/reset-password",
                self.address
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_login_google(&self, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!(
                "{}/api/v1/authentication/login-google",
                self.address
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_account(&self, id: Uuid, bearer: &str) -> reqwest::Response {
        self.http_client
            .delete(format!("{}/api/v1/accounts/{}", self.address, id))
            .bearer_auth(bearer)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_restore_account(&self, id: Uuid, bearer: &str) -> reqwest::Response {
        self.http_client
            .put(format!("{}/api/v1/accounts/{}/restore", self.address, id))
            .bearer_auth(bearer)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers through the API and confirms the email with the code from
    /// the recorded verification message.
    pub async fn register_verified(&self, email: &str, password: &str) {
        let response = self.post_register(&register_body(email, password)).await;
        assert_eq!(response.status().as_u16(), 200);

        let sent = self.email_client.sent().await;
        let verification = sent
            .iter()
            .rev()
            .find(|mail| mail.recipient == email.to_lowercase())
            .expect("No verification email recorded");
        let code = code_in(&verification.content);

        let response = self.get_verify_email(email, &code).await;
        assert_eq!(response.status().as_u16(), 200);
    }

    /// Seeds a confirmed account directly in the store.
    pub async fn seed_verified_account(&self, email: &str, password: &str) -> AccountId {
        let now = Utc::now();
        let pending = PendingVerification::new(
            VerificationCode::parse("123456").unwrap(),
            now + Duration::minutes(15),
        );
        let parsed = Email::try_from(Secret::new(email.to_string())).unwrap();
        let mut account = Account::local(parsed, Profile::default(), pending, now);
        account.confirm_email(now);

        let password = Password::try_from(Secret::new(password.to_string())).unwrap();

        self.account_store
            .add_account(account.clone(), Some(password))
            .await
            .unwrap();
        self.account_store
            .assign_role(&account.id(), Role::User)
            .await
            .unwrap();

        account.id()
    }

    pub async fn seed_admin(&self, email: &str, password: &str) -> AccountId {
        let id = self.seed_verified_account(email, password).await;
        self.account_store
            .assign_role(&id, Role::Admin)
            .await
            .unwrap();
        id
    }

    pub async fn login_tokens(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post_login(&serde_json::json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.unwrap();
        let access = body["data"]["accessToken"].as_str().unwrap().to_string();
        let refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();

        (access, refresh)
    }
}

fn test_settings() -> AccountServiceSetting {
    AccountServiceSetting {
        application: ApplicationSetting {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        postgres: PostgresSetting {
            url: Secret::new("postgres://unused".to_string()),
        },
        jwt: JwtSetting {
            secret: Secret::new("api-test-signing-secret".to_string()),
            valid_issuer: "account-service-tests".to_string(),
            valid_audience: "account-clients".to_string(),
            token_validity_minutes: 5,
            refresh_token_validity_days: 7,
        },
        verification: VerificationSetting {
            code_length: 6,
            code_validity_minutes: 15,
        },
        password_reset: PasswordResetSetting {
            token_validity_minutes: 15,
        },
        email_client: EmailClientSetting {
            base_url: "http://localhost".to_string(),
            sender: "test@email.com".to_string(),
            auth_token: Secret::new("unused".to_string()),
            timeout_milliseconds: 200,
        },
        google: GoogleSetting {
            client_id: GOOGLE_CLIENT_ID.to_string(),
            tokeninfo_url: "http://localhost".to_string(),
            timeout_milliseconds: 200,
        },
    }
}

pub fn random_email() -> String {
    SafeEmail().fake()
}

pub fn register_body(email: &str, password: &str) -> Value {
    serde_json::json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "gender": "Female",
        "dateOfBirth": "1990-04-12",
        "phoneNumber": "+15550100200",
        "email": email,
        "password": password,
        "confirmPassword": password,
    })
}

/// Pulls the code or token out of "... is {value}. The ..." email bodies.
pub fn code_in(content: &str) -> String {
    content
        .split("is ")
        .nth(1)
        .and_then(|rest| rest.split('.').next())
        .expect("No code in email body")
        .to_string()
}
