use account_adapters::{
    GoogleIdentityProvider, PostmarkEmailClient,
    config::{AccountServiceSetting, AllowedOrigins},
    persistence::PostgresAccountStore,
};
use account_core::Email;
use account_service_lib::{AccountService, get_postgres_pool, init_tracing};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AccountServiceSetting::load()?;

    // Setup database connection pool
    let pg_pool = get_postgres_pool(config.postgres.url.expose_secret()).await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    // Create store
    let account_store = PostgresAccountStore::new(pg_pool);

    // Create email client
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.email_client.timeout_milliseconds))
        .build()?;

    let email_client = PostmarkEmailClient::new(
        config.email_client.base_url.clone(),
        Email::try_from(Secret::new(config.email_client.sender.clone()))?,
        config.email_client.auth_token.clone(),
        http_client,
    );

    // Create identity provider
    let google_client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.google.timeout_milliseconds))
        .build()?;

    let identity_provider = GoogleIdentityProvider::new(
        google_client,
        config.google.tokeninfo_url.clone(),
        config.google.client_id.clone(),
    );

    let allowed_origins = AllowedOrigins::from_env();

    let service = AccountService::new(account_store, email_client, identity_provider, &config);

    let listener = TcpListener::bind(config.application.address()).await?;

    service.run_standalone(listener, allowed_origins).await?;

    Ok(())
}
