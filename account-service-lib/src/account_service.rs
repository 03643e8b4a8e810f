use account_adapters::{
    config::{AccountServiceSetting, AllowedOrigins},
    http::routes::{
        change_password, delete_account, forgot_password, login, login_google, refresh_token,
        register, resend_verification_email, reset_password, restore_account, verify_email,
    },
};
use account_core::{AccountStore, EmailClient, IdentityProvider};
use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The account service's HTTP surface, assembled from the route handlers and
/// the store, email and identity-provider implementations handed in.
pub struct AccountService {
    router: Router,
}

impl AccountService {
    /// Wires every route with exactly the state it needs.
    ///
    /// Stores and clients implement Clone over internal shared handles, so
    /// each route's state tuple is cheap to build.
    pub fn new<S, E, P>(
        account_store: S,
        email_client: E,
        identity_provider: P,
        settings: &AccountServiceSetting,
    ) -> Self
    where
        S: AccountStore + Clone + 'static,
        E: EmailClient + Clone + 'static,
        P: IdentityProvider + Clone + 'static,
    {
        let jwt = settings.jwt.clone();
        let refresh_policy = settings.jwt.refresh_policy();
        let verification_policy = settings.verification.policy();
        let reset_policy = settings.password_reset.policy();

        let authentication = Router::new()
            .route("/register", post(register::<S, E>))
            .with_state((
                account_store.clone(),
                email_client.clone(),
                verification_policy,
            ))
            .route("/login", post(login::<S>))
            .with_state((account_store.clone(), jwt.clone(), refresh_policy))
            .route("/refresh-token", post(refresh_token::<S>))
            .with_state((account_store.clone(), jwt.clone(), refresh_policy))
            .route("/verify-email", get(verify_email::<S>))
            .with_state(account_store.clone())
            .route(
                "/resend-verification-email",
                post(resend_verification_email::<S, E>),
            )
            .with_state((
                account_store.clone(),
                email_client.clone(),
                verification_policy,
                jwt.clone(),
            ))
            .route("/change-password", post(change_password::<S>))
            .with_state((account_store.clone(), jwt.clone()))
            .route("/forgot-password", post(forgot_password::<S, E>))
            .with_state((account_store.clone(), email_client, reset_policy))
            .route("/reset-password", post(reset_password::<S>))
            .with_state(account_store.clone())
            .route("/login-google", post(login_google::<S, P>))
            .with_state((
                account_store.clone(),
                identity_provider,
                jwt.clone(),
                refresh_policy,
            ));

        let accounts = Router::new()
            .route("/{id}", delete(delete_account::<S>))
            .with_state((account_store.clone(), jwt.clone()))
            .route("/{id}/restore", put(restore_account::<S>))
            .with_state((account_store, jwt));

        let router = Router::new()
            .nest("/api/v1/authentication", authentication)
            .nest("/api/v1/accounts", accounts);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Turns the service into a router that can be mounted on another
    /// application, applying the CORS allow-list when one is given.
    pub fn as_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Runs the service as a standalone server on the given listener.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_router(allowed_origins);

        tracing::info!("Account service listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}
