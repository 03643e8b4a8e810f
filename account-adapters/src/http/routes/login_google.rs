use account_application::{LoginGoogleUseCase, RefreshPolicy};
use account_core::{AccountStore, IdentityProvider};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::auth::generate_access_token;
use crate::config::JwtSetting;
use crate::http::response::ApiResponse;

use super::error::ApiError;
use super::token_transport;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGoogleRequest {
    pub id_token: Secret<String>,
    #[serde(default)]
    pub use_cookie: bool,
}

/// Signs in with a Google ID token, provisioning a local account on first
/// contact.
#[tracing::instrument(name = "Login Google", skip_all)]
pub async fn login_google<S, P>(
    State((account_store, identity_provider, jwt, refresh_policy)): State<(
        S,
        P,
        JwtSetting,
        RefreshPolicy,
    )>,
    jar: CookieJar,
    Json(request): Json<LoginGoogleRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
    P: IdentityProvider + Clone + 'static,
{
    let use_case = LoginGoogleUseCase::new(account_store, identity_provider, refresh_policy);
    let authenticated = use_case.execute(request.id_token.expose_secret()).await?;

    let issued = generate_access_token(
        authenticated.account.id(),
        authenticated.account.email(),
        &authenticated.roles,
        &jwt,
    )?;

    let verification_required = !authenticated.account.email_confirmed();

    let (jar, token_data) = token_transport(
        jar,
        issued,
        &authenticated.refresh_session,
        request.use_cookie,
        jwt.refresh_token_validity_days,
    );

    Ok((
        jar,
        (
            StatusCode::OK,
            Json(
                ApiResponse::with_data("Login successfully", token_data)
                    .requires_verification(verification_required),
            ),
        ),
    ))
}
