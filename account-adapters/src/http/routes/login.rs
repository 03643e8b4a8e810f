use account_application::{LoginUseCase, RefreshPolicy};
use account_core::{AccountStore, Email, Password};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use secrecy::Secret;
use serde::Deserialize;

use crate::auth::generate_access_token;
use crate::config::JwtSetting;
use crate::http::response::ApiResponse;

use super::error::ApiError;
use super::token_transport;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    #[serde(default)]
    pub use_cookie: bool,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<S>(
    State((account_store, jwt, refresh_policy)): State<(S, JwtSetting, RefreshPolicy)>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let use_case = LoginUseCase::new(account_store, refresh_policy);
    let authenticated = use_case.execute(email, password).await?;

    let issued = generate_access_token(
        authenticated.account.id(),
        authenticated.account.email(),
        &authenticated.roles,
        &jwt,
    )?;

    // The client still has to verify the address; login itself is allowed.
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
