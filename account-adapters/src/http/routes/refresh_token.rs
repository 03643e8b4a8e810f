use account_application::{RefreshPolicy, RefreshTokenUseCase};
use account_core::AccountStore;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::auth::{renew_access_token, validate_expired_access_token};
use crate::config::JwtSetting;
use crate::http::response::ApiResponse;

use super::error::ApiError;
use super::{resolve_refresh_secret, token_transport};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub refresh_token: Option<Secret<String>>,
    #[serde(default)]
    pub use_cookie: bool,
}

/// Exchanges an expired access token plus a live refresh token for a fresh
/// pair. The access token's signature must still verify; only its expiry may
/// have passed.
#[tracing::instrument(name = "Refresh Token", skip_all)]
pub async fn refresh_token<S>(
    State((account_store, jwt, refresh_policy)): State<(S, JwtSetting, RefreshPolicy)>,
    jar: CookieJar,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
{
    let claims = validate_expired_access_token(request.access_token.expose_secret(), &jwt)?;
    let account_id = claims.account_id()?;

    let presented = resolve_refresh_secret(request.refresh_token, &jar)?;

    let use_case = RefreshTokenUseCase::new(account_store, refresh_policy);
    let session = use_case.execute(account_id, presented).await?;

    let issued = renew_access_token(&claims, &jwt)?;

    let (jar, token_data) = token_transport(
        jar,
        issued,
        &session,
        request.use_cookie,
        jwt.refresh_token_validity_days,
    );

    Ok((
        jar,
        (
            StatusCode::OK,
            Json(ApiResponse::with_data(
                "Refresh Token successfully",
                token_data,
            )),
        ),
    ))
}
