use account_application::{ResendOutcome, ResendVerificationError, ResendVerificationUseCase, VerificationPolicy};
use account_core::{AccountStore, Email, EmailClient};
use axum::{Json, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use crate::auth::{extract_bearer_token, validate_access_token};
use crate::config::JwtSetting;
use crate::http::response::ApiResponse;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationEmailRequest {
    #[serde(default)]
    pub email: Option<Secret<String>>,
}

/// Reissues the verification code. The target is the given email, the
/// authenticated caller, or both when they agree. An unknown address gets the
/// same success-shaped answer as a real one.
#[tracing::instrument(name = "Resend Verification Email", skip_all)]
pub async fn resend_verification_email<S, E>(
    State((account_store, email_client, verification_policy, jwt)): State<(
        S,
        E,
        VerificationPolicy,
        JwtSetting,
    )>,
    headers: HeaderMap,
    Json(request): Json<ResendVerificationEmailRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = request.email.map(Email::try_from).transpose()?;

    // A missing or invalid bearer token just means an anonymous caller.
    let caller = extract_bearer_token(&headers)
        .ok()
        .and_then(|token| validate_access_token(token, &jwt).ok())
        .and_then(|claims| claims.account_id().ok());

    let use_case =
        ResendVerificationUseCase::new(account_store, email_client, verification_policy);

    match use_case.execute(email, caller).await {
        Ok(ResendOutcome::Sent) | Err(ResendVerificationError::NotFound) => Ok((
            StatusCode::OK,
            Json(ApiResponse::verification_pending(
                "Resend Verification Email successfully",
            )),
        )),
        Ok(ResendOutcome::AlreadyVerified) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success("Email has been verified")),
        )),
        Err(e) => Err(e.into()),
    }
}
