use account_application::VerifyEmailUseCase;
use account_core::{AccountStore, Email, VerificationCode};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::response::ApiResponse;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailQuery {
    pub email: Secret<String>,
    pub verification_code: String,
}

#[tracing::instrument(name = "Verify Email", skip_all)]
pub async fn verify_email<S>(
    State(account_store): State<S>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
{
    let email = Email::try_from(query.email)?;
    let code = VerificationCode::parse(&query.verification_code)?;

    let use_case = VerifyEmailUseCase::new(account_store);
    use_case.execute(email, code).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Verify Email successfully")),
    ))
}
