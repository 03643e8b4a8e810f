use account_application::{ForgotPasswordUseCase, ResetPolicy};
use account_core::{AccountStore, Email, EmailClient};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::response::ApiResponse;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Secret<String>,
}

/// Mails a password reset token. The response is the same whether or not the
/// address belongs to an account.
#[tracing::instrument(name = "Forgot Password", skip_all)]
pub async fn forgot_password<S, E>(
    State((account_store, email_client, reset_policy)): State<(S, E, ResetPolicy)>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;

    let use_case = ForgotPasswordUseCase::new(account_store, email_client, reset_policy);
    use_case.execute(email).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "An Email has been sent, please check your inbox",
        )),
    ))
}
