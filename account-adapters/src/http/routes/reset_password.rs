use account_application::ResetPasswordUseCase;
use account_core::{AccountStore, Email, Password, PasswordResetToken};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::http::response::ApiResponse;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Secret<String>,
    pub token: Secret<String>,
    pub password: Secret<String>,
    pub confirm_password: Secret<String>,
}

#[tracing::instrument(name = "Reset Password", skip_all)]
pub async fn reset_password<S>(
    State(account_store): State<S>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
{
    if request.password.expose_secret() != request.confirm_password.expose_secret() {
        return Err(ApiError::InvalidInput(
            "Password and Confirm Password does not match".to_string(),
        ));
    }

    let email = Email::try_from(request.email)?;
    let token = PasswordResetToken::from(request.token);
    let password = Password::try_from(request.password)?;

    let use_case = ResetPasswordUseCase::new(account_store);
    use_case.execute(email, token, password).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Reset Password successfully")),
    ))
}
