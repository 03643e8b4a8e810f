use account_application::ChangePasswordUseCase;
use account_core::{AccountStore, Password};
use axum::{Json, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::config::JwtSetting;
use crate::http::response::ApiResponse;

use super::error::ApiError;
use super::require_active_caller;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Secret<String>,
    pub new_password: Secret<String>,
    pub confirm_password: Secret<String>,
}

#[tracing::instrument(name = "Change Password", skip_all)]
pub async fn change_password<S>(
    State((account_store, jwt)): State<(S, JwtSetting)>,
    headers: HeaderMap,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
{
    let (account, _claims) = require_active_caller(&account_store, &headers, &jwt).await?;

    if request.new_password.expose_secret() != request.confirm_password.expose_secret() {
        return Err(ApiError::InvalidInput(
            "New password and confirm password does not match".to_string(),
        ));
    }

    let old_password = Password::try_from(request.old_password)?;
    let new_password = Password::try_from(request.new_password)?;

    let use_case = ChangePasswordUseCase::new(account_store);

    use_case
        .execute(account.id(), old_password, new_password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Change Password successfully")),
    ))
}
