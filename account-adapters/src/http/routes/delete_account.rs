use account_application::DeleteAccountUseCase;
use account_core::{AccountId, AccountStore, Role};
use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::config::JwtSetting;
use crate::http::response::ApiResponse;

use super::error::ApiError;
use super::require_active_caller;

/// Soft-deletes the account. Admin only; the target keeps its row but loses
/// its refresh session and can no longer authenticate.
#[tracing::instrument(name = "Delete Account", skip_all)]
pub async fn delete_account<S>(
    State((account_store, jwt)): State<(S, JwtSetting)>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
{
    let (caller, claims) = require_active_caller(&account_store, &headers, &jwt).await?;

    if !claims.has_role(Role::Admin) {
        return Err(ApiError::Forbidden);
    }

    let use_case = DeleteAccountUseCase::new(account_store);

    use_case
        .execute(AccountId::from(id), Some(caller.id()))
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Delete Account successfully")),
    ))
}
