pub mod change_password;
pub mod delete_account;
pub mod error;
pub mod forgot_password;
pub mod login;
pub mod login_google;
pub mod refresh_token;
pub mod register;
pub mod resend_verification_email;
pub mod reset_password;
pub mod restore_account;
pub mod verify_email;

pub use change_password::{ChangePasswordRequest, change_password};
pub use delete_account::delete_account;
pub use error::ApiError;
pub use forgot_password::{ForgotPasswordRequest, forgot_password};
pub use login::{LoginRequest, login};
pub use login_google::{LoginGoogleRequest, login_google};
pub use refresh_token::{RefreshTokenRequest, refresh_token};
pub use register::{RegisterRequest, register};
pub use resend_verification_email::{ResendVerificationEmailRequest, resend_verification_email};
pub use reset_password::{ResetPasswordRequest, reset_password};
pub use restore_account::restore_account;
pub use verify_email::{VerifyEmailQuery, verify_email};

use account_core::{Account, AccountStore, RefreshSession, RefreshTokenSecret};
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use secrecy::{ExposeSecret, Secret};

use crate::auth::{
    AccessTokenClaims, IssuedAccessToken, extract_bearer_token, validate_access_token,
};
use crate::config::{JwtSetting, REFRESH_TOKEN_COOKIE};
use crate::http::refresh_cookie::refresh_token_cookie;
use crate::http::response::TokenData;

/// Resolves the caller behind the bearer token and refuses soft-deleted
/// accounts. A deleted caller also loses any refresh session it still holds,
/// so its next refresh attempt dies too.
pub(crate) async fn require_active_caller<S>(
    account_store: &S,
    headers: &HeaderMap,
    jwt: &JwtSetting,
) -> Result<(Account, AccessTokenClaims), ApiError>
where
    S: AccountStore,
{
    let token = extract_bearer_token(headers)?;
    let claims = validate_access_token(token, jwt)?;
    let caller = claims.account_id()?;

    let account = account_store
        .find_by_id(&caller)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    if account.is_deleted() {
        account_store.clear_refresh_session(&caller).await?;
        return Err(ApiError::AccountDeleted);
    }

    Ok((account, claims))
}

/// The refresh secret comes from the request body when present, otherwise
/// from the `refreshToken` cookie.
pub(crate) fn resolve_refresh_secret(
    from_body: Option<Secret<String>>,
    jar: &CookieJar,
) -> Result<RefreshTokenSecret, ApiError> {
    if let Some(secret) = from_body {
        return Ok(RefreshTokenSecret::from(secret));
    }

    let cookie = jar.get(REFRESH_TOKEN_COOKIE).ok_or(ApiError::InvalidToken)?;

    Ok(RefreshTokenSecret::from(Secret::new(
        cookie.value().to_string(),
    )))
}

/// Splits the issued tokens between body and cookie jar. With `use_cookie`
/// the refresh secret travels only in the cookie and the body field is null.
pub(crate) fn token_transport(
    jar: CookieJar,
    issued: IssuedAccessToken,
    session: &RefreshSession,
    use_cookie: bool,
    refresh_validity_days: i64,
) -> (CookieJar, TokenData) {
    let secret = session.secret().as_ref().expose_secret().clone();

    if use_cookie {
        let jar = jar.add(refresh_token_cookie(secret, refresh_validity_days));
        let data = TokenData {
            access_token: issued.token,
            access_token_expiry_time: issued.expires_at,
            refresh_token: None,
        };
        (jar, data)
    } else {
        let data = TokenData {
            access_token: issued.token,
            access_token_expiry_time: issued.expires_at,
            refresh_token: Some(secret),
        };
        (jar, data)
    }
}
