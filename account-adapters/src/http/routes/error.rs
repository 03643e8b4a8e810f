use account_application::{
    ChangePasswordError, DeleteAccountError, ForgotPasswordError, LoginError, LoginGoogleError,
    RefreshTokenError, RegisterError, ResendVerificationError, ResetPasswordError,
    RestoreAccountError, VerifyEmailError,
};
use account_core::{
    AccountStoreError, EmailError, PasswordError, PersonNameError, PhoneNumberError,
    VerificationCodeError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::TokenAuthError;
use crate::http::response::ApiResponse;

/// Route-level error. Every variant maps to a fixed status code and a fixed
/// client-facing message; internal detail stays in the variant payload and is
/// only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Cannot login")]
    InvalidCredentials,

    #[error("Cannot change Password")]
    PasswordChangeRejected,

    #[error("Invalid Access Token or Refresh Token")]
    InvalidToken,

    #[error("Cannot reset Password")]
    InvalidResetToken,

    #[error("Account has been deleted")]
    AccountDeleted,

    #[error("User not found")]
    UserNotFound,

    #[error("The code is expired")]
    CodeExpired,

    #[error("Cannot verify Email")]
    CodeMismatch,

    #[error("Cannot resend Verification Email")]
    ResendForbidden,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid credentials")]
    ExternalAuthError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing token")]
    MissingToken,

    #[error("Something went wrong")]
    UnexpectedError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::InvalidInput(_)
            | ApiError::MissingToken
            | ApiError::CodeExpired
            | ApiError::CodeMismatch => StatusCode::BAD_REQUEST,

            ApiError::DuplicateEmail => StatusCode::CONFLICT,

            ApiError::InvalidCredentials
            | ApiError::PasswordChangeRejected
            | ApiError::InvalidToken
            | ApiError::InvalidResetToken
            | ApiError::AccountDeleted
            | ApiError::ExternalAuthError(_) => StatusCode::UNAUTHORIZED,

            ApiError::UserNotFound => StatusCode::NOT_FOUND,

            ApiError::ResendForbidden | ApiError::Forbidden => StatusCode::FORBIDDEN,

            ApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::ExternalAuthError(detail) | ApiError::UnexpectedError(detail) => {
                tracing::error!(error = %detail, "Request failed");
            }
            _ => {}
        }

        let mut body = ApiResponse::failure(self.to_string());
        body.email_verification_required = match &self {
            // The client routes an expired code back to the resend screen.
            ApiError::CodeExpired => Some(false),
            ApiError::ResendForbidden => Some(true),
            _ => None,
        };
        body.is_blocking = match &self {
            ApiError::AccountDeleted => Some(true),
            _ => None,
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<EmailError> for ApiError {
    fn from(error: EmailError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<PersonNameError> for ApiError {
    fn from(error: PersonNameError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<PhoneNumberError> for ApiError {
    fn from(error: PhoneNumberError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<VerificationCodeError> for ApiError {
    fn from(error: VerificationCodeError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<AccountStoreError> for ApiError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::AccountAlreadyExists => ApiError::DuplicateEmail,
            AccountStoreError::AccountNotFound => ApiError::UserNotFound,
            AccountStoreError::IncorrectPassword => ApiError::InvalidCredentials,
            AccountStoreError::RefreshSessionConflict => ApiError::InvalidToken,
            AccountStoreError::InvalidResetToken => ApiError::InvalidResetToken,
            AccountStoreError::UnexpectedError(e) => ApiError::UnexpectedError(e),
        }
    }
}

impl From<TokenAuthError> for ApiError {
    fn from(error: TokenAuthError) -> Self {
        match error {
            TokenAuthError::InvalidToken | TokenAuthError::TokenError(_) => ApiError::InvalidToken,
            TokenAuthError::MissingToken => ApiError::MissingToken,
            TokenAuthError::UnexpectedError(e) => ApiError::UnexpectedError(e),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::DuplicateEmail => ApiError::DuplicateEmail,
            RegisterError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => ApiError::InvalidCredentials,
            LoginError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<RefreshTokenError> for ApiError {
    fn from(error: RefreshTokenError) -> Self {
        match error {
            RefreshTokenError::InvalidToken => ApiError::InvalidToken,
            RefreshTokenError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<VerifyEmailError> for ApiError {
    fn from(error: VerifyEmailError) -> Self {
        match error {
            VerifyEmailError::NotFound => ApiError::UserNotFound,
            VerifyEmailError::CodeExpired => ApiError::CodeExpired,
            VerifyEmailError::CodeMismatch => ApiError::CodeMismatch,
            VerifyEmailError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<ResendVerificationError> for ApiError {
    fn from(error: ResendVerificationError) -> Self {
        match error {
            ResendVerificationError::NotFound => ApiError::UserNotFound,
            ResendVerificationError::Forbidden => ApiError::ResendForbidden,
            ResendVerificationError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<ChangePasswordError> for ApiError {
    fn from(error: ChangePasswordError) -> Self {
        match error {
            ChangePasswordError::NotFound => ApiError::UserNotFound,
            ChangePasswordError::InvalidCredentials => ApiError::PasswordChangeRejected,
            ChangePasswordError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<ForgotPasswordError> for ApiError {
    fn from(error: ForgotPasswordError) -> Self {
        match error {
            ForgotPasswordError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<ResetPasswordError> for ApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::NotFound => ApiError::UserNotFound,
            ResetPasswordError::InvalidToken => ApiError::InvalidResetToken,
            ResetPasswordError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<LoginGoogleError> for ApiError {
    fn from(error: LoginGoogleError) -> Self {
        match error {
            LoginGoogleError::ExternalAuthError(e) => ApiError::ExternalAuthError(e.to_string()),
            LoginGoogleError::AccountDeleted => ApiError::AccountDeleted,
            LoginGoogleError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<DeleteAccountError> for ApiError {
    fn from(error: DeleteAccountError) -> Self {
        match error {
            DeleteAccountError::NotFound => ApiError::UserNotFound,
            DeleteAccountError::AccountStoreError(e) => e.into(),
        }
    }
}

impl From<RestoreAccountError> for ApiError {
    fn from(error: RestoreAccountError) -> Self {
        match error {
            RestoreAccountError::NotFound => ApiError::UserNotFound,
            RestoreAccountError::AccountStoreError(e) => e.into(),
        }
    }
}
