use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every authentication and account route.
///
/// `email_verification_required` is only present on responses where the
/// client has to decide whether to send the user to the verification screen.
/// `is_blocking` marks failures the client must not retry silently, such as a
/// deleted account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T = ()> {
    pub status: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_blocking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            email_verification_required: None,
            is_blocking: None,
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            email_verification_required: None,
            is_blocking: None,
            data: None,
        }
    }

    /// Success response that tells the client a verification code is waiting.
    pub fn verification_pending(message: impl Into<String>) -> Self {
        Self {
            email_verification_required: Some(true),
            ..Self::success(message)
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            email_verification_required: None,
            is_blocking: None,
            data: Some(data),
        }
    }

    pub fn requires_verification(mut self, required: bool) -> Self {
        self.email_verification_required = Some(required);
        self
    }
}

/// Access and refresh token payload returned by the login and refresh routes.
///
/// `refresh_token` is `None` when the caller opted into cookie transport. The
/// field still serializes as an explicit null so clients can key off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    pub access_token_expiry_time: DateTime<Utc>,
    pub refresh_token: Option<String>,
}
