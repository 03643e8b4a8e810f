pub mod auth;
pub mod config;
pub mod email;
pub mod http;
pub mod oauth;
pub mod persistence;

// Re-export commonly used types for convenience
pub use auth::{
    AccessTokenClaims, IssuedAccessToken, TokenAuthError, extract_bearer_token,
    generate_access_token, renew_access_token, validate_access_token,
    validate_expired_access_token,
};
pub use config::settings::{AccountServiceSetting, AllowedOrigins, JwtSetting};
pub use email::{MockEmailClient, PostmarkEmailClient};
pub use http::{
    ApiResponse, TokenData,
    routes::{self, ApiError},
};
pub use oauth::GoogleIdentityProvider;
pub use persistence::{InMemoryAccountStore, PostgresAccountStore};
