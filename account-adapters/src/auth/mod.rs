pub mod jwt;

pub use jwt::{
    AccessTokenClaims, IssuedAccessToken, TokenAuthError, extract_bearer_token,
    generate_access_token, renew_access_token, validate_access_token,
    validate_expired_access_token,
};
