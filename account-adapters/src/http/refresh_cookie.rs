use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::config::REFRESH_TOKEN_COOKIE;

/// Builds the refresh token cookie handed out when a client opts into cookie
/// transport.
pub fn refresh_token_cookie(token: String, validity_days: i64) -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, token))
        .path("/") // apply cookie to all URLs on the server
        .http_only(true) // prevent JavaScript from accessing the cookie
        .secure(true)
        .same_site(SameSite::None) // browsers require Secure for cross-site cookies
        .max_age(Duration::days(validity_days))
        .build()
}
