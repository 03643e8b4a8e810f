pub mod env {
    pub const CONFIG_FILE_ENV_VAR: &str = "ACCOUNT_SERVICE_CONFIG_FILE";
    pub const ALLOWED_ORIGINS_ENV_VAR: &str = "ACCOUNT_SERVICE_ALLOWED_ORIGINS";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
}

pub const DEFAULT_CONFIG_FILE: &str = "config/default.json";

/// Cookie carrying the refresh token when the client opts into cookie
/// transport.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";

    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "test@email.com";
        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}
