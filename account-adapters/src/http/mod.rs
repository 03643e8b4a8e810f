pub mod refresh_cookie;
pub mod response;
pub mod routes;

pub use refresh_cookie::refresh_token_cookie;
pub use response::{ApiResponse, TokenData};
