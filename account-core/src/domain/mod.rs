pub mod account;
pub mod email;
pub mod password;
pub mod person_name;
pub mod phone_number;
pub mod refresh_token;
pub mod reset_token;
pub mod role;
pub mod verification_code;
