pub mod change_password;
pub mod delete_account;
pub mod forgot_password;
pub mod login;
pub mod login_google;
pub mod refresh_token;
pub mod register;
pub mod resend_verification;
pub mod reset_password;
pub mod restore_account;
pub mod verify_email;
