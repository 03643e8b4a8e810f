pub mod policies;
pub mod session;
pub mod use_cases;


// Re-export commonly used types for convenience
pub use policies::{RefreshPolicy, ResetPolicy, VerificationPolicy};
pub use use_cases::{
    change_password::{ChangePasswordError, ChangePasswordUseCase},
    delete_account::{DeleteAccountError, DeleteAccountUseCase},
    forgot_password::{ForgotPasswordError, ForgotPasswordUseCase},
    login::{AuthenticatedAccount, LoginError, LoginUseCase},
    login_google::{LoginGoogleError, LoginGoogleUseCase},
    refresh_token::{RefreshTokenError, RefreshTokenUseCase},
    register::{RegisterError, RegisterUseCase, Registration},
    resend_verification::{ResendOutcome, ResendVerificationError, ResendVerificationUseCase},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
    restore_account::{RestoreAccountError, RestoreAccountUseCase},
    verify_email::{VerifyEmailError, VerifyEmailUseCase},
};
