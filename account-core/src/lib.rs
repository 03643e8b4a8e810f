pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, AccountId, AccountStatus, AuditTrail, Gender, Profile},
    email::{Email, EmailError},
    password::{Password, PasswordError},
    person_name::{PersonName, PersonNameError},
    phone_number::{PhoneNumber, PhoneNumberError},
    refresh_token::{RefreshSession, RefreshTokenSecret},
    reset_token::PasswordResetToken,
    role::{Role, RoleError},
    verification_code::{PendingVerification, VerificationCode, VerificationCodeError},
};

pub use ports::{
    repositories::{AccountStore, AccountStoreError},
    services::{EmailClient, FederatedIdentity, IdentityProvider, IdentityProviderError},
};
