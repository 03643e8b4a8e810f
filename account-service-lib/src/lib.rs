mod account_service;
mod helpers;
mod tracing;

pub use account_service::AccountService;
pub use helpers::{configure_postgresql, get_postgres_pool};
pub use tracing::init_tracing;

// Re-export commonly used types
pub use account_core::{AccountStore, Email, EmailClient, IdentityProvider};
