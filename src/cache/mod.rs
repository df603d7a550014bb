pub mod credential;
pub mod credential_cache;

pub use credential::{Credential, CredentialSource};
pub use credential_cache::CredentialManager;
