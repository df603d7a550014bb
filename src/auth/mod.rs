pub mod authenticator;
pub mod scoped_token;

pub use authenticator::{bearer_token, RequestAuthenticator};
pub use scoped_token::{generate_scoped_token, is_scoped_token};
