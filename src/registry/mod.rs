pub mod token_registry;

pub use token_registry::{TokenEntry, TokenRegistry};
