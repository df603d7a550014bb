use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::utils::constants::SCOPED_TOKEN_PREFIX;

/// `sk_` followed by `len` characters from `[A-Za-z0-9]`.
pub fn generate_scoped_token(len: usize) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    format!("{}{}", SCOPED_TOKEN_PREFIX, suffix)
}

pub fn is_scoped_token(token: &str) -> bool {
    token.starts_with(SCOPED_TOKEN_PREFIX)
}
