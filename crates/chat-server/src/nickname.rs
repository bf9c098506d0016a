//! Placeholder nicknames for freshly accepted connections.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Random alphanumeric nickname of `len` characters.
pub fn generate_nickname(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
