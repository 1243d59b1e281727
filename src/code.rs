//! Serial code generation.
//!
//! Generated codes are 12 characters drawn from `A-Z0-9`. They are not meant
//! to be unguessable secrets, only unique enough for an admin-issued batch.

use rand::Rng;

/// Length of every generated serial code.
pub const CODE_LENGTH: usize = 12;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random code of `length` characters from `A-Z0-9`.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}
