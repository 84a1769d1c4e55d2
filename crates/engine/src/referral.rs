//! Referral codes and the outcome of a linkage attempt.

use rand::Rng;

/// Bonus credited to a referrer when a new user signs up with their code.
pub const DEFAULT_REFERRAL_BONUS: i64 = 3000;

pub(crate) const CODE_LEN: usize = 8;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Attempts before giving up on finding a free code.
pub(crate) const CODE_ATTEMPTS: usize = 8;

/// What happened to a referral code presented by a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Linkage {
    /// The user is now linked to `referrer`, who received the bonus.
    Linked { referrer: String },
    /// The code belongs to the user presenting it.
    SelfReferral,
    /// No user owns the code.
    UnknownCode,
    /// The user already had a referrer; nothing was written.
    AlreadyLinked,
}

pub(crate) fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Codes are handed out upper case; accept them typed in any case.
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
