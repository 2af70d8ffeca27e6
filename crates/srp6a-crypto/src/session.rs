//! Per-attempt key material.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A fresh secret/public pair used for exactly one login attempt.
///
/// The secret never leaves its owner's process and is wiped on drop; only
/// `public` is ever transmitted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Ephemeral {
    pub secret: String,
    pub public: String,
}

/// The outcome of session derivation on either side.
///
/// `key` is the shared session key K and stays local (wiped on drop);
/// `proof` is the evidence digest exchanged with the peer.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Session {
    pub key: String,
    pub proof: String,
}
