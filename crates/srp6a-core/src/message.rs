//! Transport-agnostic protocol messages.
//!
//! The logical message sequence of one login attempt:
//!
//! 1. Client → Server: [`ClientHello`] (username).
//! 2. Server → Client: [`ServerChallenge`] (salt, public ephemeral B).
//! 3. Client → Server: [`ClientProof`] (public ephemeral A, proof M1).
//! 4. Server → Client: [`ServerProof`] (proof M2), or an abort.
//!
//! All integers travel as fixed-width lowercase hex strings, width equal to
//! the hex width of the group modulus (proofs at the hash output width, the
//! salt at its own fixed width). Framing and transport are the caller's
//! concern.

/// First message: the client identifies itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub username: String,
}

/// Server's reply: the stored salt and the server's public ephemeral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerChallenge {
    pub salt: String,
    pub public: String,
}

/// Client's public ephemeral and evidence of the derived session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProof {
    pub public: String,
    pub proof: String,
}

/// Server's evidence, sent only after the client's proof checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProof {
    pub proof: String,
}

/// Registration-time artifact: what the server stores instead of a password.
///
/// Created once per user; owned and persisted by an external identity store.
/// Never regenerated unless the password changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub salt: String,
    pub verifier: String,
}
