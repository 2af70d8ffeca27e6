//! Error types for the SRP-6a core.

use thiserror::Error;

/// Primary error type for all SRP operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Integer error: {0}")]
    Integer(#[from] IntegerError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Failures in the fixed-width integer layer.
///
/// These indicate programmer or integration errors, not protocol failures,
/// and should be treated as unrecoverable bugs in the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegerError {
    #[error("Malformed hex string: {0:?}")]
    MalformedHex(String),

    #[error("Integer has no specified hex width")]
    UndefinedWidth,

    #[error("Negative values cannot be represented in hex")]
    NegativeSerialization,
}

/// Handshake failures. All are terminal for the current login attempt; the
/// caller must restart from a fresh ephemeral pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Peer presented a public ephemeral congruent to 0 mod N.
    #[error("Degenerate public ephemeral from peer")]
    DegenerateEphemeral,

    /// The scrambling parameter reduced to 0 mod N.
    #[error("Degenerate scrambling parameter")]
    DegenerateScrambler,

    /// Recomputed proof did not match the peer's claim. Deliberately carries
    /// no cause: a wrong password and a tampered message are
    /// indistinguishable to the peer.
    #[error("Session proof verification failed")]
    ProofMismatch,

    /// A handshake driver was used out of order or after an abort.
    #[error("Invalid handshake state: {0}")]
    InvalidState(&'static str),
}

/// Convenience Result type.
pub type Result<T> = std::result::Result<T, Error>;
