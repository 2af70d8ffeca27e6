//! # srp6a-core
//!
//! Core types shared across the SRP-6a crates.
//!
//! This crate provides:
//! - Error types for arithmetic and protocol failures
//! - The per-attempt handshake state machine
//! - Transport-agnostic protocol message types

pub mod error;
pub mod message;
pub mod state;

pub use error::{Error, IntegerError, ProtocolError, Result};
pub use message::{ClientHello, ClientProof, CredentialRecord, ServerChallenge, ServerProof};
pub use state::HandshakeState;
