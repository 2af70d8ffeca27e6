//! # srp6a-crypto
//!
//! SRP-6a (Secure Remote Password) arithmetic and protocol procedures.
//!
//! This crate provides:
//! - A fixed-width hexadecimal big-integer type underpinning all protocol math
//! - Group parameters (RFC 5054 3072-bit prime, generator 5)
//! - Registration-time credential derivation (salt, private key, verifier)
//! - Per-login ephemeral exchange, session derivation, and mutual proof
//! - Stateful handshake drivers enforcing the per-attempt state machine
//!
//! The hash function is injected as a [`digest::Digest`] type parameter;
//! ephemeral secrets and session keys are zeroized on drop; proof comparisons
//! are constant-time.
//!
//! The client never transmits the password and the server never learns it:
//! both sides independently derive the same session key, and each verifies
//! the other's proof before trusting that key.

pub mod client;
pub mod groups;
pub mod handshake;
pub mod integer;
pub mod server;
pub mod session;

mod hash;

pub use groups::{Group, G_3072};
pub use handshake::{ClientHandshake, ServerHandshake};
pub use integer::SrpInteger;
pub use session::{Ephemeral, Session};
