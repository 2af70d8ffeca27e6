//! Client-side protocol procedures.
//!
//! Registration time: [`generate_salt`], [`derive_private_key`],
//! [`derive_verifier`] produce the (salt, verifier) pair the server stores.
//! Login time: [`generate_ephemeral`], [`derive_session`],
//! [`verify_session`] run once per attempt, in that order.
//!
//! All inputs and outputs are fixed-width hex strings; the hash function is
//! the `D` type parameter and must match the server's.

use digest::Digest;
use rand::rngs::OsRng;
use rand::RngCore;
use srp6a_core::error::{ProtocolError, Result};
use subtle::ConstantTimeEq;

use crate::groups::{self, Group};
use crate::hash::{hash, pad};
use crate::integer::SrpInteger;
use crate::session::{Ephemeral, Session};

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Ephemeral secret length in bytes.
pub const EPHEMERAL_KEY_LENGTH: usize = 32;

/// A fresh random salt as lowercase hex. Per-user uniqueness is the
/// identity store's responsibility.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// x = H(salt || H(username || ":" || password)) mod N.
///
/// The inner hash binds the username to the password so two users sharing a
/// password do not share an outer hash; the outer hash binds the salt.
pub fn derive_private_key<D: Digest>(
    group: &Group,
    salt: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let s = SrpInteger::from_hex(salt)?;
    let inner = hash::<D>(&[username.as_bytes(), b":", password.as_bytes()]);
    let x = hash::<D>(&[&s.to_bytes()?, &inner.to_bytes()?]).modulo(&group.n);
    Ok(x.to_hex()?)
}

/// v = g^x mod N, the value the server stores instead of the password.
pub fn derive_verifier(group: &Group, private_key: &str) -> Result<String> {
    let x = SrpInteger::from_hex(private_key)?;
    Ok(group.g.mod_pow(&x, &group.n).to_hex()?)
}

/// Fresh client ephemeral pair: a random, A = g^a mod N.
pub fn generate_ephemeral(group: &Group) -> Result<Ephemeral> {
    let secret = SrpInteger::random_integer(EPHEMERAL_KEY_LENGTH);
    let public = group.g.mod_pow(&secret, &group.n);
    Ok(Ephemeral {
        secret: secret.to_hex()?,
        public: public.to_hex()?,
    })
}

/// Derive the session key and client proof from the server's challenge.
///
/// Premaster secret: S = (B - k*g^x)^(a + u*x) mod N, then K = H(PAD(S)) and
/// M1 = H(A || B || K). Rejects a degenerate server ephemeral (B ≡ 0 mod N)
/// and a degenerate scrambler (u ≡ 0 mod N) before touching the secret
/// exponent.
pub fn derive_session<D: Digest>(
    group: &Group,
    client_secret_ephemeral: &str,
    server_public_ephemeral: &str,
    private_key: &str,
) -> Result<Session> {
    let n = &group.n;
    let a = SrpInteger::from_hex(client_secret_ephemeral)?;
    let b_pub = SrpInteger::from_hex(server_public_ephemeral)?;
    let x = SrpInteger::from_hex(private_key)?;

    if b_pub.modulo(n) == SrpInteger::zero() {
        return Err(ProtocolError::DegenerateEphemeral.into());
    }

    let a_pub = group.g.mod_pow(&a, n);
    let length = group.padded_length();
    let u = hash::<D>(&[
        &pad(&a_pub.to_bytes()?, length),
        &pad(&b_pub.to_bytes()?, length),
    ]);
    if u.modulo(n) == SrpInteger::zero() {
        return Err(ProtocolError::DegenerateScrambler.into());
    }

    let k = groups::compute_k::<D>(group)?;
    let g_x = group.g.mod_pow(&x, n);
    let s = b_pub
        .subtract(&k.multiply(&g_x))
        .mod_pow(&a.add(&u.multiply(&x)), n);

    let key = hash::<D>(&[&s.to_bytes()?]);
    let proof = hash::<D>(&[&a_pub.to_bytes()?, &b_pub.to_bytes()?, &key.to_bytes()?]);

    Ok(Session {
        key: key.to_hex()?,
        proof: proof.to_hex()?,
    })
}

/// Check the server's proof M2 = H(A || M1 || K) against our own transcript.
///
/// Only after this succeeds may the session key be trusted.
pub fn verify_session<D: Digest>(
    client_public_ephemeral: &str,
    session: &Session,
    server_proof: &str,
) -> Result<()> {
    let a_pub = SrpInteger::from_hex(client_public_ephemeral)?;
    let m1 = SrpInteger::from_hex(&session.proof)?;
    let key = SrpInteger::from_hex(&session.key)?;

    let expected = hash::<D>(&[&a_pub.to_bytes()?, &m1.to_bytes()?, &key.to_bytes()?]);
    let claimed = SrpInteger::from_hex(server_proof)?.to_bytes()?;

    if bool::from(expected.to_bytes()?.as_slice().ct_eq(claimed.as_slice())) {
        Ok(())
    } else {
        Err(ProtocolError::ProofMismatch.into())
    }
}
