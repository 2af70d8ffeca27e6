//! Server-side protocol procedures.
//!
//! The server holds (username, salt, verifier) from registration and runs
//! [`generate_ephemeral`] then [`derive_session`] once per login attempt.
//! Its session derivation verifies the client's proof before producing its
//! own, so a failed attempt never yields a server proof.

use digest::Digest;
use srp6a_core::error::{ProtocolError, Result};
use subtle::ConstantTimeEq;

use crate::groups::{self, Group};
use crate::hash::{hash, pad};
use crate::integer::SrpInteger;
use crate::session::{Ephemeral, Session};

pub use crate::client::EPHEMERAL_KEY_LENGTH;

/// Fresh server ephemeral pair: b random, B = (k*v + g^b) mod N.
///
/// B binds the stored verifier, so a client can only complete the exchange
/// with knowledge of the matching password.
pub fn generate_ephemeral<D: Digest>(group: &Group, verifier: &str) -> Result<Ephemeral> {
    let v = SrpInteger::from_hex(verifier)?;
    let secret = SrpInteger::random_integer(EPHEMERAL_KEY_LENGTH);
    let k = groups::compute_k::<D>(group)?;
    let public = k
        .multiply(&v)
        .add(&group.g.mod_pow(&secret, &group.n))
        .modulo(&group.n);
    Ok(Ephemeral {
        secret: secret.to_hex()?,
        public: public.to_hex()?,
    })
}

/// Derive the session key, verify the client's proof, and produce the
/// server proof.
///
/// Premaster secret: S = (A * v^u)^b mod N, algebraically identical to the
/// client's computation when both sides hold matching values. The client's
/// M1 is checked in constant time; on mismatch the attempt aborts with an
/// error that does not reveal whether the password was wrong or the message
/// tampered with. M2 = H(A || M1 || K) is produced only after M1 matches.
pub fn derive_session<D: Digest>(
    group: &Group,
    server_secret_ephemeral: &str,
    client_public_ephemeral: &str,
    verifier: &str,
    client_proof: &str,
) -> Result<Session> {
    let n = &group.n;
    let b = SrpInteger::from_hex(server_secret_ephemeral)?;
    let a_pub = SrpInteger::from_hex(client_public_ephemeral)?;
    let v = SrpInteger::from_hex(verifier)?;

    if a_pub.modulo(n) == SrpInteger::zero() {
        return Err(ProtocolError::DegenerateEphemeral.into());
    }

    let k = groups::compute_k::<D>(group)?;
    let b_pub = k
        .multiply(&v)
        .add(&group.g.mod_pow(&b, n))
        .modulo(n);

    let length = group.padded_length();
    let u = hash::<D>(&[
        &pad(&a_pub.to_bytes()?, length),
        &pad(&b_pub.to_bytes()?, length),
    ]);
    if u.modulo(n) == SrpInteger::zero() {
        return Err(ProtocolError::DegenerateScrambler.into());
    }

    let s = a_pub.multiply(&v.mod_pow(&u, n)).mod_pow(&b, n);
    let key = hash::<D>(&[&s.to_bytes()?]);

    let expected = hash::<D>(&[&a_pub.to_bytes()?, &b_pub.to_bytes()?, &key.to_bytes()?]);
    let claimed = SrpInteger::from_hex(client_proof)?.to_bytes()?;
    if !bool::from(expected.to_bytes()?.as_slice().ct_eq(claimed.as_slice())) {
        return Err(ProtocolError::ProofMismatch.into());
    }

    let proof = hash::<D>(&[&a_pub.to_bytes()?, &expected.to_bytes()?, &key.to_bytes()?]);

    Ok(Session {
        key: key.to_hex()?,
        proof: proof.to_hex()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client;
    use crate::groups::G_3072;
    use sha2::{Sha256, Sha512};
    use srp6a_core::error::Error;

    fn register(username: &str, password: &str) -> (String, String) {
        let salt = client::generate_salt();
        let x = client::derive_private_key::<Sha256>(&G_3072, &salt, username, password).unwrap();
        let v = client::derive_verifier(&G_3072, &x).unwrap();
        (salt, v)
    }

    fn run_exchange(
        username: &str,
        password: &str,
        salt: &str,
        verifier: &str,
    ) -> (Session, Session) {
        let x = client::derive_private_key::<Sha256>(&G_3072, salt, username, password).unwrap();
        let client_ephemeral = client::generate_ephemeral(&G_3072).unwrap();
        let server_ephemeral = generate_ephemeral::<Sha256>(&G_3072, verifier).unwrap();

        let client_session = client::derive_session::<Sha256>(
            &G_3072,
            &client_ephemeral.secret,
            &server_ephemeral.public,
            &x,
        )
        .unwrap();
        let server_session = derive_session::<Sha256>(
            &G_3072,
            &server_ephemeral.secret,
            &client_ephemeral.public,
            verifier,
            &client_session.proof,
        )
        .unwrap();

        client::verify_session::<Sha256>(
            &client_ephemeral.public,
            &client_session,
            &server_session.proof,
        )
        .unwrap();

        (client_session, server_session)
    }

    #[test]
    fn both_sides_agree_on_the_session_key() {
        let (salt, verifier) = register("alice", "hunter2");
        let (client_session, server_session) = run_exchange("alice", "hunter2", &salt, &verifier);
        assert_eq!(client_session.key, server_session.key);
    }

    #[test]
    fn fresh_ephemerals_give_fresh_keys() {
        let (salt, verifier) = register("alice", "hunter2");
        let (first, _) = run_exchange("alice", "hunter2", &salt, &verifier);
        let (second, _) = run_exchange("alice", "hunter2", &salt, &verifier);
        assert_ne!(first.key, second.key);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let (salt, verifier) = register("alice", "hunter2");
        let x = client::derive_private_key::<Sha256>(&G_3072, &salt, "alice", "wrong").unwrap();
        let client_ephemeral = client::generate_ephemeral(&G_3072).unwrap();
        let server_ephemeral = generate_ephemeral::<Sha256>(&G_3072, &verifier).unwrap();

        let client_session = client::derive_session::<Sha256>(
            &G_3072,
            &client_ephemeral.secret,
            &server_ephemeral.public,
            &x,
        )
        .unwrap();
        let result = derive_session::<Sha256>(
            &G_3072,
            &server_ephemeral.secret,
            &client_ephemeral.public,
            &verifier,
            &client_session.proof,
        );
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::ProofMismatch))
        ));
    }

    #[test]
    fn rejects_zero_client_ephemeral() {
        let (_, verifier) = register("alice", "hunter2");
        let server_ephemeral = generate_ephemeral::<Sha256>(&G_3072, &verifier).unwrap();

        let zero_a = "0".repeat(768);
        let result = derive_session::<Sha256>(
            &G_3072,
            &server_ephemeral.secret,
            &zero_a,
            &verifier,
            &"ab".repeat(32),
        );
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::DegenerateEphemeral))
        ));
    }

    #[test]
    fn rejects_client_ephemeral_congruent_to_zero() {
        let (_, verifier) = register("alice", "hunter2");
        let server_ephemeral = generate_ephemeral::<Sha256>(&G_3072, &verifier).unwrap();

        let n_hex = G_3072.n.to_hex().unwrap();
        let result = derive_session::<Sha256>(
            &G_3072,
            &server_ephemeral.secret,
            &n_hex,
            &verifier,
            &"ab".repeat(32),
        );
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::DegenerateEphemeral))
        ));
    }

    #[test]
    fn tampered_client_ephemeral_fails_verification() {
        let (salt, verifier) = register("alice", "hunter2");
        let x = client::derive_private_key::<Sha256>(&G_3072, &salt, "alice", "hunter2").unwrap();
        let client_ephemeral = client::generate_ephemeral(&G_3072).unwrap();
        let server_ephemeral = generate_ephemeral::<Sha256>(&G_3072, &verifier).unwrap();

        let client_session = client::derive_session::<Sha256>(
            &G_3072,
            &client_ephemeral.secret,
            &server_ephemeral.public,
            &x,
        )
        .unwrap();

        let tampered = flip_first_digit(&client_ephemeral.public);
        let result = derive_session::<Sha256>(
            &G_3072,
            &server_ephemeral.secret,
            &tampered,
            &verifier,
            &client_session.proof,
        );
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::ProofMismatch))
        ));
    }

    #[test]
    fn tampered_client_proof_is_rejected() {
        let (salt, verifier) = register("alice", "hunter2");
        let x = client::derive_private_key::<Sha256>(&G_3072, &salt, "alice", "hunter2").unwrap();
        let client_ephemeral = client::generate_ephemeral(&G_3072).unwrap();
        let server_ephemeral = generate_ephemeral::<Sha256>(&G_3072, &verifier).unwrap();

        let client_session = client::derive_session::<Sha256>(
            &G_3072,
            &client_ephemeral.secret,
            &server_ephemeral.public,
            &x,
        )
        .unwrap();

        let result = derive_session::<Sha256>(
            &G_3072,
            &server_ephemeral.secret,
            &client_ephemeral.public,
            &verifier,
            &flip_first_digit(&client_session.proof),
        );
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::ProofMismatch))
        ));
    }

    #[test]
    fn hash_algorithms_are_interchangeable_but_not_mixable() {
        let username = "alice";
        let password = "hunter2";
        let salt = client::generate_salt();
        let x512 =
            client::derive_private_key::<Sha512>(&G_3072, &salt, username, password).unwrap();
        let v512 = client::derive_verifier(&G_3072, &x512).unwrap();

        let client_ephemeral = client::generate_ephemeral(&G_3072).unwrap();
        let server_ephemeral = generate_ephemeral::<Sha512>(&G_3072, &v512).unwrap();

        let client_session = client::derive_session::<Sha512>(
            &G_3072,
            &client_ephemeral.secret,
            &server_ephemeral.public,
            &x512,
        )
        .unwrap();
        let server_session = derive_session::<Sha512>(
            &G_3072,
            &server_ephemeral.secret,
            &client_ephemeral.public,
            &v512,
            &client_session.proof,
        )
        .unwrap();
        assert_eq!(client_session.key, server_session.key);

        // A client speaking SHA-256 against a SHA-512 verifier cannot pass.
        let x256 =
            client::derive_private_key::<Sha256>(&G_3072, &salt, username, password).unwrap();
        let mixed_client = client::derive_session::<Sha256>(
            &G_3072,
            &client_ephemeral.secret,
            &server_ephemeral.public,
            &x256,
        )
        .unwrap();
        let result = derive_session::<Sha512>(
            &G_3072,
            &server_ephemeral.secret,
            &client_ephemeral.public,
            &v512,
            &mixed_client.proof,
        );
        assert!(result.is_err());
    }

    fn flip_first_digit(hex: &str) -> String {
        let mut chars: Vec<char> = hex.chars().collect();
        chars[0] = if chars[0] == '0' { '1' } else { '0' };
        chars.into_iter().collect()
    }
}
