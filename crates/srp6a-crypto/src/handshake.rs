//! Stateful per-attempt handshake drivers.
//!
//! [`ClientHandshake`] and [`ServerHandshake`] compose the pure procedures
//! in [`client`](crate::client) and [`server`](crate::server) with the
//! per-attempt state machine: methods must be called in protocol order, any
//! integrity failure moves the driver to `Aborted` permanently, and an
//! aborted attempt cannot be resumed; start over with a fresh driver.
//!
//! One driver instance corresponds to one login attempt. Drivers own their
//! ephemeral secret and derived session; both are wiped on drop or abort.

use std::marker::PhantomData;

use digest::Digest;
use srp6a_core::error::{ProtocolError, Result};
use srp6a_core::message::{ClientHello, ClientProof, CredentialRecord, ServerChallenge, ServerProof};
use srp6a_core::state::HandshakeState;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::client;
use crate::groups::Group;
use crate::server;
use crate::session::{Ephemeral, Session};

/// Client side of one login attempt.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClientHandshake<'a, D: Digest> {
    #[zeroize(skip)]
    group: &'a Group,
    username: String,
    password: String,
    #[zeroize(skip)]
    state: HandshakeState,
    ephemeral: Option<Ephemeral>,
    session: Option<Session>,
    #[zeroize(skip)]
    _hash: PhantomData<D>,
}

impl<'a, D: Digest> ClientHandshake<'a, D> {
    pub fn new(group: &'a Group, username: &str, password: &str) -> Self {
        Self {
            group,
            username: username.to_string(),
            password: password.to_string(),
            state: HandshakeState::Init,
            ephemeral: None,
            session: None,
            _hash: PhantomData,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// The shared session key, available once the server's proof verified.
    pub fn session_key(&self) -> Option<&str> {
        if self.state == HandshakeState::MutuallyVerified {
            self.session.as_ref().map(|s| s.key.as_str())
        } else {
            None
        }
    }

    /// Step 1: generate the ephemeral pair and announce the username.
    pub fn hello(&mut self) -> Result<ClientHello> {
        self.require(HandshakeState::Init, "hello may only start a fresh attempt")?;
        match client::generate_ephemeral(self.group) {
            Ok(ephemeral) => {
                self.ephemeral = Some(ephemeral);
                self.advance(HandshakeState::EphemeralSent);
                Ok(ClientHello {
                    username: self.username.clone(),
                })
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// Step 2: consume the server's challenge, derive the session, and
    /// produce the public ephemeral plus client proof.
    pub fn receive_challenge(&mut self, challenge: &ServerChallenge) -> Result<ClientProof> {
        self.require(
            HandshakeState::EphemeralSent,
            "receive_challenge requires a sent hello",
        )?;
        let Some(ephemeral) = self.ephemeral.clone() else {
            self.abort();
            return Err(ProtocolError::InvalidState("missing ephemeral").into());
        };

        let derived = client::derive_private_key::<D>(
            self.group,
            &challenge.salt,
            &self.username,
            &self.password,
        )
        .and_then(|private_key| {
            client::derive_session::<D>(
                self.group,
                &ephemeral.secret,
                &challenge.public,
                &private_key,
            )
        });

        match derived {
            Ok(session) => {
                self.advance(HandshakeState::SecretDerived);
                let proof = ClientProof {
                    public: ephemeral.public.clone(),
                    proof: session.proof.clone(),
                };
                self.session = Some(session);
                self.advance(HandshakeState::ClientProven);
                Ok(proof)
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// Step 3: verify the server's proof. Only on success is the session
    /// key released.
    pub fn finish(&mut self, proof: &ServerProof) -> Result<String> {
        self.require(
            HandshakeState::ClientProven,
            "finish requires a submitted client proof",
        )?;
        let Some(ephemeral) = self.ephemeral.clone() else {
            self.abort();
            return Err(ProtocolError::InvalidState("missing ephemeral").into());
        };
        let Some(session) = self.session.clone() else {
            self.abort();
            return Err(ProtocolError::InvalidState("missing session").into());
        };

        match client::verify_session::<D>(&ephemeral.public, &session, &proof.proof) {
            Ok(()) => {
                self.advance(HandshakeState::MutuallyVerified);
                Ok(session.key.clone())
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    fn require(&mut self, want: HandshakeState, what: &'static str) -> Result<()> {
        if self.state == want {
            Ok(())
        } else {
            if !self.state.is_terminal() {
                self.abort();
            }
            Err(ProtocolError::InvalidState(what).into())
        }
    }

    fn advance(&mut self, next: HandshakeState) {
        debug_assert!(self.state.can_advance_to(next));
        tracing::debug!(
            from = self.state.name(),
            to = next.name(),
            "client handshake transition"
        );
        self.state = next;
    }

    fn abort(&mut self) {
        tracing::debug!(from = self.state.name(), "client handshake aborted");
        self.state = HandshakeState::Aborted;
        self.ephemeral = None;
        self.session = None;
    }
}

/// Server side of one login attempt, bound to one stored credential record.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ServerHandshake<'a, D: Digest> {
    #[zeroize(skip)]
    group: &'a Group,
    #[zeroize(skip)]
    record: CredentialRecord,
    #[zeroize(skip)]
    state: HandshakeState,
    ephemeral: Option<Ephemeral>,
    session: Option<Session>,
    #[zeroize(skip)]
    _hash: PhantomData<D>,
}

impl<'a, D: Digest> ServerHandshake<'a, D> {
    pub fn new(group: &'a Group, record: &CredentialRecord) -> Self {
        Self {
            group,
            record: record.clone(),
            state: HandshakeState::Init,
            ephemeral: None,
            session: None,
            _hash: PhantomData,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// The shared session key, available once the client's proof verified.
    pub fn session_key(&self) -> Option<&str> {
        if self.state == HandshakeState::MutuallyVerified {
            self.session.as_ref().map(|s| s.key.as_str())
        } else {
            None
        }
    }

    /// Step 1: answer a hello with the stored salt and a fresh public
    /// ephemeral binding the verifier.
    pub fn receive_hello(&mut self, hello: &ClientHello) -> Result<ServerChallenge> {
        self.require(HandshakeState::Init, "receive_hello may only start a fresh attempt")?;
        if hello.username != self.record.username {
            self.abort();
            return Err(
                ProtocolError::InvalidState("hello does not match the loaded credential record")
                    .into(),
            );
        }

        match server::generate_ephemeral::<D>(self.group, &self.record.verifier) {
            Ok(ephemeral) => {
                let challenge = ServerChallenge {
                    salt: self.record.salt.clone(),
                    public: ephemeral.public.clone(),
                };
                self.ephemeral = Some(ephemeral);
                self.advance(HandshakeState::EphemeralSent);
                Ok(challenge)
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// Step 2: derive the session from the client's public ephemeral, check
    /// its proof, and produce the server proof. The reply exists only if the
    /// client's proof matched.
    pub fn receive_proof(&mut self, proof: &ClientProof) -> Result<ServerProof> {
        self.require(
            HandshakeState::EphemeralSent,
            "receive_proof requires a sent challenge",
        )?;
        let Some(ephemeral) = self.ephemeral.clone() else {
            self.abort();
            return Err(ProtocolError::InvalidState("missing ephemeral").into());
        };

        match server::derive_session::<D>(
            self.group,
            &ephemeral.secret,
            &proof.public,
            &self.record.verifier,
            &proof.proof,
        ) {
            Ok(session) => {
                self.advance(HandshakeState::SecretDerived);
                self.advance(HandshakeState::ClientProven);
                let reply = ServerProof {
                    proof: session.proof.clone(),
                };
                self.session = Some(session);
                self.advance(HandshakeState::MutuallyVerified);
                Ok(reply)
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    fn require(&mut self, want: HandshakeState, what: &'static str) -> Result<()> {
        if self.state == want {
            Ok(())
        } else {
            if !self.state.is_terminal() {
                self.abort();
            }
            Err(ProtocolError::InvalidState(what).into())
        }
    }

    fn advance(&mut self, next: HandshakeState) {
        debug_assert!(self.state.can_advance_to(next));
        tracing::debug!(
            from = self.state.name(),
            to = next.name(),
            "server handshake transition"
        );
        self.state = next;
    }

    fn abort(&mut self) {
        tracing::debug!(from = self.state.name(), "server handshake aborted");
        self.state = HandshakeState::Aborted;
        self.ephemeral = None;
        self.session = None;
    }
}
