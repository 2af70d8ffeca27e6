//! Per-attempt handshake state machine.

/// Progress of a single login attempt.
///
/// The happy path is `Init → EphemeralSent → SecretDerived → ClientProven →
/// MutuallyVerified`. Any integrity failure (degenerate ephemeral, degenerate
/// scrambler, proof mismatch) transitions directly to `Aborted`, which is
/// terminal: the attempt must be discarded and restarted with a fresh
/// ephemeral pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Init,
    EphemeralSent,
    SecretDerived,
    ClientProven,
    MutuallyVerified,
    Aborted,
}

impl HandshakeState {
    /// Whether this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::MutuallyVerified | Self::Aborted)
    }

    /// Whether `next` is a legal successor of this state.
    ///
    /// `Aborted` is reachable from every live state; the happy path only
    /// advances one step at a time.
    pub fn can_advance_to(&self, next: HandshakeState) -> bool {
        use HandshakeState::*;
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (_, Aborted) => true,
            (Init, EphemeralSent) => true,
            (EphemeralSent, SecretDerived) => true,
            (SecretDerived, ClientProven) => true,
            (ClientProven, MutuallyVerified) => true,
            _ => false,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::EphemeralSent => "ephemeral_sent",
            Self::SecretDerived => "secret_derived",
            Self::ClientProven => "client_proven",
            Self::MutuallyVerified => "mutually_verified",
            Self::Aborted => "aborted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HandshakeState::*;

    #[test]
    fn happy_path_advances_one_step_at_a_time() {
        let path = [
            Init,
            EphemeralSent,
            SecretDerived,
            ClientProven,
            MutuallyVerified,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn skipping_states_is_rejected() {
        assert!(!Init.can_advance_to(SecretDerived));
        assert!(!EphemeralSent.can_advance_to(ClientProven));
        assert!(!Init.can_advance_to(MutuallyVerified));
    }

    #[test]
    fn abort_is_reachable_from_any_live_state() {
        for state in [Init, EphemeralSent, SecretDerived, ClientProven] {
            assert!(state.can_advance_to(Aborted));
        }
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for next in [Init, EphemeralSent, SecretDerived, ClientProven, MutuallyVerified, Aborted] {
            assert!(!Aborted.can_advance_to(next));
            assert!(!MutuallyVerified.can_advance_to(next));
        }
    }

    #[test]
    fn backwards_transitions_are_rejected() {
        assert!(!SecretDerived.can_advance_to(EphemeralSent));
        assert!(!ClientProven.can_advance_to(Init));
    }
}
