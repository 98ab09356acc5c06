use std::fmt;

use crate::error::CoreError;

/// The states of a single attestation request handled by the bank oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AttestationState {
    /// Request accepted for processing; nothing has been checked yet.
    Received,
    /// The zero-knowledge proof verified against the submitted statement.
    ProofChecked,
    /// The proof's public threshold matches the threshold being attested.
    ThresholdCompared,
    /// A token was signed. Final state.
    Signed,
    /// The request was refused. Final state.
    Rejected,
}

impl AttestationState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Signed | Self::Rejected)
    }
}

impl fmt::Display for AttestationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => write!(f, "Received"),
            Self::ProofChecked => write!(f, "ProofChecked"),
            Self::ThresholdCompared => write!(f, "ThresholdCompared"),
            Self::Signed => write!(f, "Signed"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Events that drive an attestation request forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestationEvent {
    /// The oracle's own proof verification succeeded.
    ProofVerified,
    /// The public threshold matched.
    ThresholdMatched,
    /// The canonical bytes were signed.
    Sign,
    /// Any check failed.
    Reject,
}

/// Valid transitions:
/// - Received → ProofChecked (ProofVerified)
/// - ProofChecked → ThresholdCompared (ThresholdMatched)
/// - ThresholdCompared → Signed (Sign)
/// - Received | ProofChecked | ThresholdCompared → Rejected (Reject)
///
/// There is no path to `Signed` that skips `ProofChecked`.
pub struct AttestationStateMachine;

impl AttestationStateMachine {
    /// Attempt a state transition based on an event.
    pub fn transition(
        current: AttestationState,
        event: AttestationEvent,
    ) -> Result<AttestationState, CoreError> {
        let new_state = match (current, event) {
            (AttestationState::Received, AttestationEvent::ProofVerified) => {
                AttestationState::ProofChecked
            }
            (AttestationState::ProofChecked, AttestationEvent::ThresholdMatched) => {
                AttestationState::ThresholdCompared
            }
            (AttestationState::ThresholdCompared, AttestationEvent::Sign) => {
                AttestationState::Signed
            }
            (state, AttestationEvent::Reject) if !state.is_final() => AttestationState::Rejected,

            _ => {
                let target = match event {
                    AttestationEvent::ProofVerified => AttestationState::ProofChecked,
                    AttestationEvent::ThresholdMatched => AttestationState::ThresholdCompared,
                    AttestationEvent::Sign => AttestationState::Signed,
                    AttestationEvent::Reject => AttestationState::Rejected,
                };
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "attestation state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: AttestationState, event: AttestationEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
