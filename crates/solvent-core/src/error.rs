use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attestation_state::AttestationState;

/// Coarse failure taxonomy shared by every Solvent crate.
///
/// Callers use the class, not the concrete error, to decide what to report:
/// structural and precondition failures carry their reason back to the
/// client, cryptographic failures collapse into a single uniform rejection,
/// and environment failures abort the request without being mistaken for a
/// protocol "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Malformed input (bad hex, wrong width, out-of-range integers).
    Structural,
    /// Well-formed input that the protocol refuses up front.
    Precondition,
    /// A proof or signature did not verify.
    Cryptographic,
    /// The system itself is broken (entropy source, key material, storage).
    Environment,
}

impl ErrorClass {
    /// Whether the failure is an operator problem rather than a protocol outcome.
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::Environment)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Precondition => write!(f, "precondition"),
            Self::Cryptographic => write!(f, "cryptographic"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Implemented by every crate-level error enum.
pub trait Classify {
    fn class(&self) -> ErrorClass;
}

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: AttestationState,
        to: AttestationState,
    },

    #[error("invalid hex in {field}: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    #[error("invalid length for {field}: expected {expected} hex chars, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i128 },

    #[error("invalid multiplier: {0}")]
    InvalidMultiplier(String),
}

impl Classify for CoreError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidStateTransition { .. } => ErrorClass::Precondition,
            Self::InvalidHex { .. }
            | Self::InvalidLength { .. }
            | Self::OutOfRange { .. }
            | Self::InvalidMultiplier(_) => ErrorClass::Structural,
        }
    }
}
