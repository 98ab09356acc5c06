use solvent_core::{Classify, CoreError, ErrorClass};

/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("value {value} exceeds the 64-bit commitment range")]
    Range { value: u128 },

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    #[error("invalid scalar: not canonically encoded")]
    InvalidScalar,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    #[error("key material unavailable: {0}")]
    KeyMaterial(String),

    #[error(transparent)]
    Encoding(#[from] CoreError),
}

impl Classify for CryptoError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Range { .. }
            | Self::InvalidKeyLength { .. }
            | Self::InvalidPoint(_)
            | Self::InvalidScalar
            | Self::InvalidInput(_) => ErrorClass::Structural,
            Self::SignatureVerificationFailed => ErrorClass::Cryptographic,
            Self::Entropy(_) | Self::KeyMaterial(_) => ErrorClass::Environment,
            Self::Encoding(e) => e.class(),
        }
    }
}
