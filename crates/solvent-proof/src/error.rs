use solvent_core::{Classify, CoreError, ErrorClass};
use solvent_crypto::CryptoError;

/// Threshold proof errors.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("value is below the threshold")]
    InsufficientValue,

    #[error("derived value does not fit in 64 bits")]
    Range,

    #[error("invalid proof data: {0}")]
    InvalidProofData(String),

    #[error("proof generation failed: {0}")]
    GenerationFailed(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Encoding(#[from] CoreError),
}

impl Classify for ProofError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::InsufficientValue => ErrorClass::Precondition,
            Self::Range | Self::InvalidProofData(_) => ErrorClass::Structural,
            Self::GenerationFailed(_) => ErrorClass::Environment,
            Self::Crypto(e) => e.class(),
            Self::Encoding(e) => e.class(),
        }
    }
}
