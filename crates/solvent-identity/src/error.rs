use solvent_core::{Classify, ErrorClass};

/// Identity-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity already registered: {0}")]
    Duplicate(String),

    #[error("unknown identity: {0}")]
    NotFound(String),

    #[error("commitment {commitment} is already claimed by another identity")]
    CommitmentClaimed { commitment: String },

    #[error("identity store error: {0}")]
    Store(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] solvent_crypto::CryptoError),
}

impl Classify for IdentityError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Duplicate(_) | Self::NotFound(_) | Self::CommitmentClaimed { .. } => {
                ErrorClass::Precondition
            }
            Self::Store(_) => ErrorClass::Environment,
            Self::Crypto(e) => e.class(),
        }
    }
}
