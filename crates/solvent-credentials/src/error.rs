use solvent_core::{Classify, CoreError, ErrorClass};

/// Attestation errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("unknown identity: {0}")]
    UnknownIdentity(String),

    #[error("invalid proof")]
    InvalidProof,

    #[error("unsupported token version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] solvent_crypto::CryptoError),

    #[error("proof error: {0}")]
    Proof(#[from] solvent_proof::ProofError),

    #[error("identity error: {0}")]
    Identity(#[from] solvent_identity::IdentityError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl Classify for CredentialError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownIdentity(_) => ErrorClass::Precondition,
            Self::InvalidProof => ErrorClass::Cryptographic,
            Self::UnsupportedVersion(_) | Self::Serialization(_) => ErrorClass::Structural,
            Self::Crypto(e) => e.class(),
            Self::Proof(e) => e.class(),
            Self::Identity(e) => e.class(),
            Self::Core(e) => e.class(),
        }
    }
}
