use solvent_core::{Classify, CoreError, ErrorClass};
use solvent_credentials::CredentialError;
use solvent_crypto::CryptoError;
use solvent_identity::IdentityError;
use solvent_proof::ProofError;

use crate::storage::StorageError;

/// Everything a request handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("worker failure: {0}")]
    Worker(String),
}

impl Classify for OracleError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::MissingField(_) => ErrorClass::Precondition,
            Self::Core(e) => e.class(),
            Self::Crypto(e) => e.class(),
            Self::Proof(e) => e.class(),
            Self::Identity(e) => e.class(),
            Self::Credential(e) => e.class(),
            Self::Storage(_) | Self::Worker(_) => ErrorClass::Environment,
        }
    }
}

impl OracleError {
    /// Message safe to return to the client.
    ///
    /// Cryptographic rejections all read the same; environment failures are
    /// logged here and hidden from the caller.
    pub fn public_message(&self) -> String {
        match self.class() {
            ErrorClass::Structural | ErrorClass::Precondition => self.to_string(),
            ErrorClass::Cryptographic => "verification failed".into(),
            ErrorClass::Environment => {
                tracing::error!(error = %self, "request aborted");
                "internal error".into()
            }
        }
    }
}
