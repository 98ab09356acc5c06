use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use solvent_crypto::{derive_key, PublicKey};
use solvent_proof::ProofContext;

const NAMESPACE_CONTEXT: &str = "solvent identity namespace v1";

/// A registered prover. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub public_key: PublicKey,
    pub registered_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            public_key,
            registered_at: Utc::now(),
        }
    }

    /// 32-byte namespace derived from the public key.
    pub fn namespace(&self) -> [u8; 32] {
        namespace_of(&self.public_key)
    }

    /// Proof context binding proofs to this identity.
    pub fn proof_context(&self) -> ProofContext {
        ProofContext::bound(self.namespace())
    }
}

/// Namespace for any key, registered or not. Verifiers holding only a token
/// use this to rebuild the prover's context.
pub fn namespace_of(public_key: &PublicKey) -> [u8; 32] {
    derive_key(NAMESPACE_CONTEXT, public_key.as_bytes())
}
