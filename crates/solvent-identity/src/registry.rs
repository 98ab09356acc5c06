use std::sync::Arc;

use tracing::{info, warn};

use solvent_crypto::{Commitment, PublicKey};

use crate::error::IdentityError;
use crate::identity::Identity;
use crate::store::{IdentityStore, MemoryIdentityStore};

/// Registry of identities allowed to request attestations.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct IdentityRegistry {
    store: Arc<dyn IdentityStore>,
}

impl IdentityRegistry {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Registry backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryIdentityStore::new()))
    }

    /// Register a public key. Fails with `Duplicate` if it is already known,
    /// leaving the registry unchanged.
    pub fn register(&self, public_key: PublicKey) -> Result<Identity, IdentityError> {
        let identity = Identity::new(public_key);
        if !self.store.insert_if_absent(&identity)? {
            warn!(public_key = %public_key, "duplicate registration rejected");
            return Err(IdentityError::Duplicate(public_key.to_hex()));
        }
        info!(public_key = %public_key, "identity registered");
        Ok(identity)
    }

    pub fn lookup(&self, public_key: &PublicKey) -> Result<Identity, IdentityError> {
        self.store
            .get(public_key)?
            .ok_or_else(|| IdentityError::NotFound(public_key.to_hex()))
    }

    pub fn is_registered(&self, public_key: &PublicKey) -> Result<bool, IdentityError> {
        Ok(self.store.get(public_key)?.is_some())
    }

    /// Record that `public_key` presented `commitment`.
    ///
    /// The first identity to present a commitment owns it. The owner may
    /// present it again; anyone else is refused.
    pub fn claim_commitment(
        &self,
        public_key: &PublicKey,
        commitment: &Commitment,
    ) -> Result<(), IdentityError> {
        match self.store.claim_if_absent(commitment, public_key)? {
            None => Ok(()),
            Some(owner) if owner == *public_key => {
                warn!(
                    public_key = %public_key,
                    commitment = %commitment,
                    "commitment presented again by its owner"
                );
                Ok(())
            }
            Some(owner) => {
                warn!(
                    public_key = %public_key,
                    owner = %owner,
                    commitment = %commitment,
                    "commitment claimed by another identity"
                );
                Err(IdentityError::CommitmentClaimed {
                    commitment: commitment.to_hex(),
                })
            }
        }
    }

    pub fn len(&self) -> Result<usize, IdentityError> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool, IdentityError> {
        Ok(self.len()? == 0)
    }

    pub fn list(&self) -> Result<Vec<Identity>, IdentityError> {
        self.store.list()
    }
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}
