use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use solvent_crypto::{Commitment, PublicKey};

use crate::error::IdentityError;
use crate::identity::Identity;

/// Backing storage for the registry.
///
/// Both insert operations must be atomic: two concurrent callers racing on
/// the same key see exactly one winner.
pub trait IdentityStore: Send + Sync {
    /// Insert unless the key is present. Returns `false` if it already was.
    fn insert_if_absent(&self, identity: &Identity) -> Result<bool, IdentityError>;

    fn get(&self, public_key: &PublicKey) -> Result<Option<Identity>, IdentityError>;

    fn len(&self) -> Result<usize, IdentityError>;

    fn list(&self) -> Result<Vec<Identity>, IdentityError>;

    /// Record `owner` for `commitment` unless already claimed. Returns the
    /// previous owner, if any.
    fn claim_if_absent(
        &self,
        commitment: &Commitment,
        owner: &PublicKey,
    ) -> Result<Option<PublicKey>, IdentityError>;
}

/// In-memory store on `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identities: DashMap<PublicKey, Identity>,
    claims: DashMap<Commitment, PublicKey>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a snapshot. Later duplicates are ignored.
    pub fn from_parts(
        identities: impl IntoIterator<Item = Identity>,
        claims: impl IntoIterator<Item = (Commitment, PublicKey)>,
    ) -> Self {
        let store = Self::new();
        for identity in identities {
            store
                .identities
                .entry(identity.public_key)
                .or_insert(identity);
        }
        for (commitment, owner) in claims {
            store.claims.entry(commitment).or_insert(owner);
        }
        store
    }

    /// Snapshot of every identity.
    pub fn identities(&self) -> Vec<Identity> {
        self.identities
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Current owner of `commitment`, if claimed.
    pub fn claim_owner(&self, commitment: &Commitment) -> Option<PublicKey> {
        self.claims.get(commitment).map(|entry| *entry.value())
    }

    /// Snapshot of every claim.
    pub fn claims(&self) -> Vec<(Commitment, PublicKey)> {
        self.claims
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn insert_if_absent(&self, identity: &Identity) -> Result<bool, IdentityError> {
        match self.identities.entry(identity.public_key) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(identity.clone());
                Ok(true)
            }
        }
    }

    fn get(&self, public_key: &PublicKey) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identities.get(public_key).map(|entry| entry.clone()))
    }

    fn len(&self) -> Result<usize, IdentityError> {
        Ok(self.identities.len())
    }

    fn list(&self) -> Result<Vec<Identity>, IdentityError> {
        Ok(self.identities())
    }

    fn claim_if_absent(
        &self,
        commitment: &Commitment,
        owner: &PublicKey,
    ) -> Result<Option<PublicKey>, IdentityError> {
        match self.claims.entry(*commitment) {
            Entry::Occupied(existing) => Ok(Some(*existing.get())),
            Entry::Vacant(slot) => {
                slot.insert(*owner);
                Ok(None)
            }
        }
    }
}
