use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use solvent_core::{AttestationEvent, AttestationState, AttestationStateMachine};
use solvent_crypto::{hash_parts, Commitment, Hash, KeyPair, PublicKey};
use solvent_identity::{IdentityError, IdentityRegistry};
use solvent_proof::{CompositeStatement, Statement, ThresholdProof, ThresholdProofSystem};

use crate::error::CredentialError;
use crate::token::AttestationToken;

/// Deterministic outcomes kept for idempotent resubmission.
#[derive(Debug, Clone)]
enum Outcome {
    Issued(Box<AttestationToken>),
    InvalidProof,
}

impl Outcome {
    fn into_result(self) -> Result<AttestationToken, CredentialError> {
        match self {
            Self::Issued(token) => Ok(*token),
            Self::InvalidProof => Err(CredentialError::InvalidProof),
        }
    }
}

/// Outcomes kept by default before the oldest are evicted.
pub const DEFAULT_OUTCOME_CAPACITY: usize = 10_000;

/// Request outcomes, bounded in size. Once full, the oldest entry is dropped;
/// resubmitting an evicted request is simply verified again.
#[derive(Debug)]
struct OutcomeCache {
    entries: DashMap<Hash, Outcome>,
    order: Mutex<VecDeque<Hash>>,
    capacity: usize,
}

impl OutcomeCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    fn get(&self, key: &Hash) -> Option<Outcome> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store `outcome` unless `key` is already present; returns what is stored.
    fn insert(&self, key: Hash, outcome: Outcome) -> Outcome {
        let stored = match self.entries.entry(key) {
            Entry::Occupied(existing) => return existing.get().clone(),
            Entry::Vacant(slot) => slot.insert(outcome).value().clone(),
        };

        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        order.push_back(key);
        while order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        stored
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The bank oracle: verifies threshold proofs from registered identities
/// and signs attestation tokens.
pub struct AttestationService {
    keypair: KeyPair,
    registry: IdentityRegistry,
    proofs: Arc<ThresholdProofSystem>,
    outcomes: OutcomeCache,
}

impl AttestationService {
    pub fn new(
        keypair: KeyPair,
        registry: IdentityRegistry,
        proofs: Arc<ThresholdProofSystem>,
    ) -> Self {
        Self {
            keypair,
            registry,
            proofs,
            outcomes: OutcomeCache::new(DEFAULT_OUTCOME_CAPACITY),
        }
    }

    /// Keep at most `capacity` request outcomes.
    pub fn with_outcome_capacity(mut self, capacity: usize) -> Self {
        self.outcomes = OutcomeCache::new(capacity);
        self
    }

    /// The bank key that verifiers must trust.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn proof_system(&self) -> &Arc<ThresholdProofSystem> {
        &self.proofs
    }

    /// Number of cached request outcomes.
    pub fn cached_outcomes(&self) -> usize {
        self.outcomes.len()
    }

    /// Attest that `commitment` opens to at least `threshold`.
    pub fn attest(
        &self,
        subject: &PublicKey,
        commitment: &Commitment,
        threshold: u64,
        proof: &ThresholdProof,
    ) -> Result<AttestationToken, CredentialError> {
        let statement = Statement::Threshold {
            commitment: *commitment,
            threshold,
        };
        self.attest_statement(subject, statement, proof)
    }

    /// Attest the rent relation over three commitments.
    pub fn attest_composite(
        &self,
        subject: &PublicKey,
        statement: &CompositeStatement,
        proof: &ThresholdProof,
    ) -> Result<AttestationToken, CredentialError> {
        self.attest_statement(subject, Statement::Composite(*statement), proof)
    }

    fn attest_statement(
        &self,
        subject: &PublicKey,
        statement: Statement,
        proof: &ThresholdProof,
    ) -> Result<AttestationToken, CredentialError> {
        let key = request_key(subject, &statement, proof);
        if let Some(cached) = self.outcomes.get(&key) {
            debug!(subject = %subject, "returning cached outcome for identical request");
            return cached.into_result();
        }

        let mut state = AttestationState::Received;

        let identity = match self.registry.lookup(subject) {
            Ok(identity) => identity,
            Err(IdentityError::NotFound(key_hex)) => {
                reject(&mut state)?;
                warn!(subject = %subject, "attestation requested by unknown identity");
                return Err(CredentialError::UnknownIdentity(key_hex));
            }
            Err(e) => return Err(e.into()),
        };

        // The proof is checked against the threshold it carries, then that
        // threshold is compared with the one being attested.
        let proven = proof
            .threshold()
            .map(|t| statement.with_threshold(t))
            .filter(|s| {
                self.proofs
                    .verify_statement(&identity.proof_context(), s, proof)
            });
        let Some(proven) = proven else {
            return self.reject_proof(&mut state, key, subject, "proof did not verify");
        };
        advance(&mut state, AttestationEvent::ProofVerified)?;

        if proven.threshold() != statement.threshold() {
            return self.reject_proof(&mut state, key, subject, "proven threshold differs");
        }
        advance(&mut state, AttestationEvent::ThresholdMatched)?;

        if let Err(e) = self
            .registry
            .claim_commitment(subject, statement.primary_commitment())
        {
            reject(&mut state)?;
            return Err(e.into());
        }

        let token = AttestationToken::issue(
            &self.keypair,
            statement,
            *subject,
            proof.clone(),
            Utc::now(),
        );
        advance(&mut state, AttestationEvent::Sign)?;

        // Concurrent identical requests converge on the first token stored.
        let stored = self.outcomes.insert(key, Outcome::Issued(Box::new(token)));

        info!(
            subject = %subject,
            kind = %statement.kind(),
            threshold = statement.threshold(),
            state = %state,
            "attestation issued"
        );

        stored.into_result()
    }

    fn reject_proof(
        &self,
        state: &mut AttestationState,
        key: Hash,
        subject: &PublicKey,
        detail: &str,
    ) -> Result<AttestationToken, CredentialError> {
        reject(state)?;
        warn!(subject = %subject, detail, "attestation rejected");
        self.outcomes.insert(key, Outcome::InvalidProof);
        Err(CredentialError::InvalidProof)
    }
}

fn advance(state: &mut AttestationState, event: AttestationEvent) -> Result<(), CredentialError> {
    *state = AttestationStateMachine::transition(*state, event)?;
    Ok(())
}

fn reject(state: &mut AttestationState) -> Result<(), CredentialError> {
    advance(state, AttestationEvent::Reject)
}

/// BLAKE3 over the full request tuple.
fn request_key(subject: &PublicKey, statement: &Statement, proof: &ThresholdProof) -> Hash {
    let signals: Vec<u8> = proof
        .public_signals()
        .iter()
        .flat_map(|s| s.to_be_bytes())
        .collect();
    hash_parts(&[
        subject.as_bytes(),
        &statement.canonical_bytes(),
        proof.as_bytes(),
        &signals,
    ])
}
