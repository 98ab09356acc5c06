//! Fixtures shared by the cross-crate tests in `tests/`.

use std::path::PathBuf;
use std::sync::Arc;

use solvent_credentials::AttestationService;
use solvent_crypto::{Blinding, Commitment, KeyPair, PublicKey};
use solvent_identity::IdentityRegistry;
use solvent_proof::{ProofContext, ThresholdProof, ThresholdProofSystem};

/// A bank with an in-memory registry and its own key.
pub struct Bank {
    pub service: AttestationService,
    pub public_key: PublicKey,
}

impl Bank {
    pub fn new() -> Self {
        let keypair = KeyPair::generate().expect("entropy");
        let public_key = keypair.public_key();
        let service = AttestationService::new(
            keypair,
            IdentityRegistry::in_memory(),
            Arc::new(ThresholdProofSystem::new()),
        );
        Self {
            service,
            public_key,
        }
    }

    pub fn proofs(&self) -> &Arc<ThresholdProofSystem> {
        self.service.proof_system()
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

/// A prover: a key plus the secret opening of one committed salary.
pub struct Prover {
    pub keypair: KeyPair,
    pub salary: u64,
    pub blinding: Blinding,
    pub commitment: Commitment,
}

impl Prover {
    pub fn new(proofs: &ThresholdProofSystem, salary: u64) -> Self {
        let keypair = KeyPair::generate().expect("entropy");
        let blinding = Blinding::random().expect("entropy");
        let commitment = proofs
            .pedersen()
            .commit(u128::from(salary), &blinding)
            .expect("salary fits in 64 bits");
        Self {
            keypair,
            salary,
            blinding,
            commitment,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    pub fn context(&self) -> ProofContext {
        ProofContext::bound(solvent_identity::namespace_of(&self.public_key()))
    }

    /// Threshold proof bound to this prover's identity.
    pub fn prove(&self, proofs: &ThresholdProofSystem, threshold: u64) -> ThresholdProof {
        proofs
            .prove_for(&self.context(), self.salary, &self.blinding, threshold)
            .expect("salary meets threshold")
    }
}

/// Fresh scratch directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, rand::random::<u64>()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
