//! Transport-agnostic request handlers for the bank oracle.
//!
//! Each `handle_*` takes one of the JSON request shapes and always returns
//! its response shape; failures are folded into `success: false` with a
//! message chosen by error class.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use solvent_core::types::{Multiplier, StatementKind};
use solvent_core::wire::{
    non_negative, AttestRequest, ProveData, ProveRequest, ProveResponse, RegisterRequest,
    RegisterResponse, VerifyRequest, VerifyResponse,
};
use solvent_credentials::{AttestationService, AttestationToken};
use solvent_crypto::{Blinding, Commitment, KeyPair, PublicKey};
use solvent_identity::IdentityRegistry;
use solvent_proof::{
    CompositeStatement, ProofContext, ProofError, ThresholdProof, ThresholdProofSystem,
};

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::records::{RecordStatus, VerificationRecord};
use crate::storage::{RecordStore, Stores};

/// The bank oracle: registry, delegated prover, and attestation signer.
pub struct OracleService {
    attestation: Arc<AttestationService>,
    records: Arc<dyn RecordStore>,
    permits: Arc<Semaphore>,
    rent_multiplier: Multiplier,
}

impl OracleService {
    pub fn new(keypair: KeyPair, stores: Stores, config: &OracleConfig) -> Self {
        let registry = IdentityRegistry::new(stores.identities);
        let proofs = Arc::new(ThresholdProofSystem::new());
        Self {
            attestation: Arc::new(
                AttestationService::new(keypair, registry, proofs)
                    .with_outcome_capacity(config.outcome_cache_capacity),
            ),
            records: stores.records,
            permits: Arc::new(Semaphore::new(config.max_concurrent_proofs.max(1))),
            rent_multiplier: config.rent_multiplier,
        }
    }

    pub fn bank_public_key(&self) -> PublicKey {
        self.attestation.public_key()
    }

    pub fn registry(&self) -> &IdentityRegistry {
        self.attestation.registry()
    }

    pub fn proof_system(&self) -> &Arc<ThresholdProofSystem> {
        self.attestation.proof_system()
    }

    pub fn records_for(&self, subject: &PublicKey) -> Result<Vec<VerificationRecord>, OracleError> {
        Ok(self.records.records_for(subject)?)
    }

    /// Register: `{ public_key_hex }` → `{ success, message? }`.
    pub async fn handle_register(&self, req: RegisterRequest) -> RegisterResponse {
        let request_id = Uuid::now_v7();
        async {
            let public_key = PublicKey::from_hex(&req.public_key_hex)?;
            self.registry().register(public_key)?;
            Ok::<_, OracleError>(())
        }
        .instrument(info_span!("register", %request_id))
        .await
        .map_or_else(
            |e| RegisterResponse::error(e.public_message()),
            |()| RegisterResponse::ok("identity registered"),
        )
    }

    /// Delegated Prove: the oracle commits to the salary with a fresh
    /// blinding, proves it against the threshold, and discards the blinding.
    ///
    /// With `public_key_hex` the proof is bound to that registered identity
    /// and can be attested. Without it the proof is anonymous: it verifies
    /// on its own but every Attest request rejects it, since attestation
    /// checks proofs under the subject's identity.
    pub async fn handle_prove(&self, req: ProveRequest) -> ProveResponse {
        let request_id = Uuid::now_v7();
        match self
            .prove(req)
            .instrument(info_span!("prove", %request_id))
            .await
        {
            Ok(data) => ProveResponse::ok(data),
            Err(e) => ProveResponse::error(e.public_message()),
        }
    }

    /// Verify: composite rent check over three commitments.
    pub async fn handle_verify(&self, req: VerifyRequest) -> VerifyResponse {
        let request_id = Uuid::now_v7();
        let result = self
            .verify(request_id, req)
            .instrument(info_span!("verify", %request_id))
            .await;
        respond(result)
    }

    /// Attest: single-commitment threshold check.
    pub async fn handle_attest(&self, req: AttestRequest) -> VerifyResponse {
        let request_id = Uuid::now_v7();
        let result = self
            .attest(request_id, req)
            .instrument(info_span!("attest", %request_id))
            .await;
        respond(result)
    }

    async fn prove(&self, req: ProveRequest) -> Result<ProveData, OracleError> {
        let salary = non_negative("salary", req.salary)?;
        let threshold = non_negative("threshold", req.threshold)?;
        let ctx = match req.public_key_hex.as_deref() {
            Some(hex_key) => {
                let public_key = PublicKey::from_hex(hex_key)?;
                self.registry().lookup(&public_key)?.proof_context()
            }
            None => ProofContext::ANONYMOUS,
        };
        if salary < threshold {
            return Err(ProofError::InsufficientValue.into());
        }

        let blinding = Blinding::random()?;
        let commitment = self
            .proof_system()
            .pedersen()
            .commit(u128::from(salary), &blinding)?;

        let proofs = Arc::clone(self.proof_system());
        let proof = self
            .run_blocking(move || proofs.prove_for(&ctx, salary, &blinding, threshold))
            .await??;

        info!(threshold, bound = !ctx.is_anonymous(), "delegated proof generated");
        Ok(ProveData {
            proof_hex: proof.to_hex(),
            public_signals: proof.public_signals().to_vec(),
            commitment_hex: commitment.to_hex(),
        })
    }

    async fn verify(
        &self,
        request_id: Uuid,
        req: VerifyRequest,
    ) -> Result<AttestationToken, OracleError> {
        let subject_hex = req
            .public_key_hex
            .as_deref()
            .ok_or(OracleError::MissingField("public_key_hex"))?;
        let subject = PublicKey::from_hex(subject_hex)?;
        let threshold = non_negative("expected_threshold", req.expected_threshold)?;
        let statement = CompositeStatement {
            c_income: Commitment::from_hex(&req.c_income_hex)?,
            c_used: Commitment::from_hex(&req.c_used_hex)?,
            c_rent: Commitment::from_hex(&req.c_rent_hex)?,
            multiplier: self.rent_multiplier,
            threshold,
        };
        let proof =
            ThresholdProof::from_hex_for(StatementKind::Composite, &req.proof_hex, vec![threshold])?;

        let attestation = Arc::clone(&self.attestation);
        let digest = proof.digest();
        let result = self
            .run_blocking(move || attestation.attest_composite(&subject, &statement, &proof))
            .await?;
        self.record(request_id, subject, digest, result)
    }

    async fn attest(
        &self,
        request_id: Uuid,
        req: AttestRequest,
    ) -> Result<AttestationToken, OracleError> {
        let subject = PublicKey::from_hex(&req.public_key_hex)?;
        let threshold = non_negative("threshold", req.threshold)?;
        let commitment = Commitment::from_hex(&req.commitment_hex)?;
        let proof =
            ThresholdProof::from_hex_for(StatementKind::Threshold, &req.proof_hex, vec![threshold])?;

        let attestation = Arc::clone(&self.attestation);
        let digest = proof.digest();
        let result = self
            .run_blocking(move || attestation.attest(&subject, &commitment, threshold, &proof))
            .await?;
        self.record(request_id, subject, digest, result)
    }

    /// Persist the decision, then hand the outcome back.
    fn record(
        &self,
        request_id: Uuid,
        subject: PublicKey,
        proof_digest: [u8; 32],
        result: Result<AttestationToken, solvent_credentials::CredentialError>,
    ) -> Result<AttestationToken, OracleError> {
        let status = match &result {
            Ok(_) => RecordStatus::Accepted,
            Err(_) => RecordStatus::Rejected,
        };
        self.records.append(&VerificationRecord::new(
            request_id,
            subject,
            proof_digest,
            status,
        ))?;
        Ok(result?)
    }

    /// Run CPU-heavy proof work on the blocking pool, bounded by the
    /// configured number of permits.
    async fn run_blocking<T, F>(&self, work: F) -> Result<T, OracleError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| OracleError::Worker(e.to_string()))?;
        tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| OracleError::Worker(e.to_string()))
    }
}

fn respond(result: Result<AttestationToken, OracleError>) -> VerifyResponse {
    let token = match result {
        Ok(token) => token,
        Err(e) => return VerifyResponse::rejected(e.public_message()),
    };
    match token.to_json_value() {
        Ok(json) => VerifyResponse::accepted(token.signature.to_hex(), json),
        Err(e) => VerifyResponse::rejected(OracleError::from(e).public_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solvent_credentials::TokenVerifier;
    use solvent_crypto::PedersenParams;
    use solvent_proof::CompositeWitness;

    fn oracle() -> OracleService {
        OracleService::new(
            KeyPair::generate().unwrap(),
            Stores::in_memory(),
            &OracleConfig::default(),
        )
    }

    async fn registered(oracle: &OracleService) -> KeyPair {
        let kp = KeyPair::generate().unwrap();
        let resp = oracle
            .handle_register(RegisterRequest {
                public_key_hex: kp.public_key().to_hex(),
            })
            .await;
        assert!(resp.success, "{:?}", resp.message);
        kp
    }

    #[tokio::test]
    async fn test_register_duplicate_and_malformed() {
        let oracle = oracle();
        let kp = registered(&oracle).await;

        let dup = oracle
            .handle_register(RegisterRequest {
                public_key_hex: kp.public_key().to_hex(),
            })
            .await;
        assert!(!dup.success);
        assert!(dup.message.unwrap().contains("already registered"));

        let bad = oracle
            .handle_register(RegisterRequest {
                public_key_hex: "abcd".into(),
            })
            .await;
        assert!(!bad.success);
        assert!(bad.message.unwrap().contains("public_key_hex"));
        assert_eq!(oracle.registry().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delegated_prove_then_attest() {
        let oracle = oracle();
        let kp = registered(&oracle).await;

        let prove = oracle
            .handle_prove(ProveRequest {
                salary: 75_000,
                threshold: 50_000,
                public_key_hex: Some(kp.public_key().to_hex()),
            })
            .await;
        assert!(prove.success, "{:?}", prove.message);
        let data = prove.data.unwrap();
        assert_eq!(data.public_signals, vec![50_000]);
        assert_eq!(data.proof_hex.len(), 1344);

        let resp = oracle
            .handle_attest(AttestRequest {
                public_key_hex: kp.public_key().to_hex(),
                commitment_hex: data.commitment_hex,
                threshold: 50_000,
                proof_hex: data.proof_hex,
            })
            .await;
        assert!(resp.success, "{:?}", resp.message);
        assert_eq!(resp.signature.as_ref().unwrap().len(), 128);

        let token: AttestationToken = serde_json::from_value(resp.token.unwrap()).unwrap();
        let verifier = TokenVerifier::new(Arc::clone(oracle.proof_system()));
        assert!(verifier.verify_token(&token, &oracle.bank_public_key()).valid);

        let records = oracle.records_for(&kp.public_key()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RecordStatus::Accepted);
    }

    #[tokio::test]
    async fn test_prove_below_threshold_and_negative_salary() {
        let oracle = oracle();
        let low = oracle
            .handle_prove(ProveRequest {
                salary: 40_000,
                threshold: 50_000,
                public_key_hex: None,
            })
            .await;
        assert!(!low.success);
        assert!(low.data.is_none());

        let negative = oracle
            .handle_prove(ProveRequest {
                salary: -1,
                threshold: 0,
                public_key_hex: None,
            })
            .await;
        assert!(!negative.success);
        assert!(negative.message.unwrap().contains("salary"));
    }

    #[tokio::test]
    async fn test_attest_wrong_threshold_uniform_message() {
        let oracle = oracle();
        let kp = registered(&oracle).await;
        let data = oracle
            .handle_prove(ProveRequest {
                salary: 75_000,
                threshold: 50_000,
                public_key_hex: Some(kp.public_key().to_hex()),
            })
            .await
            .data
            .unwrap();

        let resp = oracle
            .handle_attest(AttestRequest {
                public_key_hex: kp.public_key().to_hex(),
                commitment_hex: data.commitment_hex,
                threshold: 70_000,
                proof_hex: data.proof_hex,
            })
            .await;
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("verification failed"));
        assert!(resp.signature.is_none());

        let records = oracle.records_for(&kp.public_key()).unwrap();
        assert_eq!(records[0].status, RecordStatus::Rejected);
    }

    #[tokio::test]
    async fn test_verify_composite_rent_flow() {
        let oracle = oracle();
        let kp = registered(&oracle).await;
        let ctx = oracle.registry().lookup(&kp.public_key()).unwrap().proof_context();

        let (bi, bu, br) = (
            Blinding::random().unwrap(),
            Blinding::random().unwrap(),
            Blinding::random().unwrap(),
        );
        let witness = CompositeWitness {
            income: 100_000,
            income_blinding: &bi,
            used: 20_000,
            used_blinding: &bu,
            rent: 30_000,
            rent_blinding: &br,
        };
        let (statement, proof) = oracle
            .proof_system()
            .prove_composite(&ctx, &witness, Multiplier::ONE, 10_000)
            .unwrap();

        let req = VerifyRequest {
            c_income_hex: statement.c_income.to_hex(),
            c_used_hex: statement.c_used.to_hex(),
            c_rent_hex: statement.c_rent.to_hex(),
            proof_hex: proof.to_hex(),
            expected_threshold: 10_000,
            public_key_hex: Some(kp.public_key().to_hex()),
        };
        let resp = oracle.handle_verify(req.clone()).await;
        assert!(resp.success, "{:?}", resp.message);

        let mut missing_key = req;
        missing_key.public_key_hex = None;
        let resp = oracle.handle_verify(missing_key).await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().contains("public_key_hex"));
    }

    #[tokio::test]
    async fn test_verify_structural_errors_name_field() {
        let oracle = oracle();
        let kp = registered(&oracle).await;
        let c = PedersenParams::new()
            .commit(1, &Blinding::random().unwrap())
            .unwrap()
            .to_hex();
        let resp = oracle
            .handle_verify(VerifyRequest {
                c_income_hex: c.clone(),
                c_used_hex: "00".into(),
                c_rent_hex: c.clone(),
                proof_hex: "00".repeat(800),
                expected_threshold: 0,
                public_key_hex: Some(kp.public_key().to_hex()),
            })
            .await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().contains("commitment"));

        // A single-value proof is the wrong width for the rent check.
        let resp = oracle
            .handle_verify(VerifyRequest {
                c_income_hex: c.clone(),
                c_used_hex: c.clone(),
                c_rent_hex: c,
                proof_hex: "00".repeat(672),
                expected_threshold: 0,
                public_key_hex: Some(kp.public_key().to_hex()),
            })
            .await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().contains("proof_hex"));
    }

    #[tokio::test]
    async fn test_anonymous_delegated_proof_is_not_attestable() {
        let oracle = oracle();
        let kp = registered(&oracle).await;
        let key_hex = kp.public_key().to_hex();

        let anonymous = oracle
            .handle_prove(ProveRequest {
                salary: 62_000,
                threshold: 50_000,
                public_key_hex: None,
            })
            .await
            .data
            .unwrap();
        let proof = ThresholdProof::from_hex(&anonymous.proof_hex, vec![50_000]).unwrap();
        let commitment = Commitment::from_hex(&anonymous.commitment_hex).unwrap();
        assert!(oracle.proof_system().verify(&commitment, 50_000, &proof));

        let resp = oracle
            .handle_attest(AttestRequest {
                public_key_hex: key_hex.clone(),
                commitment_hex: anonymous.commitment_hex,
                threshold: 50_000,
                proof_hex: anonymous.proof_hex,
            })
            .await;
        assert_eq!(resp.message.as_deref(), Some("verification failed"));

        let bound = oracle
            .handle_prove(ProveRequest {
                salary: 62_000,
                threshold: 50_000,
                public_key_hex: Some(key_hex.clone()),
            })
            .await
            .data
            .unwrap();
        let resp = oracle
            .handle_attest(AttestRequest {
                public_key_hex: key_hex,
                commitment_hex: bound.commitment_hex,
                threshold: 50_000,
                proof_hex: bound.proof_hex,
            })
            .await;
        assert!(resp.success, "{:?}", resp.message);
    }

    #[tokio::test]
    async fn test_unknown_identity_attest() {
        let oracle = oracle();
        let stranger = KeyPair::generate().unwrap();
        let c = PedersenParams::new()
            .commit(1, &Blinding::random().unwrap())
            .unwrap();
        let resp = oracle
            .handle_attest(AttestRequest {
                public_key_hex: stranger.public_key().to_hex(),
                commitment_hex: c.to_hex(),
                threshold: 0,
                proof_hex: "00".repeat(672),
            })
            .await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().contains("unknown identity"));
    }
}
