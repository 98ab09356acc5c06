//! Integration test: the oracle handlers over a JSON-file store.

use solvent_core::wire::{AttestRequest, ProveRequest, RegisterRequest};
use solvent_credentials::{AttestationToken, RejectReason};
use solvent_crypto::KeyPair;
use solvent_integration_tests::temp_dir;
use solvent_node::config::{OracleConfig, StorageBackend, StorageConfig};
use solvent_node::records::RecordStatus;
use solvent_node::{OracleService, Stores};

fn open(dir: &std::path::Path, bank_seed: [u8; 32]) -> OracleService {
    let stores = Stores::open(&StorageConfig {
        data_dir: dir.to_path_buf(),
        backend: StorageBackend::Json,
    })
    .unwrap();
    OracleService::new(KeyPair::from_seed(&bank_seed), stores, &OracleConfig::default())
}

#[tokio::test]
async fn test_registry_survives_restart() {
    let dir = temp_dir("solvent-oracle");
    let prover = KeyPair::generate().unwrap();
    let key_hex = prover.public_key().to_hex();

    {
        let oracle = open(&dir, [1u8; 32]);
        let resp = oracle
            .handle_register(RegisterRequest {
                public_key_hex: key_hex.clone(),
            })
            .await;
        assert!(resp.success, "{:?}", resp.message);
    }

    let reopened = open(&dir, [1u8; 32]);
    assert!(reopened.registry().is_registered(&prover.public_key()).unwrap());
    let again = reopened
        .handle_register(RegisterRequest {
            public_key_hex: key_hex,
        })
        .await;
    assert!(!again.success);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_delegated_prove_then_attest_records_decisions() {
    let dir = temp_dir("solvent-oracle");
    let oracle = open(&dir, [2u8; 32]);
    let prover = KeyPair::generate().unwrap();
    let key_hex = prover.public_key().to_hex();

    oracle
        .handle_register(RegisterRequest {
            public_key_hex: key_hex.clone(),
        })
        .await;

    let proved = oracle
        .handle_prove(ProveRequest {
            salary: 62_000,
            threshold: 50_000,
            public_key_hex: Some(key_hex.clone()),
        })
        .await;
    let data = proved.data.expect("proof data");
    assert_eq!(data.public_signals, vec![50_000]);

    let accepted = oracle
        .handle_attest(AttestRequest {
            public_key_hex: key_hex.clone(),
            commitment_hex: data.commitment_hex.clone(),
            threshold: 50_000,
            proof_hex: data.proof_hex.clone(),
        })
        .await;
    assert!(accepted.success, "{:?}", accepted.message);

    let token: AttestationToken = serde_json::from_value(accepted.token.unwrap()).unwrap();
    let verifier = solvent_credentials::TokenVerifier::new(oracle.proof_system().clone());
    assert!(verifier.verify_token(&token, &oracle.bank_public_key()).valid);

    // Same proof, different threshold claim.
    let rejected = oracle
        .handle_attest(AttestRequest {
            public_key_hex: key_hex,
            commitment_hex: data.commitment_hex,
            threshold: 55_000,
            proof_hex: data.proof_hex,
        })
        .await;
    assert!(!rejected.success);
    assert_eq!(rejected.message.as_deref(), Some("verification failed"));

    let statuses: Vec<_> = oracle
        .records_for(&prover.public_key())
        .unwrap()
        .into_iter()
        .map(|r| r.status)
        .collect();
    assert_eq!(statuses, vec![RecordStatus::Accepted, RecordStatus::Rejected]);

    // A different bank key does not vouch for this token.
    let other = KeyPair::generate().unwrap().public_key();
    assert_eq!(
        verifier.verify_token(&token, &other).reason,
        Some(RejectReason::IssuerMismatch)
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_negative_inputs_rejected_with_field_name() {
    let dir = temp_dir("solvent-oracle");
    let oracle = open(&dir, [3u8; 32]);

    let resp = oracle
        .handle_prove(ProveRequest {
            salary: -1,
            threshold: 50_000,
            public_key_hex: None,
        })
        .await;
    assert!(!resp.success);
    assert!(resp.message.unwrap().contains("salary"));

    let _ = std::fs::remove_dir_all(&dir);
}
