//! Integration test: prover → bank → third-party verifier.
//!
//! Exercises registration, attestation, token transport and offline
//! verification with solvent-identity, solvent-proof and solvent-credentials
//! together.

use std::sync::Arc;

use solvent_core::Multiplier;
use solvent_credentials::{
    AttestationToken, CredentialError, RejectReason, TokenVerifier,
};
use solvent_crypto::{Blinding, KeyPair};
use solvent_integration_tests::{Bank, Prover};
use solvent_proof::{CompositeWitness, ThresholdProofSystem};

fn verifier() -> TokenVerifier {
    TokenVerifier::new(Arc::new(ThresholdProofSystem::new()))
}

// =========================================================================
// Single-commitment flow
// =========================================================================

#[test]
fn test_full_attestation_round_trip() {
    let bank = Bank::new();
    let prover = Prover::new(bank.proofs(), 62_000);
    bank.service.registry().register(prover.public_key()).unwrap();

    let proof = prover.prove(bank.proofs(), 50_000);
    let token = bank
        .service
        .attest(&prover.public_key(), &prover.commitment, 50_000, &proof)
        .expect("attestation should succeed");

    assert_eq!(token.subject, prover.public_key());
    assert_eq!(token.issuer, bank.public_key);
    assert_eq!(token.statement.threshold(), 50_000);

    // The prover hands the JSON token to a landlord, who checks it offline.
    let json = token.to_json().unwrap();
    let received = AttestationToken::from_json(&json).unwrap();
    let result = verifier().verify_token(&received, &bank.public_key);
    assert!(result.valid, "checks: {:?}", result.checks);
    assert_eq!(result.reason, None);
    assert!(result.checks.iter().all(|c| c.passed));
}

#[test]
fn test_salary_40000_cannot_reach_50000() {
    let bank = Bank::new();
    let prover = Prover::new(bank.proofs(), 40_000);
    bank.service.registry().register(prover.public_key()).unwrap();

    // The best an honest prover can do is a lower threshold, which the bank
    // will not accept in place of the requested one.
    let proof = prover.prove(bank.proofs(), 40_000);
    let err = bank
        .service
        .attest(&prover.public_key(), &prover.commitment, 50_000, &proof)
        .unwrap_err();
    assert!(matches!(err, CredentialError::InvalidProof));
}

#[test]
fn test_unregistered_prover_rejected() {
    let bank = Bank::new();
    let prover = Prover::new(bank.proofs(), 70_000);
    let proof = prover.prove(bank.proofs(), 50_000);

    let err = bank
        .service
        .attest(&prover.public_key(), &prover.commitment, 50_000, &proof)
        .unwrap_err();
    assert!(matches!(err, CredentialError::UnknownIdentity(_)));
}

#[test]
fn test_registration_is_idempotent_per_key() {
    let bank = Bank::new();
    let key = KeyPair::generate().unwrap().public_key();
    let registry = bank.service.registry();

    registry.register(key).unwrap();
    assert!(registry.register(key).is_err());
    assert_eq!(registry.len().unwrap(), 1);
}

#[test]
fn test_identical_request_returns_same_token() {
    let bank = Bank::new();
    let prover = Prover::new(bank.proofs(), 65_000);
    bank.service.registry().register(prover.public_key()).unwrap();
    let proof = prover.prove(bank.proofs(), 50_000);

    let first = bank
        .service
        .attest(&prover.public_key(), &prover.commitment, 50_000, &proof)
        .unwrap();
    let second = bank
        .service
        .attest(&prover.public_key(), &prover.commitment, 50_000, &proof)
        .unwrap();
    assert_eq!(first, second);
}

// =========================================================================
// Tampering and replay
// =========================================================================

#[test]
fn test_tampered_token_fails_signature() {
    let bank = Bank::new();
    let prover = Prover::new(bank.proofs(), 62_000);
    bank.service.registry().register(prover.public_key()).unwrap();
    let proof = prover.prove(bank.proofs(), 50_000);
    let token = bank
        .service
        .attest(&prover.public_key(), &prover.commitment, 50_000, &proof)
        .unwrap();

    let mut value = token.to_json_value().unwrap();
    value["statement"]["threshold"] = serde_json::json!(60_000);
    let tampered: AttestationToken = serde_json::from_value(value).unwrap();

    let result = verifier().verify_token(&tampered, &bank.public_key);
    assert!(!result.valid);
    assert_eq!(result.reason, Some(RejectReason::BadSignature));
}

#[test]
fn test_token_from_other_bank_rejected() {
    let bank = Bank::new();
    let other_bank = Bank::new();
    let prover = Prover::new(bank.proofs(), 62_000);
    bank.service.registry().register(prover.public_key()).unwrap();
    let proof = prover.prove(bank.proofs(), 50_000);
    let token = bank
        .service
        .attest(&prover.public_key(), &prover.commitment, 50_000, &proof)
        .unwrap();

    let result = verifier().verify_token(&token, &other_bank.public_key);
    assert_eq!(result.reason, Some(RejectReason::IssuerMismatch));
}

#[test]
fn test_proof_replayed_by_other_identity_rejected() {
    let bank = Bank::new();
    let alice = Prover::new(bank.proofs(), 90_000);
    let mallory = KeyPair::generate().unwrap();
    bank.service.registry().register(alice.public_key()).unwrap();
    bank.service.registry().register(mallory.public_key()).unwrap();

    let proof = alice.prove(bank.proofs(), 50_000);
    let err = bank
        .service
        .attest(&mallory.public_key(), &alice.commitment, 50_000, &proof)
        .unwrap_err();
    assert!(matches!(err, CredentialError::InvalidProof));

    // Alice's own request is still accepted afterwards.
    assert!(bank
        .service
        .attest(&alice.public_key(), &alice.commitment, 50_000, &proof)
        .is_ok());
}

#[test]
fn test_tokens_for_distinct_requests_differ() {
    let bank = Bank::new();
    let prover = Prover::new(bank.proofs(), 62_000);
    bank.service.registry().register(prover.public_key()).unwrap();

    let low = bank
        .service
        .attest(
            &prover.public_key(),
            &prover.commitment,
            30_000,
            &prover.prove(bank.proofs(), 30_000),
        )
        .unwrap();
    let high = bank
        .service
        .attest(
            &prover.public_key(),
            &prover.commitment,
            50_000,
            &prover.prove(bank.proofs(), 50_000),
        )
        .unwrap();

    assert_ne!(low.canonical_bytes(), high.canonical_bytes());
    assert_ne!(low.signature, high.signature);
}

// =========================================================================
// Composite rent flow
// =========================================================================

#[test]
fn test_composite_rent_flow() {
    let bank = Bank::new();
    let prover = KeyPair::generate().unwrap();
    bank.service.registry().register(prover.public_key()).unwrap();
    let ctx = solvent_proof::ProofContext::bound(solvent_identity::namespace_of(
        &prover.public_key(),
    ));

    let (r_income, r_used, r_rent) = (
        Blinding::random().unwrap(),
        Blinding::random().unwrap(),
        Blinding::random().unwrap(),
    );
    let witness = CompositeWitness {
        income: 5_000,
        income_blinding: &r_income,
        used: 1_000,
        used_blinding: &r_used,
        rent: 1_200,
        rent_blinding: &r_rent,
    };
    // 5000 − 1000 − 500 = 3500 ≥ 2.5 · 1200 = 3000
    let multiplier = Multiplier::new(5, 2).unwrap();
    let (statement, proof) = bank
        .proofs()
        .prove_composite(&ctx, &witness, multiplier, 500)
        .unwrap();

    let token = bank
        .service
        .attest_composite(&prover.public_key(), &statement, &proof)
        .unwrap();
    let result = verifier().verify_token(&token, &bank.public_key);
    assert!(result.valid, "checks: {:?}", result.checks);

    // Rent the income cannot cover is refused at proving time.
    let too_much = CompositeWitness { rent: 1_500, ..witness };
    assert!(bank
        .proofs()
        .prove_composite(&ctx, &too_much, multiplier, 500)
        .is_err());
}
