//! Integration test: threshold proofs across solvent-crypto, solvent-proof
//! and solvent-identity.

use solvent_crypto::{Blinding, Commitment};
use solvent_integration_tests::Prover;
use solvent_proof::{ProofContext, ProofError, ThresholdProof, ThresholdProofSystem};

// =========================================================================
// Completeness
// =========================================================================

#[test]
fn test_honest_proofs_verify_across_thresholds() {
    let proofs = ThresholdProofSystem::new();
    let prover = Prover::new(&proofs, 60_000);

    for threshold in [0, 1, 50_000, 59_999, 60_000] {
        let proof = prover.prove(&proofs, threshold);
        assert_eq!(proof.public_signals(), &[threshold]);
        assert!(
            proofs.verify_for(&prover.context(), &prover.commitment, threshold, &proof),
            "threshold {} should verify",
            threshold
        );
    }
}

#[test]
fn test_proof_survives_hex_transport() {
    let proofs = ThresholdProofSystem::new();
    let prover = Prover::new(&proofs, 75_000);
    let proof = prover.prove(&proofs, 50_000);

    let hex_proof = proof.to_hex();
    assert_eq!(hex_proof.len(), 1344);
    let received = ThresholdProof::from_hex(&hex_proof, vec![50_000]).unwrap();
    let commitment = Commitment::from_hex(&prover.commitment.to_hex()).unwrap();

    assert!(proofs.verify_for(&prover.context(), &commitment, 50_000, &received));
}

#[test]
fn test_sessions_with_same_inputs_are_distinct() {
    let proofs = ThresholdProofSystem::new();
    let first = Prover::new(&proofs, 58_000);
    let second = Prover::new(&proofs, 58_000);
    // One identity, two independent sessions with the same (value, threshold).
    let ctx = first.context();
    let commitment_b = second.commitment;

    let proof_a = proofs
        .prove_for(&ctx, first.salary, &first.blinding, 50_000)
        .unwrap();
    let proof_b = proofs
        .prove_for(&ctx, second.salary, &second.blinding, 50_000)
        .unwrap();

    assert_ne!(first.commitment, commitment_b);
    assert_ne!(proof_a.as_bytes(), proof_b.as_bytes());
    assert!(proofs.verify_for(&ctx, &first.commitment, 50_000, &proof_a));
    assert!(proofs.verify_for(&ctx, &commitment_b, 50_000, &proof_b));
    assert!(!proofs.verify_for(&ctx, &first.commitment, 50_000, &proof_b));
    assert!(!proofs.verify_for(&ctx, &commitment_b, 50_000, &proof_a));
}

// =========================================================================
// Soundness
// =========================================================================

#[test]
fn test_salary_below_threshold_cannot_be_proven() {
    let proofs = ThresholdProofSystem::new();
    let prover = Prover::new(&proofs, 40_000);

    let err = proofs
        .prove_for(&prover.context(), prover.salary, &prover.blinding, 50_000)
        .unwrap_err();
    assert!(matches!(err, ProofError::InsufficientValue));
}

#[test]
fn test_proof_does_not_transfer_to_higher_threshold() {
    let proofs = ThresholdProofSystem::new();
    let prover = Prover::new(&proofs, 60_000);
    let proof = prover.prove(&proofs, 30_000);

    // Relabelling the public signal does not change what was proven.
    let relabelled = ThresholdProof::from_bytes(proof.as_bytes().to_vec(), vec![50_000]).unwrap();
    assert!(!proofs.verify_for(&prover.context(), &prover.commitment, 50_000, &relabelled));
    assert!(!proofs.verify_for(&prover.context(), &prover.commitment, 50_000, &proof));
}

#[test]
fn test_proof_does_not_transfer_to_other_commitment() {
    let proofs = ThresholdProofSystem::new();
    let rich = Prover::new(&proofs, 90_000);
    let poor = Prover::new(&proofs, 10_000);
    let proof = rich.prove(&proofs, 50_000);

    assert!(!proofs.verify_for(&rich.context(), &poor.commitment, 50_000, &proof));
}

#[test]
fn test_proof_bound_to_identity() {
    let proofs = ThresholdProofSystem::new();
    let alice = Prover::new(&proofs, 80_000);
    let bob = Prover::new(&proofs, 80_000);
    let proof = alice.prove(&proofs, 50_000);

    assert!(proofs.verify_for(&alice.context(), &alice.commitment, 50_000, &proof));
    assert!(!proofs.verify_for(&bob.context(), &alice.commitment, 50_000, &proof));
    assert!(!proofs.verify_for(&ProofContext::ANONYMOUS, &alice.commitment, 50_000, &proof));
}

// =========================================================================
// Hiding
// =========================================================================

#[test]
fn test_equal_salaries_give_unlinkable_commitments() {
    let proofs = ThresholdProofSystem::new();
    let a = Prover::new(&proofs, 55_000);
    let b = Prover::new(&proofs, 55_000);
    assert_ne!(a.commitment, b.commitment);

    // Same value and same blinding is the only way to reproduce a commitment.
    let again = proofs.pedersen().commit(55_000, &a.blinding).unwrap();
    assert_eq!(again, a.commitment);
}

#[test]
fn test_commitment_does_not_open_to_other_value() {
    let proofs = ThresholdProofSystem::new();
    let prover = Prover::new(&proofs, 55_000);
    let pedersen = proofs.pedersen();

    assert!(pedersen.open(&prover.commitment, 55_000, &prover.blinding));
    assert!(!pedersen.open(&prover.commitment, 55_001, &prover.blinding));
    assert!(!pedersen.open(&prover.commitment, 55_000, &Blinding::random().unwrap()));
}

#[test]
fn test_commitments_to_one_value_spread_out() {
    let proofs = ThresholdProofSystem::new();
    let commitments: Vec<Commitment> = (0..64)
        .map(|_| Prover::new(&proofs, 50_000).commitment)
        .collect();

    let distinct: std::collections::HashSet<_> = commitments.iter().collect();
    assert_eq!(distinct.len(), commitments.len());

    let first_bytes: std::collections::HashSet<u8> =
        commitments.iter().map(|c| c.to_bytes()[0]).collect();
    assert!(first_bytes.len() > 16, "only {} distinct lead bytes", first_bytes.len());
}
