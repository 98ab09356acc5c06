//! Range-proof based threshold proofs.
//!
//! Every statement is reduced to "the derived commitment opens to a value in
//! `[0, 2^64)`", where the derived commitment is computed homomorphically
//! from public data. Composite statements additionally bound the income,
//! used and rent commitments in the same aggregated proof, so the relation
//! holds over the integers and not just modulo the group order. The prover
//! knows the blindings; the verifier only ever sees commitments.

use bulletproofs::{BulletproofGens, RangeProof};
use curve25519_dalek::ristretto::CompressedRistretto;
use merlin::Transcript;
use std::fmt;
use tracing::debug;

use solvent_core::types::{Multiplier, COMPOSITE_VALUES, RANGE_BITS};
use solvent_crypto::{Blinding, Commitment, PedersenParams, Scalar};

use crate::context::ProofContext;
use crate::error::ProofError;
use crate::proof::ThresholdProof;
use crate::statement::{CompositeStatement, CompositeWitness, Statement};

const TRANSCRIPT_LABEL: &[u8] = b"solvent.threshold.v1";

/// Immutable proving/verifying parameters. Share through `Arc`.
pub struct ThresholdProofSystem {
    pedersen: PedersenParams,
    bp_gens: BulletproofGens,
}

impl ThresholdProofSystem {
    pub fn new() -> Self {
        Self {
            pedersen: PedersenParams::new(),
            bp_gens: BulletproofGens::new(RANGE_BITS, COMPOSITE_VALUES),
        }
    }

    pub fn pedersen(&self) -> &PedersenParams {
        &self.pedersen
    }

    /// Prove `value ≥ threshold` for `commit(value, blinding)`, unbound.
    ///
    /// An unbound proof only verifies under `ProofContext::ANONYMOUS`; the
    /// attestation service checks proofs under the subject's identity, so
    /// proofs meant for attestation come from [`Self::prove_for`].
    pub fn prove(
        &self,
        value: u64,
        blinding: &Blinding,
        threshold: u64,
    ) -> Result<ThresholdProof, ProofError> {
        self.prove_for(&ProofContext::ANONYMOUS, value, blinding, threshold)
    }

    /// Prove `value ≥ threshold` under an identity context.
    pub fn prove_for(
        &self,
        ctx: &ProofContext,
        value: u64,
        blinding: &Blinding,
        threshold: u64,
    ) -> Result<ThresholdProof, ProofError> {
        let derived_value = value
            .checked_sub(threshold)
            .ok_or(ProofError::InsufficientValue)?;
        let commitment = self.pedersen.commit(u128::from(value), blinding)?;
        let statement = Statement::Threshold {
            commitment,
            threshold,
        };
        self.prove_statement(ctx, &statement, &[derived_value], &[*blinding.as_scalar()])
    }

    pub fn verify(&self, commitment: &Commitment, threshold: u64, proof: &ThresholdProof) -> bool {
        self.verify_for(&ProofContext::ANONYMOUS, commitment, threshold, proof)
    }

    pub fn verify_for(
        &self,
        ctx: &ProofContext,
        commitment: &Commitment,
        threshold: u64,
        proof: &ThresholdProof,
    ) -> bool {
        let statement = Statement::Threshold {
            commitment: *commitment,
            threshold,
        };
        self.verify_statement(ctx, &statement, proof)
    }

    /// Prove `income − used − threshold ≥ k · rent` for the commitments
    /// opened by `witness`. Returns the public statement with the proof.
    pub fn prove_composite(
        &self,
        ctx: &ProofContext,
        witness: &CompositeWitness<'_>,
        multiplier: Multiplier,
        threshold: u64,
    ) -> Result<(CompositeStatement, ThresholdProof), ProofError> {
        let derived_value = composite_value(witness, multiplier, threshold)?;

        let statement = CompositeStatement {
            c_income: self
                .pedersen
                .commit(u128::from(witness.income), witness.income_blinding)?,
            c_used: self
                .pedersen
                .commit(u128::from(witness.used), witness.used_blinding)?,
            c_rent: self
                .pedersen
                .commit(u128::from(witness.rent), witness.rent_blinding)?,
            multiplier,
            threshold,
        };

        let den = Scalar::from(multiplier.denominator);
        let num = Scalar::from(multiplier.numerator);
        let blinding = Blinding::combine(&[
            (den, witness.income_blinding),
            (-den, witness.used_blinding),
            (-num, witness.rent_blinding),
        ]);

        let proof = self.prove_statement(
            ctx,
            &Statement::Composite(statement),
            &[derived_value, witness.income, witness.used, witness.rent],
            &[
                *blinding.as_scalar(),
                *witness.income_blinding.as_scalar(),
                *witness.used_blinding.as_scalar(),
                *witness.rent_blinding.as_scalar(),
            ],
        )?;
        Ok((statement, proof))
    }

    pub fn verify_composite(
        &self,
        ctx: &ProofContext,
        statement: &CompositeStatement,
        proof: &ThresholdProof,
    ) -> bool {
        self.verify_statement(ctx, &Statement::Composite(*statement), proof)
    }

    /// The commitment the range proof speaks about.
    ///
    /// Threshold: `C − t·G`. Composite:
    /// `den·(C_income − C_used − t·G) − num·C_rent`. `None` when an input
    /// commitment does not decompress or the multiplier has a zero denominator.
    pub fn derive_commitment(&self, statement: &Statement) -> Option<Commitment> {
        match statement {
            Statement::Threshold {
                commitment,
                threshold,
            } => self.pedersen.sub_public(commitment, *threshold),
            Statement::Composite(c) => {
                if c.multiplier.denominator == 0 {
                    return None;
                }
                let den = Scalar::from(c.multiplier.denominator);
                let num = Scalar::from(c.multiplier.numerator);
                self.pedersen.combine(
                    &[(den, &c.c_income), (-den, &c.c_used), (-num, &c.c_rent)],
                    -(den * Scalar::from(c.threshold)),
                )
            }
        }
    }

    /// Commitments the range proof bounds, in proving order: the derived
    /// commitment, then for composite statements income, used and rent.
    fn range_commitments(&self, statement: &Statement) -> Option<Vec<CompressedRistretto>> {
        let derived = self.derive_commitment(statement)?;
        let mut out = vec![*derived.as_compressed()];
        if let Statement::Composite(c) = statement {
            out.extend(
                [c.c_income, c.c_used, c.c_rent]
                    .iter()
                    .map(|commitment| *commitment.as_compressed()),
            );
        }
        Some(out)
    }

    /// Check a proof against any statement. Never panics; malformed input is
    /// simply `false`.
    pub fn verify_statement(
        &self,
        ctx: &ProofContext,
        statement: &Statement,
        proof: &ThresholdProof,
    ) -> bool {
        if proof.threshold() != Some(statement.threshold()) {
            debug!(kind = %statement.kind(), "public signals do not match statement");
            return false;
        }
        if proof.as_bytes().len() != statement.kind().proof_len() {
            debug!(kind = %statement.kind(), "proof length does not match statement kind");
            return false;
        }
        let Some(commitments) = self.range_commitments(statement) else {
            debug!(kind = %statement.kind(), "statement commitments do not decompress");
            return false;
        };
        let range_proof = match RangeProof::from_bytes(proof.as_bytes()) {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "range proof bytes rejected");
                return false;
            }
        };
        let mut transcript = self.transcript(ctx, statement);
        range_proof
            .verify_multiple(
                &self.bp_gens,
                self.pedersen.gens(),
                &mut transcript,
                &commitments,
                RANGE_BITS,
            )
            .is_ok()
    }

    fn prove_statement(
        &self,
        ctx: &ProofContext,
        statement: &Statement,
        values: &[u64],
        blindings: &[Scalar],
    ) -> Result<ThresholdProof, ProofError> {
        let expected = self
            .range_commitments(statement)
            .ok_or_else(|| ProofError::GenerationFailed("derived commitment invalid".into()))?;

        let mut transcript = self.transcript(ctx, statement);
        let (range_proof, committed) = RangeProof::prove_multiple(
            &self.bp_gens,
            self.pedersen.gens(),
            &mut transcript,
            values,
            blindings,
            RANGE_BITS,
        )
        .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;

        if committed != expected {
            return Err(ProofError::GenerationFailed(
                "witness does not open the derived commitment".into(),
            ));
        }

        debug!(kind = %statement.kind(), bound = !ctx.is_anonymous(), "threshold proof generated");
        ThresholdProof::from_bytes(range_proof.to_bytes(), vec![statement.threshold()])
    }

    fn transcript(&self, ctx: &ProofContext, statement: &Statement) -> Transcript {
        let mut transcript = Transcript::new(TRANSCRIPT_LABEL);
        transcript.append_message(b"kind", &[statement.kind().tag()]);
        ctx.append_to(&mut transcript);
        statement.append_to(&mut transcript);
        transcript
    }
}

impl Default for ThresholdProofSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThresholdProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdProofSystem")
            .field("bits", &RANGE_BITS)
            .finish_non_exhaustive()
    }
}

/// `den·(income − used − threshold) − num·rent`, checked to lie in `[0, 2^64)`.
fn composite_value(
    witness: &CompositeWitness<'_>,
    multiplier: Multiplier,
    threshold: u64,
) -> Result<u64, ProofError> {
    if multiplier.denominator == 0 {
        return Err(ProofError::Range);
    }
    let available =
        i128::from(witness.income) - i128::from(witness.used) - i128::from(threshold);
    let lhs = available
        .checked_mul(i128::from(multiplier.denominator))
        .ok_or(ProofError::Range)?;
    let rhs = i128::from(multiplier.numerator)
        .checked_mul(i128::from(witness.rent))
        .ok_or(ProofError::Range)?;
    let derived = lhs.checked_sub(rhs).ok_or(ProofError::Range)?;
    if derived < 0 {
        return Err(ProofError::InsufficientValue);
    }
    u64::try_from(derived).map_err(|_| ProofError::Range)
}
