use merlin::Transcript;
use serde::{Deserialize, Serialize};

use solvent_core::types::Multiplier;
use solvent_core::StatementKind;
use solvent_crypto::{Blinding, Commitment};

/// Public claim over one or more commitments that a proof speaks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// The committed value is at least `threshold`.
    Threshold {
        commitment: Commitment,
        threshold: u64,
    },
    /// `income − used − threshold ≥ multiplier · rent`.
    Composite(CompositeStatement),
}

/// Public half of the rent flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeStatement {
    pub c_income: Commitment,
    pub c_used: Commitment,
    pub c_rent: Commitment,
    #[serde(default)]
    pub multiplier: Multiplier,
    pub threshold: u64,
}

/// Prover-private openings for a [`CompositeStatement`].
pub struct CompositeWitness<'a> {
    pub income: u64,
    pub income_blinding: &'a Blinding,
    pub used: u64,
    pub used_blinding: &'a Blinding,
    pub rent: u64,
    pub rent_blinding: &'a Blinding,
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Threshold { .. } => StatementKind::Threshold,
            Self::Composite(_) => StatementKind::Composite,
        }
    }

    pub fn threshold(&self) -> u64 {
        match self {
            Self::Threshold { threshold, .. } => *threshold,
            Self::Composite(c) => c.threshold,
        }
    }

    /// The same claim with a different threshold.
    pub fn with_threshold(&self, threshold: u64) -> Self {
        match self {
            Self::Threshold { commitment, .. } => Self::Threshold {
                commitment: *commitment,
                threshold,
            },
            Self::Composite(c) => Self::Composite(CompositeStatement { threshold, ..*c }),
        }
    }

    /// The commitment that carries the prover's own value.
    pub fn primary_commitment(&self) -> &Commitment {
        match self {
            Self::Threshold { commitment, .. } => commitment,
            Self::Composite(c) => &c.c_income,
        }
    }

    /// Every commitment the statement mentions, in canonical order.
    pub fn commitments(&self) -> Vec<Commitment> {
        match self {
            Self::Threshold { commitment, .. } => vec![*commitment],
            Self::Composite(c) => vec![c.c_income, c.c_used, c.c_rent],
        }
    }

    /// Canonical byte encoding: kind tag, commitments, threshold, multiplier.
    ///
    /// Fields are fixed width, so no length prefixes are needed.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 3 * 32 + 8 + 16);
        out.push(self.kind().tag());
        for commitment in self.commitments() {
            out.extend_from_slice(&commitment.to_bytes());
        }
        out.extend_from_slice(&self.threshold().to_be_bytes());
        if let Self::Composite(c) = self {
            out.extend_from_slice(&c.multiplier.to_bytes());
        }
        out
    }

    pub(crate) fn append_to(&self, transcript: &mut Transcript) {
        match self {
            Self::Threshold {
                commitment,
                threshold,
            } => {
                transcript.append_message(b"commitment", commitment.as_compressed().as_bytes());
                transcript.append_u64(b"threshold", *threshold);
            }
            Self::Composite(c) => {
                transcript.append_message(b"c_income", c.c_income.as_compressed().as_bytes());
                transcript.append_message(b"c_used", c.c_used.as_compressed().as_bytes());
                transcript.append_message(b"c_rent", c.c_rent.as_compressed().as_bytes());
                transcript.append_u64(b"threshold", c.threshold);
                transcript.append_message(b"multiplier", &c.multiplier.to_bytes());
            }
        }
    }
}

impl From<CompositeStatement> for Statement {
    fn from(statement: CompositeStatement) -> Self {
        Self::Composite(statement)
    }
}
