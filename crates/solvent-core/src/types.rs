use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Bit-width of every range proof. Committed values must fit in a `u64`.
pub const RANGE_BITS: usize = 64;

/// Compressed Ristretto point (commitment) length in bytes.
pub const COMMITMENT_LEN: usize = 32;

/// Scalar (blinding factor) length in bytes.
pub const SCALAR_LEN: usize = 32;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Serialized 64-bit Bulletproofs range proof length in bytes:
/// four points, three scalars, then 2·log2(64) inner-product points and two scalars.
pub const RANGE_PROOF_LEN: usize = (2 * 6 + 9) * 32;

/// Values a composite proof bounds together: derived value, income, used, rent.
pub const COMPOSITE_VALUES: usize = 4;

/// Aggregated proof over `COMPOSITE_VALUES` 64-bit values; the inner-product
/// part grows to 2·log2(64·4) points.
pub const COMPOSITE_PROOF_LEN: usize = (2 * 8 + 9) * 32;

/// Version byte at the head of every canonical token encoding.
pub const TOKEN_VERSION: u8 = 1;

/// Public rational multiplier `k = numerator / denominator` used by the
/// rent flow (`income − used − threshold ≥ k · rent`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplier {
    pub numerator: u64,
    pub denominator: u64,
}

impl Multiplier {
    /// `k = 1`.
    pub const ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Create a multiplier; the denominator must be non-zero.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, CoreError> {
        if denominator == 0 {
            return Err(CoreError::InvalidMultiplier(
                "denominator must be non-zero".into(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Integer multiplier `k / 1`.
    pub fn integer(k: u64) -> Self {
        Self {
            numerator: k,
            denominator: 1,
        }
    }

    /// Fixed-width encoding absorbed into transcripts and token bytes.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.numerator.to_be_bytes());
        out[8..].copy_from_slice(&self.denominator.to_be_bytes());
        out
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl FromStr for Multiplier {
    type Err = CoreError;

    /// Parses `"3"` or `"5/2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u64>()
                .map_err(|e| CoreError::InvalidMultiplier(format!("{}: {}", s, e)))
        };
        match s.split_once('/') {
            Some((num, den)) => Self::new(parse(num)?, parse(den)?),
            None => Ok(Self::integer(parse(s)?)),
        }
    }
}

/// Which relation a proof or token speaks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// `value ≥ threshold` over one commitment.
    Threshold,
    /// `income − used − threshold ≥ k · rent` over three commitments.
    Composite,
}

impl StatementKind {
    /// Domain tag absorbed into transcripts and canonical encodings.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Threshold => 0x01,
            Self::Composite => 0x02,
        }
    }

    /// Exact byte length of a proof for this kind of statement.
    pub fn proof_len(&self) -> usize {
        match self {
            Self::Threshold => RANGE_PROOF_LEN,
            Self::Composite => COMPOSITE_PROOF_LEN,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold => write!(f, "Threshold"),
            Self::Composite => write!(f, "Composite"),
        }
    }
}
