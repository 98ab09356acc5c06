//! Pedersen commitments over the Ristretto group.
//!
//! `C = v·G + r·H` where `G` is the Ristretto basepoint and `H` is the
//! Bulletproofs blinding generator, a hash-to-group image of `G` with no known
//! discrete-log relation to it. The same generators are used by the range
//! proofs, so a commitment produced here is directly provable.

use bulletproofs::PedersenGens;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::MultiscalarMul;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash as StdHash, Hasher};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use solvent_core::types::{COMMITMENT_LEN, SCALAR_LEN};
use solvent_core::wire::decode_hex_array;

use crate::error::CryptoError;
use crate::hex_serde;

/// Prover-private blinding factor. Zeroized on drop; `Debug` never prints it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Blinding(Scalar);

impl Blinding {
    /// Draw a fresh blinding factor from the operating system RNG.
    ///
    /// Fails (rather than panicking) when the entropy source is unavailable.
    pub fn random() -> Result<Self, CryptoError> {
        let mut wide = [0u8; 64];
        OsRng
            .try_fill_bytes(&mut wide)
            .map_err(|e| CryptoError::Entropy(e.to_string()))?;
        let scalar = Scalar::from_bytes_mod_order_wide(&wide);
        wide.zeroize();
        Ok(Self(scalar))
    }

    pub fn from_scalar(scalar: Scalar) -> Self {
        Self(scalar)
    }

    /// Parse a canonically encoded scalar.
    pub fn from_bytes(bytes: &[u8; SCALAR_LEN]) -> Result<Self, CryptoError> {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(*bytes))
            .map(Self)
            .ok_or(CryptoError::InvalidScalar)
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let mut bytes = decode_hex_array::<SCALAR_LEN>("blinding", s)?;
        let result = Self::from_bytes(&bytes);
        bytes.zeroize();
        result
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        self.0.to_bytes()
    }

    /// Hex export for the prover's own storage. Never put this on the wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    /// `Σ coeffᵢ · rᵢ`, the blinding of the matching commitment combination.
    pub fn combine(terms: &[(Scalar, &Blinding)]) -> Blinding {
        let scalar = terms
            .iter()
            .fold(Scalar::ZERO, |acc, (coeff, b)| acc + coeff * b.as_scalar());
        Blinding(scalar)
    }
}

impl fmt::Debug for Blinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blinding(<redacted>)")
    }
}

/// Public commitment: a compressed Ristretto point.
///
/// Equality is constant-time. Construction from untrusted bytes goes through
/// [`Commitment::from_bytes`], which rejects non-canonical encodings.
#[derive(Clone, Copy)]
pub struct Commitment(CompressedRistretto);

impl Commitment {
    /// Wrap a compressed point without validating it.
    pub fn from_compressed(compressed: CompressedRistretto) -> Self {
        Self(compressed)
    }

    /// Wrap raw bytes without validating them. Anything built on an invalid
    /// point fails later at decompression.
    pub fn from_bytes_unchecked(bytes: [u8; COMMITMENT_LEN]) -> Self {
        Self(CompressedRistretto(bytes))
    }

    pub fn from_point(point: RistrettoPoint) -> Self {
        Self(point.compress())
    }

    /// Parse and validate a 32-byte compressed point.
    pub fn from_bytes(bytes: &[u8; COMMITMENT_LEN]) -> Result<Self, CryptoError> {
        let compressed = CompressedRistretto(*bytes);
        if compressed.decompress().is_none() {
            return Err(CryptoError::InvalidPoint(
                "bytes are not a canonical Ristretto encoding".into(),
            ));
        }
        Ok(Self(compressed))
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex_array::<COMMITMENT_LEN>("commitment", s)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; COMMITMENT_LEN] {
        self.0.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }

    pub fn as_compressed(&self) -> &CompressedRistretto {
        &self.0
    }

    pub fn decompress(&self) -> Option<RistrettoPoint> {
        self.0.decompress()
    }
}

impl ConstantTimeEq for Commitment {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Commitment {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Commitment {}

impl StdHash for Commitment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_bytes().hash(state);
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex_serde::serialize(self.0.as_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        hex_serde::deserialize(deserializer, Commitment::from_hex)
    }
}

/// Immutable public parameters of the commitment scheme.
#[derive(Clone, Copy)]
pub struct PedersenParams {
    gens: PedersenGens,
}

impl PedersenParams {
    pub fn new() -> Self {
        Self {
            gens: PedersenGens::default(),
        }
    }

    /// The underlying generators, shared with the range-proof system.
    pub fn gens(&self) -> &PedersenGens {
        &self.gens
    }

    /// Commit to `value` under `blinding`.
    ///
    /// Deterministic in its inputs. Values wider than 64 bits are refused
    /// because the range proofs cannot speak about them.
    pub fn commit(&self, value: u128, blinding: &Blinding) -> Result<Commitment, CryptoError> {
        let value = u64::try_from(value).map_err(|_| CryptoError::Range { value })?;
        let point = self.gens.commit(Scalar::from(value), *blinding.as_scalar());
        Ok(Commitment::from_point(point))
    }

    /// Recompute the commitment and compare in constant time.
    pub fn open(&self, commitment: &Commitment, value: u128, blinding: &Blinding) -> bool {
        match self.commit(value, blinding) {
            Ok(recomputed) => recomputed.ct_eq(commitment).into(),
            Err(_) => false,
        }
    }

    /// `Σ coeffᵢ · Cᵢ + public · G`, computed without opening anything.
    ///
    /// Returns `None` if any input does not decompress.
    pub fn combine(&self, terms: &[(Scalar, &Commitment)], public: Scalar) -> Option<Commitment> {
        let mut scalars = Vec::with_capacity(terms.len() + 1);
        let mut points = Vec::with_capacity(terms.len() + 1);
        for (coeff, commitment) in terms {
            scalars.push(*coeff);
            points.push(commitment.decompress()?);
        }
        scalars.push(public);
        points.push(self.gens.B);
        Some(Commitment::from_point(RistrettoPoint::multiscalar_mul(
            scalars, points,
        )))
    }

    /// `C − value·G`: a commitment to `v − value` under the same blinding.
    pub fn sub_public(&self, commitment: &Commitment, value: u64) -> Option<Commitment> {
        self.combine(&[(Scalar::ONE, commitment)], -Scalar::from(value))
    }
}

impl Default for PedersenParams {
    fn default() -> Self {
        Self::new()
    }
}
