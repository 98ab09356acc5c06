use serde::{Deserialize, Deserializer, Serialize, Serializer};

use solvent_core::types::{StatementKind, COMPOSITE_PROOF_LEN, RANGE_PROOF_LEN};
use solvent_core::wire::decode_hex_exact;
use solvent_core::CoreError;
use solvent_crypto::{hash, Hash};

use crate::error::ProofError;

/// A serialised range proof plus its public signals (`[threshold]`).
///
/// Threshold statements carry a single 64-bit range proof; composite
/// statements carry one proof aggregated over four values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdProof {
    #[serde(
        rename = "proof_hex",
        serialize_with = "serialize_proof",
        deserialize_with = "deserialize_proof"
    )]
    bytes: Vec<u8>,
    public_signals: Vec<u64>,
}

impl ThresholdProof {
    /// Wrap raw proof bytes; the length must match one of the proof kinds.
    pub fn from_bytes(bytes: Vec<u8>, public_signals: Vec<u64>) -> Result<Self, ProofError> {
        if bytes.len() != RANGE_PROOF_LEN && bytes.len() != COMPOSITE_PROOF_LEN {
            return Err(ProofError::InvalidProofData(format!(
                "proof must be {} or {} bytes, got {}",
                RANGE_PROOF_LEN,
                COMPOSITE_PROOF_LEN,
                bytes.len()
            )));
        }
        Ok(Self {
            bytes,
            public_signals,
        })
    }

    /// Parse `proof_hex` of either kind, checking its width before decoding.
    pub fn from_hex(proof_hex: &str, public_signals: Vec<u64>) -> Result<Self, ProofError> {
        let bytes = decode_proof_hex(proof_hex)?;
        Self::from_bytes(bytes, public_signals)
    }

    /// Parse `proof_hex` that must be exactly the width for `kind`.
    pub fn from_hex_for(
        kind: StatementKind,
        proof_hex: &str,
        public_signals: Vec<u64>,
    ) -> Result<Self, ProofError> {
        let bytes = decode_hex_exact("proof_hex", proof_hex, kind.proof_len())?;
        Self::from_bytes(bytes, public_signals)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn public_signals(&self) -> &[u64] {
        &self.public_signals
    }

    /// The threshold the prover claims, if the signals carry one.
    pub fn threshold(&self) -> Option<u64> {
        match self.public_signals.as_slice() {
            [threshold] => Some(*threshold),
            _ => None,
        }
    }

    /// BLAKE3 digest of the proof bytes, as bound into tokens and records.
    pub fn digest(&self) -> Hash {
        hash(&self.bytes)
    }
}

fn decode_proof_hex(proof_hex: &str) -> Result<Vec<u8>, CoreError> {
    let trimmed = proof_hex.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let len = if digits.len() == COMPOSITE_PROOF_LEN * 2 {
        COMPOSITE_PROOF_LEN
    } else {
        RANGE_PROOF_LEN
    };
    decode_hex_exact("proof_hex", proof_hex, len)
}

fn serialize_proof<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn deserialize_proof<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    decode_proof_hex(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solvent_core::Classify;
    use solvent_core::ErrorClass;

    fn dummy() -> ThresholdProof {
        ThresholdProof::from_bytes(vec![0xab; RANGE_PROOF_LEN], vec![50_000]).unwrap()
    }

    #[test]
    fn test_length_checked() {
        let err = ThresholdProof::from_bytes(vec![0u8; 10], vec![1]).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Structural);
    }

    #[test]
    fn test_hex_width_checked_before_decoding() {
        assert!(ThresholdProof::from_hex("zz", vec![1]).is_err());
        let short = "00".repeat(RANGE_PROOF_LEN - 1);
        assert!(ThresholdProof::from_hex(&short, vec![1]).is_err());
    }

    #[test]
    fn test_hex_is_1344_chars() {
        let proof = dummy();
        assert_eq!(proof.to_hex().len(), 1344);
        let back = ThresholdProof::from_hex(&proof.to_hex(), vec![50_000]).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn test_composite_width_accepted() {
        let hex_proof = "11".repeat(COMPOSITE_PROOF_LEN);
        let proof = ThresholdProof::from_hex(&hex_proof, vec![500]).unwrap();
        assert_eq!(proof.as_bytes().len(), 800);

        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(serde_json::from_value::<ThresholdProof>(json).unwrap(), proof);
    }

    #[test]
    fn test_from_hex_for_requires_kind_width() {
        let single = "00".repeat(RANGE_PROOF_LEN);
        let aggregated = "00".repeat(COMPOSITE_PROOF_LEN);
        assert!(ThresholdProof::from_hex_for(StatementKind::Threshold, &single, vec![1]).is_ok());
        assert!(ThresholdProof::from_hex_for(StatementKind::Composite, &single, vec![1]).is_err());
        assert!(ThresholdProof::from_hex_for(StatementKind::Composite, &aggregated, vec![1]).is_ok());
        assert!(ThresholdProof::from_hex_for(StatementKind::Threshold, &aggregated, vec![1]).is_err());
    }

    #[test]
    fn test_threshold_signal() {
        assert_eq!(dummy().threshold(), Some(50_000));
        let none = ThresholdProof::from_bytes(vec![0u8; RANGE_PROOF_LEN], vec![]).unwrap();
        assert_eq!(none.threshold(), None);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(dummy()).unwrap();
        assert_eq!(json["public_signals"], serde_json::json!([50_000]));
        assert_eq!(json["proof_hex"].as_str().unwrap().len(), 1344);

        let mut bad = json.clone();
        bad["proof_hex"] = serde_json::json!("abcd");
        assert!(serde_json::from_value::<ThresholdProof>(bad).is_err());
    }
}
