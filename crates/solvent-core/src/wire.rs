//! Request/response shapes consumed by whatever transport fronts the oracle,
//! plus the structural validation every hex field passes before any
//! cryptographic parsing happens.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// --- Register ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub public_key_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegisterResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// --- Prove (delegated) ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProveRequest {
    pub salary: i64,
    pub threshold: i64,
    /// Identity the proof is bound to; anonymous when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProveData {
    pub proof_hex: String,
    pub public_signals: Vec<u64>,
    pub commitment_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProveData>,
}

impl ProveResponse {
    pub fn ok(data: ProveData) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

// --- Verify (rent flow) and Attest (single commitment) ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub c_income_hex: String,
    pub c_used_hex: String,
    pub c_rent_hex: String,
    pub proof_hex: String,
    pub expected_threshold: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestRequest {
    pub public_key_hex: String,
    pub commitment_hex: String,
    pub threshold: i64,
    pub proof_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<serde_json::Value>,
}

impl VerifyResponse {
    pub fn accepted(signature: String, token: serde_json::Value) -> Self {
        Self {
            success: true,
            message: Some("attestation issued".into()),
            signature: Some(signature),
            token: Some(token),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            signature: None,
            token: None,
        }
    }
}

// --- Structural validation ---

/// Decode a hex field that must encode exactly `byte_len` bytes.
///
/// The width is checked before decoding so oversized input is rejected
/// without allocating. A leading `0x` is tolerated.
pub fn decode_hex_exact(
    field: &'static str,
    input: &str,
    byte_len: usize,
) -> Result<Vec<u8>, CoreError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.len() != byte_len * 2 {
        return Err(CoreError::InvalidLength {
            field,
            expected: byte_len * 2,
            actual: digits.len(),
        });
    }
    hex::decode(digits).map_err(|e| CoreError::InvalidHex {
        field,
        reason: e.to_string(),
    })
}

/// Decode a fixed-width hex field into an array.
pub fn decode_hex_array<const N: usize>(
    field: &'static str,
    input: &str,
) -> Result<[u8; N], CoreError> {
    let bytes = decode_hex_exact(field, input, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Convert a signed JSON integer into the unsigned domain of the protocol.
pub fn non_negative(field: &'static str, value: i64) -> Result<u64, CoreError> {
    u64::try_from(value).map_err(|_| CoreError::OutOfRange {
        field,
        value: value as i128,
    })
}
