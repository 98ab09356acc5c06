use ed25519_dalek::Signer;
use ed25519_dalek::Verifier;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use solvent_core::types::SIGNATURE_LEN;
use solvent_core::wire::decode_hex_array;

use crate::error::CryptoError;
use crate::hex_serde;
use crate::keys::{KeyPair, PublicKey};

/// Ed25519 signature (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inner: ed25519_dalek::Signature,
}

impl Signature {
    /// Get the raw bytes (64 bytes).
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.inner.to_bytes()
    }

    /// Create from raw bytes (64 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_arr: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidInput(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            ))
        })?;
        let inner = ed25519_dalek::Signature::from_bytes(&bytes_arr);
        Ok(Self { inner })
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex_array::<SIGNATURE_LEN>("signature", hex_str)?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex_serde::serialize(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        hex_serde::deserialize(deserializer, Signature::from_hex)
    }
}

/// Sign a message using Ed25519.
///
/// Signing borrows the key immutably and is deterministic, so concurrent
/// callers may share one `KeyPair`.
pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    let sig = keypair.signing_key().sign(message);
    Signature { inner: sig }
}

/// Verify an Ed25519 signature (strict verification: rejects malleable
/// encodings and small-order keys).
pub fn verify(
    message: &[u8],
    signature: &Signature,
    pubkey: &PublicKey,
) -> Result<(), CryptoError> {
    pubkey
        .verifying_key()
        .verify_strict(message, &signature.inner)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
