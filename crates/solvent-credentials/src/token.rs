use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use solvent_core::types::TOKEN_VERSION;
use solvent_crypto::{sign, verify, KeyPair, PublicKey, Signature};
use solvent_proof::{Statement, ThresholdProof};

use crate::error::CredentialError;

const SIGNING_DOMAIN: &[u8] = b"solvent.attestation.v1";

/// Portable, signed statement that a registered prover met a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationToken {
    pub version: u8,
    pub statement: Statement,
    /// The prover's registered key.
    pub subject: PublicKey,
    /// The bank's key.
    pub issuer: PublicKey,
    pub proof: ThresholdProof,
    pub issued_at: DateTime<Utc>,
    pub signature: Signature,
}

impl AttestationToken {
    /// Sign a new token with the bank's key.
    pub fn issue(
        keypair: &KeyPair,
        statement: Statement,
        subject: PublicKey,
        proof: ThresholdProof,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let issuer = keypair.public_key();
        let bytes = signing_bytes(TOKEN_VERSION, &statement, &subject, &issuer, &proof, &issued_at);
        let signature = sign(&bytes, keypair);
        Self {
            version: TOKEN_VERSION,
            statement,
            subject,
            issuer,
            proof,
            issued_at,
            signature,
        }
    }

    /// The exact bytes covered by `signature`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        signing_bytes(
            self.version,
            &self.statement,
            &self.subject,
            &self.issuer,
            &self.proof,
            &self.issued_at,
        )
    }

    /// Check the signature against the embedded issuer key.
    pub fn verify_signature(&self) -> Result<(), CredentialError> {
        verify(&self.canonical_bytes(), &self.signature, &self.issuer)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CredentialError> {
        serde_json::to_string(self).map_err(|e| CredentialError::Serialization(e.to_string()))
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, CredentialError> {
        serde_json::to_value(self).map_err(|e| CredentialError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        serde_json::from_str(json).map_err(|e| CredentialError::Serialization(e.to_string()))
    }
}

/// `domain ‖ version ‖ statement ‖ subject ‖ issuer ‖ BLAKE3(proof) ‖ secs ‖ nanos`.
fn signing_bytes(
    version: u8,
    statement: &Statement,
    subject: &PublicKey,
    issuer: &PublicKey,
    proof: &ThresholdProof,
    issued_at: &DateTime<Utc>,
) -> Vec<u8> {
    let statement_bytes = statement.canonical_bytes();
    let mut out = Vec::with_capacity(SIGNING_DOMAIN.len() + 1 + statement_bytes.len() + 3 * 32 + 12);
    out.extend_from_slice(SIGNING_DOMAIN);
    out.push(version);
    out.extend_from_slice(&statement_bytes);
    out.extend_from_slice(subject.as_bytes());
    out.extend_from_slice(issuer.as_bytes());
    out.extend_from_slice(&proof.digest());
    out.extend_from_slice(&issued_at.timestamp().to_be_bytes());
    out.extend_from_slice(&issued_at.timestamp_subsec_nanos().to_be_bytes());
    out
}
