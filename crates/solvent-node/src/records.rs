//! Decision records: what the oracle decided, never what it saw.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use solvent_crypto::PublicKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Accepted,
    Rejected,
}

/// One persisted Verify / Attest decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub request_id: Uuid,
    pub subject: PublicKey,
    /// Hex BLAKE3 digest of the presented proof bytes.
    pub proof_digest: String,
    pub status: RecordStatus,
    pub recorded_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn new(
        request_id: Uuid,
        subject: PublicKey,
        proof_digest: [u8; 32],
        status: RecordStatus,
    ) -> Self {
        Self {
            request_id,
            subject,
            proof_digest: hex::encode(proof_digest),
            status,
            recorded_at: Utc::now(),
        }
    }
}
