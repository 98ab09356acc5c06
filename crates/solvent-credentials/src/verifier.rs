use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use solvent_core::types::TOKEN_VERSION;
use solvent_crypto::PublicKey;
use solvent_identity::namespace_of;
use solvent_proof::{ProofContext, ThresholdProofSystem};

use crate::token::AttestationToken;

/// Why a token was refused. The first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    UnsupportedVersion,
    BadSignature,
    BadProof,
    IssuerMismatch,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion => write!(f, "unsupported token version"),
            Self::BadSignature => write!(f, "bad signature"),
            Self::BadProof => write!(f, "bad proof"),
            Self::IssuerMismatch => write!(f, "issuer mismatch"),
        }
    }
}

/// Result of token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenVerification {
    pub valid: bool,
    pub reason: Option<RejectReason>,
    /// Individual check results, in the order they ran.
    pub checks: Vec<VerificationCheck>,
}

/// An individual verification check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCheck {
    pub name: String,
    pub passed: bool,
    pub detail: Option<String>,
}

impl VerificationCheck {
    fn new(name: &str, passed: bool, failure: &str) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: if passed { None } else { Some(failure.into()) },
        }
    }
}

/// Offline verifier: needs only the token and the bank's public key.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    proofs: Arc<ThresholdProofSystem>,
}

impl TokenVerifier {
    pub fn new(proofs: Arc<ThresholdProofSystem>) -> Self {
        Self { proofs }
    }

    /// Run every check in order and stop at the first failure.
    pub fn verify_token(
        &self,
        token: &AttestationToken,
        bank_public_key: &PublicKey,
    ) -> TokenVerification {
        let mut checks = Vec::with_capacity(4);

        let version_ok = token.version == TOKEN_VERSION;
        checks.push(VerificationCheck::new(
            "version_supported",
            version_ok,
            &format!("token version {} is not supported", token.version),
        ));
        if !version_ok {
            return rejected(RejectReason::UnsupportedVersion, checks);
        }

        let signature_ok = token.verify_signature().is_ok();
        checks.push(VerificationCheck::new(
            "signature_valid",
            signature_ok,
            "signature does not match the token contents",
        ));
        if !signature_ok {
            return rejected(RejectReason::BadSignature, checks);
        }

        let ctx = ProofContext::bound(namespace_of(&token.subject));
        let proof_ok = self
            .proofs
            .verify_statement(&ctx, &token.statement, &token.proof);
        checks.push(VerificationCheck::new(
            "proof_valid",
            proof_ok,
            "embedded proof does not verify for the statement and subject",
        ));
        if !proof_ok {
            return rejected(RejectReason::BadProof, checks);
        }

        let issuer_ok = token.issuer == *bank_public_key;
        checks.push(VerificationCheck::new(
            "issuer_matches",
            issuer_ok,
            &format!("token issued by {}, expected {}", token.issuer, bank_public_key),
        ));
        if !issuer_ok {
            return rejected(RejectReason::IssuerMismatch, checks);
        }

        tracing::debug!(subject = %token.subject, "attestation token verified");
        TokenVerification {
            valid: true,
            reason: None,
            checks,
        }
    }
}

fn rejected(reason: RejectReason, checks: Vec<VerificationCheck>) -> TokenVerification {
    tracing::debug!(%reason, "attestation token rejected");
    TokenVerification {
        valid: false,
        reason: Some(reason),
        checks,
    }
}
