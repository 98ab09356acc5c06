//! Solvent Credentials: attestation tokens issued by the bank oracle and
//! verified offline by anyone holding the bank's public key.

pub mod error;
pub mod issuer;
pub mod token;
pub mod verifier;

pub use error::CredentialError;
pub use issuer::AttestationService;
pub use token::AttestationToken;
pub use verifier::{RejectReason, TokenVerification, TokenVerifier, VerificationCheck};
