//! Solvent Core: Fundamental types, error classes, and wire shapes for the
//! Solvent confidential income-threshold attestation protocol.

pub mod attestation_state;
pub mod error;
pub mod types;
pub mod wire;

pub use attestation_state::{AttestationEvent, AttestationState, AttestationStateMachine};
pub use error::{Classify, CoreError, ErrorClass};
pub use types::{Multiplier, StatementKind};
