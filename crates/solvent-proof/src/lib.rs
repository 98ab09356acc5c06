//! Solvent Proof: zero-knowledge threshold proofs over Pedersen commitments.
//!
//! Provides proof generation and verification for:
//! - Threshold proofs (prove a committed value ≥ a public threshold)
//! - Composite rent proofs (prove `income − used − threshold ≥ k · rent`
//!   over three commitments)
//!
//! Proofs can be bound to an identity through a [`ProofContext`].

pub mod context;
pub mod error;
pub mod proof;
pub mod statement;
pub mod system;

pub use context::ProofContext;
pub use error::ProofError;
pub use proof::ThresholdProof;
pub use statement::{CompositeStatement, CompositeWitness, Statement};
pub use system::ThresholdProofSystem;
