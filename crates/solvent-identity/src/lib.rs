//! Solvent Identity: the registry of public keys allowed to request
//! attestations, and the record of which identity presented which commitment.

pub mod error;
pub mod identity;
pub mod registry;
pub mod store;

pub use error::IdentityError;
pub use identity::{namespace_of, Identity};
pub use registry::IdentityRegistry;
pub use store::{IdentityStore, MemoryIdentityStore};
