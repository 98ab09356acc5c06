pub mod commitment;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod signing;

mod hex_serde;

pub use commitment::{Blinding, Commitment, PedersenParams};
pub use error::CryptoError;
pub use hashing::{derive_key, hash, hash_parts, Hash};
pub use keys::{KeyPair, PublicKey};
pub use signing::{sign, verify, Signature};

/// Re-exported so downstream crates build scalars without a direct dalek dependency.
pub use curve25519_dalek::scalar::Scalar;
