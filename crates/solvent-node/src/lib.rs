//! Solvent Node: the bank oracle's configuration, persistent registry,
//! decision records, and transport-agnostic request handlers.

pub mod config;
pub mod error;
pub mod keyfile;
pub mod oracle;
pub mod records;
pub mod storage;

pub use config::SolventConfig;
pub use error::OracleError;
pub use oracle::OracleService;
pub use storage::Stores;
