//! Oracle configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use solvent_core::Multiplier;

/// Full configuration for the bank oracle.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SolventConfig {
    /// Attestation policy and resource limits.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Identity settings.
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Rent multiplier `k` for composite checks, e.g. `"3"` or `"5/2"`.
    #[serde(default, with = "multiplier_str")]
    pub rent_multiplier: Multiplier,
    /// Upper bound on proofs generated or verified at the same time.
    #[serde(default = "default_max_concurrent_proofs")]
    pub max_concurrent_proofs: usize,
    /// How many attestation outcomes are kept for identical resubmissions.
    #[serde(default = "default_outcome_cache_capacity")]
    pub outcome_cache_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Registry snapshot and decision records as JSON files.
    Json,
    /// RocksDB column families (requires the `rocksdb` feature).
    Rocksdb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    /// Path to the bank's signing key. Defaults to `<data_dir>/bank.key`.
    #[serde(default)]
    pub keypair_path: Option<PathBuf>,
}

fn default_max_concurrent_proofs() -> usize {
    4
}
fn default_outcome_cache_capacity() -> usize {
    solvent_credentials::issuer::DEFAULT_OUTCOME_CAPACITY
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_backend() -> StorageBackend {
    StorageBackend::Json
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            rent_multiplier: Multiplier::ONE,
            max_concurrent_proofs: default_max_concurrent_proofs(),
            outcome_cache_capacity: default_outcome_cache_capacity(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: default_backend(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SolventConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: SolventConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Where the bank key lives.
    pub fn keypair_path(&self) -> PathBuf {
        self.identity
            .keypair_path
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join("bank.key"))
    }
}

mod multiplier_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use solvent_core::Multiplier;

    pub fn serialize<S: Serializer>(m: &Multiplier, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(m)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Multiplier, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
