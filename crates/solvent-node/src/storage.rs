//! Persistent backends for the identity registry and decision records.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use solvent_crypto::{Commitment, PublicKey};
use solvent_identity::{Identity, IdentityError, IdentityStore, MemoryIdentityStore};

use crate::config::{StorageBackend, StorageConfig};
use crate::records::VerificationRecord;

const REGISTRY_FILE: &str = "registry.json";
const RECORDS_FILE: &str = "records.jsonl";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "rocksdb")]
    #[error("rocksdb error: {0}")]
    Rocks(#[from] rocksdb::Error),

    #[error("column family '{0}' not found")]
    MissingColumnFamily(&'static str),

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage backend {0:?} is not compiled in")]
    BackendUnavailable(StorageBackend),
}

impl From<StorageError> for IdentityError {
    fn from(e: StorageError) -> Self {
        IdentityError::Store(e.to_string())
    }
}

/// Append-only log of oracle decisions.
pub trait RecordStore: Send + Sync {
    fn append(&self, record: &VerificationRecord) -> Result<(), StorageError>;

    fn records_for(&self, subject: &PublicKey) -> Result<Vec<VerificationRecord>, StorageError>;
}

/// Registry and record handles sharing one backend.
#[derive(Clone)]
pub struct Stores {
    pub identities: Arc<dyn IdentityStore>,
    pub records: Arc<dyn RecordStore>,
}

impl Stores {
    /// Non-persistent stores.
    pub fn in_memory() -> Self {
        Self {
            identities: Arc::new(MemoryIdentityStore::new()),
            records: Arc::new(MemoryRecordStore::default()),
        }
    }

    /// Open the backend selected in `config`.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        match config.backend {
            StorageBackend::Json => {
                let store = Arc::new(JsonFileStore::open(&config.data_dir)?);
                Ok(Self {
                    identities: store.clone(),
                    records: store,
                })
            }
            #[cfg(feature = "rocksdb")]
            StorageBackend::Rocksdb => {
                let store = Arc::new(rocks::RocksStore::open(&config.data_dir.join("rocksdb"))?);
                Ok(Self {
                    identities: store.clone(),
                    records: store,
                })
            }
            #[cfg(not(feature = "rocksdb"))]
            StorageBackend::Rocksdb => Err(StorageError::BackendUnavailable(config.backend)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<VerificationRecord>>,
}

impl RecordStore for MemoryRecordStore {
    fn append(&self, record: &VerificationRecord) -> Result<(), StorageError> {
        self.records
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .push(record.clone());
        Ok(())
    }

    fn records_for(&self, subject: &PublicKey) -> Result<Vec<VerificationRecord>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.subject == *subject)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistrySnapshot {
    identities: Vec<Identity>,
    claims: Vec<ClaimEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClaimEntry {
    commitment: Commitment,
    owner: PublicKey,
}

/// Registry kept in memory and snapshotted to `registry.json` after every
/// change; decisions appended to `records.jsonl`.
pub struct JsonFileStore {
    dir: PathBuf,
    memory: MemoryIdentityStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(REGISTRY_FILE);
        let snapshot: RegistrySnapshot = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            RegistrySnapshot::default()
        };
        tracing::debug!(
            path = %path.display(),
            identities = snapshot.identities.len(),
            claims = snapshot.claims.len(),
            "registry snapshot loaded"
        );
        let memory = MemoryIdentityStore::from_parts(
            snapshot.identities,
            snapshot.claims.into_iter().map(|c| (c.commitment, c.owner)),
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            memory,
            write_lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Current state of the registry as a snapshot.
    fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            identities: self.memory.identities(),
            claims: self
                .memory
                .claims()
                .into_iter()
                .map(|(commitment, owner)| ClaimEntry { commitment, owner })
                .collect(),
        }
    }

    /// Replace `registry.json` atomically. Callers hold the write lock.
    fn write_snapshot(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError> {
        let tmp = self.dir.join(format!("{}.tmp", REGISTRY_FILE));
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&tmp, self.dir.join(REGISTRY_FILE))?;
        Ok(())
    }
}

// Mutations write the new snapshot to disk first and only then touch the
// in-memory maps, all under the write lock, so a failed write leaves no trace.
impl IdentityStore for JsonFileStore {
    fn insert_if_absent(&self, identity: &Identity) -> Result<bool, IdentityError> {
        let _guard = self.lock()?;
        if self.memory.get(&identity.public_key)?.is_some() {
            return Ok(false);
        }
        let mut snapshot = self.snapshot();
        snapshot.identities.push(identity.clone());
        self.write_snapshot(&snapshot)?;
        self.memory.insert_if_absent(identity)
    }

    fn get(&self, public_key: &PublicKey) -> Result<Option<Identity>, IdentityError> {
        self.memory.get(public_key)
    }

    fn len(&self) -> Result<usize, IdentityError> {
        self.memory.len()
    }

    fn list(&self) -> Result<Vec<Identity>, IdentityError> {
        self.memory.list()
    }

    fn claim_if_absent(
        &self,
        commitment: &Commitment,
        owner: &PublicKey,
    ) -> Result<Option<PublicKey>, IdentityError> {
        let _guard = self.lock()?;
        if let Some(previous) = self.memory.claim_owner(commitment) {
            return Ok(Some(previous));
        }
        let mut snapshot = self.snapshot();
        snapshot.claims.push(ClaimEntry {
            commitment: *commitment,
            owner: *owner,
        });
        self.write_snapshot(&snapshot)?;
        self.memory.claim_if_absent(commitment, owner)
    }
}

impl RecordStore for JsonFileStore {
    fn append(&self, record: &VerificationRecord) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(RECORDS_FILE))?;
        file.write_all(&line)?;
        Ok(())
    }

    fn records_for(&self, subject: &PublicKey) -> Result<Vec<VerificationRecord>, StorageError> {
        let path = self.dir.join(RECORDS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for line in BufReader::new(fs::File::open(path)?).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: VerificationRecord = serde_json::from_str(&line)?;
            if record.subject == *subject {
                out.push(record);
            }
        }
        Ok(out)
    }
}

#[cfg(feature = "rocksdb")]
mod rocks {
    //! RocksDB backend.

    use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, DB};
    use std::path::Path;
    use std::sync::Mutex;

    use solvent_crypto::{Commitment, PublicKey};
    use solvent_identity::{Identity, IdentityError, IdentityStore};

    use super::{RecordStore, StorageError};
    use crate::records::VerificationRecord;

    const CF_IDENTITIES: &str = "identities";
    const CF_CLAIMS: &str = "claims";
    const CF_RECORDS: &str = "records";

    pub struct RocksStore {
        db: DB,
        write_lock: Mutex<()>,
    }

    impl RocksStore {
        pub fn open(path: &Path) -> Result<Self, StorageError> {
            std::fs::create_dir_all(path)?;

            let mut opts = Options::default();
            opts.create_if_missing(true);
            opts.create_missing_column_families(true);

            let cf_descriptors = vec![
                ColumnFamilyDescriptor::new(CF_IDENTITIES, Options::default()),
                ColumnFamilyDescriptor::new(CF_CLAIMS, Options::default()),
                ColumnFamilyDescriptor::new(CF_RECORDS, Options::default()),
            ];

            let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
            Ok(Self {
                db,
                write_lock: Mutex::new(()),
            })
        }

        fn cf(&self, name: &'static str) -> Result<&ColumnFamily, StorageError> {
            self.db
                .cf_handle(name)
                .ok_or(StorageError::MissingColumnFamily(name))
        }

        fn put_if_absent(
            &self,
            cf_name: &'static str,
            key: &[u8],
            value: &[u8],
        ) -> Result<Option<Vec<u8>>, StorageError> {
            let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
            let cf = self.cf(cf_name)?;
            if let Some(existing) = self.db.get_cf(cf, key)? {
                return Ok(Some(existing));
            }
            self.db.put_cf(cf, key, value)?;
            Ok(None)
        }

        fn identities(&self) -> Result<Vec<Identity>, StorageError> {
            let cf = self.cf(CF_IDENTITIES)?;
            let mut out = Vec::new();
            for item in self.db.iterator_cf(cf, IteratorMode::Start) {
                let (_, value) = item?;
                out.push(serde_json::from_slice(&value)?);
            }
            Ok(out)
        }
    }

    impl IdentityStore for RocksStore {
        fn insert_if_absent(&self, identity: &Identity) -> Result<bool, IdentityError> {
            let value = serde_json::to_vec(identity).map_err(StorageError::from)?;
            let previous =
                self.put_if_absent(CF_IDENTITIES, identity.public_key.as_bytes(), &value)?;
            Ok(previous.is_none())
        }

        fn get(&self, public_key: &PublicKey) -> Result<Option<Identity>, IdentityError> {
            let cf = self.cf(CF_IDENTITIES)?;
            let value = self
                .db
                .get_cf(cf, public_key.as_bytes())
                .map_err(StorageError::from)?;
            match value {
                Some(bytes) => Ok(Some(
                    serde_json::from_slice(&bytes).map_err(StorageError::from)?,
                )),
                None => Ok(None),
            }
        }

        fn len(&self) -> Result<usize, IdentityError> {
            Ok(self.identities()?.len())
        }

        fn list(&self) -> Result<Vec<Identity>, IdentityError> {
            Ok(self.identities()?)
        }

        fn claim_if_absent(
            &self,
            commitment: &Commitment,
            owner: &PublicKey,
        ) -> Result<Option<PublicKey>, IdentityError> {
            match self.put_if_absent(CF_CLAIMS, &commitment.to_bytes(), owner.as_bytes())? {
                Some(bytes) => Ok(Some(PublicKey::from_bytes(&bytes)?)),
                None => Ok(None),
            }
        }
    }

    impl RecordStore for RocksStore {
        fn append(&self, record: &VerificationRecord) -> Result<(), StorageError> {
            let cf = self.cf(CF_RECORDS)?;
            let mut key = record.subject.as_bytes().to_vec();
            key.extend_from_slice(record.request_id.as_bytes());
            self.db.put_cf(cf, key, serde_json::to_vec(record)?)?;
            Ok(())
        }

        fn records_for(
            &self,
            subject: &PublicKey,
        ) -> Result<Vec<VerificationRecord>, StorageError> {
            let cf = self.cf(CF_RECORDS)?;
            let prefix = subject.as_bytes();
            let mut out = Vec::new();
            let iter = self
                .db
                .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));
            for item in iter {
                let (key, value) = item?;
                if !key.starts_with(prefix) {
                    break;
                }
                out.push(serde_json::from_slice(&value)?);
            }
            Ok(out)
        }
    }

}
