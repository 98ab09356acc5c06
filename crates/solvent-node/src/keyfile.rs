//! The bank's signing key on disk: one line of hex.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use solvent_crypto::{CryptoError, KeyPair};

/// Read the key written by `keygen`. Missing or unreadable files are
/// environment failures, never protocol outcomes.
pub fn load_keypair(path: &Path) -> Result<KeyPair, CryptoError> {
    let contents = zeroize::Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
        CryptoError::KeyMaterial(format!("cannot read {}: {}", path.display(), e))
    })?);
    KeyPair::from_secret_hex(&contents)
}

/// Write a fresh key file. Refuses to overwrite an existing one.
pub fn write_keypair(path: &Path, keypair: &KeyPair) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(keypair.secret_hex().as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}
