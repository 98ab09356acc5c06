pub mod attest;
pub mod commit;
pub mod init;
pub mod keygen;
pub mod prove;
pub mod register;
pub mod verify;
pub mod verify_token;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use solvent_node::keyfile::load_keypair;
use solvent_node::{OracleService, SolventConfig, Stores};

/// Build the oracle from the configured key and storage backend.
pub fn open_oracle(config: &SolventConfig) -> anyhow::Result<OracleService> {
    let keypair = load_keypair(&config.keypair_path())?;
    let stores = Stores::open(&config.storage)?;
    Ok(OracleService::new(keypair, stores, &config.oracle))
}

/// Read a JSON document from a file, or from stdin when the path is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?
    };
    serde_json::from_str(&contents).map_err(|e| anyhow::anyhow!("invalid JSON: {}", e))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
