//! `solvent-node keygen` / `solvent-node pubkey`.

use clap::Args;
use std::path::PathBuf;

use solvent_crypto::KeyPair;
use solvent_node::keyfile::{load_keypair, write_keypair};
use solvent_node::SolventConfig;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Where to write the key. Defaults to the configured bank key path.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &KeygenArgs, config: &SolventConfig) -> anyhow::Result<()> {
    let path = args.out.clone().unwrap_or_else(|| config.keypair_path());
    let keypair = KeyPair::generate()?;
    write_keypair(&path, &keypair)?;
    tracing::info!(path = %path.display(), public_key = %keypair.public_key(), "key generated");
    println!("{}", keypair.public_key().to_hex());
    Ok(())
}

pub fn run_pubkey(config: &SolventConfig) -> anyhow::Result<()> {
    let keypair = load_keypair(&config.keypair_path())?;
    println!("{}", keypair.public_key().to_hex());
    Ok(())
}
