//! `solvent-node verify-token`: offline token check.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use solvent_credentials::{AttestationToken, TokenVerifier};
use solvent_crypto::PublicKey;
use solvent_node::keyfile::load_keypair;
use solvent_node::SolventConfig;
use solvent_proof::ThresholdProofSystem;

use super::{print_json, read_json};

#[derive(Args, Debug)]
pub struct VerifyTokenArgs {
    /// Token JSON file, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    pub token: PathBuf,

    /// Trusted bank key. Defaults to the public half of the configured key.
    #[arg(long)]
    pub bank_key_hex: Option<String>,
}

pub fn run(args: &VerifyTokenArgs, config: &SolventConfig) -> anyhow::Result<()> {
    let token: AttestationToken = read_json(&args.token)?;
    let bank_key = match &args.bank_key_hex {
        Some(hex_key) => PublicKey::from_hex(hex_key)?,
        None => load_keypair(&config.keypair_path())?.public_key(),
    };

    let verifier = TokenVerifier::new(Arc::new(ThresholdProofSystem::new()));
    let result = verifier.verify_token(&token, &bank_key);
    print_json(&result)?;
    match result.reason {
        None => Ok(()),
        Some(reason) => anyhow::bail!("token rejected: {}", reason),
    }
}
