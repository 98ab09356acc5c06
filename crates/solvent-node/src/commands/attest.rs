//! `solvent-node attest`: single-commitment attestation request.

use clap::Args;
use std::path::PathBuf;

use solvent_core::wire::AttestRequest;
use solvent_node::SolventConfig;

use super::{open_oracle, print_json, read_json};

#[derive(Args, Debug)]
pub struct AttestArgs {
    /// JSON request file, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    pub request: PathBuf,
}

pub async fn run(args: &AttestArgs, config: &SolventConfig) -> anyhow::Result<()> {
    let request: AttestRequest = read_json(&args.request)?;
    let oracle = open_oracle(config)?;
    print_json(&oracle.handle_attest(request).await)
}
