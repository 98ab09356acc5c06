//! `solvent-node verify`: composite rent check request.

use clap::Args;
use std::path::PathBuf;

use solvent_core::wire::VerifyRequest;
use solvent_node::SolventConfig;

use super::{open_oracle, print_json, read_json};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// JSON request file, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    pub request: PathBuf,
}

pub async fn run(args: &VerifyArgs, config: &SolventConfig) -> anyhow::Result<()> {
    let request: VerifyRequest = read_json(&args.request)?;
    let oracle = open_oracle(config)?;
    print_json(&oracle.handle_verify(request).await)
}
