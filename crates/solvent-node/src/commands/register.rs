//! `solvent-node register`: add a prover key to the registry.

use clap::Args;

use solvent_core::wire::RegisterRequest;
use solvent_node::SolventConfig;

use super::{open_oracle, print_json};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// The prover's Ed25519 public key (64 hex chars).
    pub public_key_hex: String,
}

pub async fn run(args: &RegisterArgs, config: &SolventConfig) -> anyhow::Result<()> {
    let oracle = open_oracle(config)?;
    let response = oracle
        .handle_register(RegisterRequest {
            public_key_hex: args.public_key_hex.clone(),
        })
        .await;
    print_json(&response)
}
