//! `solvent-node commit`: prover-side commitment with a fresh blinding.

use clap::Args;
use serde::Serialize;

use solvent_crypto::{Blinding, PedersenParams};

use super::print_json;

#[derive(Args, Debug)]
pub struct CommitArgs {
    /// The private value to commit to.
    #[arg(short, long)]
    pub value: u64,
}

#[derive(Serialize)]
struct CommitOutput {
    commitment_hex: String,
    /// Keep this secret; it is needed to prove anything about the value.
    blinding_hex: String,
}

pub fn run(args: &CommitArgs) -> anyhow::Result<()> {
    let blinding = Blinding::random()?;
    let commitment = PedersenParams::new().commit(u128::from(args.value), &blinding)?;
    print_json(&CommitOutput {
        commitment_hex: commitment.to_hex(),
        blinding_hex: blinding.to_hex(),
    })
}
