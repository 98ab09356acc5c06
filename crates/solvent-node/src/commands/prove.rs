//! `solvent-node prove`: threshold proof.
//!
//! With `--blinding-hex` the proof is made locally from the prover's own
//! commitment opening; without it the request goes to the oracle's
//! delegated Prove handler.

use clap::Args;

use solvent_core::wire::{non_negative, ProveData, ProveRequest, ProveResponse};
use solvent_crypto::{Blinding, PublicKey};
use solvent_identity::namespace_of;
use solvent_node::SolventConfig;
use solvent_proof::{ProofContext, ThresholdProofSystem};

use super::{open_oracle, print_json};

#[derive(Args, Debug)]
pub struct ProveArgs {
    #[arg(short, long, allow_negative_numbers = true)]
    pub salary: i64,

    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: i64,

    /// Bind the proof to this registered identity. Proofs made without it
    /// are anonymous and cannot be attested.
    #[arg(long)]
    pub public_key_hex: Option<String>,

    /// Prove locally with this blinding instead of delegating.
    #[arg(long)]
    pub blinding_hex: Option<String>,
}

pub async fn run(args: &ProveArgs, config: &SolventConfig) -> anyhow::Result<()> {
    let response = match &args.blinding_hex {
        Some(blinding_hex) => prove_locally(args, blinding_hex)
            .unwrap_or_else(|e| ProveResponse::error(e.to_string())),
        None => {
            let oracle = open_oracle(config)?;
            oracle
                .handle_prove(ProveRequest {
                    salary: args.salary,
                    threshold: args.threshold,
                    public_key_hex: args.public_key_hex.clone(),
                })
                .await
        }
    };
    print_json(&response)
}

fn prove_locally(args: &ProveArgs, blinding_hex: &str) -> anyhow::Result<ProveResponse> {
    let salary = non_negative("salary", args.salary)?;
    let threshold = non_negative("threshold", args.threshold)?;
    let blinding = Blinding::from_hex(blinding_hex)?;
    let ctx = match &args.public_key_hex {
        Some(key) => ProofContext::bound(namespace_of(&PublicKey::from_hex(key)?)),
        None => ProofContext::ANONYMOUS,
    };

    let system = ThresholdProofSystem::new();
    let commitment = system.pedersen().commit(u128::from(salary), &blinding)?;
    let proof = system.prove_for(&ctx, salary, &blinding, threshold)?;
    Ok(ProveResponse::ok(ProveData {
        proof_hex: proof.to_hex(),
        public_signals: proof.public_signals().to_vec(),
        commitment_hex: commitment.to_hex(),
    }))
}
