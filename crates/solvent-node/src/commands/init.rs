//! `solvent-node init`: write a default configuration file.

use clap::Args;
use std::path::Path;

use solvent_node::SolventConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, path: &Path, config: &SolventConfig) -> anyhow::Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.save(path)?;
    std::fs::create_dir_all(&config.storage.data_dir)?;
    tracing::info!(path = %path.display(), "wrote default config");
    println!("Configuration written to {}", path.display());
    Ok(())
}
