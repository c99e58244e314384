//! Trust store listing command

use anyhow::Result;
use clap::Args;

use super::StoreArgs;
use crate::output;

#[derive(Args, Debug, Clone)]
pub struct CertsArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

/// Succeeds when at least one certificate was loaded.
pub fn execute(args: &CertsArgs, json: bool) -> Result<bool> {
    let (_, store) = args.store.load()?;
    let inventory = store.inventory();
    output::print_inventory(&inventory, json)?;
    Ok(!inventory.is_empty())
}
