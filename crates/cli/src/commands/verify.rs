//! Module verification command

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use modsig_verify::Verifier;
use tracing::info;

use super::StoreArgs;
use crate::output::{self, ModuleReport};

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Modules to verify
    #[arg(required = true, value_name = "MODULE")]
    pub modules: Vec<PathBuf>,
}

/// Returns `Ok(true)` only when every module verified.
pub fn execute(args: &VerifyArgs, json: bool) -> Result<bool> {
    let (config, store) = args.store.load()?;
    info!(certificates = store.len(), "trust store loaded");

    let provider = config.provider();
    let verifier = Verifier::with_provider(&store, &provider);

    let reports: Vec<ModuleReport<'_>> = args
        .modules
        .iter()
        .map(|module| ModuleReport {
            module,
            result: verifier.verify_path(module),
        })
        .collect();

    let all_valid = reports.iter().all(|r| r.result.valid);
    output::print_verify_results(&reports, all_valid, json)?;
    Ok(all_valid)
}
