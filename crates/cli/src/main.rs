//! pgmodverify - appended module signature checker
//!
//! Loads trusted certificates, verifies kernel modules against them and
//! prints the verification fields. Exits 0 only when every module verified.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CertsArgs, VerifyArgs};

#[derive(Parser)]
#[command(name = "pgmodverify")]
#[command(about = "Verify appended kernel-module signatures against trusted certificates")]
#[command(version)]
#[command(long_about = "
pgmodverify checks that a kernel module ends with an appended signature made
by the key of one of the trusted certificates.

Certificates are read from directories containing user_secureboot.{crt,pem,der}
or phoenixguard.{crt,pem}, from individual files, or from a JSON config file.
Use --json for machine-readable output.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify one or more modules
    Verify(VerifyArgs),

    /// List the certificates that would be trusted
    Certs(CertsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pgmodverify={log_level},modsig_verify={log_level},modsig_crypto={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::FAILURE
        }
    }
}

fn execute_command(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Verify(args) => commands::verify::execute(args, cli.json),
        Commands::Certs(args) => commands::certs::execute(args, cli.json),
    }
}
