//! Output formatting for CLI responses

use std::path::Path;

use anyhow::{Error, Result};
use colored::*;
use serde::Serialize;
use serde_json::json;

use modsig_verify::{CertificateInfo, VerifyResult};

use crate::error::CliError;

/// One module and its verification outcome
#[derive(Debug, Serialize)]
pub struct ModuleReport<'a> {
    pub module: &'a Path,
    pub result: VerifyResult,
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print verification results in the selected format
pub fn print_verify_results(reports: &[ModuleReport<'_>], all_valid: bool, json: bool) -> Result<()> {
    if json {
        let output = json!({
            "success": all_valid,
            "results": reports,
        });
        let text = serde_json::to_string_pretty(&output).map_err(CliError::from)?;
        println!("{}", text);
        return Ok(());
    }

    for report in reports {
        print_result_human(report);
    }
    if reports.len() > 1 {
        let passed = reports.iter().filter(|r| r.result.valid).count();
        let summary = format!("{}/{} modules verified", passed, reports.len());
        if all_valid {
            println!("{}", summary.green().bold());
        } else {
            println!("{}", summary.red().bold());
        }
    }
    Ok(())
}

fn print_result_human(report: &ModuleReport<'_>) {
    let result = &report.result;
    let status = if result.valid {
        "VALID".green().bold()
    } else if result.has_signature {
        "INVALID".red().bold()
    } else {
        "UNSIGNED".yellow().bold()
    };

    println!("{} {}", status, report.module.display().to_string().bold());
    if let Some(signer) = &result.signer {
        println!("  Signer:      {}", signer);
    }
    if let Some(algorithm) = &result.algorithm {
        println!("  Algorithm:   {}", algorithm);
    }
    if let Some(hash) = &result.hash_algorithm {
        println!("  Hash:        {}", hash);
    }
    if result.has_signature {
        println!(
            "  Signature:   {} bytes at offset {}",
            result.signature_size, result.signature_offset
        );
    }
    if let Some(message) = &result.error_message {
        println!("  Error:       {}", message.red());
    }
    println!(
        "  Checked:     {}",
        result.verification_time.to_rfc3339().dimmed()
    );
}

/// Print the loaded certificates
pub fn print_inventory(inventory: &[CertificateInfo], json: bool) -> Result<()> {
    if json {
        let output = json!({
            "success": !inventory.is_empty(),
            "certificates": inventory,
        });
        let text = serde_json::to_string_pretty(&output).map_err(CliError::from)?;
        println!("{}", text);
        return Ok(());
    }

    if inventory.is_empty() {
        println!("{}", "No trusted certificates loaded".yellow());
        return Ok(());
    }

    println!("{}", "Trusted Certificates:".bold());
    for info in inventory {
        println!("  {} {}", "●".green(), info.fingerprint.bold());
        if let Some(subject) = &info.subject {
            println!("    Subject:   {}", subject);
        }
        println!("    Key:       {}", info.key_algorithm);
        println!("    Encoding:  {}", info.encoding.name());
        if let Some(source) = &info.source {
            println!("    Source:    {}", source.display().to_string().dimmed());
        }
    }
    Ok(())
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidConfiguration(_)) => "InvalidConfiguration",
        Some(CliError::CertDirNotFound(_)) => "CertDirNotFound",
        Some(CliError::JsonError(_)) => "JsonError",
        None => "Error",
    }
}
