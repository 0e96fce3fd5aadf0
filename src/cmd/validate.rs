//! `pdl-client validate`: check a configuration file for errors.
//!
//! Parses and validates the config file, reporting results in either
//! human-readable text or machine-readable JSON format.

use std::path::Path;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::{apply_overrides, parse_config_str, validation};
use crate::error::ClientError;

pub fn execute(path: &Path, args: &ValidateArgs) -> Result<(), ClientError> {
    if !path.exists() {
        return Err(ClientError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let mut config = parse_config_str(ext, &content, &path.display().to_string())?;
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "section": e.section,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(ClientError::ConfigValidation { errors });
    }

    let mut registrations: Vec<&str> = config
        .token_x
        .registration
        .keys()
        .map(String::as_str)
        .collect();
    registrations.sort_unstable();

    match args.format {
        ValidateFormat::Text => {
            println!("\u{2713} {} is valid", path.display());
            println!("  application:   {}", config.application.name);
            println!("  pdl:           {}", config.pdl.base_uri);
            println!("  ping:          {}", config.pdl.ping_endpoint());
            println!("  registrations: {}", registrations.join(", "));
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "application": config.application.name,
                    "pdl": config.pdl.base_uri.as_str(),
                    "registrations": registrations,
                })
            );
        }
    }

    Ok(())
}
