use clap::{Parser, Subcommand};

use crate::constants::defaults;
use crate::errors::BlueprintError;

#[derive(Debug, Parser)]
#[clap(version, about = "Blueprint disk customization validator")]
pub struct Cli {
    #[command(subcommand)]
    pub commands: Option<Commands>,

    /// Blueprint file (.toml, .json, .yaml or .yml)
    #[arg(
        global = true,
        short = 'f',
        long = "file",
        value_parser = validate_filename,
        default_value_t = String::from(defaults::BLUEPRINT_FILE)
    )]
    pub blueprint: String,

    /// Mountpoint policy file (TOML), overrides $BLUEPRINT_POLICY
    #[arg(global = true, short = 'p', long = "policy", value_parser = validate_filename)]
    pub policy: Option<String>,

    /// Verbose logging to stderr
    #[arg(global = true, short = 'v', long = "verbose", default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate blueprint customizations (default)
    Validate,

    /// Print the effective mountpoint policy
    Policy,
}

fn validate_filename(name: &str) -> Result<String, BlueprintError> {
    if name.is_empty() {
        return Err(BlueprintError::BadArgs(String::from("empty filename")));
    }

    Ok(name.to_string())
}
