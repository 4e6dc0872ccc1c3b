use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lambda-cost")]
#[command(version, about = "Forecasts Lambda functions costs based on last day")]
pub struct Cli {
    /// CSV filename to output full table data
    #[arg(long, value_name = "OUTPUT_FILENAME")]
    pub csv: Option<PathBuf>,

    /// AWS access key id. Must provide AWS secret access key as well (default: from local configuration)
    #[arg(long, value_name = "TOKEN_KEY_ID", requires = "token_secret")]
    pub token_key_id: Option<String>,

    /// AWS secret access key. Must provide AWS access key id as well (default: from local configuration)
    #[arg(long, value_name = "TOKEN_SECRET", requires = "token_key_id")]
    pub token_secret: Option<String>,

    /// AWS profile name (default: "default"). A key pair takes precedence.
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Read usage records from a JSON snapshot instead of AWS
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Only scan these regions (repeatable)
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// Maximum number of regions fetched concurrently
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print current configuration
    #[arg(long = "print")]
    pub print: bool,

    /// Initialize config file
    #[arg(long = "init")]
    pub init: bool,

    /// Check configuration
    #[arg(long = "check")]
    pub check: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
