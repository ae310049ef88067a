use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};

use crate::error::Result;
use crate::operation::Operation;

#[derive(Parser, Debug)]
#[command(name = "quipedit")]
#[command(version, about = "Convert Quiplash prompt files between schema versions and formats")]
pub struct Cli {
    /// Operation to run: to_v3_jet|to_v3_csv|to_v1_jet|to_v1_csv|csv_to_v1|csv_to_v3
    #[arg(value_name = "OPERATION")]
    pub operation: String,

    #[command(flatten)]
    pub args: ConvertArgs,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// File to read
    #[arg(value_name = "IN_FILE")]
    pub input: PathBuf,

    /// File to write (created or replaced)
    #[arg(value_name = "OUT_FILE")]
    pub output: PathBuf,

    /// Output the conversion report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Resolve the operation name, accepting kebab-case spellings.
    pub fn operation(&self) -> Result<Operation> {
        self.operation.parse()
    }
}
