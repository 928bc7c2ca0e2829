//! CLI argument parsing

use cbusctl_core::{FunctionAssignment, FUNCTIONS};
use clap::Parser;

/// Generate dynamic help text for the --set argument
fn set_help() -> String {
    let names: Vec<&str> = FUNCTIONS.iter().map(|f| f.name).collect();
    format!("Set CBUS function [available: {}]", names.join(", "))
}

#[derive(Parser, Debug)]
#[command(name = "cbusctl")]
#[command(author, version, about = "FTDI CBUS pin configuration tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reassign a pin function in the EEPROM (power cycle required afterwards)
    #[arg(long, value_name = "NUM:FUNCTION", allow_hyphen_values = true, help = set_help())]
    pub set: Vec<FunctionAssignment>,

    /// Set CBUS GPIO as input
    #[arg(long, value_name = "NUM", allow_negative_numbers = true)]
    pub input: Vec<i32>,

    /// Set CBUS GPIO as high
    #[arg(long, value_name = "NUM", allow_negative_numbers = true)]
    pub high: Vec<i32>,

    /// Set CBUS GPIO as low
    #[arg(long, value_name = "NUM", allow_negative_numbers = true)]
    pub low: Vec<i32>,

    /// Toggle CBUS GPIO
    #[arg(long, value_name = "NUM", allow_negative_numbers = true)]
    pub toggle: Vec<i32>,

    /// Get CBUS GPIO state
    #[arg(long, value_name = "NUM", allow_negative_numbers = true)]
    pub get: Option<i32>,

    /// Dump chip ID and the function and level of every CBUS pin
    #[arg(short, long)]
    pub dump: bool,

    /// Skip all pin operations (for re-plugging the adapter after --set)
    #[arg(short = 'u', long)]
    pub detach: bool,
}
