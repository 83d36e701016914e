//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gym progression tracker.
///
/// Reads a freeform workout log from a spreadsheet and turns it into
/// per-exercise progression data with personal records.
#[derive(Debug, Parser)]
#[command(name = "gt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a single workout cell and print the structured entry.
    Parse {
        /// Raw cell text, e.g. "10kg/12", "DB 15/12", or "1.5 min".
        cell: String,
    },

    /// Build per-exercise progression data from the workout sheet.
    Exercises {
        /// Print the full JSON payload instead of a summary.
        #[arg(long)]
        json: bool,

        /// Read the raw grid from a JSON file instead of the Sheets API.
        #[arg(long)]
        input: Option<PathBuf>,
    },
}
