//! Implementation of the `gt parse` command.
//!
//! Parses one cell the way the aggregator would and prints the structured
//! entry as JSON. Unparseable input prints `null` and still exits zero:
//! absence of a match is data, not a failure.

use std::io::Write;

use anyhow::Result;

pub fn run<W: Write>(writer: &mut W, cell: &str) -> Result<()> {
    match gt_core::parse_entry(cell) {
        Some(entry) => {
            let json = serde_json::to_string_pretty(&entry)?;
            writeln!(writer, "{json}")?;
        }
        None => writeln!(writer, "null")?,
    }
    Ok(())
}
