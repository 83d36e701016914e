//! CLI subcommand implementations.

pub mod exercises;
pub mod parse;
