//! Core domain logic for the gym progression tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Cell parsing: freeform workout log text to structured entries
//! - Session aggregation: folding sheet columns into per-exercise sessions
//! - Record detection: flagging maximum-volume sessions as personal records

pub mod aggregate;
pub mod entry;
pub mod exercise;
pub mod records;

pub use aggregate::build_exercise_map;
pub use entry::{ParsedEntry, is_continuation, normalize_cell, parse_cell, parse_entry};
pub use exercise::{
    ErrorResponse, Exercise, ExerciseMap, ExercisesResponse, ParseError, Session, SetRecord,
};
pub use records::mark_personal_records;
