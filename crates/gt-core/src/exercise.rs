//! Exercise, session, and set types, including the wire contract.
//!
//! Serialized field names follow the JSON shape consumed by the charting
//! front end (`sessionNumber`, `originalWeight`, `isPR`, ...); the optional
//! flags are omitted when false so weight-based entries stay compact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::ParsedEntry;

/// Per-exercise output, keyed by the column header name.
///
/// Duplicate headers overwrite: the later column wins.
pub type ExerciseMap = BTreeMap<String, Exercise>;

/// One recorded attempt within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub weight: f64,
    pub reps: u32,
    pub original_weight: f64,
    pub original_unit: String,
    /// 1-based position within the session.
    pub set_number: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_time: bool,
}

impl SetRecord {
    pub fn new(entry: ParsedEntry, set_number: u32) -> Self {
        Self {
            weight: entry.weight,
            reps: entry.reps,
            original_weight: entry.original_weight,
            original_unit: entry.original_unit,
            set_number,
            is_time: entry.is_time,
        }
    }

    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// One workout occurrence for an exercise.
///
/// The top-level weight/reps mirror the best (highest-volume) set so summary
/// charts can read a single value per session. `session_number` is 1-based,
/// assigned at creation, and never reassigned; the source sheet has no
/// calendar dates, so `date` is the `Session N` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub date: String,
    pub session_number: u32,
    pub weight: f64,
    pub reps: u32,
    pub original_weight: f64,
    pub original_unit: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_time: bool,
    /// Set when this session's volume equals the exercise maximum.
    #[serde(rename = "isPR", default, skip_serializing_if = "is_false")]
    pub is_pr: bool,
    pub sets: Vec<SetRecord>,
}

impl Session {
    /// Opens a new session from its first set.
    pub fn start(session_number: u32, entry: ParsedEntry) -> Self {
        let first_set = SetRecord::new(entry, 1);
        Self {
            date: format!("Session {session_number}"),
            session_number,
            weight: first_set.weight,
            reps: first_set.reps,
            original_weight: first_set.original_weight,
            original_unit: first_set.original_unit.clone(),
            is_time: first_set.is_time,
            is_pr: false,
            sets: vec![first_set],
        }
    }

    /// Appends a same-day set, promoting it to the session summary when it
    /// strictly beats the current best volume.
    pub fn add_set(&mut self, entry: ParsedEntry) {
        let set_number = u32::try_from(self.sets.len()).unwrap_or(u32::MAX).saturating_add(1);
        let set = SetRecord::new(entry, set_number);
        if set.volume() > self.volume() {
            self.weight = set.weight;
            self.reps = set.reps;
            self.original_weight = set.original_weight;
            self.original_unit = set.original_unit.clone();
            self.is_time = set.is_time;
        }
        self.sets.push(set);
    }

    /// Summary volume, i.e. the best set's volume.
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// Location of a cell that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    /// 1-based spreadsheet row.
    pub row: usize,
    /// Column letters, A1 style.
    pub column: String,
    /// Combined position, e.g. `B7`.
    pub location: String,
}

impl ParseError {
    /// Builds a parse error from 0-based grid indices.
    pub fn at(row_index: usize, column_index: usize) -> Self {
        let row = row_index + 1;
        let column = column_letters(column_index);
        let location = format!("{column}{row}");
        Self { row, column, location }
    }
}

/// A1 column letters for a 0-based column index (0 = `A`, 26 = `AA`).
#[allow(
    clippy::cast_possible_truncation,
    reason = "remainder is always below 26"
)]
fn column_letters(index: usize) -> String {
    let mut index = index;
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// All parsed data for one exercise column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    /// Chronological (column-row) order.
    pub sessions: Vec<Session>,
    pub parse_errors: Vec<ParseError>,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sessions: Vec::new(),
            parse_errors: Vec::new(),
        }
    }
}

/// Success envelope of the exercises endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisesResponse {
    pub exercises: ExerciseMap,
}

/// Failure envelope: total failures carry a message instead of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serde helper so false flags disappear from the wire.
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
