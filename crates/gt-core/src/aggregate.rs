//! Session aggregation over the raw sheet grid.
//!
//! The sheet layout puts exercise names in the third row (index 2) starting
//! at column B, and per-session cells in the rows below, one exercise per
//! column. Each column is folded top to bottom into sessions: a plain entry
//! opens a new session, a "Same Day" entry joins the current one as an extra
//! set, and unparseable cells are recorded with their A1 position without
//! stopping the pass.

use serde_json::Value;

use crate::entry::{is_continuation, parse_cell};
use crate::exercise::{Exercise, ExerciseMap, ParseError, Session};
use crate::records::mark_personal_records;

/// Row holding the exercise name headers (0-based).
const HEADER_ROW: usize = 2;

/// First row of per-session data (0-based).
const DATA_START_ROW: usize = 3;

/// Exercise columns start at B; column A holds row labels.
const FIRST_EXERCISE_COLUMN: usize = 1;

/// Builds the full exercise map from a raw grid.
///
/// A grid with fewer than three rows has no header row and degrades to an
/// empty map rather than an error. Columns are independent: a column full of
/// junk yields an exercise with parse errors, never a failed build.
pub fn build_exercise_map(grid: &[Vec<Value>]) -> ExerciseMap {
    let mut exercises = ExerciseMap::new();
    let Some(header) = grid.get(HEADER_ROW) else {
        return exercises;
    };

    for (column, cell) in header.iter().enumerate().skip(FIRST_EXERCISE_COLUMN) {
        let Some(name) = cell.as_str().map(str::trim).filter(|name| !name.is_empty()) else {
            continue;
        };
        if exercises.contains_key(name) {
            tracing::debug!(exercise = name, column, "duplicate exercise header, later column wins");
        }

        let mut exercise = aggregate_column(grid, column, name);
        mark_personal_records(&mut exercise);
        exercises.insert(name.to_string(), exercise);
    }

    exercises
}

/// Folds one exercise column into sessions, single forward pass.
fn aggregate_column(grid: &[Vec<Value>], column: usize, name: &str) -> Exercise {
    let mut exercise = Exercise::new(name);
    let mut session_counter: u32 = 0;

    for (row, cells) in grid.iter().enumerate().skip(DATA_START_ROW) {
        let Some(cell) = cells.get(column) else {
            continue;
        };
        if is_blank(cell) {
            continue;
        }

        let Some(entry) = parse_cell(cell) else {
            exercise.parse_errors.push(ParseError::at(row, column));
            continue;
        };

        let continuation = cell.as_str().is_some_and(is_continuation);
        if continuation {
            if let Some(current) = exercise.sessions.last_mut() {
                current.add_set(entry);
            } else {
                // A same-day set with no session to attach to; drop it.
                tracing::warn!(exercise = name, row, "same-day marker before any session");
            }
        } else {
            session_counter += 1;
            exercise.sessions.push(Session::start(session_counter, entry));
        }
    }

    exercise
}

/// Blank cells are skipped entirely: they advance neither the session
/// numbering nor the error list.
fn is_blank(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
