//! Workout cell normalization and parsing.
//!
//! Sheet cells are freeform text typed by hand: `10kg/12`, `DB 15/12`,
//! `1.5 min`, `25/10+failure SD`, `70/12 (felt burning on 8th rep)`. This
//! module recognizes the closed set of conventions observed in the sheet and
//! turns a cell into a [`ParsedEntry`]. Anything outside those conventions is
//! not guessed at: the parser returns `None` and the caller records the cell
//! as unparseable.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Conversion factor for entries logged in pounds.
const LBS_TO_KG: f64 = 0.453_592;

/// Parenthesized asides, e.g. `(felt burning on 8th rep)`. Non-nested.
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Trailing "Same Day" marker and anything after it.
static SD_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bsd\b.*$").unwrap());

/// Trailing lap notation, e.g. `10kg/2 lap`.
static LAP_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\blaps?\b.*$").unwrap());

/// Time-based entries: `1 min`, `1.5 min`, `30 sec`, `1 m`, `Plank 2 mins`.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(min|mins|minute|minutes|m|sec|secs|second|seconds|s)\b")
        .unwrap()
});

/// Weight/rep entries with a `/` separator: `10/12`, `10kg/12`, `DB 15/12`.
static SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:DB\s+)?(\d+(?:\.\d+)?)\s*(kg|lbs|lb)?\s*/\s*(\d+)").unwrap());

/// Weight/rep entries with an `x` separator, prefix text tolerated:
/// `10 x 3`, `Knee 10 x3`, `Push ups 15 x 3`.
static X_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(kg|lbs|lb)?\s*x\s*(\d+)").unwrap());

/// One structured workout entry extracted from a single cell.
///
/// `weight` is canonical: kilograms for weight entries, seconds for time
/// entries. `original_weight`/`original_unit` keep the author's literal value
/// and unit spelling for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    pub weight: f64,
    pub reps: u32,
    pub original_weight: f64,
    pub original_unit: String,
    /// Set for duration-based entries, which always count as one rep.
    #[serde(default, skip_serializing_if = "crate::exercise::is_false")]
    pub is_time: bool,
}

impl ParsedEntry {
    /// Training volume, the comparison metric for best sets and records.
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// Strips asides and trailing annotations from a raw cell.
///
/// Steps run in order and each is idempotent: parenthesized runs, a `+...`
/// suffix (`+failure`), a trailing `SD` token, a trailing `lap`/`laps` token,
/// then surrounding whitespace.
pub fn normalize_cell(raw: &str) -> String {
    let no_parens = PAREN_RE.replace_all(raw, "");
    let truncated = no_parens.split('+').next().unwrap_or("");
    let no_sd = SD_SUFFIX_RE.replace(truncated, "");
    let no_lap = LAP_SUFFIX_RE.replace(&no_sd, "");
    no_lap.trim().to_string()
}

/// Parses one cell into a [`ParsedEntry`].
///
/// Time detection runs first; weight/rep patterns are only tried when the
/// cell is not a duration. Returns `None` for anything unrecognized — plain
/// numbers (`8`), words (`rest`, `fail`), and rep-only text (`12 reps`) are
/// all unparseable by design.
pub fn parse_entry(raw: &str) -> Option<ParsedEntry> {
    let cleaned = normalize_cell(raw);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = TIME_RE.captures(&cleaned) {
        let value: f64 = caps[1].parse().ok()?;
        let unit = caps[2].to_lowercase();
        // Minute units (min, mins, minute, minutes, m) scale to seconds.
        let seconds = if unit.starts_with('m') { value * 60.0 } else { value };
        return Some(ParsedEntry {
            weight: seconds,
            reps: 1,
            original_weight: seconds,
            original_unit: "sec".to_string(),
            is_time: true,
        });
    }

    let caps = SLASH_RE.captures(&cleaned).or_else(|| X_RE.captures(&cleaned))?;
    let weight: f64 = caps[1].parse().ok()?;
    let reps: u32 = caps[3].parse().ok()?;
    let unit = caps.get(2).map_or("kg", |m| m.as_str());
    let weight_kg = if unit.to_lowercase().contains("lb") {
        weight * LBS_TO_KG
    } else {
        weight
    };

    Some(ParsedEntry {
        weight: weight_kg,
        reps,
        original_weight: weight,
        original_unit: unit.to_string(),
        is_time: false,
    })
}

/// Parses a raw grid cell, which may not be a string at all.
///
/// Non-string values (numbers, booleans, null) never parse; the sheet API
/// hands back JSON values and only text cells carry workout entries.
pub fn parse_cell(value: &serde_json::Value) -> Option<ParsedEntry> {
    value.as_str().and_then(parse_entry)
}

/// Whether the *original* cell text carries the "Same Day" marker, making the
/// entry an extra set within the current session rather than a new session.
///
/// Checked against the raw text because normalization strips the marker.
pub fn is_continuation(raw: &str) -> bool {
    raw.to_uppercase().contains(" SD")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(weight: f64, reps: u32, original_weight: f64, unit: &str) -> ParsedEntry {
        ParsedEntry {
            weight,
            reps,
            original_weight,
            original_unit: unit.to_string(),
            is_time: false,
        }
    }

    fn time_entry(seconds: f64) -> ParsedEntry {
        ParsedEntry {
            weight: seconds,
            reps: 1,
            original_weight: seconds,
            original_unit: "sec".to_string(),
            is_time: true,
        }
    }

    #[test]
    fn parses_slash_format_with_unit() {
        assert_eq!(parse_entry("10kg/12"), Some(entry(10.0, 12, 10.0, "kg")));
    }

    #[test]
    fn slash_format_defaults_to_kg() {
        assert_eq!(parse_entry("25/10"), Some(entry(25.0, 10, 25.0, "kg")));
    }

    #[test]
    fn parses_dumbbell_prefix() {
        assert_eq!(parse_entry("DB 15/12"), Some(entry(15.0, 12, 15.0, "kg")));
    }

    #[test]
    fn parses_decimal_weights() {
        assert_eq!(parse_entry("15.5/4"), Some(entry(15.5, 4, 15.5, "kg")));
    }

    #[test]
    fn converts_pounds_to_kilograms() {
        let parsed = parse_entry("10lbs/8").unwrap();
        assert!((parsed.weight - 4.54).abs() < 0.01);
        assert_eq!(parsed.reps, 8);
        assert_eq!(parsed.original_unit, "lbs");
        assert!((parsed.original_weight - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn handles_lb_as_well_as_lbs() {
        let parsed = parse_entry("10lb/8").unwrap();
        assert!((parsed.weight - 4.54).abs() < 0.01);
        assert_eq!(parsed.original_unit, "lb");
    }

    #[test]
    fn parses_x_separator() {
        assert_eq!(parse_entry("10 x 3"), Some(entry(10.0, 3, 10.0, "kg")));
        assert_eq!(parse_entry("Knee 10 x3"), Some(entry(10.0, 3, 10.0, "kg")));
        assert_eq!(parse_entry("15kg x 5"), Some(entry(15.0, 5, 15.0, "kg")));
    }

    #[test]
    fn x_separator_tolerates_prefix_text() {
        assert_eq!(
            parse_entry("Push ups 15 x 3"),
            Some(entry(15.0, 3, 15.0, "kg"))
        );
    }

    #[test]
    fn x_separator_converts_pounds() {
        let parsed = parse_entry("20lbs x 12").unwrap();
        assert!((parsed.weight - 9.07).abs() < 0.01);
        assert_eq!(parsed.reps, 12);
        assert_eq!(parsed.original_unit, "lbs");
    }

    #[test]
    fn parses_minutes_to_seconds() {
        assert_eq!(parse_entry("1 min"), Some(time_entry(60.0)));
        assert_eq!(parse_entry("1.5 min"), Some(time_entry(90.0)));
        assert_eq!(parse_entry("2 mins"), Some(time_entry(120.0)));
        assert_eq!(parse_entry("1 minute"), Some(time_entry(60.0)));
        assert_eq!(parse_entry("1 m"), Some(time_entry(60.0)));
    }

    #[test]
    fn parses_seconds() {
        assert_eq!(parse_entry("30 sec"), Some(time_entry(30.0)));
        assert_eq!(parse_entry("45 seconds"), Some(time_entry(45.0)));
    }

    #[test]
    fn time_format_tolerates_prefix_text() {
        assert_eq!(parse_entry("Plank 1 min"), Some(time_entry(60.0)));
    }

    #[test]
    fn strips_failure_annotation_and_sd_marker() {
        assert_eq!(parse_entry("25/10+failure SD"), parse_entry("25/10"));
        assert_eq!(parse_entry("15/8 SD"), Some(entry(15.0, 8, 15.0, "kg")));
    }

    #[test]
    fn strips_parenthetical_asides() {
        assert_eq!(
            parse_entry("70/12 (felt burning on 8th rep)"),
            parse_entry("70/12")
        );
    }

    #[test]
    fn strips_lap_notation() {
        assert_eq!(parse_entry("10kg/2 lap"), Some(entry(10.0, 2, 10.0, "kg")));
    }

    #[test]
    fn tolerates_extra_whitespace() {
        assert_eq!(parse_entry("  10kg / 12  "), Some(entry(10.0, 12, 10.0, "kg")));
    }

    #[test]
    fn preserves_original_unit_case() {
        let parsed = parse_entry("10KG/12").unwrap();
        assert_eq!(parsed.original_unit, "KG");

        let parsed = parse_entry("10LBS/8").unwrap();
        assert_eq!(parsed.original_unit, "LBS");
        assert!((parsed.weight - 4.54).abs() < 0.01);
    }

    #[test]
    fn rejects_unparseable_cells() {
        for cell in ["", "fail", "rest", "skip", "8", "12 reps", "8+fail", "failure"] {
            assert_eq!(parse_entry(cell), None, "{cell:?} should not parse");
        }
    }

    #[test]
    fn annotation_stripping_can_leave_nothing_parseable() {
        // "8+fail 10kg/12" truncates at the first '+', leaving just "8".
        assert_eq!(parse_entry("8+fail 10kg/12"), None);
    }

    #[test]
    fn non_string_cells_never_parse() {
        assert_eq!(parse_cell(&json!(null)), None);
        assert_eq!(parse_cell(&json!(123)), None);
        assert_eq!(parse_cell(&json!(true)), None);
        assert_eq!(parse_cell(&json!(["10kg/12"])), None);
        assert_eq!(parse_cell(&json!("10kg/12")), parse_entry("10kg/12"));
    }

    #[test]
    fn normalize_is_idempotent() {
        for cell in [
            "25/10+failure SD",
            "70/12 (felt burning on 8th rep)",
            "10kg/2 lap",
            "  10kg / 12  ",
            "15/8 SD",
            "rest",
            "",
        ] {
            let once = normalize_cell(cell);
            assert_eq!(normalize_cell(&once), once, "normalize({cell:?}) not idempotent");
        }
    }

    #[test]
    fn continuation_marker_is_case_insensitive() {
        assert!(is_continuation("15/8 SD"));
        assert!(is_continuation("15/8 sd"));
        assert!(is_continuation("25/10+failure SD"));
        assert!(!is_continuation("15/8"));
        assert!(!is_continuation("SD 15/8"));
    }

    #[test]
    fn volume_is_weight_times_reps() {
        let parsed = parse_entry("10/12").unwrap();
        assert!((parsed.volume() - 120.0).abs() < f64::EPSILON);
    }
}
