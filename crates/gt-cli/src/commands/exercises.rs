//! Implementation of the `gt exercises` command.
//!
//! Pulls the raw workout grid (Sheets API or a local JSON file), folds it
//! into per-exercise sessions, and prints either the JSON wire payload or a
//! human-readable progression summary.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use gt_core::ExercisesResponse;
use gt_sheets::{Grid, SheetCache, SheetsClient};

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    json: bool,
    input: Option<&Path>,
) -> Result<()> {
    let grid = match input {
        Some(path) => load_grid(path)?,
        None => fetch_grid(config)?,
    };

    let response = ExercisesResponse {
        exercises: gt_core::build_exercise_map(&grid),
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&response)?)?;
    } else {
        render_summary(writer, &response)?;
    }
    Ok(())
}

/// Reads a saved grid (JSON array of rows) from disk.
fn load_grid(path: &Path) -> Result<Grid> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let grid: Grid =
        serde_json::from_str(&text).context("grid file must be a JSON array of rows")?;
    Ok(grid)
}

/// Fetches the grid from the Sheets API.
///
/// The cache object lives for one invocation here; long-running callers of
/// gt-sheets hold one across requests.
fn fetch_grid(config: &Config) -> Result<Grid> {
    let spreadsheet_id = config
        .spreadsheet_id
        .as_deref()
        .context("spreadsheet_id is not configured (set GT_SPREADSHEET_ID or config.toml)")?;
    let access_token = config
        .access_token
        .as_deref()
        .context("access_token is not configured (set GT_ACCESS_TOKEN or config.toml)")?;

    let client = SheetsClient::new(spreadsheet_id, access_token)?;
    let mut cache = SheetCache::new(Duration::from_millis(config.cache_ttl_ms));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;
    let grid = runtime
        .block_on(client.fetch_grid(&config.sheet_name, &config.columns, &mut cache))
        .context("failed to fetch sheet data")?;
    Ok(grid)
}

fn render_summary<W: Write>(writer: &mut W, response: &ExercisesResponse) -> Result<()> {
    if response.exercises.is_empty() {
        writeln!(writer, "No exercises found.")?;
        return Ok(());
    }

    for exercise in response.exercises.values() {
        writeln!(writer, "{}", exercise.name)?;
        for session in &exercise.sessions {
            let best = if session.is_time {
                format!("{}s hold", session.original_weight)
            } else {
                format!(
                    "{}{} x {}",
                    session.original_weight, session.original_unit, session.reps
                )
            };
            let sets = if session.sets.len() > 1 {
                format!(" ({} sets)", session.sets.len())
            } else {
                String::new()
            };
            let pr = if session.is_pr { " [PR]" } else { "" };
            writeln!(writer, "  {}: {best}{sets}{pr}", session.date)?;
        }
        if !exercise.parse_errors.is_empty() {
            let locations: Vec<&str> = exercise
                .parse_errors
                .iter()
                .map(|err| err.location.as_str())
                .collect();
            writeln!(writer, "  unparseable cells: {}", locations.join(", "))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
