//! Personal-record detection.

use crate::exercise::{Exercise, Session};

/// Flags every session whose summary volume equals the exercise maximum.
///
/// Ties are all marked, not just the first. Session summaries are copies of
/// their best set, so equal volumes compare exactly.
#[allow(clippy::float_cmp, reason = "tied summaries are bitwise-equal copies")]
pub fn mark_personal_records(exercise: &mut Exercise) {
    if exercise.sessions.is_empty() {
        return;
    }

    let max_volume = exercise
        .sessions
        .iter()
        .map(Session::volume)
        .fold(0.0_f64, f64::max);

    for session in &mut exercise.sessions {
        if session.volume() == max_volume {
            session.is_pr = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::parse_entry;

    fn exercise_with_volumes(entries: &[&str]) -> Exercise {
        let mut exercise = Exercise::new("Bench Press");
        for (i, cell) in entries.iter().enumerate() {
            let number = u32::try_from(i).unwrap() + 1;
            exercise
                .sessions
                .push(Session::start(number, parse_entry(cell).unwrap()));
        }
        exercise
    }

    #[test]
    fn marks_all_tied_maximum_sessions() {
        // Volumes 80, 90, 90: both 90s are records.
        let mut exercise = exercise_with_volumes(&["10/8", "10/9", "10/9"]);
        mark_personal_records(&mut exercise);

        assert!(!exercise.sessions[0].is_pr);
        assert!(exercise.sessions[1].is_pr);
        assert!(exercise.sessions[2].is_pr);
    }

    #[test]
    fn single_session_is_its_own_record() {
        let mut exercise = exercise_with_volumes(&["10/8"]);
        mark_personal_records(&mut exercise);
        assert!(exercise.sessions[0].is_pr);
    }

    #[test]
    fn no_sessions_is_a_no_op() {
        let mut exercise = Exercise::new("Bench Press");
        mark_personal_records(&mut exercise);
        assert!(exercise.sessions.is_empty());
    }
}
