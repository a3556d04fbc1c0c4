//! Tutorial sequence.
//!
//! Pure functions over `TutorialStep`. Steps name a string by course, so the
//! same sequence is valid in every tuning.

use fretstorm_core::enums::TutorialStep;
use fretstorm_core::tuning::{Note, Tuning, STRING_COUNT};

/// Step entered from Idle.
pub const FIRST_STEP: TutorialStep = TutorialStep::Tune;

/// Successor of a step. `None` after the last step (the mission starts).
pub fn next(step: TutorialStep) -> Option<TutorialStep> {
    match step {
        TutorialStep::Tune => Some(TutorialStep::FireLow),
        TutorialStep::FireLow => Some(TutorialStep::FireHigh),
        TutorialStep::FireHigh => Some(TutorialStep::Launch),
        TutorialStep::Launch => None,
    }
}

/// Course (0 = thickest) the step waits for.
pub fn required_course(step: TutorialStep) -> usize {
    match step {
        TutorialStep::Tune | TutorialStep::FireLow | TutorialStep::Launch => 0,
        TutorialStep::FireHigh => STRING_COUNT - 1,
    }
}

/// Note the step waits for in the given tuning.
pub fn required_note(step: TutorialStep, tuning: &Tuning) -> Note {
    tuning.strings[required_course(step)].note
}

/// Instruction shown while the step is current.
pub fn prompt(step: TutorialStep, tuning: &Tuning) -> String {
    let string = &tuning.strings[required_course(step)];
    match step {
        TutorialStep::Tune => format!(
            "Pluck the {} string ({}) so we can hear you",
            string.label, string.note
        ),
        TutorialStep::FireLow => format!(
            "Meteors carry a string name. Pluck {} to shoot the big ones",
            string.label
        ),
        TutorialStep::FireHigh => format!(
            "Thin strings hit small, fast meteors. Pluck {} to try it",
            string.label
        ),
        TutorialStep::Launch => format!("Pluck {} to launch the mission", string.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretstorm_core::tuning::TuningName;

    #[test]
    fn test_sequence_terminates() {
        let mut step = FIRST_STEP;
        let mut visited = vec![step];
        while let Some(n) = next(step) {
            step = n;
            visited.push(step);
        }
        assert_eq!(visited.len(), 4);
        assert_eq!(step, TutorialStep::Launch);
    }

    #[test]
    fn test_required_notes_follow_tuning() {
        let standard = TuningName::Standard.tuning();
        let drop_d = TuningName::DropD.tuning();
        assert_eq!(required_note(TutorialStep::Tune, standard), Note::E2);
        assert_eq!(required_note(TutorialStep::FireHigh, standard), Note::E4);
        assert_eq!(required_note(TutorialStep::Launch, drop_d), Note::D2);
        assert!(prompt(TutorialStep::Tune, standard).contains("E2"));
    }
}
