//! Mission state machine.
//!
//! Idle → Tutorial(Tune) → … → Tutorial(Launch) → Active → GameOver(unarmed)
//! → GameOver(armed) → Active. No ECS dependency; the engine polls it once
//! per tick with the driver clock and acts on the returned transition.

use fretstorm_core::constants::{PLUCK_RECENCY_MS, RESTART_DELAY_MS};
use fretstorm_core::enums::{MissionPhase, TutorialStep};
use fretstorm_core::events::StringPluckEvent;
use fretstorm_core::tuning::{Note, Tuning};
use fretstorm_core::types::Millis;

use crate::tutorial;

/// Result of polling the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionTransition {
    /// Moved to the given tutorial step.
    TutorialAdvanced(TutorialStep),
    /// Final tutorial step passed; the engine must start a fresh mission.
    Start,
    /// Restart delay elapsed.
    RestartArmed,
    /// Restart string heard; the engine must start a fresh mission.
    Restart,
}

#[derive(Debug, Clone, Default)]
pub struct MissionState {
    phase: MissionPhase,
    /// Latest pluck not yet consumed by a tutorial step or restart.
    pending_pluck: Option<StringPluckEvent>,
    game_over_at_ms: Millis,
}

impl MissionState {
    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    /// Idle → first tutorial step. No-op elsewhere.
    pub fn begin(&mut self) -> bool {
        if self.phase != MissionPhase::Idle {
            return false;
        }
        self.pending_pluck = None;
        self.phase = MissionPhase::Tutorial {
            step: tutorial::FIRST_STEP,
        };
        true
    }

    /// Whether the escape action may force a mission start from here.
    pub fn can_skip(&self) -> bool {
        matches!(
            self.phase,
            MissionPhase::Tutorial { .. } | MissionPhase::GameOver { .. }
        )
    }

    /// Enter Active. The caller resets the world.
    pub fn start(&mut self) {
        self.pending_pluck = None;
        self.phase = MissionPhase::Active;
    }

    /// Active → GameOver(unarmed).
    pub fn mission_over(&mut self, now_ms: Millis) {
        if self.phase == MissionPhase::Active {
            self.phase = MissionPhase::GameOver {
                restart_armed: false,
            };
            self.game_over_at_ms = now_ms;
            self.pending_pluck = None;
        }
    }

    /// Any phase → Idle.
    pub fn stop(&mut self) {
        self.phase = MissionPhase::Idle;
        self.pending_pluck = None;
    }

    /// Offer a pluck to the state machine. Kept only in phases that wait for one.
    ///
    /// Commands are handled before `poll` arms the restart, so a pluck made at
    /// or after the arming time is kept while still unarmed and consumed once
    /// the restart is armed.
    pub fn record_pluck(&mut self, pluck: StringPluckEvent) {
        if self.awaits_pluck(pluck.at_ms) {
            self.pending_pluck = Some(pluck);
        }
    }

    fn awaits_pluck(&self, at_ms: Millis) -> bool {
        match self.phase {
            MissionPhase::Tutorial { .. } | MissionPhase::GameOver {
                restart_armed: true,
            } => true,
            MissionPhase::GameOver {
                restart_armed: false,
            } => at_ms >= self.game_over_at_ms + RESTART_DELAY_MS,
            MissionPhase::Idle | MissionPhase::Active => false,
        }
    }

    /// Note the current phase is waiting for, if any.
    pub fn awaiting(&self, tuning: &Tuning) -> Option<Note> {
        match self.phase {
            MissionPhase::Tutorial { step } => Some(tutorial::required_note(step, tuning)),
            MissionPhase::GameOver {
                restart_armed: true,
            } => Some(restart_note(tuning)),
            _ => None,
        }
    }

    /// Advance time-driven and pluck-driven transitions.
    pub fn poll(&mut self, now_ms: Millis, tuning: &Tuning) -> Option<MissionTransition> {
        match self.phase {
            MissionPhase::Tutorial { step } => {
                let pluck = self.take_fresh_pluck(now_ms)?;
                if pluck.string != tutorial::required_note(step, tuning) {
                    return None;
                }
                match tutorial::next(step) {
                    Some(next) => {
                        self.phase = MissionPhase::Tutorial { step: next };
                        Some(MissionTransition::TutorialAdvanced(next))
                    }
                    None => Some(MissionTransition::Start),
                }
            }
            MissionPhase::GameOver {
                restart_armed: false,
            } => {
                if now_ms.saturating_sub(self.game_over_at_ms) >= RESTART_DELAY_MS {
                    self.phase = MissionPhase::GameOver {
                        restart_armed: true,
                    };
                    Some(MissionTransition::RestartArmed)
                } else {
                    None
                }
            }
            MissionPhase::GameOver {
                restart_armed: true,
            } => {
                let pluck = self.take_fresh_pluck(now_ms)?;
                (pluck.string == restart_note(tuning)).then_some(MissionTransition::Restart)
            }
            MissionPhase::Idle | MissionPhase::Active => None,
        }
    }

    /// Consume the pending pluck if it is recent enough. Stale plucks are dropped.
    fn take_fresh_pluck(&mut self, now_ms: Millis) -> Option<StringPluckEvent> {
        self.pending_pluck
            .take()
            .filter(|p| now_ms.saturating_sub(p.at_ms) <= PLUCK_RECENCY_MS)
    }
}

/// The string that restarts a mission after game over: the thickest string.
pub fn restart_note(tuning: &Tuning) -> Note {
    tuning.thickest().note
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretstorm_core::tuning::TuningName;

    fn pluck(string: Note, at_ms: Millis) -> StringPluckEvent {
        StringPluckEvent { string, at_ms }
    }

    #[test]
    fn test_wrong_string_is_consumed_without_advancing() {
        let tuning = TuningName::Standard.tuning();
        let mut mission = MissionState::default();
        assert!(mission.begin());
        mission.record_pluck(pluck(Note::A2, 100));
        assert_eq!(mission.poll(100, tuning), None);
        assert_eq!(
            mission.phase(),
            MissionPhase::Tutorial {
                step: TutorialStep::Tune
            }
        );
        // Nothing left to re-evaluate on the next tick.
        assert_eq!(mission.poll(116, tuning), None);
    }

    #[test]
    fn test_stale_pluck_ignored() {
        let tuning = TuningName::Standard.tuning();
        let mut mission = MissionState::default();
        mission.begin();
        mission.record_pluck(pluck(Note::E2, 0));
        assert_eq!(mission.poll(1001, tuning), None);
        mission.record_pluck(pluck(Note::E2, 1500));
        assert_eq!(
            mission.poll(2500, tuning),
            Some(MissionTransition::TutorialAdvanced(TutorialStep::FireLow))
        );
    }

    #[test]
    fn test_one_pluck_advances_one_step() {
        let tuning = TuningName::Standard.tuning();
        let mut mission = MissionState::default();
        mission.begin();
        mission.record_pluck(pluck(Note::E2, 10));
        assert!(mission.poll(10, tuning).is_some());
        // FireLow also wants E2, but the pluck was already consumed.
        assert_eq!(mission.poll(26, tuning), None);
    }

    #[test]
    fn test_plucks_dropped_outside_waiting_phases() {
        let tuning = TuningName::Standard.tuning();
        let mut mission = MissionState::default();
        mission.record_pluck(pluck(Note::E2, 0));
        assert!(mission.begin());
        assert_eq!(mission.poll(0, tuning), None);

        mission.start();
        mission.mission_over(5000);
        mission.record_pluck(pluck(Note::E2, 5100));
        assert_eq!(mission.poll(7000, tuning), Some(MissionTransition::RestartArmed));
        assert_eq!(mission.poll(7016, tuning), None);
    }

    #[test]
    fn test_pluck_on_arming_tick_restarts() {
        let tuning = TuningName::Standard.tuning();
        let mut mission = MissionState::default();
        mission.start();
        mission.mission_over(5000);

        mission.record_pluck(pluck(Note::E2, 7000));
        assert_eq!(mission.poll(7000, tuning), Some(MissionTransition::RestartArmed));
        assert_eq!(mission.poll(7016, tuning), Some(MissionTransition::Restart));
    }

    #[test]
    fn test_begin_only_from_idle() {
        let mut mission = MissionState::default();
        mission.start();
        assert!(!mission.begin());
        assert_eq!(mission.phase(), MissionPhase::Active);
        assert!(!mission.can_skip());
        mission.stop();
        mission.stop();
        assert_eq!(mission.phase(), MissionPhase::Idle);
        assert!(!mission.can_skip());
    }
}
