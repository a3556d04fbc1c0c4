//! Score, lives, level and the shield stack.
//!
//! Stored on `SimulationEngine`, NOT as ECS entities.

use fretstorm_core::components::Shield;
use fretstorm_core::constants::*;

/// Running score state tracked by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub running: bool,
    pub meteors_destroyed: u32,
    pub lasers_fired: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            running: false,
            meteors_destroyed: 0,
            lasers_fired: 0,
        }
    }
}

impl ScoreState {
    /// Fresh state for a new mission.
    pub fn new_mission() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Advance one level if the score threshold for the current level is met.
    pub fn check_level_up(&mut self) -> Option<u32> {
        if self.score >= self.level as u64 * LEVEL_SCORE_STEP {
            self.level += 1;
            Some(self.level)
        } else {
            None
        }
    }
}

/// Points for destroying a meteor: smaller meteors pay a bonus.
pub fn points_for_hit(level: u32, size: f64) -> u64 {
    let size_bonus = (SCORE_REFERENCE_SIZE / size).max(1.0);
    (SCORE_BASE * level as f64 * size_bonus).floor() as u64
}

/// Ordered shield tiers. The lowest active tier absorbs first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldStack {
    shields: Vec<Shield>,
}

impl Default for ShieldStack {
    fn default() -> Self {
        Self::full(MAX_SHIELDS)
    }
}

impl ShieldStack {
    /// `count` active tiers numbered from 1.
    pub fn full(count: u8) -> Self {
        Self {
            shields: (1..=count).map(|tier| Shield { tier, active: true }).collect(),
        }
    }

    /// Deactivate the lowest active tier. Returns that tier, or `None` if all are down.
    pub fn absorb(&mut self) -> Option<u8> {
        let shield = self.shields.iter_mut().find(|s| s.active)?;
        shield.active = false;
        Some(shield.tier)
    }

    pub fn any_active(&self) -> bool {
        self.shields.iter().any(|s| s.active)
    }

    pub fn active_count(&self) -> usize {
        self.shields.iter().filter(|s| s.active).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shield> {
        self.shields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_for_hit_size_bonus() {
        assert_eq!(points_for_hit(1, 45.0), 111);
        assert_eq!(points_for_hit(1, 50.0), 100);
        assert_eq!(points_for_hit(1, 80.0), 100);
        assert_eq!(points_for_hit(2, 25.0), 400);
        assert_eq!(points_for_hit(3, 22.0), 681);
    }

    #[test]
    fn test_level_up_threshold() {
        let mut score = ScoreState::new_mission();
        score.score = 999;
        assert_eq!(score.check_level_up(), None);
        score.score = 1000;
        assert_eq!(score.check_level_up(), Some(2));
        assert_eq!(score.check_level_up(), None);
        score.score = 2000;
        assert_eq!(score.check_level_up(), Some(3));
    }

    #[test]
    fn test_shields_absorb_in_tier_order() {
        let mut shields = ShieldStack::default();
        assert_eq!(shields.active_count(), 3);
        assert_eq!(shields.absorb(), Some(1));
        assert_eq!(shields.absorb(), Some(2));
        assert!(shields.any_active());
        assert_eq!(shields.absorb(), Some(3));
        assert!(!shields.any_active());
        assert_eq!(shields.absorb(), None);
    }
}
