use serde::{Deserialize, Serialize};

use crate::{RollMode, D20_FACES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub to_hit_bonus: i32,
    pub roll_mode: RollMode,
}

impl AttackProfile {
    pub fn new(to_hit_bonus: i32, roll_mode: RollMode) -> Self {
        Self {
            to_hit_bonus,
            roll_mode,
        }
    }
}

/// Number of d20 faces that meet or beat `defense` with `bonus` added,
/// clamped to `0..=19` (a natural 1 always misses).
pub fn hitting_faces(bonus: i32, defense: i32) -> i32 {
    // saturating: defenses and bonuses are unvalidated input
    let raw = D20_FACES
        .saturating_sub(defense.saturating_sub(bonus))
        .saturating_add(1);
    raw.clamp(0, D20_FACES - 1)
}

/// Single-roll hit probability in `[0, 0.95]`.
pub fn single_roll_probability(bonus: i32, defense: i32) -> f64 {
    hitting_faces(bonus, defense) as f64 / D20_FACES as f64
}

/// Chance to hit each defense, as a percentage, in input order.
pub fn compute_hit_chances(attack: AttackProfile, defenses: &[i32]) -> Vec<f64> {
    defenses
        .iter()
        .map(|&ac| {
            attack
                .roll_mode
                .success_percent(hitting_faces(attack.to_hit_bonus, ac))
        })
        .collect()
}
