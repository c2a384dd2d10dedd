use serde::{Deserialize, Serialize};

pub mod api;
pub mod compare;
pub mod content;
pub mod damage;
pub mod error;
pub mod hit;
pub mod table;

pub use compare::{compare_expected_damage, Emphasis};
pub use damage::{compute_expected_damage, expected_damage_for, DamageProfile};
pub use error::{BuildError, DiceParseError};
pub use hit::{compute_hit_chances, hitting_faces, single_roll_probability, AttackProfile};

/// Faces on the attack die.
pub const D20_FACES: i32 = 20;

/// How the attack d20 is rolled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl RollMode {
    /// Derive the effective mode from the two independent form flags.
    /// Advantage and disadvantage together cancel out.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, false) => RollMode::Advantage,
            (false, true) => RollMode::Disadvantage,
            _ => RollMode::Normal,
        }
    }

    pub fn combine(self, other: RollMode) -> RollMode {
        use RollMode::*;
        match (self, other) {
            (Disadvantage, Advantage) | (Advantage, Disadvantage) => Normal,
            (Normal, x) => x,
            (x, Normal) => x,
            (Advantage, Advantage) => Advantage,
            (Disadvantage, Disadvantage) => Disadvantage,
        }
    }

    /// Percentage chance that the kept d20 lands on one of `faces` winning
    /// faces. `faces` is clamped to `0..=19` since a natural 1 always misses.
    ///
    /// Works on whole faces so every result is an exact multiple of 0.25.
    pub fn success_percent(self, faces: i32) -> f64 {
        let k = faces.clamp(0, D20_FACES - 1) as f64;
        match self {
            // p * 100 with p = k / 20
            RollMode::Normal => k * 5.0,
            // (2p - p^2) * 100
            RollMode::Advantage => k * (40.0 - k) / 4.0,
            // p^2 * 100
            RollMode::Disadvantage => k * k / 4.0,
        }
    }

    /// Percentage of attacks that are critical hits: the chance the kept
    /// die shows a natural 20.
    pub fn crit_threshold(self) -> f64 {
        self.success_percent(1)
    }

    pub fn label(self) -> &'static str {
        match self {
            RollMode::Normal => "normal",
            RollMode::Advantage => "advantage",
            RollMode::Disadvantage => "disadvantage",
        }
    }
}

impl std::fmt::Display for RollMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
