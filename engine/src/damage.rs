use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiceParseError;
use crate::RollMode;

/// Damage dealt by one hit: `dice_count` dice of `dice_sides` faces plus a
/// flat bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageProfile {
    #[serde(rename = "count")]
    pub dice_count: u32,
    #[serde(rename = "sides")]
    pub dice_sides: u32,
    #[serde(rename = "bonus", default)]
    pub flat_bonus: i32,
}

impl DamageProfile {
    pub fn new(dice_count: u32, dice_sides: u32, flat_bonus: i32) -> Self {
        Self {
            dice_count,
            dice_sides,
            flat_bonus,
        }
    }

    /// Average of the dice alone. An n-sided die averages n/2 + 0.5.
    pub fn dice_average(&self) -> f64 {
        self.dice_count as f64 * (self.dice_sides as f64 / 2.0 + 0.5)
    }

    /// Expected damage of a hit that is not a critical.
    pub fn regular_damage(&self) -> f64 {
        self.dice_average() + self.flat_bonus as f64
    }

    /// Expected damage of a critical: dice are doubled, the bonus is not.
    pub fn crit_damage(&self) -> f64 {
        (self.regular_damage() - self.flat_bonus as f64) * 2.0 + self.flat_bonus as f64
    }
}

impl fmt::Display for DamageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.dice_count, self.dice_sides)?;
        match self.flat_bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{}", b),
            b => write!(f, "{}", b),
        }
    }
}

impl FromStr for DamageProfile {
    type Err = DiceParseError;

    /// Parses `XdY`, `XdY+Z` or `XdY-Z`. Whitespace and case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let (count, rest) = lowered
            .split_once('d')
            .ok_or_else(|| DiceParseError::Malformed(s.to_string()))?;

        let (sides, bonus) = match rest.find(['+', '-']) {
            Some(idx) => {
                let (sides, bonus) = rest.split_at(idx);
                let bad_bonus = || DiceParseError::BadBonus(bonus.to_string());
                let bonus: i32 = match bonus.strip_prefix('+') {
                    // "+" followed by another sign, as in "2d6++3" or "2d6+-3"
                    Some(digits) if digits.starts_with(['+', '-']) => return Err(bad_bonus()),
                    Some(digits) => digits.parse().map_err(|_| bad_bonus())?,
                    None => bonus.parse().map_err(|_| bad_bonus())?,
                };
                (sides, bonus)
            }
            None => (rest, 0),
        };

        let count: u32 = if count.is_empty() {
            // "d8" reads as a single die
            1
        } else {
            count
                .parse()
                .map_err(|_| DiceParseError::BadCount(count.to_string()))?
        };
        let sides: u32 = sides
            .parse()
            .map_err(|_| DiceParseError::BadSides(sides.to_string()))?;
        if sides == 0 {
            return Err(DiceParseError::ZeroSides);
        }
        Ok(DamageProfile::new(count, sides, bonus))
    }
}

/// Expected damage per attack at hit chance `hit_chance` (a percentage).
///
/// The crit share of the hit chance deals crit damage, the rest deals
/// regular damage. Hit chances below the crit threshold use the same blend.
pub fn expected_damage_for(damage: DamageProfile, mode: RollMode, hit_chance: f64) -> f64 {
    if hit_chance <= 0.0 || hit_chance.is_nan() {
        return 0.0;
    }
    let threshold = mode.crit_threshold();
    let crit_part = damage.crit_damage() * (threshold / 100.0);
    if hit_chance == threshold {
        return crit_part;
    }
    damage.regular_damage() * ((hit_chance - threshold) / 100.0) + crit_part
}

/// Expected damage for each hit chance, in input order.
pub fn compute_expected_damage(
    damage: DamageProfile,
    mode: RollMode,
    hit_chances: &[f64],
) -> Vec<f64> {
    let threshold = mode.crit_threshold();
    hit_chances
        .iter()
        .map(|&h| {
            if h > 0.0 && h < threshold {
                tracing::warn!(
                    hit_chance = h,
                    threshold,
                    %mode,
                    "hit chance below crit threshold; blending as usual"
                );
            }
            expected_damage_for(damage, mode, h)
        })
        .collect()
}
