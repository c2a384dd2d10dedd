use serde::{Deserialize, Serialize};

/// Which side of a side-by-side comparison deals more damage at one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Left,
    Right,
    Tie,
}

impl Emphasis {
    pub fn of(left: f64, right: f64) -> Self {
        if left > right {
            Emphasis::Left
        } else if right > left {
            Emphasis::Right
        } else {
            Emphasis::Tie
        }
    }

    pub fn is_left_emphasized(self) -> bool {
        self == Emphasis::Left
    }

    pub fn is_right_emphasized(self) -> bool {
        self == Emphasis::Right
    }
}

/// Position-by-position comparison of two expected-damage rows. Rows of
/// different length are compared over the shorter one.
pub fn compare_expected_damage(left: &[f64], right: &[f64]) -> Vec<Emphasis> {
    left.iter()
        .zip(right)
        .map(|(&l, &r)| Emphasis::of(l, r))
        .collect()
}
