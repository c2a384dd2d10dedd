use std::{fs, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{builtin_builds, DEFAULT_DEFENSES};
use crate::error::BuildError;
use crate::{
    compare_expected_damage, compute_expected_damage, compute_hit_chances, AttackProfile,
    DamageProfile, Emphasis, RollMode,
};

/// Damage dice as written in a build file: either notation (`"2d6+3"`) or
/// the expanded `{ count, sides, bonus }` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiceSpec {
    Notation(String),
    Profile(DamageProfile),
}

impl From<DamageProfile> for DiceSpec {
    fn from(profile: DamageProfile) -> Self {
        DiceSpec::Profile(profile)
    }
}

/// One attack build, as entered on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildConfig {
    #[serde(default)]
    pub name: String,
    pub to_hit: i32,
    pub dice: DiceSpec,
    #[serde(default)]
    pub advantage: bool,
    #[serde(default)]
    pub disadvantage: bool,
}

impl BuildConfig {
    pub fn new(name: impl Into<String>, to_hit: i32, dice: DamageProfile) -> Self {
        Self {
            name: name.into(),
            to_hit,
            dice: dice.into(),
            advantage: false,
            disadvantage: false,
        }
    }

    pub fn with_flags(mut self, advantage: bool, disadvantage: bool) -> Self {
        self.advantage = advantage;
        self.disadvantage = disadvantage;
        self
    }

    /// Fold a situational roll mode (cover, a hidden attacker, a prone
    /// target) into the build's own flags. Opposite modes cancel.
    pub fn with_situation(self, situation: RollMode) -> Self {
        match self.roll_mode().combine(situation) {
            RollMode::Normal => self.with_flags(false, false),
            RollMode::Advantage => self.with_flags(true, false),
            RollMode::Disadvantage => self.with_flags(false, true),
        }
    }

    pub fn roll_mode(&self) -> RollMode {
        RollMode::from_flags(self.advantage, self.disadvantage)
    }

    pub fn attack_profile(&self) -> AttackProfile {
        AttackProfile::new(self.to_hit, self.roll_mode())
    }

    /// Resolve and check the damage dice. The calculators accept any
    /// numbers; a die with no sides is rejected here instead.
    pub fn damage_profile(&self) -> Result<DamageProfile, BuildError> {
        let profile = match &self.dice {
            DiceSpec::Notation(s) => s.parse().map_err(|source| BuildError::Dice {
                name: self.display_name().to_string(),
                source,
            })?,
            DiceSpec::Profile(p) => *p,
        };
        if profile.dice_sides == 0 {
            return Err(BuildError::ZeroSides {
                name: self.display_name().to_string(),
            });
        }
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        self.damage_profile().map(|_| ())
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "unnamed"
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildReport {
    pub name: String,
    pub to_hit: i32,
    pub dice: String,
    pub roll_mode: RollMode,
    pub defenses: Vec<i32>,
    pub hit_chances: Vec<f64>,
    pub expected_damage: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Comparison {
    pub left: BuildReport,
    pub right: BuildReport,
    pub emphasis: Vec<Emphasis>,
}

/// Single-build request as accepted over the JSON bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub build: BuildConfig,
    #[serde(default)]
    pub defenses: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompareRequest {
    pub left: BuildConfig,
    pub right: BuildConfig,
    #[serde(default)]
    pub defenses: Option<Vec<i32>>,
}

/// Hit chances, then expected damage from those hit chances, for every
/// defense in order.
pub fn calculate_build(cfg: &BuildConfig, defenses: &[i32]) -> Result<BuildReport> {
    let damage = cfg.damage_profile()?;
    let attack = cfg.attack_profile();
    debug!(
        build = cfg.display_name(),
        to_hit = attack.to_hit_bonus,
        mode = %attack.roll_mode,
        dice = %damage,
        targets = defenses.len(),
        "calculating build"
    );

    let hit_chances = compute_hit_chances(attack, defenses);
    let expected_damage = compute_expected_damage(damage, attack.roll_mode, &hit_chances);

    Ok(BuildReport {
        name: cfg.display_name().to_string(),
        to_hit: cfg.to_hit,
        dice: damage.to_string(),
        roll_mode: attack.roll_mode,
        defenses: defenses.to_vec(),
        hit_chances,
        expected_damage,
    })
}

pub fn compare_builds(
    left: &BuildConfig,
    right: &BuildConfig,
    defenses: &[i32],
) -> Result<Comparison> {
    let left = calculate_build(left, defenses).context("left build")?;
    let right = calculate_build(right, defenses).context("right build")?;
    let emphasis = compare_expected_damage(&left.expected_damage, &right.expected_damage);
    debug!(
        left = %left.name,
        right = %right.name,
        left_wins = emphasis.iter().filter(|e| e.is_left_emphasized()).count(),
        right_wins = emphasis.iter().filter(|e| e.is_right_emphasized()).count(),
        "compared builds"
    );
    Ok(Comparison {
        left,
        right,
        emphasis,
    })
}

pub fn calculate_request(req: &CalculateRequest) -> Result<BuildReport> {
    calculate_build(&req.build, defenses_or_default(req.defenses.as_deref()))
}

pub fn compare_request(req: &CompareRequest) -> Result<Comparison> {
    compare_builds(
        &req.left,
        &req.right,
        defenses_or_default(req.defenses.as_deref()),
    )
}

/// Only a missing list falls back to the default row; an empty list stays
/// empty.
pub fn defenses_or_default(defenses: Option<&[i32]>) -> &[i32] {
    defenses.unwrap_or(&DEFAULT_DEFENSES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFormat {
    Json,
    Yaml,
}

impl BuildFormat {
    /// `.yaml` / `.yml` read as YAML, anything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => BuildFormat::Yaml,
            _ => BuildFormat::Json,
        }
    }
}

pub fn parse_build(text: &str, format: BuildFormat) -> Result<BuildConfig> {
    let cfg: BuildConfig = match format {
        BuildFormat::Json => serde_json::from_str(text).context("failed to parse build JSON")?,
        BuildFormat::Yaml => serde_yaml::from_str(text).context("failed to parse build YAML")?,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Read a text file, honoring a UTF-8 or UTF-16 byte order mark.
pub fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read build file: {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes)
            .with_context(|| format!("build file is not UTF-8: {}", path.display()))
    }
}

pub fn load_build(path: &Path) -> Result<BuildConfig> {
    let text = read_text_auto(path)?;
    parse_build(&text, BuildFormat::from_path(path))
        .with_context(|| format!("invalid build file: {}", path.display()))
}

pub fn builtin_build(id: &str) -> Result<BuildConfig> {
    let builds = builtin_builds();
    let text = builds
        .get(id)
        .ok_or_else(|| BuildError::UnknownPreset(id.to_string()))?;
    parse_build(text, BuildFormat::Json).with_context(|| format!("builtin build '{}'", id))
}
