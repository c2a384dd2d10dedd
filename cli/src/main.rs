use clap::{Args, Parser, Subcommand};
use engine::api::{
    builtin_build, calculate_build, compare_builds, defenses_or_default, load_build,
    BuildConfig,
};
use engine::content::builtin_builds;
use engine::table::{format_damage, format_percent, render_comparison, render_report};
use engine::{compute_expected_damage, compute_hit_chances, AttackProfile, DamageProfile, RollMode};
use std::path::Path;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Args, Clone, Copy)]
struct Vantage {
    /// Roll two d20s and keep the higher
    #[arg(long)]
    advantage: bool,
    /// Roll two d20s and keep the lower (cancels --advantage)
    #[arg(long)]
    disadvantage: bool,
}

impl Vantage {
    fn mode(self) -> RollMode {
        RollMode::from_flags(self.advantage, self.disadvantage)
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Chance to hit each Armor Class
    Hit {
        /// Attack bonus added to the d20
        #[arg(long, allow_negative_numbers = true)]
        to_hit: i32,
        #[command(flatten)]
        vantage: Vantage,
        /// Target Armor Classes (comma separated); defaults to AC 10-20
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        ac: Option<Vec<i32>>,
    },
    /// Expected damage per attack for given hit chances
    Damage {
        /// Damage dice, e.g. 2d6+3
        #[arg(long)]
        dice: DamageProfile,
        #[command(flatten)]
        vantage: Vantage,
        /// Hit chances in percent (comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        hit_chance: Vec<f64>,
    },
    /// Full results table for one attack
    Table {
        /// Attack bonus added to the d20
        #[arg(long, allow_negative_numbers = true)]
        to_hit: i32,
        /// Damage dice, e.g. 2d6+3
        #[arg(long)]
        dice: DamageProfile,
        #[command(flatten)]
        vantage: Vantage,
        /// Label shown above the table
        #[arg(long, default_value = "Attack")]
        name: String,
        /// Target Armor Classes (comma separated); defaults to AC 10-20
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        ac: Option<Vec<i32>>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compare two builds side by side
    Compare {
        /// Build file (.json/.yaml) or builtin preset id
        #[arg(long)]
        left: String,
        /// Build file (.json/.yaml) or builtin preset id
        #[arg(long)]
        right: String,
        /// Situational advantage/disadvantage applied on top of both builds
        #[command(flatten)]
        situation: Vantage,
        /// Target Armor Classes (comma separated); defaults to AC 10-20
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        ac: Option<Vec<i32>>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List builtin build presets
    Presets {
        /// Print the JSON of one preset
        #[arg(long)]
        dump: Option<String>,
    },
}

#[derive(Parser)]
#[command(name = "dmgcalc")]
#[command(about = "Expected damage per attack against a range of Armor Classes")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

/// `RUST_LOG` decides unless `-v` is given; with neither, only warnings.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        _ => EnvFilter::from_default_env().add_directive(Level::DEBUG.into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// An existing path is read as a build file; anything else is looked up
/// among the builtin presets.
fn resolve_build(spec: &str) -> anyhow::Result<BuildConfig> {
    let path = Path::new(spec);
    if path.is_file() {
        debug!(path = %path.display(), "loading build file");
        load_build(path)
    } else {
        builtin_build(spec)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Hit { to_hit, vantage, ac } => {
            let defenses = defenses_or_default(ac.as_deref());
            let hits = compute_hit_chances(AttackProfile::new(to_hit, vantage.mode()), defenses);
            for (d, h) in defenses.iter().zip(&hits) {
                println!("AC {:>3}: {}", d, format_percent(*h));
            }
        }
        Cmd::Damage {
            dice,
            vantage,
            hit_chance,
        } => {
            let dmg = compute_expected_damage(dice, vantage.mode(), &hit_chance);
            for (h, d) in hit_chance.iter().zip(&dmg) {
                println!("{:>7} -> {}", format_percent(*h), format_damage(*d));
            }
        }
        Cmd::Table {
            to_hit,
            dice,
            vantage,
            name,
            ac,
            json,
        } => {
            let cfg = BuildConfig::new(name, to_hit, dice)
                .with_flags(vantage.advantage, vantage.disadvantage);
            let report = calculate_build(&cfg, defenses_or_default(ac.as_deref()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        Cmd::Compare {
            left,
            right,
            situation,
            ac,
            json,
        } => {
            let left = resolve_build(&left)?.with_situation(situation.mode());
            let right = resolve_build(&right)?.with_situation(situation.mode());
            let cmp = compare_builds(&left, &right, defenses_or_default(ac.as_deref()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cmp)?);
            } else {
                print!("{}", render_comparison(&cmp));
            }
        }
        Cmd::Presets { dump } => match dump {
            Some(id) => {
                let cfg = builtin_build(&id)?;
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            }
            None => {
                for id in builtin_builds().keys() {
                    let cfg = builtin_build(id)?;
                    println!(
                        "{:<20} {} ({:+} to hit, {}, {})",
                        id,
                        cfg.name,
                        cfg.to_hit,
                        cfg.damage_profile()?,
                        cfg.roll_mode()
                    );
                }
            }
        },
    }
    Ok(())
}
