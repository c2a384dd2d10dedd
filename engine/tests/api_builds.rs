use std::io::Write;

use engine::api::{
    builtin_build, calculate_build, calculate_request, compare_builds, load_build, BuildConfig,
    CalculateRequest, DiceSpec,
};
use engine::content::{builtin_builds, DEFAULT_DEFENSES};
use engine::table::{render_comparison, render_report};
use engine::{DamageProfile, Emphasis, RollMode};

fn greatsword() -> BuildConfig {
    BuildConfig::new("Greatsword", 5, DamageProfile::new(2, 6, 3))
}

#[test]
fn every_builtin_build_loads() {
    for id in builtin_builds().keys() {
        let cfg = builtin_build(id).unwrap_or_else(|e| panic!("{}: {:#}", id, e));
        assert!(!cfg.name.is_empty(), "{} has no name", id);
    }
    assert!(builtin_build("vorpal_spoon").is_err());
}

#[test]
fn sneak_attack_preset_rolls_with_advantage() {
    let cfg = builtin_build("sneak_attack").unwrap();
    assert_eq!(cfg.roll_mode(), RollMode::Advantage);
    assert_eq!(cfg.damage_profile().unwrap(), DamageProfile::new(4, 6, 3));
}

#[test]
fn report_chains_hit_chance_into_damage() {
    let report = calculate_build(&greatsword(), &[10, 15, 20]).unwrap();
    assert_eq!(report.hit_chances, vec![80.0, 55.0, 30.0]);
    assert_eq!(report.expected_damage.len(), 3);
    assert!((report.expected_damage[0] - 8.35).abs() < 1e-9);
    assert_eq!(report.dice, "2d6+3");
    assert_eq!(report.roll_mode, RollMode::Normal);
}

#[test]
fn zero_sided_dice_are_rejected() {
    let cfg = BuildConfig::new("Broken", 5, DamageProfile::new(1, 0, 0));
    assert!(cfg.validate().is_err());
    assert!(calculate_build(&cfg, &[10]).is_err());

    let bad_notation = BuildConfig {
        dice: DiceSpec::Notation("2x6".into()),
        ..greatsword()
    };
    let err = calculate_build(&bad_notation, &[10]).unwrap_err();
    assert!(format!("{:#}", err).contains("Greatsword"));
}

#[test]
fn comparison_marks_the_stronger_build() {
    let gwm = builtin_build("great_weapon_master").unwrap();
    let cmp = compare_builds(&gwm, &greatsword(), &[10, 15, 20]).unwrap();
    assert_eq!(
        cmp.emphasis,
        vec![Emphasis::Left, Emphasis::Left, Emphasis::Right]
    );
}

#[test]
fn identical_builds_tie_everywhere() {
    let cmp = compare_builds(&greatsword(), &greatsword(), &DEFAULT_DEFENSES).unwrap();
    assert!(cmp.emphasis.iter().all(|e| *e == Emphasis::Tie));
}

#[test]
fn request_without_defenses_uses_default_row() {
    let req: CalculateRequest =
        serde_json::from_str(r#"{ "name": "Dagger", "to_hit": 4, "dice": "1d4+2" }"#).unwrap();
    let report = calculate_request(&req).unwrap();
    assert_eq!(report.defenses, DEFAULT_DEFENSES.to_vec());
    assert_eq!(report.hit_chances.len(), DEFAULT_DEFENSES.len());
}

#[test]
fn loads_json_and_yaml_build_files() {
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("maul.json");
    let mut f = std::fs::File::create(&json_path).unwrap();
    writeln!(
        f,
        r#"{{ "name": "Maul", "to_hit": 6, "dice": {{ "count": 2, "sides": 6, "bonus": 4 }}, "disadvantage": true }}"#
    )
    .unwrap();
    let maul = load_build(&json_path).unwrap();
    assert_eq!(maul.roll_mode(), RollMode::Disadvantage);
    assert_eq!(maul.damage_profile().unwrap(), DamageProfile::new(2, 6, 4));

    let yaml_path = dir.path().join("bow.yml");
    std::fs::write(
        &yaml_path,
        "name: Shortbow\nto_hit: 5\ndice: 1d6+3\nadvantage: true\ndisadvantage: true\n",
    )
    .unwrap();
    let bow = load_build(&yaml_path).unwrap();
    assert_eq!(bow.roll_mode(), RollMode::Normal);
    assert_eq!(bow.damage_profile().unwrap(), DamageProfile::new(1, 6, 3));

    assert!(load_build(&dir.path().join("missing.json")).is_err());
}

#[test]
fn report_table_layout() {
    let report = calculate_build(&greatsword(), &[10, 15, 20]).unwrap();
    insta::assert_snapshot!(render_report(&report), @r"
    Greatsword (+5 to hit, 2d6+3, normal)
    AC                 10        15        20
    Hit chance     80.00%    55.00%    30.00%
    Avg damage       8.35      5.85      3.35
    ");
}

#[test]
fn comparison_table_layout() {
    let gwm = builtin_build("great_weapon_master").unwrap();
    let cmp = compare_builds(&gwm, &greatsword(), &[10, 15, 20]).unwrap();
    insta::assert_snapshot!(render_comparison(&cmp), @r"
    L: Greatsword (GWM) (+0 to hit, 2d6+13, normal)
    R: Greatsword (+5 to hit, 2d6+3, normal)
    AC                 10        15        20
    L hit          55.00%    30.00%     5.00%
    L damage        11.35*     6.35*     1.35
    R hit          80.00%    55.00%    30.00%
    R damage         8.35      5.85      3.35*
    ");
}

#[test]
fn explicit_empty_defenses_stay_empty() {
    let req: CalculateRequest =
        serde_json::from_str(r#"{ "to_hit": 5, "dice": "2d6+3", "defenses": [] }"#).unwrap();
    let report = calculate_request(&req).unwrap();
    assert!(report.defenses.is_empty());
    assert!(report.hit_chances.is_empty());
    assert!(report.expected_damage.is_empty());
}

#[test]
fn loads_build_file_with_byte_order_mark() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bom.json");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{ "name": "Handaxe", "to_hit": 5, "dice": "1d6+3" }"#);
    std::fs::write(&path, bytes).unwrap();

    let cfg = load_build(&path).unwrap();
    assert_eq!(cfg.name, "Handaxe");
    assert_eq!(cfg.damage_profile().unwrap(), DamageProfile::new(1, 6, 3));
}

#[test]
fn situation_folds_into_build_mode() {
    let hidden = builtin_build("sneak_attack").unwrap();
    assert_eq!(
        hidden.clone().with_situation(RollMode::Disadvantage).roll_mode(),
        RollMode::Normal
    );
    assert_eq!(
        hidden.with_situation(RollMode::Advantage).roll_mode(),
        RollMode::Advantage
    );
    assert_eq!(
        greatsword().with_situation(RollMode::Disadvantage).roll_mode(),
        RollMode::Disadvantage
    );
    assert_eq!(
        greatsword().with_situation(RollMode::Normal),
        greatsword()
    );
}
