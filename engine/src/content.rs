use indexmap::IndexMap;

/// Armor Classes shown when the caller supplies none: the header row of
/// the results table, AC 10 through 20.
pub const DEFAULT_DEFENSES: [i32; 11] = [10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20];

pub fn builtin_builds() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        (
            "longsword",
            include_str!("../content/builds/longsword.json"),
        ),
        (
            "greatsword",
            include_str!("../content/builds/greatsword.json"),
        ),
        (
            "great_weapon_master",
            include_str!("../content/builds/great_weapon_master.json"),
        ),
        ("longbow", include_str!("../content/builds/longbow.json")),
        (
            "sharpshooter",
            include_str!("../content/builds/sharpshooter.json"),
        ),
        (
            "sneak_attack",
            include_str!("../content/builds/sneak_attack.json"),
        ),
    ])
}
