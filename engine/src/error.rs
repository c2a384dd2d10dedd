#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceParseError {
    #[error("invalid dice spec (expected XdY, XdY+Z or XdY-Z), got: {0}")]
    Malformed(String),

    #[error("invalid dice count '{0}'")]
    BadCount(String),

    #[error("invalid dice sides '{0}'")]
    BadSides(String),

    #[error("invalid damage bonus '{0}'")]
    BadBonus(String),

    #[error("dice must have at least one side")]
    ZeroSides,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("build '{name}': {source}")]
    Dice {
        name: String,
        #[source]
        source: DiceParseError,
    },

    #[error("build '{name}': dice must have at least one side")]
    ZeroSides { name: String },

    #[error("unknown builtin build '{0}'")]
    UnknownPreset(String),
}
