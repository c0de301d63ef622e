//! Input validation errors and engine invariant failures.

use thiserror::Error;

/// Bad combatant or move data. Raised before any round is played.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("combatant name must not be empty")]
    EmptyName,

    #[error("{combatant}: stat {stat} must be greater than zero")]
    ZeroStat {
        combatant: String,
        stat: &'static str,
    },

    #[error("{combatant}: unknown type '{name}'")]
    UnknownType { combatant: String, name: String },

    #[error("{combatant}: expected one or two types, got {count}")]
    TypeCount { combatant: String, count: usize },

    #[error("{combatant}: type '{name}' listed twice")]
    DuplicateType { combatant: String, name: String },

    #[error("{combatant}: at most {max} moves allowed, got {count}")]
    TooManyMoves {
        combatant: String,
        max: usize,
        count: usize,
    },

    #[error("{combatant}: move name must not be empty")]
    EmptyMoveName { combatant: String },

    #[error("{combatant}: move '{mv}' status chance {chance} is outside 0..=100")]
    ChanceOutOfRange {
        combatant: String,
        mv: String,
        chance: u32,
    },

    #[error("round cap must be greater than zero")]
    ZeroRoundCap,
}

/// Errors surfaced by the battle entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("invalid battle input: {0}")]
    Validation(#[from] ValidationError),

    /// The engine broke one of its own invariants. This is a bug, not bad input.
    #[error("engine invariant violated: {0}")]
    Invariant(String),
}

impl BattleError {
    pub fn is_validation(&self) -> bool {
        matches!(self, BattleError::Validation(_))
    }
}
