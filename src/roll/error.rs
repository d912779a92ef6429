use crate::common::UInt;
use crate::expand::MacroError;
use thiserror::Error;

/// A non-fatal problem found while building a [`Roll`](super::Roll).
///
/// The `Display` text of each variant is what the user sees.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RollError {
    #[error("Too many iterations: used {used} instead.")]
    TooManyIterations { used: usize },
    #[error("Macro `{name}` could not be applied: {source}")]
    Macro {
        name: String,
        #[source]
        source: MacroError,
    },
    #[error("Unrecognized roll expression: {0}")]
    Unrecognized(String),
    #[error("Unsupported dice modifier: {0}")]
    UnsupportedModifier(String),
    #[error("Weird roll.")]
    WeirdRoll,
    #[error("Congrats, you found my upper limits!")]
    UpperLimits,
    #[error("Keep value is more than die count ({keep} > {count})")]
    KeepExceedsCount { keep: UInt, count: UInt },
    #[error("Keep lower value is more than die count ({lose} > {count})")]
    LoseExceedsCount { lose: UInt, count: UInt },
    #[error("Your explode cannot be greater than the die value.")]
    ExplodeAboveSides,
    #[error("exploding on a d1 creates a black hole, and your character dies.")]
    ExplodeOnD1,
    #[error("Too many explosions: stopped after {limit}.")]
    ExplosionLimit { limit: usize },
    #[error("Empty roll expression.")]
    Empty,
    #[error("Roll expression is nested too deeply.")]
    TooDeep,
    #[error("Too many rolls: stopped after {limit}.")]
    TooManyRolls { limit: usize },
}
