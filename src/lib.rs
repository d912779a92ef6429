//! A dice expression engine for tabletop chat.
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use rod_dice::RollContext;
//!
//! let mut ctx = RollContext::new(StdRng::seed_from_u64(1));
//! let roll = ctx.parse("4d6k3 + 2 # strength");
//! assert!(roll.is_success());
//! assert_eq!(roll.title(), Some("strength"));
//! ```

pub mod common;
pub mod dice;
pub mod expand;
pub mod inline;
mod markdown;
pub mod math;
pub mod roll;

pub use expand::{Macro, MacroBook, MacroError};
pub use inline::InlineRolls;
pub use math::{MathError, Number};
pub use roll::{FnRoller, Limits, Roll, RollContext, RollError, RollKind, Roller, Separator};

/// Parses `input` with a default context: thread-local randomness, `/` as the escape
/// and no macros.
pub fn roll(input: &str) -> Roll {
    RollContext::default().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll() {
        for _ in 0..100 {
            let r = roll("3d6");
            match r.result() {
                Some(Ok(Number::Int(n))) => assert!((3..=18).contains(n)),
                other => panic!("unexpected result {:?}", other),
            }
        }
    }
}
