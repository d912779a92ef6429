//! Dice tokens: classification, rolling and modifiers.

mod ops;
mod pool;
mod spec;
mod wod;

use crate::markdown;
use crate::roll::{RollContext, RollError, Roller};
use tracing::trace;

pub use ops::{Advantage, Disadvantage, Explode, Flat, Keep, Lose, Modifier, Plain, PoolOperate};
pub use pool::{Die, Pool};
pub use spec::{DiceToken, DieSpec, ParseDiceError, Threshold, WodSpec};

/// A token after evaluation: the arithmetic it contributes and how to show it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Resolved {
    pub expression: String,
    pub pretty: String,
}

impl Resolved {
    /// All dice summed, shown as they are.
    pub fn sum(dice: &[Die]) -> Self {
        let expression = markdown::group(dice, "+");
        Self {
            pretty: expression.clone(),
            expression,
        }
    }

    pub fn literal(token: &str) -> Self {
        Self {
            expression: token.to_string(),
            pretty: token.to_string(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Part {
    Dice(DiceToken),
    /// A number or operator passed through to the arithmetic.
    Math,
}

const MATH_CHARS: &[char] = &['+', '-', '*', '/', '(', ')'];

pub fn classify(token: &str) -> Result<Part, RollError> {
    match token.parse::<DiceToken>() {
        Ok(dice) => Ok(Part::Dice(dice)),
        Err(ParseDiceError::NotDice) => {
            if token.contains(|c: char| c.is_ascii_digit() || MATH_CHARS.contains(&c)) {
                Ok(Part::Math)
            } else {
                Err(RollError::Unrecognized(token.to_string()))
            }
        }
        Err(ParseDiceError::Zero) => Err(RollError::WeirdRoll),
        Err(ParseDiceError::TooLarge) => Err(RollError::UpperLimits),
        Err(ParseDiceError::InvalidModifier) => Err(RollError::UnsupportedModifier(token.to_string())),
    }
}

/// Evaluates one token of a roll.
pub fn resolve<R: Roller>(token: &str, ctx: &mut RollContext<R>) -> Result<Resolved, RollError> {
    let part = classify(token)?;
    trace!(token, ?part, "classified");
    match part {
        Part::Math => Ok(Resolved::literal(token)),
        Part::Dice(DiceToken::Standard(spec)) => {
            spec.check(ctx.limits())?;
            let pool = Pool::roll(spec.count, spec.sides, ctx);
            spec.modifier.operate(pool, ctx)
        }
        Part::Dice(DiceToken::Wod(spec)) => {
            spec.check(ctx.limits())?;
            wod::evaluate(&spec, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::SequenceRoller;

    fn check(token: &str, draws: Vec<u32>, expression: &str, pretty: &str) {
        let mut ctx = RollContext::new(SequenceRoller::new(draws));
        let resolved = resolve(token, &mut ctx).unwrap();
        assert_eq!(resolved.expression, expression);
        assert_eq!(resolved.pretty, pretty);
    }

    fn check_err(token: &str, expected: RollError) {
        let mut ctx = RollContext::new(SequenceRoller::max());
        assert_eq!(resolve(token, &mut ctx), Err(expected));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("+"), Ok(Part::Math));
        assert_eq!(classify("12"), Ok(Part::Math));
        assert_eq!(classify("("), Ok(Part::Math));
        assert!(matches!(classify("2d6"), Ok(Part::Dice(DiceToken::Standard(_)))));
        assert!(matches!(classify("5w"), Ok(Part::Dice(DiceToken::Wod(_)))));
        assert_eq!(
            classify("fireball"),
            Err(RollError::Unrecognized("fireball".into()))
        );
        assert_eq!(
            classify("2d20ak1"),
            Err(RollError::UnsupportedModifier("2d20ak1".into()))
        );
    }

    #[test]
    fn test_resolve() {
        check("3d6", vec![2, 5, 1], "(2+5+1)", "(2+5+1)");
        check("d20", vec![20], "__**20**__", "__**20**__");
        check("4d6k3", vec![3, 6, 1, 4], "(6+4+3)", "(6+4+3+~~1~~)");
        check("5w", vec![5, 4, 1, 8, 10], "2", "(**5**, 4, ~~1~~, **8**, **10**)");
        check("4", vec![1], "4", "4");
    }

    #[test]
    fn test_resolve_errors() {
        check_err("0d6", RollError::WeirdRoll);
        check_err("101d6", RollError::UpperLimits);
        check_err("1d1001", RollError::UpperLimits);
        check_err("2d6k3", RollError::KeepExceedsCount { keep: 3, count: 2 });
        check_err("1d6e7", RollError::ExplodeAboveSides);
    }
}
