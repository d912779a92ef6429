use super::tokenize::{split_multi, split_title, tokenize};
use super::{Leaf, Roll, RollError, Roller};
use crate::common::*;
use crate::dice;
use crate::expand::{Expander, MacroBook};
use crate::math;
use tracing::{debug, warn};

pub type DefaultRoller = rand::rngs::ThreadRng;

pub const DEFAULT_ESCAPE: &str = "/";

/// Caps that keep a single roll bounded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Limits {
    /// Most copies a `[N]` iteration may produce.
    pub max_iterations: usize,
    pub max_dice: UInt,
    pub max_sides: UInt,
    /// Most explosion rounds per standard pool. World of Darkness pools get this many
    /// rounds per die.
    pub max_explosions: usize,
    /// How many times a roll may be split into sub-rolls, counting nested splits.
    pub max_depth: usize,
    /// Most rolls and sub-rolls evaluated for a single input.
    pub max_rolls: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            max_dice: 100,
            max_sides: 1000,
            max_explosions: 50,
            max_depth: 4,
            max_rolls: 200,
        }
    }
}

/// Everything a roll needs from its host: the command escape, the user's macros,
/// limits and a source of randomness.
pub struct RollContext<R = DefaultRoller> {
    escape: String,
    macros: MacroBook,
    limits: Limits,
    roller: R,
    rolls: usize,
}

impl<R: Roller> RollContext<R> {
    pub fn new(roller: R) -> Self {
        Self {
            escape: DEFAULT_ESCAPE.to_string(),
            macros: MacroBook::new(),
            limits: Limits::default(),
            roller,
            rolls: 0,
        }
    }

    pub fn with_escape(mut self, escape: impl Into<String>) -> Self {
        self.escape = escape.into();
        self
    }

    pub fn with_macros(mut self, macros: MacroBook) -> Self {
        self.macros = macros;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn escape(&self) -> &str {
        &self.escape
    }

    pub fn macros(&self) -> &MacroBook {
        &self.macros
    }

    pub fn macros_mut(&mut self) -> &mut MacroBook {
        &mut self.macros
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub(crate) fn roll_face(&mut self, faces: NonZeroUInt) -> UInt {
        self.roller.roll(faces)
    }

    /// Parses and evaluates `input`. Problems are reported inside the returned
    /// [`Roll`], so this never fails.
    pub fn parse(&mut self, input: &str) -> Roll {
        self.macros.set_escape(&self.escape);
        self.rolls = 0;
        self.parse_at(input, 0)
    }

    fn parse_at(&mut self, input: &str, depth: usize) -> Roll {
        let mut errors = Vec::new();
        if self.rolls == self.limits.max_rolls {
            let limit = self.rolls;
            warn!(limit, "roll budget spent");
            errors.push(RollError::TooManyRolls { limit });
            return Roll::failed(input.to_string(), errors);
        }
        self.rolls += 1;

        let raw = Expander {
            macros: &self.macros,
            max_iterations: self.limits.max_iterations,
        }
        .expand(input, &mut errors);
        debug!(input, raw = %raw, depth, "expanded");

        if let Some((separator, fragments)) = split_multi(&raw) {
            if depth >= self.limits.max_depth {
                warn!(depth, "roll nested too deeply");
                errors.push(RollError::TooDeep);
                return Roll::failed(raw, errors);
            }
            debug!(?separator, count = fragments.len(), "split roll");
            let rolls: Vec<Roll> = fragments
                .iter()
                .map(|fragment| self.parse_at(fragment, depth + 1))
                .collect();
            match NonEmpty::try_from_vec(rolls) {
                Ok(rolls) => return Roll::new_multi(raw, errors, separator, rolls),
                Err(_) => {
                    errors.push(RollError::Empty);
                    return Roll::failed(raw, errors);
                }
            }
        }

        self.parse_leaf(raw, errors)
    }

    fn parse_leaf(&mut self, raw: String, mut errors: Vec<RollError>) -> Roll {
        let (body, title) = split_title(&raw);
        let parts = tokenize(body, &self.escape);
        debug!(?parts, ?title, "tokenized");
        if parts.is_empty() {
            errors.push(RollError::Empty);
        }

        let mut expressions = Vec::with_capacity(parts.len());
        let mut pretty = Vec::with_capacity(parts.len());
        for part in &parts {
            match dice::resolve(part, self) {
                Ok(resolved) => {
                    expressions.push(resolved.expression);
                    pretty.push(resolved.pretty);
                }
                Err(e) => {
                    debug!(part = part.as_str(), error = %e, "token skipped");
                    errors.push(e);
                }
            }
        }

        let result = math::finalize(&expressions.join(" "));
        let leaf = Leaf {
            parts,
            expressions,
            pretty,
            title: title.map(str::to_string),
            result,
        };
        Roll::new_leaf(raw, errors, leaf)
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Number;
    use crate::roll::SequenceRoller;

    #[test]
    fn test_builder() {
        let mut macros = MacroBook::new();
        macros.insert("init", "1d20 + 2");
        let limits = Limits {
            max_dice: 10,
            ..Limits::default()
        };
        let ctx = RollContext::new(SequenceRoller::max())
            .with_escape("!")
            .with_macros(macros)
            .with_limits(limits);
        assert_eq!(ctx.escape(), "!");
        assert_eq!(ctx.macros().len(), 1);
        assert_eq!(ctx.limits().max_dice, 10);
    }

    #[test]
    fn test_limits_apply() {
        let limits = Limits {
            max_dice: 2,
            ..Limits::default()
        };
        let mut ctx = RollContext::new(SequenceRoller::max()).with_limits(limits);
        let roll = ctx.parse("3d6");
        assert_eq!(roll.errors(), &[RollError::UpperLimits]);
        assert_eq!(ctx.parse("2d6").result(), Some(&Ok(Number::Int(12))));
    }

    #[test]
    fn test_macros_mut() {
        let mut ctx = RollContext::new(SequenceRoller::new(vec![4]));
        ctx.macros_mut().insert("stab", "1d6 + 1");
        assert_eq!(ctx.parse("stab").text(), "1d6 + 1 = 4 + 1 = **5**");
    }

    #[test]
    fn test_depth_guard() {
        let mut macros = MacroBook::new();
        macros.insert("loop", "loop;loop");
        let mut ctx = RollContext::new(SequenceRoller::max()).with_macros(macros);
        let roll = ctx.parse("loop");
        assert!(roll.text().contains(&RollError::TooDeep.to_string()));
    }

    fn count(roll: &Roll) -> usize {
        1 + roll.multi().map_or(0, |rolls| rolls.iter().map(count).sum())
    }

    #[test]
    fn test_roll_budget() {
        let mut macros = MacroBook::new();
        macros.insert("x", "[20]x");
        let mut ctx = RollContext::new(SequenceRoller::max()).with_macros(macros);
        let limit = ctx.limits().max_rolls;
        let roll = ctx.parse("x");
        let budget = RollError::TooManyRolls { limit }.to_string();
        assert!(roll.text().contains(&budget));
        assert!(count(&roll) < 2 * limit, "{} rolls", count(&roll));

        // the budget is per input
        assert_eq!(ctx.parse("1d6").text(), "1d6 = 6 = **6**");
    }

    #[test]
    fn test_small_roll_budget() {
        let limits = Limits {
            max_rolls: 3,
            ..Limits::default()
        };
        let mut ctx = RollContext::new(SequenceRoller::new(vec![2])).with_limits(limits);
        let roll = ctx.parse("1d4; 1d4; 1d4");
        assert_eq!(
            roll.text(),
            "1d4 = 2 = **2**\n1d4 = 2 = **2**\nToo many rolls: stopped after 3."
        );
        assert!(ctx.parse("1d4; 1d4").is_success());
    }

    #[test]
    fn test_escape_reaches_macros() {
        let mut macros = MacroBook::new();
        macros.insert("stab", "1d6");
        let mut ctx = RollContext::new(SequenceRoller::new(vec![4]))
            .with_macros(macros)
            .with_escape("!");
        assert_eq!(ctx.parse("!r stab").text(), "1d6 = 4 = **4**");
    }
}
