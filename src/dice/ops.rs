use super::{Die, Pool, Resolved, Threshold};
use crate::common::*;
use crate::markdown;
use crate::roll::{RollContext, RollError, Roller};
use std::fmt;
use tracing::warn;

#[enum_dispatch::enum_dispatch]
pub trait PoolOperate {
    /// Turns a freshly rolled pool into the token's expression and trace.
    fn operate<R: Roller>(&self, pool: Pool, ctx: &mut RollContext<R>) -> Result<Resolved, RollError>;
}

/// What a dice token does with its pool after rolling it. A token carries at most one.
#[derive(Debug, Clone, Eq, PartialEq)]
#[enum_dispatch::enum_dispatch(PoolOperate)]
pub enum Modifier {
    Plain(Plain),
    Advantage(Advantage),
    Disadvantage(Disadvantage),
    Keep(Keep),
    Lose(Lose),
    Explode(Explode),
    Flat(Flat),
}

impl Default for Modifier {
    fn default() -> Self {
        Self::Plain(Plain)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => Ok(()),
            Self::Advantage(_) => f.write_str("a"),
            Self::Disadvantage(_) => f.write_str("d"),
            Self::Keep(Keep(n)) => write!(f, "k{}", n),
            Self::Lose(Lose(n)) => write!(f, "l{}", n),
            Self::Explode(Explode(t)) => write!(f, "e{}", t),
            Self::Flat(Flat(n)) => write!(f, "+{}", n),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Plain;

/// Roll the pool twice and keep the higher sum.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Advantage;

/// Roll the pool twice and keep the lower sum.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Disadvantage;

/// Keep the highest `n` dice.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Keep(pub UInt);

/// Keep the lowest `n` dice.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Lose(pub UInt);

/// Roll one more die for every die meeting the threshold, chaining.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Explode(pub Threshold);

/// Add a flat amount to the pool.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Flat(pub UInt);

impl PoolOperate for Plain {
    fn operate<R: Roller>(&self, pool: Pool, _: &mut RollContext<R>) -> Result<Resolved, RollError> {
        Ok(Resolved::sum(pool.dice()))
    }
}

impl PoolOperate for Advantage {
    fn operate<R: Roller>(&self, pool: Pool, ctx: &mut RollContext<R>) -> Result<Resolved, RollError> {
        Ok(pick(pool, ctx, true))
    }
}

impl PoolOperate for Disadvantage {
    fn operate<R: Roller>(&self, pool: Pool, ctx: &mut RollContext<R>) -> Result<Resolved, RollError> {
        Ok(pick(pool, ctx, false))
    }
}

fn pick<R: Roller>(pool: Pool, ctx: &mut RollContext<R>, higher: bool) -> Resolved {
    let other = pool.reroll(ctx);
    let (first, second) = (pool.total(), other.total());
    let (kept, dropped, op) = if higher {
        (first.max(second), first.min(second), '>')
    } else {
        (first.min(second), first.max(second), '<')
    };

    let natural = pool.len() == 1 && pool.sides().is_d20() && kept == pool.sides().max_value();
    let shown = if natural {
        markdown::emphasis(kept)
    } else {
        kept.to_string()
    };
    Resolved {
        expression: kept.to_string(),
        pretty: format!("({} {} {})", shown, op, dropped),
    }
}

impl PoolOperate for Keep {
    fn operate<R: Roller>(&self, pool: Pool, _: &mut RollContext<R>) -> Result<Resolved, RollError> {
        let count = pool.len() as UInt;
        if self.0 > count {
            return Err(RollError::KeepExceedsCount { keep: self.0, count });
        }
        let mut dice = pool.into_dice();
        dice.sort_by(|a, b| b.value.cmp(&a.value));
        Ok(select(&dice, self.0 as usize))
    }
}

impl PoolOperate for Lose {
    fn operate<R: Roller>(&self, pool: Pool, _: &mut RollContext<R>) -> Result<Resolved, RollError> {
        let count = pool.len() as UInt;
        if self.0 > count {
            return Err(RollError::LoseExceedsCount { lose: self.0, count });
        }
        let mut dice = pool.into_dice();
        dice.sort_by_key(|d| d.value);
        Ok(select(&dice, self.0 as usize))
    }
}

/// Keeps the first `n` of the sorted dice and strikes out the rest.
fn select(sorted: &[Die], n: usize) -> Resolved {
    let (kept, dropped) = sorted.split_at(n.min(sorted.len()));
    let pretty: Vec<String> = kept
        .iter()
        .map(ToString::to_string)
        .chain(dropped.iter().map(markdown::strike))
        .collect();
    let expression = if kept.is_empty() {
        "0".to_string()
    } else {
        markdown::group(kept, "+")
    };
    Resolved {
        expression,
        pretty: markdown::group(&pretty, "+"),
    }
}

impl PoolOperate for Explode {
    fn operate<R: Roller>(&self, pool: Pool, ctx: &mut RollContext<R>) -> Result<Resolved, RollError> {
        let sides = pool.sides();
        let threshold = &self.0;
        if matches!(threshold, Threshold::AtLeast(n) if *n > sides.max_value()) {
            return Err(RollError::ExplodeAboveSides);
        }
        if sides.faces().get() == 1 {
            return Err(RollError::ExplodeOnD1);
        }

        let limit = ctx.limits().max_explosions;
        let mut dice = Vec::with_capacity(pool.len());
        let mut pending = mark(pool.into_dice(), threshold, &mut dice);

        // Each round rerolls every die that exploded in the round before.
        let mut rounds = 0;
        while pending > 0 {
            if rounds == limit {
                warn!(limit, "explosion cap reached");
                return Err(RollError::ExplosionLimit { limit });
            }
            rounds += 1;
            let fresh: Vec<Die> = (0..pending).map(|_| Die::roll(sides, ctx)).collect();
            pending = mark(fresh, threshold, &mut dice);
        }
        Ok(Resolved::sum(&dice))
    }
}

/// Moves `fresh` into `dice`, emphasizing the ones that explode, and returns how many did.
fn mark(fresh: impl IntoIterator<Item = Die>, threshold: &Threshold, dice: &mut Vec<Die>) -> usize {
    let mut exploded = 0;
    for die in fresh {
        if threshold.is_met(die.value) {
            exploded += 1;
            dice.push(die.emphasize());
        } else {
            dice.push(die);
        }
    }
    exploded
}

impl PoolOperate for Flat {
    fn operate<R: Roller>(&self, mut pool: Pool, _: &mut RollContext<R>) -> Result<Resolved, RollError> {
        pool.push(Die::new(self.0 as Int));
        Ok(Resolved::sum(pool.dice()))
    }
}
