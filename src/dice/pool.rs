use crate::common::*;
use crate::markdown;
use crate::roll::{RollContext, Roller};
use std::fmt;

/// One rolled die, as it appears in a trace.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Die {
    pub value: Int,
    pub emphasized: bool,
}

impl Die {
    pub fn new(value: Int) -> Self {
        Self {
            value,
            emphasized: false,
        }
    }

    pub fn emphasize(mut self) -> Self {
        self.emphasized = true;
        self
    }

    /// Rolls a single die. A natural 20 on a d20 comes out emphasized.
    pub fn roll<R: Roller>(sides: Sides, ctx: &mut RollContext<R>) -> Self {
        let die = Self::new(sides.value_of(ctx.roll_face(sides.faces())));
        if sides.is_d20() && die.value == sides.max_value() {
            die.emphasize()
        } else {
            die
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.emphasized {
            f.write_str(&markdown::emphasis(self.value))
        } else {
            fmt::Display::fmt(&self.value, f)
        }
    }
}

/// The dice of one token, all of the same kind.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Pool {
    sides: Sides,
    dice: NonEmpty<Die>,
}

impl Pool {
    pub fn new(sides: Sides, dice: NonEmpty<Die>) -> Self {
        Self { sides, dice }
    }

    pub fn roll<R: Roller>(count: NonZeroUInt, sides: Sides, ctx: &mut RollContext<R>) -> Self {
        let mut dice = vec1![Die::roll(sides, ctx)];
        for _ in 1..count.get() {
            dice.push(Die::roll(sides, ctx));
        }
        Self::new(sides, dice)
    }

    /// Rolls a fresh pool of the same size and kind.
    pub fn reroll<R: Roller>(&self, ctx: &mut RollContext<R>) -> Self {
        let sides = self.sides;
        Self::new(sides, self.dice.mapped_ref(|_| Die::roll(sides, ctx)))
    }

    pub fn sides(&self) -> Sides {
        self.sides
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn total(&self) -> Int {
        self.dice.iter().map(|d| d.value).sum()
    }

    pub fn push(&mut self, die: Die) {
        self.dice.push(die);
    }

    pub fn into_dice(self) -> Vec<Die> {
        self.dice.into_vec()
    }
}
