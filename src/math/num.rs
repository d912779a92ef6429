use crate::common::*;
use std::fmt;

/// An arithmetic value. Integers stay exact until a division leaves a remainder.
#[derive(Debug, Copy, Clone)]
pub enum Number {
    Int(Int),
    Float(Float),
}

macro_rules! num_checked_op {
    ($fn_name:ident, $int_fn:ident, $op:tt) => {
        pub(crate) fn $fn_name(self, rhs: Self) -> Option<Self> {
            match (self, rhs) {
                (Self::Int(x), Self::Int(y)) => x.$int_fn(y).map(Self::Int),
                (x, y) => Self::finite(x.as_float() $op y.as_float()),
            }
        }
    };
}

impl Number {
    pub const ZERO: Self = Self::Int(0);

    pub fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Self::Int(x) => x != 0,
            Self::Float(x) => x != 0.0 && !x.is_nan(),
        }
    }

    pub(crate) fn from_bool(b: bool) -> Self {
        Self::Int(b as Int)
    }

    fn finite(x: Float) -> Option<Self> {
        x.is_finite().then_some(Self::Float(x))
    }

    num_checked_op!(checked_add, checked_add, +);
    num_checked_op!(checked_sub, checked_sub, -);
    num_checked_op!(checked_mul, checked_mul, *);

    pub(crate) fn checked_div(self, rhs: Self) -> Option<Self> {
        if !rhs.is_truthy() {
            return None;
        }
        match (self, rhs) {
            (Self::Int(x), Self::Int(y)) if x.checked_rem(y) == Some(0) => x.checked_div(y).map(Self::Int),
            (x, y) => Self::finite(x.as_float() / y.as_float()),
        }
    }

    pub(crate) fn checked_neg(self) -> Option<Self> {
        match self {
            Self::Int(x) => x.checked_neg().map(Self::Int),
            Self::Float(x) => Some(Self::Float(-x)),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.as_float().eq(&other.as_float())
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.as_float().partial_cmp(&other.as_float())
    }
}

impl From<Int> for Number {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<Float> for Number {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            // whole floats print without a fractional part
            Self::Float(x) if x.fract() == 0.0 && x.abs() < 1e15 => write!(f, "{}", *x as Int),
            Self::Float(x) => fmt::Display::fmt(x, f),
        }
    }
}
