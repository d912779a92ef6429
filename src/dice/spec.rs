use super::ops::*;
use crate::common::*;
use crate::math;
use crate::roll::{Limits, RollError};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref DICE: Regex =
        Regex::new(r"(?i)^(?P<count>[0-9]+)?(?P<kind>[dfw])(?P<sides>[0-9]+|f)?(?P<mods>.*)$")
            .unwrap();
    static ref MODIFIER: Regex =
        Regex::new(r"(?i)^(?P<flag>[adkle+])(?P<arg>[0-9]+|[<>=]+[0-9]+)?$").unwrap();
    static ref WOD_MODIFIERS: Regex =
        Regex::new(r"(?i)^(?:[tde](?:[0-9]+|[<>=]+[0-9]+)?)*$").unwrap();
    static ref WOD_MODIFIER: Regex =
        Regex::new(r"(?i)(?P<flag>[tde])(?P<arg>[0-9]+|[<>=]+[0-9]+)?").unwrap();
}

const WOD_SUCCESS: UInt = 5;
const WOD_THRESHOLD: Threshold = Threshold::AtLeast(10);

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseDiceError {
    #[error("not a dice expression")]
    NotDice,
    #[error("dice count and sides must be positive")]
    Zero,
    #[error("dice count or sides too large")]
    TooLarge,
    #[error("unsupported dice modifier")]
    InvalidModifier,
}

/// When a die triggers an effect: at or above a value, or when a comparison such as
/// `>=6` holds for it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Threshold {
    AtLeast(Int),
    Expr(String),
}

impl Threshold {
    pub fn is_met(&self, value: Int) -> bool {
        match self {
            Self::AtLeast(n) => value >= *n,
            Self::Expr(cmp) => math::finalize_silent(&format!("{}{}", value, cmp)).is_truthy(),
        }
    }
}

impl FromStr for Threshold {
    type Err = ParseDiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().all(|c| c.is_ascii_digit()) {
            s.parse().map(Self::AtLeast).map_err(|_| ParseDiceError::TooLarge)
        } else {
            Ok(Self::Expr(s.to_string()))
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtLeast(n) => fmt::Display::fmt(n, f),
            Self::Expr(s) => f.write_str(s),
        }
    }
}

/// A summed pool such as `4d6k3`, `2d20a` or `4dF`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DieSpec {
    pub count: NonZeroUInt,
    pub sides: Sides,
    pub modifier: Modifier,
}

impl DieSpec {
    pub fn new(count: NonZeroUInt, sides: Sides) -> Self {
        Self {
            count,
            sides,
            modifier: Modifier::default(),
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<Modifier>) -> Self {
        self.modifier = modifier.into();
        self
    }

    pub fn check(&self, limits: &Limits) -> Result<(), RollError> {
        if self.count.get() > limits.max_dice || self.sides.faces().get() > limits.max_sides {
            Err(RollError::UpperLimits)
        } else {
            Ok(())
        }
    }

    fn parse(count: NonZeroUInt, fate: bool, sides: Option<&str>, mods: &str) -> Result<Self, ParseDiceError> {
        let sides = match (fate, sides) {
            (true, None) => Sides::Fate,
            (true, Some(_)) => return Err(ParseDiceError::InvalidModifier),
            (false, None) => Sides::default(),
            (false, Some(s)) if s.eq_ignore_ascii_case("f") => Sides::Fate,
            (false, Some(s)) => Sides::Poly(parse_nonzero(s)?),
        };
        let spec = Self::new(count, sides);
        if mods.is_empty() {
            return Ok(spec);
        }

        let caps = MODIFIER.captures(mods).ok_or(ParseDiceError::InvalidModifier)?;
        let arg = caps.name("arg").map(|m| m.as_str());
        let modifier: Modifier = match flag(&caps) {
            'a' | 'd' if arg.is_some() => return Err(ParseDiceError::InvalidModifier),
            'a' => Advantage.into(),
            'd' => Disadvantage.into(),
            'k' => Keep(count_arg(arg)?).into(),
            'l' => Lose(count_arg(arg)?).into(),
            'e' => Explode(match arg {
                Some(arg) => arg.parse()?,
                None => Threshold::AtLeast(sides.max_value()),
            })
            .into(),
            '+' => Flat(count_arg(arg)?).into(),
            _ => return Err(ParseDiceError::InvalidModifier),
        };
        Ok(spec.with_modifier(modifier))
    }
}

impl fmt::Display for DieSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
    }
}

/// A World of Darkness success pool such as `6w7e10`: `count` d10s, each scoring a
/// success at or above `success`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WodSpec {
    pub count: NonZeroUInt,
    pub success: UInt,
    pub double: Option<Threshold>,
    pub triple: Option<Threshold>,
    pub explode: Option<Threshold>,
}

impl WodSpec {
    pub fn new(count: NonZeroUInt) -> Self {
        Self {
            count,
            success: WOD_SUCCESS,
            double: None,
            triple: None,
            explode: None,
        }
    }

    pub fn check(&self, limits: &Limits) -> Result<(), RollError> {
        if self.count.get() > limits.max_dice {
            Err(RollError::UpperLimits)
        } else {
            Ok(())
        }
    }

    fn parse(count: NonZeroUInt, sides: Option<&str>, mods: &str) -> Result<Self, ParseDiceError> {
        let mut spec = Self::new(count);
        match sides {
            None => {}
            Some(s) if s.eq_ignore_ascii_case("f") => return Err(ParseDiceError::InvalidModifier),
            Some(s) => spec.success = parse_nonzero(s)?.get(),
        }
        if !WOD_MODIFIERS.is_match(mods) {
            return Err(ParseDiceError::InvalidModifier);
        }

        for caps in WOD_MODIFIER.captures_iter(mods) {
            let threshold = match caps.name("arg") {
                Some(arg) => arg.as_str().parse()?,
                None => WOD_THRESHOLD,
            };
            match flag(&caps) {
                't' => spec.triple = Some(threshold),
                'd' => spec.double = Some(threshold),
                'e' => spec.explode = Some(threshold),
                _ => return Err(ParseDiceError::InvalidModifier),
            }
        }
        Ok(spec)
    }
}

impl fmt::Display for WodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}w{}", self.count, self.success)?;
        for (flag, threshold) in [('t', &self.triple), ('d', &self.double), ('e', &self.explode)] {
            if let Some(threshold) = threshold {
                write!(f, "{}{}", flag, threshold)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DiceToken {
    Standard(DieSpec),
    Wod(WodSpec),
}

impl FromStr for DiceToken {
    type Err = ParseDiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DICE.captures(s).ok_or(ParseDiceError::NotDice)?;
        let count = match caps.name("count") {
            Some(m) => parse_nonzero(m.as_str())?,
            None => NonZeroUInt::MIN,
        };
        let sides = caps.name("sides").map(|m| m.as_str());
        let mods = caps.name("mods").map_or("", |m| m.as_str());
        let kind = caps
            .name("kind")
            .and_then(|m| m.as_str().chars().next())
            .map_or('d', |c| c.to_ascii_lowercase());

        let token = match kind {
            'w' => WodSpec::parse(count, sides, mods).map(Self::Wod),
            _ => DieSpec::parse(count, kind == 'f', sides, mods).map(Self::Standard),
        };
        // a bare letter followed by junk is a word, not a malformed roll
        let bare = caps.name("count").is_none() && sides.is_none();
        match token {
            Err(ParseDiceError::InvalidModifier) if bare => Err(ParseDiceError::NotDice),
            token => token,
        }
    }
}

impl fmt::Display for DiceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(x) => x.fmt(f),
            Self::Wod(x) => x.fmt(f),
        }
    }
}

fn flag(caps: &Captures) -> char {
    caps.name("flag")
        .and_then(|m| m.as_str().chars().next())
        .map_or('\0', |c| c.to_ascii_lowercase())
}

fn parse_nonzero(s: &str) -> Result<NonZeroUInt, ParseDiceError> {
    let n = s.parse::<UInt>().map_err(|_| ParseDiceError::TooLarge)?;
    NonZeroUInt::new(n).ok_or(ParseDiceError::Zero)
}

fn count_arg(arg: Option<&str>) -> Result<UInt, ParseDiceError> {
    match arg {
        None => Ok(1),
        Some(s) if s.chars().all(|c| c.is_ascii_digit()) => parse_nonzero(s).map(NonZeroUInt::get),
        Some(_) => Err(ParseDiceError::InvalidModifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: UInt) -> NonZeroUInt {
        NonZeroUInt::new(n).unwrap()
    }

    fn d(count: UInt, sides: UInt) -> DieSpec {
        DieSpec::new(nz(count), Sides::Poly(nz(sides)))
    }

    fn check(s: &str, expected: DieSpec) {
        assert_eq!(s.parse::<DiceToken>(), Ok(DiceToken::Standard(expected)));
    }

    #[test]
    fn test_parse_plain() {
        check("1d20", d(1, 20));
        check("d20", d(1, 20));
        check("d", d(1, 20));
        check("14d4", d(14, 4));
        check("3D6", d(3, 6));
    }

    #[test]
    fn test_parse_fate() {
        check("4dF", DieSpec::new(nz(4), Sides::Fate));
        check("4df", DieSpec::new(nz(4), Sides::Fate));
        check("f", DieSpec::new(nz(1), Sides::Fate));
    }

    #[test]
    fn test_parse_modifiers() {
        check("2d20a", d(2, 20).with_modifier(Advantage));
        check("1d20D", d(1, 20).with_modifier(Disadvantage));
        check("4d6k3", d(4, 6).with_modifier(Keep(3)));
        check("2d20k", d(2, 20).with_modifier(Keep(1)));
        check("4d6l2", d(4, 6).with_modifier(Lose(2)));
        check("3d6e", d(3, 6).with_modifier(Explode(Threshold::AtLeast(6))));
        check("3d6e5", d(3, 6).with_modifier(Explode(Threshold::AtLeast(5))));
        check(
            "3d6e>=6",
            d(3, 6).with_modifier(Explode(Threshold::Expr(">=6".into()))),
        );
        check("1d6+", d(1, 6).with_modifier(Flat(1)));
        check("1d6+2", d(1, 6).with_modifier(Flat(2)));
    }

    #[test]
    fn test_parse_wod() {
        let mut expected = WodSpec::new(nz(5));
        assert_eq!("5w".parse::<DiceToken>(), Ok(DiceToken::Wod(expected.clone())));

        expected.success = 7;
        expected.explode = Some(Threshold::AtLeast(10));
        expected.double = Some(Threshold::AtLeast(9));
        assert_eq!("5w7ed9".parse::<DiceToken>(), Ok(DiceToken::Wod(expected)));

        let token = "3w6t>=10".parse::<DiceToken>().unwrap();
        assert_eq!(token.to_string(), "3w6t>=10");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("20".parse::<DiceToken>(), Err(ParseDiceError::NotDice));
        assert_eq!("+".parse::<DiceToken>(), Err(ParseDiceError::NotDice));
        assert_eq!("fireball".parse::<DiceToken>(), Err(ParseDiceError::NotDice));
        assert_eq!("0d6".parse::<DiceToken>(), Err(ParseDiceError::Zero));
        assert_eq!("1d0".parse::<DiceToken>(), Err(ParseDiceError::Zero));
        assert_eq!("99999999999d6".parse::<DiceToken>(), Err(ParseDiceError::TooLarge));
        assert_eq!("2d20ak1".parse::<DiceToken>(), Err(ParseDiceError::InvalidModifier));
        assert_eq!("2d20a2".parse::<DiceToken>(), Err(ParseDiceError::InvalidModifier));
        assert_eq!("4d6k>3".parse::<DiceToken>(), Err(ParseDiceError::InvalidModifier));
        assert_eq!("5wx".parse::<DiceToken>(), Err(ParseDiceError::InvalidModifier));
    }

    #[test]
    fn test_display() {
        assert_eq!(d(4, 6).with_modifier(Keep(3)).to_string(), "4d6k3");
        assert_eq!(DieSpec::new(nz(4), Sides::Fate).to_string(), "4dF");
        assert_eq!(
            d(3, 6).with_modifier(Explode(Threshold::Expr(">=6".into()))).to_string(),
            "3d6e>=6"
        );
    }

    #[test]
    fn test_threshold() {
        assert!(Threshold::AtLeast(6).is_met(6));
        assert!(!Threshold::AtLeast(6).is_met(5));
        assert!(Threshold::Expr(">=6".into()).is_met(6));
        assert!(!Threshold::Expr(">=6".into()).is_met(5));
        assert!(Threshold::Expr("==1".into()).is_met(1));
        assert!(!Threshold::Expr(">=oops".into()).is_met(6));
    }

    #[test]
    fn test_limits() {
        let limits = Limits::default();
        assert!(d(100, 1000).check(&limits).is_ok());
        assert_eq!(d(101, 6).check(&limits), Err(RollError::UpperLimits));
        assert_eq!(d(1, 1001).check(&limits), Err(RollError::UpperLimits));
        assert_eq!(WodSpec::new(nz(101)).check(&limits), Err(RollError::UpperLimits));
    }
}
