use std::fmt::{self, Write};
use std::num::NonZeroU32;
use std::str::FromStr;
pub use vec1::vec1;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Float = f64;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// The faces of a die: an ordinary polyhedral die, or a Fate die (a d3 read as -1, 0, +1).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sides {
    Poly(NonZeroUInt),
    Fate,
}

impl Sides {
    pub const D20: Self = Self::Poly(NonZeroUInt::MIN.saturating_add(19));
    const FATE_FACES: NonZeroUInt = NonZeroUInt::MIN.saturating_add(2);

    /// Number of physical faces rolled for this die.
    pub fn faces(self) -> NonZeroUInt {
        match self {
            Self::Poly(x) => x,
            Self::Fate => Self::FATE_FACES,
        }
    }

    /// Highest value the die can show.
    pub fn max_value(self) -> Int {
        self.value_of(self.faces().get())
    }

    /// Maps a rolled face in `1..=faces` to the value the die shows.
    pub fn value_of(self, face: UInt) -> Int {
        match self {
            Self::Poly(_) => face as Int,
            Self::Fate => face as Int - 2,
        }
    }

    pub fn is_d20(self) -> bool {
        self == Self::D20
    }
}

impl Default for Sides {
    fn default() -> Self {
        Self::D20
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poly(x) => fmt::Display::fmt(x, f),
            Self::Fate => f.write_char('F'),
        }
    }
}

impl FromStr for Sides {
    type Err = <NonZeroUInt as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("f") {
            Ok(Self::Fate)
        } else {
            s.parse().map(Self::Poly)
        }
    }
}
