use crate::common::{Float, NonZeroUInt, UInt};
use rand::Rng;

/// A source of die faces.
///
/// Every [`rand::Rng`] is a roller, so a seeded `StdRng` gives reproducible rolls.
pub trait Roller {
    /// Returns a uniformly distributed face in `1..=faces`.
    fn roll(&mut self, faces: NonZeroUInt) -> UInt;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, faces: NonZeroUInt) -> UInt {
        self.gen_range(1..=faces.get())
    }
}

/// Adapts a `FnMut() -> f64` returning values in `[0, 1)` into a [`Roller`].
#[derive(Debug, Copy, Clone)]
pub struct FnRoller<F>(pub F);

impl<F: FnMut() -> Float> Roller for FnRoller<F> {
    fn roll(&mut self, faces: NonZeroUInt) -> UInt {
        let x = (self.0)();
        let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 };
        let face = 1 + (x * faces.get() as Float) as UInt;
        face.min(faces.get())
    }
}

#[cfg(test)]
pub(crate) use sequence::SequenceRoller;

#[cfg(test)]
mod sequence {
    use super::*;

    /// Replays fixed draws in order, cycling when exhausted. Draws larger than the
    /// die wrap around its faces.
    pub(crate) struct SequenceRoller {
        draws: Vec<UInt>,
        next: usize,
    }

    impl SequenceRoller {
        pub fn new(draws: impl Into<Vec<UInt>>) -> Self {
            Self {
                draws: draws.into(),
                next: 0,
            }
        }

        /// Always rolls the highest face.
        pub fn max() -> Self {
            Self::new(vec![UInt::MAX])
        }
    }

    impl Roller for SequenceRoller {
        fn roll(&mut self, faces: NonZeroUInt) -> UInt {
            let draw = self.draws[self.next % self.draws.len()];
            self.next += 1;
            if draw == UInt::MAX {
                faces.get()
            } else {
                (draw.max(1) - 1) % faces.get() + 1
            }
        }
    }
}
