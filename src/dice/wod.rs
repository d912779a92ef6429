//! Success counting for World of Darkness pools.

use super::{Resolved, Threshold, WodSpec};
use crate::common::*;
use crate::markdown;
use crate::roll::{RollContext, RollError, Roller};
use tracing::warn;

const FACES: NonZeroUInt = NonZeroUInt::MIN.saturating_add(9);

/// Rolls `spec.count` d10s and nets their successes. A face at or above the success
/// value scores one (more for double and triple faces) and a 1 always costs one.
///
/// Exploding faces add a die to the next round. The round cap scales with the pool size.
pub fn evaluate<R: Roller>(spec: &WodSpec, ctx: &mut RollContext<R>) -> Result<Resolved, RollError> {
    let count = spec.count.get() as usize;
    let limit = ctx.limits().max_explosions.saturating_mul(count);

    let mut successes: Int = 0;
    let mut trace = Vec::with_capacity(count);
    let mut pending = count;
    let mut rounds = 0;
    loop {
        let mut exploded = 0;
        for _ in 0..pending {
            let face = ctx.roll_face(FACES) as Int;
            let (points, shown) = score(spec, face);
            successes += points;
            trace.push(shown);
            if spec.explode.as_ref().map_or(false, |t| t.is_met(face)) {
                exploded += 1;
            }
        }

        pending = exploded;
        if pending == 0 {
            break;
        }
        if rounds == limit {
            warn!(limit, "explosion cap reached");
            return Err(RollError::ExplosionLimit { limit });
        }
        rounds += 1;
    }

    Ok(Resolved {
        expression: successes.to_string(),
        pretty: markdown::group(&trace, ", "),
    })
}

fn score(spec: &WodSpec, face: Int) -> (Int, String) {
    if face == 1 {
        return (-1, markdown::strike(face));
    }
    if face < spec.success as Int {
        return (0, face.to_string());
    }

    let met = |t: &Option<Threshold>| t.as_ref().map_or(false, |t| t.is_met(face));
    if met(&spec.triple) {
        (3, format!("{}^^", markdown::bold(face)))
    } else if met(&spec.double) {
        (2, format!("{}^", markdown::bold(face)))
    } else {
        (1, markdown::bold(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::{Limits, SequenceRoller};

    fn spec(count: UInt) -> WodSpec {
        WodSpec::new(NonZeroUInt::new(count).unwrap())
    }

    fn check(spec: &WodSpec, draws: Vec<UInt>) -> Result<Resolved, RollError> {
        let mut ctx = RollContext::new(SequenceRoller::new(draws));
        evaluate(spec, &mut ctx)
    }

    #[test]
    fn test_default_pool() {
        let resolved = check(&spec(5), vec![5, 4, 1, 8, 10]).unwrap();
        assert_eq!(resolved.expression, "2");
        assert_eq!(resolved.pretty, "(**5**, 4, ~~1~~, **8**, **10**)");
    }

    #[test]
    fn test_success_threshold() {
        let mut wod = spec(3);
        wod.success = 8;
        let resolved = check(&wod, vec![7, 8, 1]).unwrap();
        assert_eq!(resolved.expression, "0");
        assert_eq!(resolved.pretty, "(7, **8**, ~~1~~)");
    }

    #[test]
    fn test_double_and_triple() {
        let mut wod = spec(3);
        wod.double = Some(Threshold::AtLeast(9));
        wod.triple = Some(Threshold::AtLeast(10));
        let resolved = check(&wod, vec![9, 10, 6]).unwrap();
        assert_eq!(resolved.expression, "6");
        assert_eq!(resolved.pretty, "(**9**^, **10**^^, **6**)");
    }

    #[test]
    fn test_explode() {
        let mut wod = spec(2);
        wod.explode = Some(Threshold::AtLeast(10));
        let resolved = check(&wod, vec![10, 3, 10, 2]).unwrap();
        assert_eq!(resolved.expression, "2");
        assert_eq!(resolved.pretty, "(**10**, 3, **10**, 2)");
    }

    #[test]
    fn test_explode_cap_scales_with_pool() {
        let mut wod = spec(2);
        wod.explode = Some(Threshold::AtLeast(10));
        let limit = Limits::default().max_explosions * 2;
        assert_eq!(
            check(&wod, vec![10]),
            Err(RollError::ExplosionLimit { limit })
        );
    }

    #[test]
    fn test_explode_counts_rounds() {
        let mut wod = spec(2);
        wod.explode = Some(Threshold::AtLeast(10));
        let mut draws = vec![10; 122];
        draws.extend([3, 3]);
        let resolved = check(&wod, draws).unwrap();
        assert_eq!(resolved.expression, "122");
    }
}
