//! Rolls embedded in ordinary chat text, written `(/roll 1d20)` or `(/r 1d20)`.

use crate::roll::{Roll, RollContext, Roller};
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct InlineRolls {
    /// Every inline roll of the message, evaluated together as one list.
    pub roll: Roll,
    /// The message with its inline rolls cut out.
    pub remainder: String,
}

/// Finds and evaluates the inline rolls in `message`, or returns `None` if it has none.
pub fn extract<R: Roller>(message: &str, ctx: &mut RollContext<R>) -> Option<InlineRolls> {
    let escape = regex::escape(ctx.escape());
    let (rolls, cut) = match (
        Regex::new(&format!(r"\(({}r(?:oll)?\s.*?)\)", escape)),
        Regex::new(&format!(r" ?\({}.*?\)", escape)),
    ) {
        (Ok(rolls), Ok(cut)) => (rolls, cut),
        (Err(e), _) | (_, Err(e)) => {
            debug!(error = %e, "cannot match inline rolls");
            return None;
        }
    };

    let bodies: Vec<&str> = rolls
        .captures_iter(message)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    if bodies.is_empty() {
        return None;
    }
    debug!(count = bodies.len(), "found inline rolls");

    let roll = ctx.parse(&bodies.join("; "));
    let remainder = cut.replace_all(message, "").into_owned();
    Some(InlineRolls { roll, remainder })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::SequenceRoller;

    #[test]
    fn test_single() {
        let mut ctx = RollContext::new(SequenceRoller::new(vec![14]));
        let inline = extract("I attack (/roll 1d20 + 3) the goblin", &mut ctx).unwrap();
        assert_eq!(inline.roll.text(), "1d20 + 3 = 14 + 3 = **17**");
        assert_eq!(inline.remainder, "I attack the goblin");
    }

    #[test]
    fn test_many() {
        let mut ctx = RollContext::new(SequenceRoller::new(vec![4, 5]));
        let inline = extract("hit (/r 1d6) and (/r 1d8)!", &mut ctx).unwrap();
        assert_eq!(inline.roll.text(), "1d6 = 4 = **4**\n1d8 = 5 = **5**");
        assert_eq!(inline.remainder, "hit and!");
    }

    #[test]
    fn test_custom_escape() {
        let mut ctx = RollContext::new(SequenceRoller::new(vec![2])).with_escape("!");
        let inline = extract("(!r 1d4)", &mut ctx).unwrap();
        assert_eq!(inline.roll.text(), "1d4 = 2 = **2**");
        assert_eq!(inline.remainder, "");
        assert!(extract("(/r 1d4)", &mut ctx).is_none());
    }

    #[test]
    fn test_none() {
        let mut ctx = RollContext::new(SequenceRoller::max());
        assert!(extract("no rolls (here)", &mut ctx).is_none());
        assert!(extract("(/rolling)", &mut ctx).is_none());
    }
}
