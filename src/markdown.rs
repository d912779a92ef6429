//! Chat-markdown decoration used in roll traces.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::fmt::Display;

lazy_static! {
    static ref EMPHASIS: Regex = Regex::new(r"__\*\*(-?[0-9.]+)\*\*__").unwrap();
}

/// Underlined bold, used for natural maximums and exploding dice.
pub fn emphasis(x: impl Display) -> String {
    format!("__**{}**__", x)
}

pub fn bold(x: impl Display) -> String {
    format!("**{}**", x)
}

pub fn strike(x: impl Display) -> String {
    format!("~~{}~~", x)
}

/// Joins `items` with `sep`, wrapping them in parentheses when there is more than one.
pub fn group<T: Display>(items: &[T], sep: &str) -> String {
    let joined = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep);
    if items.len() > 1 {
        format!("({})", joined)
    } else {
        joined
    }
}

/// Removes [`emphasis`] so the number underneath can be evaluated.
pub fn strip_emphasis(s: &str) -> Cow<'_, str> {
    EMPHASIS.replace_all(s, "$1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group() {
        assert_eq!(group(&[4], "+"), "4");
        assert_eq!(group(&[2, 5, 1], "+"), "(2+5+1)");
        assert_eq!(group::<u32>(&[], "+"), "");
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("(__**20**__+3)"), "(20+3)");
        assert_eq!(strip_emphasis("**20**"), "**20**");
        assert_eq!(strip_emphasis(&emphasis(6)), "6");
        assert_eq!(strip_emphasis(&emphasis(-1)), "-1");
    }
}
