mod ctx;
mod error;
mod roller;
mod tokenize;

use crate::common::NonEmpty;
use crate::markdown;
use crate::math::{self, MathError, Number};
use std::fmt;

pub use ctx::{DefaultRoller, Limits, RollContext, DEFAULT_ESCAPE};
pub use error::RollError;
pub use roller::{FnRoller, Roller};

#[cfg(test)]
pub(crate) use roller::SequenceRoller;

/// How the rolls of a list were separated, which decides how they are joined back.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Separator {
    Semicolon,
    Comma,
}

impl Separator {
    pub fn joiner(self) -> &'static str {
        match self {
            Self::Semicolon => "\n",
            Self::Comma => ", ",
        }
    }
}

/// A single evaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub parts: Vec<String>,
    /// What each part contributed to the arithmetic.
    pub expressions: Vec<String>,
    /// How each part is shown.
    pub pretty: Vec<String>,
    pub title: Option<String>,
    pub result: Result<Number, MathError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RollKind {
    Leaf(Leaf),
    Multi {
        separator: Separator,
        rolls: NonEmpty<Roll>,
    },
}

/// The outcome of parsing one roll command.
#[derive(Debug, Clone, PartialEq)]
pub struct Roll {
    raw: String,
    errors: Vec<RollError>,
    text: String,
    kind: RollKind,
}

impl Roll {
    pub(crate) fn new_leaf(raw: String, errors: Vec<RollError>, leaf: Leaf) -> Self {
        let text = if errors.is_empty() {
            render(&leaf)
        } else {
            join_errors(&errors)
        };
        Self {
            raw,
            errors,
            text,
            kind: RollKind::Leaf(leaf),
        }
    }

    pub(crate) fn new_multi(
        raw: String,
        errors: Vec<RollError>,
        separator: Separator,
        rolls: NonEmpty<Roll>,
    ) -> Self {
        let mut text = Vec::with_capacity(rolls.len() + 1);
        if !errors.is_empty() {
            text.push(join_errors(&errors));
        }
        text.extend(rolls.iter().map(|r| r.text.clone()));
        Self {
            raw,
            errors,
            text: text.join(separator.joiner()),
            kind: RollKind::Multi { separator, rolls },
        }
    }

    /// A roll that failed before any token could be evaluated.
    pub(crate) fn failed(raw: String, errors: Vec<RollError>) -> Self {
        let leaf = Leaf {
            parts: Vec::new(),
            expressions: Vec::new(),
            pretty: Vec::new(),
            title: None,
            result: math::finalize(""),
        };
        Self::new_leaf(raw, errors, leaf)
    }

    /// The input after macro and shorthand expansion.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Problems found while building this roll. Sub-rolls of a list keep their own.
    pub fn errors(&self) -> &[RollError] {
        &self.errors
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &RollKind {
        &self.kind
    }

    pub fn leaf(&self) -> Option<&Leaf> {
        match &self.kind {
            RollKind::Leaf(leaf) => Some(leaf),
            RollKind::Multi { .. } => None,
        }
    }

    /// The sub-rolls of a list. Blank entries are dropped, so `"1d20;"` is a list of one.
    pub fn multi(&self) -> Option<&[Roll]> {
        match &self.kind {
            RollKind::Leaf(_) => None,
            RollKind::Multi { rolls, .. } => Some(rolls.as_slice()),
        }
    }

    pub fn parts(&self) -> &[String] {
        self.leaf().map(|l| l.parts.as_slice()).unwrap_or_default()
    }

    pub fn expressions(&self) -> &[String] {
        self.leaf().map(|l| l.expressions.as_slice()).unwrap_or_default()
    }

    pub fn pretty(&self) -> &[String] {
        self.leaf().map(|l| l.pretty.as_slice()).unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.leaf().and_then(|l| l.title.as_deref())
    }

    pub fn result(&self) -> Option<&Result<Number, MathError>> {
        self.leaf().map(|l| &l.result)
    }

    /// True when neither this roll nor any sub-roll reported a problem.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
            && match &self.kind {
                RollKind::Leaf(leaf) => leaf.result.is_ok(),
                RollKind::Multi { rolls, .. } => rolls.iter().all(Roll::is_success),
            }
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn join_errors(errors: &[RollError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn render(leaf: &Leaf) -> String {
    let result = match &leaf.result {
        Ok(n) => n.to_string(),
        Err(e) => e.to_string(),
    };
    let mut text = format!(
        "{} = {} = {}",
        leaf.parts.join(" "),
        leaf.pretty.join(" "),
        markdown::bold(result)
    );
    if let Some(title) = &leaf.title {
        text.push(' ');
        text.push_str(&markdown::bold(title));
    }
    text
}
