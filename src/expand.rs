//! Text rewriting applied to a roll before it is split and tokenized.
//!
//! The passes run in a fixed order, each consuming the previous one's output:
//!
//! 1. `abilities` shortcut
//! 2. bracket iteration (`[N]expr`)
//! 3. user macros
//! 4. check shorthand (`c5`, `c-2d`)
//! 5. attack shorthand (`4a:2.6:3`)
//! 6. bracket iteration again, for iterations introduced by the passes above

use crate::common::Int;
use crate::roll::{RollError, DEFAULT_ESCAPE};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, NoExpand, Regex};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{trace, warn};

lazy_static! {
    static ref ITERATION: Regex = Regex::new(r"\[([0-9]+)\](.*?)(;.*)?$").unwrap();
    static ref NEGATIVE_CHECK: Regex = Regex::new(r"c-([0-9]+)([ad])?").unwrap();
    static ref CHECK: Regex = Regex::new(r"c([0-9]+)([ad])?").unwrap();
    static ref ATTACK: Regex =
        Regex::new(r"([\-0-9]+)([ade])?:([0-9.]+):?([\-0-9]+)?").unwrap();
}

const ABILITIES: &str = "abilities";
const ABILITY_ROLL: &str = "4d6k3";
const ABILITY_COUNT: usize = 6;
const INDEX_PLACEHOLDER: &str = "{i}";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MacroError {
    #[error("macro names cannot contain spaces, `#`, `;` or `,`")]
    InvalidName,
    #[error("{0}")]
    Pattern(#[from] regex::Error),
}

/// A named shorthand that expands to a full roll.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Macro {
    pub name: String,
    pub text: String,
}

fn pattern(name: &str, escape: &str) -> Result<Regex, MacroError> {
    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | ';' | ','))
    {
        return Err(MacroError::InvalidName);
    }
    let pattern = format!(
        r"(?i)^(?:{}r(?:oll)?)?\s?{}\b",
        regex::escape(escape),
        regex::escape(name)
    );
    Ok(Regex::new(&pattern)?)
}

#[derive(Debug, Clone)]
struct Entry {
    def: Macro,
    pattern: Result<Regex, MacroError>,
}

impl Entry {
    fn new(def: Macro, escape: &str) -> Self {
        let pattern = pattern(&def.name, escape);
        Self { def, pattern }
    }
}

/// A user's macros, applied in insertion order. Names are case-insensitive.
///
/// Each macro's pattern is compiled once, when it is inserted or the escape changes.
#[derive(Debug, Clone)]
pub struct MacroBook {
    escape: String,
    macros: IndexMap<String, Entry>,
}

impl Default for MacroBook {
    fn default() -> Self {
        Self {
            escape: DEFAULT_ESCAPE.to_string(),
            macros: IndexMap::new(),
        }
    }
}

impl MacroBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a macro, replacing (and moving to the end) any macro with the same name.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> Option<Macro> {
        let name = name.into();
        let key = name.to_lowercase();
        let previous = self.macros.shift_remove(&key);
        let def = Macro {
            name,
            text: text.into(),
        };
        self.macros.insert(key, Entry::new(def, &self.escape));
        previous.map(|e| e.def)
    }

    pub fn remove(&mut self, name: &str) -> Option<Macro> {
        self.macros.shift_remove(&name.to_lowercase()).map(|e| e.def)
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(&name.to_lowercase()).map(|e| &e.def)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Macro> + '_ {
        self.macros.values().map(|e| &e.def)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn escape(&self) -> &str {
        &self.escape
    }

    /// Recompiles every pattern for a new command escape. Does nothing if it is unchanged.
    pub(crate) fn set_escape(&mut self, escape: &str) {
        if self.escape == escape {
            return;
        }
        self.escape = escape.to_string();
        for entry in self.macros.values_mut() {
            *entry = Entry::new(entry.def.clone(), escape);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MacroBook {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut book = Self::new();
        for (name, text) in iter {
            book.insert(name, text);
        }
        book
    }
}

pub struct Expander<'a> {
    pub macros: &'a MacroBook,
    pub max_iterations: usize,
}

impl Expander<'_> {
    /// Runs every pass over `input`, appending recoverable problems to `errors`.
    pub fn expand(&self, input: &str, errors: &mut Vec<RollError>) -> String {
        let s = abilities(input);
        let s = iterate(&s, self.max_iterations, errors);
        let s = apply_macros(&s, self.macros, errors);
        let s = checks(&s);
        let s = attacks(&s);
        let s = iterate(&s, self.max_iterations, errors);
        trace!(input, expanded = %s, "expanded roll");
        s
    }
}

/// Replaces any input mentioning `abilities` with six `4d6k3` rolls.
pub(crate) fn abilities(s: &str) -> String {
    if s.contains(ABILITIES) {
        vec![ABILITY_ROLL; ABILITY_COUNT].join(";")
    } else {
        s.to_string()
    }
}

/// Expands the first `[N]expr` into `N` `;`-joined copies of `expr`, numbering any
/// `{i}` placeholder from 1. `N` is clamped to `max`.
pub(crate) fn iterate(s: &str, max: usize, errors: &mut Vec<RollError>) -> String {
    let Some(caps) = ITERATION.captures(s) else {
        return s.to_string();
    };
    let (Some(whole), Some(count), Some(body)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return s.to_string();
    };

    let requested = count.as_str().parse::<usize>().unwrap_or(usize::MAX);
    let count = if requested > max {
        warn!(requested, max, "clamping iteration count");
        errors.push(RollError::TooManyIterations { used: max });
        max
    } else {
        requested
    };

    let body = body.as_str().trim();
    let copies = (1..=count)
        .map(|i| body.replace(INDEX_PLACEHOLDER, &i.to_string()))
        .collect::<Vec<_>>()
        .join(";");
    let rest = caps.get(3).map_or("", |m| m.as_str());

    format!(
        "{}{}{}{}",
        &s[..whole.start()],
        copies,
        rest,
        &s[whole.end()..]
    )
}

/// Substitutes each macro invoked at the start of `s`, optionally behind `<escape>r`
/// or `<escape>roll`.
pub(crate) fn apply_macros(s: &str, macros: &MacroBook, errors: &mut Vec<RollError>) -> String {
    let mut s = s.to_string();
    for Entry { def, pattern } in macros.macros.values() {
        if def.name.is_empty() || def.text.is_empty() {
            continue;
        }
        if !s.to_lowercase().contains(&def.name.to_lowercase()) {
            continue;
        }
        match pattern {
            Ok(pattern) => s = pattern.replace_all(&s, NoExpand(&def.text)).into_owned(),
            Err(source) => {
                warn!(name = %def.name, %source, "skipping malformed macro");
                errors.push(RollError::Macro {
                    name: def.name.clone(),
                    source: source.clone(),
                });
            }
        }
    }
    s
}

/// `cN` becomes `1d20 + N` and `c-N` becomes `1d20 - N`; a trailing `a` or `d` stays on the d20.
pub(crate) fn checks(s: &str) -> String {
    let s = NEGATIVE_CHECK.replace_all(s, "1d20${2} - ${1}");
    CHECK.replace_all(&s, "1d20${2} + ${1}").into_owned()
}

/// `<mod>[ade]:<die>[:<damage>]` becomes a `# hit` roll and a `# dmg` roll. A die
/// written `N.M` means `NdM`; otherwise it is a single die.
pub(crate) fn attacks(s: &str) -> String {
    ATTACK
        .replace_all(s, |caps: &Captures| {
            let hit = caps[1].parse::<Int>().unwrap_or(0);
            let flag = caps.get(2).map_or("", |m| m.as_str());
            let die = &caps[3];
            let damage = if die.contains('.') {
                die.replacen('.', "d", 1)
            } else {
                format!("1d{}", die)
            };
            let bonus = caps
                .get(4)
                .and_then(|m| m.as_str().parse::<Int>().ok())
                .unwrap_or(0);
            format!(
                "1d20{}{} # hit; {}{} # dmg",
                flag,
                signed(hit),
                damage,
                signed(bonus)
            )
        })
        .into_owned()
}

fn signed(n: Int) -> String {
    match n.cmp(&0) {
        Ordering::Greater => format!(" + {}", n),
        Ordering::Less => format!(" - {}", n.unsigned_abs()),
        Ordering::Equal => String::new(),
    }
}
