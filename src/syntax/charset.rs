//! Character sets written as `(...)` literals.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

/// An unordered, deduplicated set of characters used as a membership test.
///
/// Two sets are equal when they have the same members, regardless of the
/// order or repetition in the literal they were written as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharSet {
    chars: BTreeSet<char>,
}

impl CharSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(c);
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Render as a literal the chunker reads back to an equal set.
    pub fn to_literal(&self) -> String {
        let mut out = String::with_capacity(self.chars.len() + 2);
        out.push('(');
        for c in self.iter() {
            if c == ')' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(')');
        out
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl From<&str> for CharSet {
    fn from(chars: &str) -> Self {
        chars.chars().collect()
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl Serialize for CharSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.iter().collect::<String>())
    }
}
