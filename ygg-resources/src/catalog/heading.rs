//! Heading levels recognised by the section parser

use std::fmt;

/// Depth of a markdown heading, from the number of leading `#` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Number of `#` characters that introduce this level
    pub fn depth(self) -> usize {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }

    /// Regex matching a heading of exactly this level and capturing its text
    ///
    /// The marker must be followed by a space, so `## Foo` never matches H1
    /// and `#### Foo` matches none of the levels.
    pub fn pattern(self) -> String {
        format!("^{} (.*)", "#".repeat(self.depth()))
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.depth())
    }
}
