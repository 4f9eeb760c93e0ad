//! Line classification rules
//!
//! Each rule pairs a regex with a guard on the parse cursor and a handler
//! that mutates the tree. The parser tries rules in order and the first
//! rule whose guard passes and whose pattern matches consumes the line.

use super::heading::HeadingLevel;
use super::parser::{ParseState, SectionParser};
use super::tree::TorBridgeEntry;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Name of the only leaf section whose list items are extracted
pub const TOR_BRIDGES: &str = "Tor bridges";

/// Inline record format used inside "Tor bridges" sections
///
/// ```text
/// - `obfs4 [fd00::1]:443 cert=... iat-mode=0` operated by someone
/// ```
pub const TOR_BRIDGE_PATTERN: &str = r"^- `(\S*)\s?(\[[\da-f:]+\]:\d+) (.+)` operated by (.+)";

/// Result of running a rule handler on a matched line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The tree or cursor was updated
    Applied,
    /// The line matched but the cursor had no parent for it
    Rejected,
}

/// Decides whether a rule is considered for the current cursor
pub type RuleGuard = fn(&ParseState) -> bool;

/// Applies a matched line to the parser
pub type RuleHandler = fn(&mut SectionParser<'_>, &Captures<'_>) -> RuleOutcome;

/// A pattern and the tree mutation it triggers
pub struct LineRule {
    name: &'static str,
    pattern: Regex,
    guard: RuleGuard,
    handler: RuleHandler,
}

impl LineRule {
    /// Compile a rule
    ///
    /// # Parameters
    /// * `name` - Short label used in logs
    /// * `pattern` - Regex tested against each line
    /// * `guard` - Cursor precondition; the pattern is not even tried when it fails
    /// * `handler` - Mutation to run with the captures of a matching line
    pub fn new(
        name: &'static str,
        pattern: &str,
        guard: RuleGuard,
        handler: RuleHandler,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            guard,
            handler,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Captures for `line` if this rule applies in the current state
    pub fn matches<'l>(&self, state: &ParseState, line: &'l str) -> Option<Captures<'l>> {
        if !(self.guard)(state) {
            return None;
        }
        self.pattern.captures(line)
    }

    /// Run the handler for a line this rule matched
    pub fn apply(&self, parser: &mut SectionParser<'_>, captures: &Captures<'_>) -> RuleOutcome {
        (self.handler)(parser, captures)
    }
}

impl std::fmt::Debug for LineRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// The built-in rule set: three heading levels, then Tor bridge entries
pub fn default_rules() -> &'static [LineRule] {
    static RULES: OnceLock<Vec<LineRule>> = OnceLock::new();
    RULES.get_or_init(|| build_default_rules().expect("built-in line patterns are valid regexes"))
}

/// Compile the built-in rules in evaluation order
pub fn build_default_rules() -> Result<Vec<LineRule>, regex::Error> {
    Ok(vec![
        LineRule::new("h1", &HeadingLevel::H1.pattern(), always, open_h1)?,
        LineRule::new("h2", &HeadingLevel::H2.pattern(), always, open_h2)?,
        LineRule::new("h3", &HeadingLevel::H3.pattern(), always, open_h3)?,
        LineRule::new("tor-bridge", TOR_BRIDGE_PATTERN, in_tor_bridges, append_tor_bridge)?,
    ])
}

fn always(_: &ParseState) -> bool {
    true
}

fn in_tor_bridges(state: &ParseState) -> bool {
    state.current_h3() == Some(TOR_BRIDGES)
}

fn open_h1(parser: &mut SectionParser<'_>, captures: &Captures<'_>) -> RuleOutcome {
    parser.open_heading(HeadingLevel::H1, capture(captures, 1))
}

fn open_h2(parser: &mut SectionParser<'_>, captures: &Captures<'_>) -> RuleOutcome {
    parser.open_heading(HeadingLevel::H2, capture(captures, 1))
}

fn open_h3(parser: &mut SectionParser<'_>, captures: &Captures<'_>) -> RuleOutcome {
    parser.open_heading(HeadingLevel::H3, capture(captures, 1))
}

fn append_tor_bridge(parser: &mut SectionParser<'_>, captures: &Captures<'_>) -> RuleOutcome {
    parser.append_entry(TorBridgeEntry {
        prefix: capture(captures, 1).to_string(),
        address: capture(captures, 2).to_string(),
        postfix: capture(captures, 3).to_string(),
        operated: capture(captures, 4).to_string(),
    })
}

/// Text of group `index`, empty when the group did not participate
fn capture<'c>(captures: &Captures<'c>, index: usize) -> &'c str {
    captures.get(index).map_or("", |m| m.as_str())
}
