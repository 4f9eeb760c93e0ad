//! Hierarchical section parser
//!
//! Scans markdown lines once, in order, and builds a [`ResourceTree`] from
//! `#`, `##` and `###` headings. Lines that match no rule, and headings that
//! have no enclosing parent, are skipped without error; the counts are kept
//! in [`ParseDiagnostics`].

use super::diagnostics::ParseDiagnostics;
use super::heading::HeadingLevel;
use super::rules::{default_rules, LineRule, RuleOutcome};
use super::tree::{LeafList, ResourceTree, TorBridgeEntry};

/// Cursor over the heading context of the line being scanned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseState {
    h1: Option<String>,
    h2: Option<String>,
    h3: Option<String>,
}

impl ParseState {
    pub fn current_h1(&self) -> Option<&str> {
        self.h1.as_deref()
    }

    pub fn current_h2(&self) -> Option<&str> {
        self.h2.as_deref()
    }

    /// Name of the active leaf section, if any
    pub fn current_h3(&self) -> Option<&str> {
        self.h3.as_deref()
    }
}

/// Parser state for turning a line sequence into a resource tree
pub struct SectionParser<'r> {
    /// Rules tried against every line, in order
    rules: &'r [LineRule],

    /// Current heading context
    state: ParseState,

    /// Tree under construction
    tree: ResourceTree,

    /// Counters for skipped and consumed lines
    diagnostics: ParseDiagnostics,
}

impl SectionParser<'static> {
    /// Create a parser using the built-in heading and Tor bridge rules
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }
}

impl Default for SectionParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> SectionParser<'r> {
    /// Create a parser with a custom rule set
    ///
    /// # Parameters
    /// * `rules` - Line rules in evaluation order; the first match wins
    pub fn with_rules(rules: &'r [LineRule]) -> Self {
        Self {
            rules,
            state: ParseState::default(),
            tree: ResourceTree::new(),
            diagnostics: ParseDiagnostics::default(),
        }
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Classify one line and apply the first rule that matches it
    pub fn feed(&mut self, line: &str) {
        self.diagnostics.lines_scanned += 1;

        let rules = self.rules;
        for rule in rules {
            let Some(captures) = rule.matches(&self.state, line) else {
                continue;
            };
            if rule.apply(self, &captures) == RuleOutcome::Rejected {
                log::debug!(
                    "Skipping {} on line {}: no enclosing heading",
                    rule.name(),
                    self.diagnostics.lines_scanned
                );
                self.diagnostics.orphan_headings += 1;
            }
            return;
        }

        self.diagnostics.lines_ignored += 1;
    }

    /// Finish the scan and hand over the tree
    ///
    /// # Returns
    /// * `(ResourceTree, ParseDiagnostics)` - The completed tree and scan counters
    pub fn finish(mut self) -> (ResourceTree, ParseDiagnostics) {
        self.diagnostics.empty_leaves = self
            .tree
            .leaves()
            .filter(|(_, _, _, leaf)| leaf.is_empty())
            .count();
        (self.tree, self.diagnostics)
    }

    /// Start a new node for a heading and move the cursor onto it
    ///
    /// A shallower heading clears every deeper level of the cursor. Headings
    /// whose parent level is not active are rejected and leave the cursor
    /// untouched.
    pub fn open_heading(&mut self, level: HeadingLevel, name: &str) -> RuleOutcome {
        match level {
            HeadingLevel::H1 => {
                self.tree.insert_category(name);
                self.state.h1 = Some(name.to_string());
                self.state.h2 = None;
                self.state.h3 = None;
            }
            HeadingLevel::H2 => {
                let Some(category) = self
                    .state
                    .h1
                    .as_deref()
                    .and_then(|h1| self.tree.category_mut(h1))
                else {
                    return RuleOutcome::Rejected;
                };
                category.insert_subcategory(name);
                self.state.h2 = Some(name.to_string());
                self.state.h3 = None;
            }
            HeadingLevel::H3 => {
                let path = self.state.h1.as_deref().zip(self.state.h2.as_deref());
                let Some(subcategory) = path.and_then(|(h1, h2)| {
                    self.tree
                        .category_mut(h1)
                        .and_then(|category| category.subcategory_mut(h2))
                }) else {
                    return RuleOutcome::Rejected;
                };
                subcategory.insert_leaf(name);
                self.state.h3 = Some(name.to_string());
            }
        }

        log::trace!("Opened {} '{}'", level, name);
        self.diagnostics.headings += 1;
        RuleOutcome::Applied
    }

    /// Append an entry to the active leaf list
    pub fn append_entry(&mut self, entry: TorBridgeEntry) -> RuleOutcome {
        let Some(leaf) = self.current_leaf_mut() else {
            return RuleOutcome::Rejected;
        };
        log::debug!("Found bridge {} operated by {}", entry.address, entry.operated);
        leaf.push(entry);
        self.diagnostics.entries += 1;
        RuleOutcome::Applied
    }

    fn current_leaf_mut(&mut self) -> Option<&mut LeafList> {
        let h1 = self.state.h1.as_deref()?;
        let h2 = self.state.h2.as_deref()?;
        let h3 = self.state.h3.as_deref()?;
        self.tree.category_mut(h1)?.subcategory_mut(h2)?.leaf_mut(h3)
    }
}

/// Parse a line sequence into a resource tree
///
/// Never fails: malformed or out-of-order input produces a partial tree.
pub fn parse<I, S>(lines: I) -> ResourceTree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with_diagnostics(lines).0
}

/// Parse a line sequence, also returning the scan counters
pub fn parse_with_diagnostics<I, S>(lines: I) -> (ResourceTree, ParseDiagnostics)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = SectionParser::new();
    for line in lines {
        parser.feed(line.as_ref());
    }
    let (tree, diagnostics) = parser.finish();
    log::debug!("Parsed resource tree: {}", diagnostics);
    (tree, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WORKED_EXAMPLE: &str = "\
# Public Peers
## Europe
### Tor bridges
- `prefix1 [fd00::1]:1234 extra text` operated by Alice
- this line does not match
## Asia
### Regular
";

    #[test]
    fn test_empty_input_yields_empty_tree() {
        let (tree, diagnostics) = parse_with_diagnostics(Vec::<String>::new());

        assert!(tree.is_empty());
        assert_eq!(diagnostics, ParseDiagnostics::default());
    }

    #[test]
    fn test_worked_example() {
        // Arrange
        let expected = json!({
            "Public Peers": {
                "Europe": {
                    "Tor bridges": [{
                        "prefix": "prefix1",
                        "address": "[fd00::1]:1234",
                        "postfix": "extra text",
                        "operated": "Alice"
                    }]
                },
                "Asia": {
                    "Regular": []
                }
            }
        });

        // Act
        let (tree, diagnostics) = parse_with_diagnostics(WORKED_EXAMPLE.lines());

        // Assert
        assert_eq!(serde_json::to_value(&tree).unwrap(), expected);
        assert_eq!(diagnostics.entries, 1);
        assert_eq!(diagnostics.lines_ignored, 1);
        assert_eq!(diagnostics.headings, 5);
        assert_eq!(diagnostics.empty_leaves, 1);
    }

    #[test]
    fn test_single_chain_has_one_key_per_level() {
        let tree = parse(["# Services", "## DNS", "### Resolvers"]);

        assert_eq!(tree.len(), 1);
        let category = tree.category("Services").unwrap();
        assert_eq!(category.len(), 1);
        let subcategory = category.subcategory("DNS").unwrap();
        assert_eq!(subcategory.len(), 1);
        assert!(subcategory.leaf("Resolvers").unwrap().is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse(WORKED_EXAMPLE.lines());
        let second = parse(WORKED_EXAMPLE.lines());

        assert_eq!(first, second);
    }

    #[test]
    fn test_four_hashes_is_not_a_heading() {
        let (tree, diagnostics) =
            parse_with_diagnostics(["# Peers", "## Europe", "#### Deep", "### Leaf"]);

        let europe = tree.category("Peers").unwrap().subcategory("Europe").unwrap();
        assert_eq!(europe.len(), 1);
        assert!(europe.leaf("Deep").is_none());
        assert_eq!(diagnostics.lines_ignored, 1);
    }

    #[test]
    fn test_new_h1_clears_deeper_context() {
        // Arrange: an h3 directly after a fresh h1 has no h2 to live under
        let lines = [
            "# First",
            "## Europe",
            "### Tor bridges",
            "# Second",
            "### Tor bridges",
            "- `obfs4 [fd00::1]:443 x` operated by Dan",
        ];

        // Act
        let (tree, diagnostics) = parse_with_diagnostics(lines);

        // Assert
        assert!(tree.category("Second").unwrap().is_empty());
        assert_eq!(diagnostics.orphan_headings, 1);
        assert_eq!(diagnostics.entries, 0);
        assert_eq!(diagnostics.lines_ignored, 1);
    }

    #[test]
    fn test_new_h2_clears_leaf_context() {
        let tree = parse([
            "# Peers",
            "## Europe",
            "### Tor bridges",
            "## Asia",
            "- `obfs4 [fd00::1]:443 x` operated by Dan",
        ]);

        let leaf = tree.leaf("Peers", "Europe", "Tor bridges").unwrap();
        assert!(leaf.is_empty());
        assert!(tree.category("Peers").unwrap().subcategory("Asia").unwrap().is_empty());
    }

    #[test]
    fn test_h2_before_any_h1_is_ignored() {
        let (tree, diagnostics) = parse_with_diagnostics(["## Orphan", "### Leaf", "prose"]);

        assert!(tree.is_empty());
        assert_eq!(diagnostics.orphan_headings, 2);
        assert_eq!(diagnostics.lines_ignored, 1);
    }

    #[test]
    fn test_bridge_lines_outside_tor_bridges_are_ignored() {
        let tree = parse([
            "# Peers",
            "## Europe",
            "### Regular",
            "- `obfs4 [fd00::1]:443 x` operated by Dan",
        ]);

        assert!(tree.leaf("Peers", "Europe", "Regular").unwrap().is_empty());
    }

    #[test]
    fn test_entries_keep_encounter_order() {
        let tree = parse([
            "# Peers",
            "## Europe",
            "### Tor bridges",
            "",
            "Some prose about bridges.",
            "- `obfs4 [fd00::1]:1 a` operated by First",
            "* unrelated bullet",
            "- `[fd00::2]:2 b` operated by Second",
        ]);

        let operators: Vec<_> = tree
            .leaf("Peers", "Europe", "Tor bridges")
            .unwrap()
            .entries()
            .iter()
            .map(|entry| entry.operated.as_str())
            .collect();
        assert_eq!(operators, vec!["First", "Second"]);
    }

    #[test]
    fn test_repeated_heading_keeps_last_occurrence() {
        // Arrange
        let lines = [
            "# Peers",
            "## Europe",
            "### Tor bridges",
            "- `obfs4 [fd00::1]:1 a` operated by Old",
            "## Europe",
            "### Tor bridges",
            "- `obfs4 [fd00::2]:2 b` operated by New",
        ];

        // Act
        let tree = parse(lines);

        // Assert
        let entries = tree.leaf("Peers", "Europe", "Tor bridges").unwrap().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operated, "New");
        assert_eq!(entries[0].address, "[fd00::2]:2");
    }

    #[test]
    fn test_repeated_h1_discards_earlier_subtree() {
        let tree = parse(["# Peers", "## Europe", "# Peers", "## Asia"]);

        let peers = tree.category("Peers").unwrap();
        assert!(peers.subcategory("Europe").is_none());
        assert!(peers.subcategory("Asia").is_some());
    }

    #[test]
    fn test_crlf_document_is_split_cleanly() {
        let document =
            "# Peers\r\n## Europe\r\n### Tor bridges\r\n- `x [fd00::1]:1 y` operated by Eve\r\n";

        let tree = parse(document.lines());

        let entries = tree.leaf("Peers", "Europe", "Tor bridges").unwrap().entries();
        assert_eq!(entries[0].operated, "Eve");
    }

    #[test]
    fn test_custom_rule_set_without_bridge_rule() {
        let mut rules = crate::catalog::rules::build_default_rules().unwrap();
        rules.retain(|rule| rule.name() != "tor-bridge");
        let mut parser = SectionParser::with_rules(&rules);

        for line in WORKED_EXAMPLE.lines() {
            parser.feed(line);
        }
        let (tree, diagnostics) = parser.finish();

        assert!(tree.leaf("Public Peers", "Europe", "Tor bridges").unwrap().is_empty());
        assert_eq!(diagnostics.lines_ignored, 2);
    }

    #[test]
    fn test_cursor_tracks_headings() {
        let mut parser = SectionParser::new();
        parser.feed("# Peers");
        parser.feed("## Europe");
        parser.feed("### Tor bridges");

        assert_eq!(parser.state().current_h1(), Some("Peers"));
        assert_eq!(parser.state().current_h2(), Some("Europe"));
        assert_eq!(parser.state().current_h3(), Some("Tor bridges"));

        parser.feed("## Asia");

        assert_eq!(parser.state().current_h2(), Some("Asia"));
        assert_eq!(parser.state().current_h3(), None);
    }
}
