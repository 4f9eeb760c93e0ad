//! Counters describing what a parse skipped

use std::fmt;

/// Observable summary of a parse
///
/// Parsing never fails, so these counters are the only way to see how much
/// of a document was not understood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseDiagnostics {
    /// Lines fed to the parser
    pub lines_scanned: usize,
    /// Headings that created a node
    pub headings: usize,
    /// Tor bridge entries extracted
    pub entries: usize,
    /// Lines that matched no rule
    pub lines_ignored: usize,
    /// Headings skipped because their parent level was not open
    pub orphan_headings: usize,
    /// Leaf sections still empty when the scan finished
    pub empty_leaves: usize,
}

impl fmt::Display for ParseDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines scanned, {} headings, {} entries, {} ignored, {} orphan headings, {} empty leaves",
            self.lines_scanned,
            self.headings,
            self.entries,
            self.lines_ignored,
            self.orphan_headings,
            self.empty_leaves
        )
    }
}
