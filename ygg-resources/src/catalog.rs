//! Resource catalog extracted from the services document
//!
//! This module holds the line-oriented section parser and the typed tree it
//! produces. It performs no I/O.

// Submodules
mod diagnostics;
mod heading;
mod parser;
mod rules;
mod tree;

// Re-export public types
pub use diagnostics::ParseDiagnostics;
pub use heading::HeadingLevel;
pub use parser::{parse, parse_with_diagnostics, ParseState, SectionParser};
pub use rules::{default_rules, LineRule, RuleOutcome, TOR_BRIDGES, TOR_BRIDGE_PATTERN};
pub use tree::{CategoryNode, LeafList, ResourceTree, SubcategoryNode, TorBridgeEntry};
