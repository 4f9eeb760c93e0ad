//! Resource tree produced by the section parser
//!
//! The three heading levels are distinct types so that a tree can only be
//! shaped as `ResourceTree -> CategoryNode -> SubcategoryNode -> LeafList`.
//! Every level serializes transparently, giving the nested JSON object
//! graph consumers expect.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// One bridge relay extracted from a "Tor bridges" section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorBridgeEntry {
    /// Transport token before the address (e.g. `obfs4`), may be empty
    pub prefix: String,
    /// Bracketed address with port, e.g. `[fd00::1]:1234`
    pub address: String,
    /// Remainder of the bridge line up to the closing backtick
    pub postfix: String,
    /// Operator named after "operated by"
    pub operated: String,
}

/// Entries collected under a level-3 heading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafList {
    entries: Vec<TorBridgeEntry>,
}

impl LeafList {
    /// Append an entry, keeping encounter order
    pub fn push(&mut self, entry: TorBridgeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TorBridgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A level-2 section: named leaf lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubcategoryNode {
    leaves: BTreeMap<String, LeafList>,
}

impl SubcategoryNode {
    /// Start a fresh leaf list under `name`, discarding any previous one
    pub fn insert_leaf(&mut self, name: &str) -> &mut LeafList {
        replace_entry(&mut self.leaves, name)
    }

    pub fn leaf(&self, name: &str) -> Option<&LeafList> {
        self.leaves.get(name)
    }

    pub fn leaf_mut(&mut self, name: &str) -> Option<&mut LeafList> {
        self.leaves.get_mut(name)
    }

    pub fn leaves(&self) -> impl Iterator<Item = (&str, &LeafList)> {
        self.leaves.iter().map(|(name, leaf)| (name.as_str(), leaf))
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// A level-1 category: named subcategories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryNode {
    subcategories: BTreeMap<String, SubcategoryNode>,
}

impl CategoryNode {
    /// Start a fresh subcategory under `name`, discarding any previous one
    pub fn insert_subcategory(&mut self, name: &str) -> &mut SubcategoryNode {
        replace_entry(&mut self.subcategories, name)
    }

    pub fn subcategory(&self, name: &str) -> Option<&SubcategoryNode> {
        self.subcategories.get(name)
    }

    pub fn subcategory_mut(&mut self, name: &str) -> Option<&mut SubcategoryNode> {
        self.subcategories.get_mut(name)
    }

    pub fn subcategories(&self) -> impl Iterator<Item = (&str, &SubcategoryNode)> {
        self.subcategories
            .iter()
            .map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.subcategories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subcategories.is_empty()
    }
}

/// Root of the catalog, keyed by level-1 heading text
///
/// Names are kept in a `BTreeMap`, so iteration and serialized output are
/// ordered by name and identical for identical input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTree {
    categories: BTreeMap<String, CategoryNode>,
}

impl ResourceTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh category under `name`, discarding any previous one
    pub fn insert_category(&mut self, name: &str) -> &mut CategoryNode {
        replace_entry(&mut self.categories, name)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryNode> {
        self.categories.get(name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut CategoryNode> {
        self.categories.get_mut(name)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryNode)> {
        self.categories
            .iter()
            .map(|(name, node)| (name.as_str(), node))
    }

    /// Look up a leaf by its full heading path
    pub fn leaf(&self, category: &str, subcategory: &str, leaf: &str) -> Option<&LeafList> {
        self.category(category)?.subcategory(subcategory)?.leaf(leaf)
    }

    /// Iterate every leaf as `(h1, h2, h3, list)`
    pub fn leaves(&self) -> impl Iterator<Item = (&str, &str, &str, &LeafList)> {
        self.categories().flat_map(|(h1, category)| {
            category.subcategories().flat_map(move |(h2, subcategory)| {
                subcategory
                    .leaves()
                    .map(move |(h3, leaf)| (h1, h2, h3, leaf))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Insert a default value under `key`, replacing whatever was there
fn replace_entry<'a, V: Default>(map: &'a mut BTreeMap<String, V>, key: &str) -> &'a mut V {
    match map.entry(key.to_string()) {
        Entry::Occupied(mut slot) => {
            slot.insert(V::default());
            slot.into_mut()
        }
        Entry::Vacant(slot) => slot.insert(V::default()),
    }
}
