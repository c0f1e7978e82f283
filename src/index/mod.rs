//! Document-wide fingerprint index
//!
//! Every qualifying element is fingerprinted once and grouped under the
//! canonical text of its fingerprint. The index is a snapshot: a changed
//! document needs a fresh index.

use crate::dom::{NodeId, TreeAccessor};
use crate::error::{FingerprintError, Result};
use crate::fingerprint::{Fingerprint, FingerprintKind, Fingerprinter};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Nodes sharing one fingerprint key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Tag of the first node grouped under the key
    pub tag: String,
    /// Document order
    pub nodes: Vec<NodeId>,
}

/// A node left out of the index and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedNode {
    pub node: NodeId,
    pub error: FingerprintError,
}

#[derive(Debug, Clone)]
pub struct FingerprintIndex {
    entries: BTreeMap<String, IndexEntry>,
    skipped: Vec<SkippedNode>,
    kind: FingerprintKind,
    depth: usize,
}

enum Outcome {
    Keyed(String, String),
    Empty,
    Unqualified,
    Skipped(FingerprintError),
}

impl FingerprintIndex {
    /// Fingerprint every qualifying element of the tree
    ///
    /// Nodes with an empty fingerprint are left out. Nodes the walk cannot
    /// handle are recorded in [`FingerprintIndex::skipped`] instead of failing
    /// the build.
    pub fn build<T>(fingerprinter: &Fingerprinter<'_, T>, depth: usize, kind: FingerprintKind) -> Self
    where
        T: TreeAccessor + Sync + ?Sized,
    {
        let tree = fingerprinter.tree();
        let candidates = tree.elements();

        let outcomes: Vec<(NodeId, Outcome)> = candidates
            .par_iter()
            .map(|&id| (id, Self::fingerprint_node(fingerprinter, id, depth, kind)))
            .collect();

        let mut entries: BTreeMap<String, IndexEntry> = BTreeMap::new();
        let mut skipped = Vec::new();
        for (node, outcome) in outcomes {
            match outcome {
                Outcome::Keyed(key, tag) => {
                    entries
                        .entry(key)
                        .or_insert_with(|| IndexEntry { tag, nodes: Vec::new() })
                        .nodes
                        .push(node);
                }
                Outcome::Skipped(error) => {
                    tracing::warn!(node, error = %error, "skipping node while indexing");
                    skipped.push(SkippedNode { node, error });
                }
                Outcome::Empty | Outcome::Unqualified => {}
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            keys = entries.len(),
            skipped = skipped.len(),
            depth,
            "built fingerprint index"
        );

        FingerprintIndex { entries, skipped, kind, depth }
    }

    fn fingerprint_node<T>(
        fingerprinter: &Fingerprinter<'_, T>,
        id: NodeId,
        depth: usize,
        kind: FingerprintKind,
    ) -> Outcome
    where
        T: TreeAccessor + ?Sized,
    {
        match fingerprinter.qualifies(id) {
            Ok(true) => {}
            Ok(false) => return Outcome::Unqualified,
            Err(e) => return Outcome::Skipped(e),
        }
        let tag = match fingerprinter.tree().tag(id) {
            Some(tag) => tag.to_string(),
            None => return Outcome::Skipped(FingerprintError::MalformedTree { node: id }),
        };
        match fingerprinter.build(id, depth, kind) {
            Ok(fp) if fp.is_empty() => Outcome::Empty,
            Ok(fp) => Outcome::Keyed(fp.to_text(), tag),
            Err(e) => Outcome::Skipped(e),
        }
    }

    pub fn kind(&self) -> FingerprintKind {
        self.kind
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in canonical order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &IndexEntry)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    /// Nodes grouped under the key of `fingerprint`
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<&IndexEntry> {
        self.entries.get(&fingerprint.to_text())
    }

    pub fn skipped(&self) -> &[SkippedNode] {
        &self.skipped
    }

    /// Keys resembling `key`, in key order
    ///
    /// A key matches when its first node has the same tag as `key`'s and
    /// `1 - levenshtein(key, other) / len(key)` (in characters) is strictly
    /// greater than `ratio`. `key` passes the same test, so it is yielded
    /// only for `ratio < 1`. The returned iterator is lazy and can be cloned
    /// to iterate again.
    pub fn find_similar<'a>(
        &'a self,
        key: &str,
        ratio: f64,
    ) -> Result<impl Iterator<Item = &'a str> + Clone + 'a> {
        let (key, entry) = self
            .entries
            .get_key_value(key)
            .ok_or_else(|| FingerprintError::KeyNotFound(key.to_string()))?;
        let key_len = key.chars().count().max(1) as f64;

        Ok(self
            .entries
            .iter()
            .filter(move |(other, other_entry)| {
                other_entry.tag == entry.tag
                    && 1.0 - levenshtein(key, other) as f64 / key_len > ratio
            })
            .map(|(other, _)| other.as_str()))
    }
}

/// Character edit distance
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
