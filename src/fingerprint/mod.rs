//! Fingerprints - the signature of an anchor's bounded neighborhood
//!
//! Two shapes share one comparator contract:
//! - `Detailed`: canonical path -> `{tag, text}` of the neighbor
//! - `Paths`: bare set of canonical paths
//!
//! Canonical text forms (held fixed; used for caching and index keys):
//! - `Paths`: paths in canonical order joined by single spaces
//! - `Detailed`: JSON object keyed by path, keys in canonical order

pub mod compare;
pub mod path;
pub mod walker;

pub use compare::score;
pub use path::{Path, Step};
pub use walker::{ContentPredicate, NeighborDescriptor, NeighborhoodWalker};

use crate::config::FingerprintConfig;
use crate::core::{DefaultNormalizer, TextNormalizer};
use crate::dom::{NodeId, TreeAccessor};
use crate::error::{FingerprintError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Which fingerprint shape to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintKind {
    Paths,
    Detailed,
}

/// What a `Detailed` fingerprint records for each path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub tag: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    Detailed(BTreeMap<Path, Neighbor>),
    Paths(BTreeSet<Path>),
}

impl Fingerprint {
    /// Empty fingerprint of the given shape
    pub fn empty(kind: FingerprintKind) -> Self {
        match kind {
            FingerprintKind::Paths => Fingerprint::Paths(BTreeSet::new()),
            FingerprintKind::Detailed => Fingerprint::Detailed(BTreeMap::new()),
        }
    }

    /// Collect walk emissions; a repeated path overwrites the earlier entry
    pub fn from_descriptors<I>(kind: FingerprintKind, descriptors: I) -> Self
    where
        I: IntoIterator<Item = NeighborDescriptor>,
    {
        let mut fingerprint = Fingerprint::empty(kind);
        for d in descriptors {
            match &mut fingerprint {
                Fingerprint::Detailed(map) => {
                    map.insert(d.path, Neighbor { tag: d.tag, text: d.text });
                }
                Fingerprint::Paths(set) => {
                    set.insert(d.path);
                }
            }
        }
        fingerprint
    }

    pub fn kind(&self) -> FingerprintKind {
        match self {
            Fingerprint::Detailed(_) => FingerprintKind::Detailed,
            Fingerprint::Paths(_) => FingerprintKind::Paths,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Fingerprint::Detailed(map) => map.len(),
            Fingerprint::Paths(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in canonical order
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        let (detailed, bare) = match self {
            Fingerprint::Detailed(map) => (Some(map.keys()), None),
            Fingerprint::Paths(set) => (None, Some(set.iter())),
        };
        detailed.into_iter().flatten().chain(bare.into_iter().flatten())
    }

    pub fn contains(&self, path: &Path) -> bool {
        match self {
            Fingerprint::Detailed(map) => map.contains_key(path),
            Fingerprint::Paths(set) => set.contains(path),
        }
    }

    /// Descriptor for a path (`Detailed` only)
    pub fn neighbor(&self, path: &Path) -> Option<&Neighbor> {
        match self {
            Fingerprint::Detailed(map) => map.get(path),
            Fingerprint::Paths(_) => None,
        }
    }

    /// Drop descriptors, keeping the key set
    pub fn to_paths(&self) -> Fingerprint {
        Fingerprint::Paths(self.paths().cloned().collect())
    }

    /// Canonical text form
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Parse canonical text; a leading `{` selects the `Detailed` shape
    pub fn from_text(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.starts_with('{') {
            let map: BTreeMap<Path, Neighbor> = serde_json::from_str(trimmed)?;
            return Ok(Fingerprint::Detailed(map));
        }
        trimmed
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<Path>()
                    .map_err(|_| FingerprintError::InvalidFingerprint(format!("bad path {:?}", token)))
            })
            .collect::<Result<BTreeSet<_>>>()
            .map(Fingerprint::Paths)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Detailed(map) => {
                let json = serde_json::to_string(map).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Fingerprint::Paths(set) => {
                for (i, path) in set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", path)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self> {
        Fingerprint::from_text(s)
    }
}

static DEFAULT_NORMALIZER: DefaultNormalizer = DefaultNormalizer;

/// Builds fingerprints over one tree with one configuration
pub struct Fingerprinter<'a, T: TreeAccessor + ?Sized> {
    tree: &'a T,
    config: &'a FingerprintConfig,
    normalizer: &'a dyn TextNormalizer,
}

impl<'a, T: TreeAccessor + ?Sized> Fingerprinter<'a, T> {
    pub fn new(tree: &'a T, config: &'a FingerprintConfig) -> Self {
        Fingerprinter {
            tree,
            config,
            normalizer: &DEFAULT_NORMALIZER,
        }
    }

    /// Replace the text normalization collaborator
    pub fn with_normalizer(mut self, normalizer: &'a dyn TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn tree(&self) -> &'a T {
        self.tree
    }

    pub fn config(&self) -> &'a FingerprintConfig {
        self.config
    }

    fn predicate(&self) -> ContentPredicate<'a> {
        ContentPredicate::new(self.config, self.normalizer)
    }

    /// Whether `id` itself satisfies the content predicate
    pub fn qualifies(&self, id: NodeId) -> Result<bool> {
        Ok(self.predicate().content(self.tree, id)?.is_some())
    }

    /// Walk from `anchor` and collect the emissions into a fingerprint
    pub fn build(&self, anchor: NodeId, depth: usize, kind: FingerprintKind) -> Result<Fingerprint> {
        let walker = NeighborhoodWalker::new(self.tree, self.predicate());
        let descriptors = walker.walk(anchor, depth)?;
        Ok(Fingerprint::from_descriptors(kind, descriptors))
    }
}
