//! WebLeaf - structural neighborhood fingerprints for document nodes
//!
//! Finds corresponding elements across structurally similar documents:
//! repeated template blocks, or the same element re-rendered with new
//! content. Layers, leaf first:
//! - `dom`: arena document and the [`TreeAccessor`] capability set
//! - `fingerprint`: neighborhood walk, fingerprint model, comparator
//! - `index`: document-wide fingerprint table with approximate key lookup
//! - `search`: parallel candidate ranking
//! - `resolve`: selectors and path re-walking
//!
//! ```
//! use webleaf::{build_fingerprint, compare, Document, FingerprintConfig, TreeAccessor};
//!
//! let doc = Document::parse(b"<div><h3>Title</h3><p>Body</p></div>");
//! let p = doc.elements()[2];
//! let config = FingerprintConfig::default();
//! let fp = build_fingerprint(&doc, p, 2, &config).unwrap();
//! assert_eq!(fp.to_text(), r#"{"1":{"tag":"h3","text":"Title"}}"#);
//! assert_eq!(compare(&fp, &fp), 1.0);
//! ```

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod reader;
pub mod resolve;
pub mod search;

#[cfg(feature = "nif")]
mod nif;
#[cfg(feature = "nif")]
mod resource;
#[cfg(feature = "nif")]
mod term;

#[cfg(test)]
mod test_fixtures;

pub use config::FingerprintConfig;
pub use dom::{Document, NodeId, TreeAccessor};
pub use error::{validate_depth, FingerprintError, Result};
pub use fingerprint::{Fingerprint, FingerprintKind, Fingerprinter, Neighbor, Path, Step};
pub use index::FingerprintIndex;
pub use resolve::{resolve_path, validate_paths, LocationPathResolver, SelectorResolver};
pub use search::Match;

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Fingerprints
// ============================================================================

/// Fingerprint of `anchor` with the configured shape
pub fn build_fingerprint<T: TreeAccessor + ?Sized>(
    tree: &T,
    anchor: NodeId,
    depth: i64,
    config: &FingerprintConfig,
) -> Result<Fingerprint> {
    let depth = validate_depth(depth)?;
    Fingerprinter::new(tree, config).build(anchor, depth, config.kind)
}

/// Canonical text of a fingerprint
pub fn fingerprint_to_text(fingerprint: &Fingerprint) -> String {
    fingerprint.to_text()
}

/// Parse canonical fingerprint text
pub fn fingerprint_from_text(text: &str) -> Result<Fingerprint> {
    Fingerprint::from_text(text)
}

/// Similarity in `[0, 1]`
pub fn compare(a: &Fingerprint, b: &Fingerprint) -> f64 {
    fingerprint::score(a, b)
}

// ============================================================================
// Index and Search
// ============================================================================

/// Index every qualifying element, keyed with the configured index shape
pub fn build_index<T: TreeAccessor + Sync + ?Sized>(
    tree: &T,
    depth: i64,
    config: &FingerprintConfig,
) -> Result<FingerprintIndex> {
    let depth = validate_depth(depth)?;
    Ok(FingerprintIndex::build(&Fingerprinter::new(tree, config), depth, config.index_kind))
}

/// Element of `tree` most similar to `target`
pub fn find_best_match<T: TreeAccessor + Sync + ?Sized>(
    target: &Fingerprint,
    tree: &T,
    depth: i64,
    config: &FingerprintConfig,
) -> Result<NodeId> {
    let depth = validate_depth(depth)?;
    search::find_best_match(target, &Fingerprinter::new(tree, config), depth).map(|m| m.node)
}

/// The `n` elements of `tree` most similar to `target`, best first
pub fn find_top_n<T: TreeAccessor + Sync + ?Sized>(
    target: &Fingerprint,
    tree: &T,
    depth: i64,
    n: usize,
    config: &FingerprintConfig,
) -> Result<Vec<Match>> {
    let depth = validate_depth(depth)?;
    Ok(search::find_top_n(target, &Fingerprinter::new(tree, config), depth, n))
}

// ============================================================================
// Resolution
// ============================================================================

/// First node matching `selector`
pub fn resolve_selector<R: SelectorResolver + ?Sized>(
    resolver: &R,
    doc: &Document,
    selector: &str,
) -> Result<NodeId> {
    resolver.resolve(doc, selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::CARDS_HTML;

    #[test]
    fn test_negative_depth_rejected_everywhere() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let config = FingerprintConfig::default();
        let target = Fingerprint::from_text("0.1").unwrap();

        assert_eq!(build_fingerprint(&doc, 1, -1, &config), Err(FingerprintError::InvalidDepth(-1)));
        assert!(matches!(build_index(&doc, -3, &config), Err(FingerprintError::InvalidDepth(-3))));
        assert_eq!(find_best_match(&target, &doc, -1, &config), Err(FingerprintError::InvalidDepth(-1)));
        assert_eq!(find_top_n(&target, &doc, -1, 3, &config), Err(FingerprintError::InvalidDepth(-1)));
    }

    #[test]
    fn test_end_to_end() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let config = FingerprintConfig::default();
        let resolver = LocationPathResolver::new(config.selector_cache_size);

        let date = resolve_selector(&resolver, &doc, "/html/body/div/div[1]/div[2]/span").unwrap();
        let fp = build_fingerprint(&doc, date, 3, &config).unwrap();
        assert_eq!(fp.kind(), FingerprintKind::Detailed);

        let text = fingerprint_to_text(&fp);
        let parsed = fingerprint_from_text(&text).unwrap();
        assert_eq!(compare(&fp, &parsed), 1.0);
        assert_eq!(find_best_match(&parsed, &doc, 3, &config).unwrap(), date);

        let index = build_index(&doc, 3, &config).unwrap();
        assert_eq!(index.kind(), FingerprintKind::Paths);
        let key = fp.to_paths().to_text();
        assert_eq!(index.get(&key).unwrap().nodes.len(), 3);

        let top = find_top_n(&parsed, &doc, 3, 2, &config).unwrap();
        assert_eq!(top[0].node, date);
        assert!(top[1].score < 1.0);
    }
}
