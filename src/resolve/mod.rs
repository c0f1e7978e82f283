//! Getting from strings back to nodes
//!
//! - [`selector`]: location path selectors naming an anchor
//! - [`resolve_path`]: re-walking a fingerprint path from its anchor

pub mod selector;

pub use selector::{LocationPath, LocationPathResolver, SelectorResolver};

use crate::dom::{NodeId, TreeAccessor};
use crate::error::{FingerprintError, Result};
use crate::fingerprint::{Fingerprint, Path, Step};

/// Node reached by following `path` from `anchor`
///
/// Steps are read the way the neighborhood walk writes them: while the path
/// is climbing, `Down(n)` picks the sibling at position `n`; after the first
/// `Down`, each `Down(n)` picks the n-th child.
pub fn resolve_path<T: TreeAccessor + ?Sized>(tree: &T, anchor: NodeId, path: &Path) -> Result<NodeId> {
    let unresolvable = |reason: String| FingerprintError::UnresolvablePath {
        path: path.to_string(),
        reason,
    };

    if tree.tag(anchor).is_none() {
        return Err(unresolvable(format!("anchor {} does not resolve", anchor)));
    }

    let mut node = anchor;
    let mut climbing = true;
    for step in path.steps() {
        match *step {
            Step::Up => {
                if !climbing {
                    return Err(unresolvable("step up after stepping down".to_string()));
                }
                node = tree
                    .parent(node)
                    .ok_or_else(|| unresolvable(format!("node {} has no parent", node)))?;
            }
            Step::Down(n) => {
                let from = if climbing {
                    tree.parent(node)
                        .ok_or_else(|| unresolvable(format!("node {} has no parent", node)))?
                } else {
                    node
                };
                climbing = false;
                node = tree
                    .children(from)
                    .get((n as usize).wrapping_sub(1))
                    .copied()
                    .ok_or_else(|| unresolvable(format!("node {} has no child {}", from, n)))?;
            }
        }
    }
    Ok(node)
}

/// Outcome of re-walking one fingerprint path
#[derive(Debug, Clone, PartialEq)]
pub struct PathCheck {
    pub path: Path,
    pub outcome: Result<NodeId>,
}

/// Re-walk every path of `fingerprint` from `anchor`
///
/// Failures are reported per path and never stop the batch. For `Detailed`
/// fingerprints a path whose node no longer carries the recorded tag counts
/// as unresolvable.
pub fn validate_paths<T: TreeAccessor + ?Sized>(
    tree: &T,
    anchor: NodeId,
    fingerprint: &Fingerprint,
) -> Vec<PathCheck> {
    fingerprint
        .paths()
        .map(|path| {
            let outcome = resolve_path(tree, anchor, path).and_then(|node| {
                match (fingerprint.neighbor(path), tree.tag(node)) {
                    (Some(expected), Some(found)) if expected.tag != found => {
                        Err(FingerprintError::UnresolvablePath {
                            path: path.to_string(),
                            reason: format!("expected <{}>, found <{}>", expected.tag, found),
                        })
                    }
                    _ => Ok(node),
                }
            });
            if let Err(e) = &outcome {
                tracing::warn!(anchor, error = %e, "fingerprint path no longer resolves");
            }
            PathCheck { path: path.clone(), outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FingerprintConfig;
    use crate::dom::Document;
    use crate::fingerprint::{FingerprintKind, Fingerprinter};
    use crate::test_fixtures::{find_all, CARDS_HTML};

    fn path(text: &str) -> Path {
        text.parse().unwrap()
    }

    #[test]
    fn test_resolve_walk_paths() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let p = find_all(&doc, "p")[0];

        assert_eq!(resolve_path(&doc, p, &path("0.1")).unwrap(), find_all(&doc, "h3")[0]);
        assert_eq!(resolve_path(&doc, p, &path("0.3.1")).unwrap(), find_all(&doc, "a")[0]);
        assert_eq!(resolve_path(&doc, p, &path("0.3.2")).unwrap(), find_all(&doc, "span")[0]);

        let date = find_all(&doc, "span")[0];
        assert_eq!(resolve_path(&doc, date, &path("1")).unwrap(), find_all(&doc, "a")[0]);
    }

    #[test]
    fn test_every_emitted_path_resolves() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let config = FingerprintConfig::default();
        let fingerprinter = Fingerprinter::new(&doc, &config);
        for anchor in doc.elements() {
            let fp = fingerprinter.build(anchor, 4, FingerprintKind::Detailed).unwrap();
            for check in validate_paths(&doc, anchor, &fp) {
                let node = check.outcome.unwrap();
                assert_eq!(doc.tag(node), fp.neighbor(&check.path).map(|n| n.tag.as_str()));
            }
        }
    }

    #[test]
    fn test_unresolvable_paths() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let p = find_all(&doc, "p")[0];

        for bad in ["0.9", "0.3.7", "1.0", "0.0.0.0.0.0.0.0"] {
            assert!(
                matches!(
                    resolve_path(&doc, p, &path(bad)),
                    Err(FingerprintError::UnresolvablePath { .. })
                ),
                "{}",
                bad
            );
        }
        assert!(resolve_path(&doc, 999, &path("0")).is_err());
    }

    #[test]
    fn test_validate_after_change() {
        let before = Document::parse(CARDS_HTML.as_bytes());
        let config = FingerprintConfig::default();
        let anchor = find_all(&before, "p")[0];
        let fp = Fingerprinter::new(&before, &config)
            .build(anchor, 3, FingerprintKind::Detailed)
            .unwrap();

        // the footer lost its link, so the date moved up one position
        let after = Document::parse(
            b"<div><h3>Card One</h3><div><p>First</p></div><div><span>2024-01-01</span></div></div>",
        );
        let anchor = find_all(&after, "p")[0];
        let checks = validate_paths(&after, anchor, &fp);

        let failed: Vec<String> = checks
            .iter()
            .filter(|c| c.outcome.is_err())
            .map(|c| c.path.to_string())
            .collect();
        assert_eq!(checks.len(), 3);
        assert_eq!(failed, vec!["0.3.1", "0.3.2"]);
    }
}
