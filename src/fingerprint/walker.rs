//! Neighborhood walk
//!
//! Bounded FIFO breadth-first traversal from an anchor. While the path is
//! climbing (empty or ending in `Up`) the walk moves to the parent and fans
//! out to the current node's siblings; once a path has stepped down it only
//! descends. Every qualifying node reached within the bound is emitted with
//! the path that reached it, so a node reachable along two paths is emitted
//! twice.

use super::path::{Path, Step};
use crate::config::FingerprintConfig;
use crate::core::TextNormalizer;
use crate::dom::{NodeId, TreeAccessor};
use crate::error::{FingerprintError, Result};
use std::collections::VecDeque;

/// A qualifying node reached by the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborDescriptor {
    pub path: Path,
    pub tag: String,
    /// Normalized direct text
    pub text: String,
}

/// Decides whether a node counts as content
pub struct ContentPredicate<'a> {
    config: &'a FingerprintConfig,
    normalizer: &'a dyn TextNormalizer,
}

impl<'a> ContentPredicate<'a> {
    pub fn new(config: &'a FingerprintConfig, normalizer: &'a dyn TextNormalizer) -> Self {
        ContentPredicate { config, normalizer }
    }

    /// `(tag, normalized text)` when the node qualifies
    ///
    /// Fails only when `id` does not resolve in the tree.
    pub fn content<T: TreeAccessor + ?Sized>(
        &self,
        tree: &T,
        id: NodeId,
    ) -> Result<Option<(String, String)>> {
        let tag = tree.tag(id).ok_or(FingerprintError::MalformedTree { node: id })?;
        if id == tree.document_node_id() || self.config.is_excluded(tag) {
            return Ok(None);
        }
        Ok(tree
            .raw_text(id)
            .and_then(|raw| self.normalizer.normalize(raw))
            .map(|text| (tag.to_string(), text)))
    }
}

/// Runs the bounded walk over a tree
pub struct NeighborhoodWalker<'a, T: TreeAccessor + ?Sized> {
    tree: &'a T,
    predicate: ContentPredicate<'a>,
}

impl<'a, T: TreeAccessor + ?Sized> NeighborhoodWalker<'a, T> {
    pub fn new(tree: &'a T, predicate: ContentPredicate<'a>) -> Self {
        NeighborhoodWalker { tree, predicate }
    }

    /// Collect every qualifying neighbor of `anchor` within `depth` steps, in
    /// visit order.
    ///
    /// Errors with `MalformedTree` when the anchor does not resolve, a
    /// parent does not list its child, or a child id dangles.
    pub fn walk(&self, anchor: NodeId, depth: usize) -> Result<Vec<NeighborDescriptor>> {
        if self.tree.tag(anchor).is_none() {
            return Err(FingerprintError::MalformedTree { node: anchor });
        }

        let mut emitted = Vec::new();
        let mut queue: VecDeque<(NodeId, Path)> = VecDeque::new();
        queue.push_back((anchor, Path::root()));

        while let Some((node, path)) = queue.pop_front() {
            if path.depth() > depth {
                continue;
            }

            // Anything enqueued from here would sit past the bound
            if path.depth() < depth {
                self.expand(node, &path, &mut queue)?;
            }

            if !path.is_empty() {
                if let Some((tag, text)) = self.predicate.content(self.tree, node)? {
                    emitted.push(NeighborDescriptor { path, tag, text });
                }
            }
        }

        Ok(emitted)
    }

    fn expand(
        &self,
        node: NodeId,
        path: &Path,
        queue: &mut VecDeque<(NodeId, Path)>,
    ) -> Result<()> {
        if path.is_going_up() {
            let Some(parent) = self.tree.parent(node) else {
                return Ok(());
            };
            let siblings = self.tree.children(parent);
            if !siblings.contains(&node) {
                return Err(FingerprintError::MalformedTree { node });
            }

            queue.push_back((parent, path.child(Step::Up)));
            for (index, &sibling) in siblings.iter().enumerate() {
                if sibling != node {
                    queue.push_back((sibling, path.child(Step::Down(index as u32 + 1))));
                }
            }
        } else {
            for (index, child) in self.tree.children(node).into_iter().enumerate() {
                queue.push_back((child, path.child(Step::Down(index as u32 + 1))));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DefaultNormalizer;
    use crate::dom::Document;
    use crate::test_fixtures::{find_all, TableTree, CARDS_HTML};

    fn walk(doc: &Document, anchor: NodeId, depth: usize) -> Vec<String> {
        let config = FingerprintConfig::default();
        let walker = NeighborhoodWalker::new(doc, ContentPredicate::new(&config, &DefaultNormalizer));
        walker
            .walk(anchor, depth)
            .unwrap()
            .into_iter()
            .map(|d| d.path.to_string())
            .collect()
    }

    #[test]
    fn test_walk_depths_for_description() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let p = find_all(&doc, "p")[0];

        assert!(walk(&doc, p, 0).is_empty());
        assert!(walk(&doc, p, 1).is_empty());
        assert_eq!(walk(&doc, p, 2), vec!["0.1"]);
        assert_eq!(walk(&doc, p, 3), vec!["0.1", "0.3.1", "0.3.2"]);
    }

    #[test]
    fn test_descriptors_carry_tag_and_text() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let p = find_all(&doc, "p")[0];
        let config = FingerprintConfig::default();
        let walker = NeighborhoodWalker::new(&doc, ContentPredicate::new(&config, &DefaultNormalizer));
        let emitted = walker.walk(p, 2).unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].tag, "h3");
        assert_eq!(emitted[0].text, "Card One");
    }

    #[test]
    fn test_sibling_reached_directly() {
        let doc = Document::parse(CARDS_HTML.as_bytes());
        let date = find_all(&doc, "span")[0];
        assert_eq!(walk(&doc, date, 3), vec!["1", "0.1", "0.2.1"]);
    }

    #[test]
    fn test_excluded_tags_do_not_qualify() {
        let doc = Document::parse(b"<div><p>anchor</p><script>var x = 1;</script><b>bold</b></div>");
        let p = find_all(&doc, "p")[0];
        assert_eq!(walk(&doc, p, 1), vec!["3"]);
    }

    #[test]
    fn test_document_node_never_qualifies() {
        let doc = Document::parse(b"stray<div><p>x</p></div>");
        let div = find_all(&doc, "div")[0];
        assert!(walk(&doc, div, 1).is_empty());
        let p = find_all(&doc, "p")[0];
        assert!(walk(&doc, p, 3).is_empty());

        let config = FingerprintConfig::default();
        let predicate = ContentPredicate::new(&config, &DefaultNormalizer);
        assert_eq!(predicate.content(&doc, doc.document_node_id()), Ok(None));
    }

    #[test]
    fn test_same_node_via_two_paths() {
        // x is listed under both p and q; its parent link points at p
        let tree = TableTree::new(&[
            ("root", None, None),
            ("p", None, Some(0)),
            ("q", None, Some(0)),
            ("a", Some("anchor"), Some(1)),
            ("x", Some("shared"), Some(1)),
        ])
        .with_extra_child(2, 4);
        let config = FingerprintConfig::default();
        let walker = NeighborhoodWalker::new(&tree, ContentPredicate::new(&config, &DefaultNormalizer));
        let paths: Vec<String> = walker
            .walk(3, 3)
            .unwrap()
            .into_iter()
            .map(|d| d.path.to_string())
            .collect();
        assert_eq!(paths, vec!["2", "0.2.1"]);
    }

    #[test]
    fn test_broken_parent_link() {
        // b claims a as parent but a does not list it
        let tree = TableTree::new(&[("root", None, None), ("a", Some("x"), Some(0))])
            .with_orphan("b", Some("y"), 1);
        let config = FingerprintConfig::default();
        let walker = NeighborhoodWalker::new(&tree, ContentPredicate::new(&config, &DefaultNormalizer));
        assert_eq!(walker.walk(2, 2), Err(FingerprintError::MalformedTree { node: 2 }));
    }

    #[test]
    fn test_unresolvable_anchor() {
        let doc = Document::parse(b"<p>x</p>");
        let config = FingerprintConfig::default();
        let walker = NeighborhoodWalker::new(&doc, ContentPredicate::new(&config, &DefaultNormalizer));
        assert_eq!(
            walker.walk(999, 3),
            Err(FingerprintError::MalformedTree { node: 999 })
        );
    }
}
