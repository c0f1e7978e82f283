//! Location path selectors
//!
//! Supported subset:
//! - absolute steps `/html/body/div`
//! - descendant steps `//p`
//! - `*` name wildcard
//! - a leading `.` (`.//p`), read from the document node
//! - predicates `[2]` (1-based, among the step's matches under one parent),
//!   `[@class]` and `[@class='card']`
//!
//! This is the form [`Document::node_path`] produces, so a node's path
//! resolves back to the node.

use crate::dom::{Document, NodeId, TreeAccessor};
use crate::error::{FingerprintError, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Turns a selector string into document nodes
pub trait SelectorResolver {
    /// Every match, in document order
    fn resolve_all(&self, doc: &Document, selector: &str) -> Result<Vec<NodeId>>;

    /// First match in document order
    fn resolve(&self, doc: &Document, selector: &str) -> Result<NodeId> {
        self.resolve_all(doc, selector)?
            .into_iter()
            .next()
            .ok_or_else(|| FingerprintError::NodeNotFound(selector.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    HasAttribute(String),
    AttributeEquals(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LocationStep {
    descendant: bool,
    test: NameTest,
    predicates: Vec<Predicate>,
}

/// A compiled selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPath {
    steps: Vec<LocationStep>,
}

impl LocationPath {
    pub fn compile(selector: &str) -> Result<Self> {
        let invalid = |why: &str| FingerprintError::InvalidSelector(format!("{}: {}", why, selector));
        let trimmed = selector.trim();
        // relative to the document node
        let bytes = trimmed.strip_prefix('.').unwrap_or(trimmed).as_bytes();
        if bytes.first() != Some(&b'/') {
            return Err(invalid("must start with '/'"));
        }

        let mut steps = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            if bytes[pos] != b'/' {
                return Err(invalid("expected '/'"));
            }
            pos += 1;
            let descendant = bytes.get(pos) == Some(&b'/');
            if descendant {
                pos += 1;
            }

            let start = pos;
            while pos < bytes.len() && bytes[pos] != b'/' && bytes[pos] != b'[' {
                pos += 1;
            }
            let name = std::str::from_utf8(&bytes[start..pos])
                .map_err(|_| invalid("bad name"))?
                .trim();
            let test = match name {
                "" => return Err(invalid("empty step")),
                "*" => NameTest::Any,
                n if n.bytes().all(|b| b.is_ascii_alphanumeric() || b"-_:.".contains(&b)) => {
                    NameTest::Name(n.to_ascii_lowercase())
                }
                _ => return Err(invalid("bad name")),
            };

            let mut predicates = Vec::new();
            while bytes.get(pos) == Some(&b'[') {
                let close = bytes[pos..]
                    .iter()
                    .position(|&b| b == b']')
                    .map(|offset| pos + offset)
                    .ok_or_else(|| invalid("unclosed predicate"))?;
                let body = std::str::from_utf8(&bytes[pos + 1..close])
                    .map_err(|_| invalid("bad predicate"))?;
                predicates.push(Self::parse_predicate(body.trim()).ok_or_else(|| invalid("bad predicate"))?);
                pos = close + 1;
            }

            steps.push(LocationStep { descendant, test, predicates });
        }

        Ok(LocationPath { steps })
    }

    fn parse_predicate(body: &str) -> Option<Predicate> {
        if let Some(attr) = body.strip_prefix('@') {
            return match attr.split_once('=') {
                None => Some(Predicate::HasAttribute(attr.trim().to_string())),
                Some((name, value)) => {
                    let value = value.trim();
                    let unquoted = value
                        .strip_prefix('\'')
                        .and_then(|v| v.strip_suffix('\''))
                        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))?;
                    Some(Predicate::AttributeEquals(name.trim().to_string(), unquoted.to_string()))
                }
            };
        }
        match body.parse::<usize>() {
            Ok(n) if n > 0 => Some(Predicate::Position(n)),
            _ => None,
        }
    }

    /// Matching elements in document order
    pub fn evaluate(&self, doc: &Document) -> Vec<NodeId> {
        let mut context = vec![doc.document_node_id()];

        for step in &self.steps {
            if step.descendant {
                context = context
                    .iter()
                    .flat_map(|&id| std::iter::once(id).chain(doc.descendants(id)))
                    .filter(|&id| id == 0 || doc.get_node(id).is_some_and(|n| n.is_element()))
                    .collect();
                // node ids follow document order
                context.sort_unstable();
                context.dedup();
            }

            let mut next = Vec::new();
            for &parent in &context {
                let mut matched: Vec<NodeId> = doc
                    .children(parent)
                    .into_iter()
                    .filter(|&c| Self::name_matches(doc, c, &step.test))
                    .collect();
                for predicate in &step.predicates {
                    matched = Self::apply(doc, matched, predicate);
                }
                next.extend(matched);
            }
            next.sort_unstable();
            next.dedup();
            context = next;

            if context.is_empty() {
                break;
            }
        }
        context
    }

    fn name_matches(doc: &Document, id: NodeId, test: &NameTest) -> bool {
        match test {
            NameTest::Any => true,
            NameTest::Name(name) => doc.tag(id) == Some(name.as_str()),
        }
    }

    fn apply(doc: &Document, matched: Vec<NodeId>, predicate: &Predicate) -> Vec<NodeId> {
        match predicate {
            Predicate::Position(n) => matched.get(n - 1).copied().into_iter().collect(),
            Predicate::HasAttribute(name) => matched
                .into_iter()
                .filter(|&id| doc.get_attribute(id, name).is_some())
                .collect(),
            Predicate::AttributeEquals(name, value) => matched
                .into_iter()
                .filter(|&id| doc.get_attribute(id, name) == Some(value.as_str()))
                .collect(),
        }
    }
}

/// Resolves location paths, memoizing compiled selectors
pub struct LocationPathResolver {
    cache: Mutex<LruCache<String, Arc<LocationPath>>>,
}

impl LocationPathResolver {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        LocationPathResolver {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Compiled form of `selector`, from cache when seen recently
    pub fn compiled(&self, selector: &str) -> Result<Arc<LocationPath>> {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(path) = cache.get(selector) {
            return Ok(Arc::clone(path));
        }
        let path = Arc::new(LocationPath::compile(selector)?);
        cache.put(selector.to_string(), Arc::clone(&path));
        Ok(path)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for LocationPathResolver {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SelectorResolver for LocationPathResolver {
    fn resolve_all(&self, doc: &Document, selector: &str) -> Result<Vec<NodeId>> {
        Ok(self.compiled(selector)?.evaluate(doc))
    }
}
