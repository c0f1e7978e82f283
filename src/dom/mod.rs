//! DOM Module - Arena-based markup document
//!
//! Implements an efficient, read-only tree representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names and text

pub mod document;
pub mod node;
pub mod strings;

pub use document::Document;
pub use node::{Attribute, Node, NodeId, NodeKind};
pub use strings::StringPool;

/// Read-only capabilities the fingerprinting core needs from a tree.
///
/// Implemented by [`Document`]; foreign trees can implement it directly.
/// Nodes are compared by id only.
pub trait TreeAccessor {
    /// Id of the node every other node descends from
    fn document_node_id(&self) -> NodeId;

    /// Element tag, `None` for ids that do not resolve
    fn tag(&self, id: NodeId) -> Option<&str>;

    /// Raw content of the node's first direct text child (not recursive)
    fn raw_text(&self, id: NodeId) -> Option<&str>;

    /// Element children in document order - returns collected Vec for trait object compatibility
    fn children(&self, id: NodeId) -> Vec<NodeId>;

    /// Parent node, `None` for the document node
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// All element nodes in document order
    fn elements(&self) -> Vec<NodeId>;
}
