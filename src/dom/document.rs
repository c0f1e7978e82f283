//! Markup Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names and raw text

use super::node::{Attribute, Node, NodeId};
use super::strings::StringPool;
use super::TreeAccessor;
use crate::reader::events::StartElement;
use crate::reader::{MarkupEvent, SliceReader};

/// Tag reported for the document node
pub const DOCUMENT_TAG: &str = "#document";

/// A parsed document stored in arena format. Immutable once built.
#[derive(Debug)]
pub struct Document {
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<Node>,
    /// Arena of attributes
    attributes: Vec<Attribute>,
    /// Interned strings
    strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl Document {
    /// Parse a markup document (lenient; never fails)
    ///
    /// End tags close up to the nearest open element of the same name;
    /// unmatched end tags are ignored and open elements close at EOF.
    pub fn parse(input: &[u8]) -> Self {
        let mut doc = Document {
            nodes: Vec::with_capacity(256),
            attributes: Vec::with_capacity(128),
            strings: StringPool::new(),
            root_element: None,
        };
        doc.nodes.push(Node::document());

        // (node, tag name) of open elements; the document node is never popped
        let mut stack: Vec<(NodeId, String)> = vec![(0, String::new())];

        for event in SliceReader::new(input) {
            match event {
                MarkupEvent::StartElement(elem) => {
                    let parent_id = stack.last().map_or(0, |(id, _)| *id);
                    let depth = stack.len() as u16;
                    let name = elem.name.clone();
                    let node_id = doc.handle_element(&elem, parent_id, depth);
                    stack.push((node_id, name));
                }

                MarkupEvent::EmptyElement(elem) => {
                    let parent_id = stack.last().map_or(0, |(id, _)| *id);
                    let depth = stack.len() as u16;
                    doc.handle_element(&elem, parent_id, depth);
                }

                MarkupEvent::EndElement(end) => {
                    if let Some(pos) = stack.iter().rposition(|(_, name)| *name == end.name) {
                        if pos > 0 {
                            stack.truncate(pos);
                        }
                    }
                }

                MarkupEvent::Text(content) => {
                    let parent_id = stack.last().map_or(0, |(id, _)| *id);
                    let text_id = doc.strings.intern(&String::from_utf8_lossy(content));
                    doc.push_child(parent_id, Node::text(text_id, Some(parent_id), stack.len() as u16));
                }

                MarkupEvent::CData(content) => {
                    let parent_id = stack.last().map_or(0, |(id, _)| *id);
                    let text_id = doc.strings.intern(&String::from_utf8_lossy(content));
                    doc.push_child(parent_id, Node::cdata(text_id, Some(parent_id), stack.len() as u16));
                }

                MarkupEvent::Comment(_)
                | MarkupEvent::DocType(_)
                | MarkupEvent::ProcessingInstruction { .. } => {}
            }
        }

        doc
    }

    /// Handle start/empty element
    fn handle_element(&mut self, elem: &StartElement<'_>, parent_id: NodeId, depth: u16) -> NodeId {
        let name_id = self.strings.intern(&elem.name);
        let mut node = Node::element(name_id, Some(parent_id), depth);

        node.attr_start = self.attributes.len() as u32;
        for attr in &elem.attributes {
            let name_id = self.strings.intern(&attr.name);
            let value_id = self.strings.intern(&String::from_utf8_lossy(attr.value));
            self.attributes.push(Attribute { name_id, value_id });
        }
        node.attr_count = elem.attributes.len().min(u16::MAX as usize) as u16;

        let node_id = self.push_child(parent_id, node);
        if self.root_element.is_none() && parent_id == 0 {
            self.root_element = Some(node_id);
        }
        node_id
    }

    /// Add a node to the arena and link it as the parent's last child
    fn push_child(&mut self, parent_id: NodeId, node: Node) -> NodeId {
        let child_id = self.nodes.len() as NodeId;
        self.nodes.push(node);

        let last_child_opt = self.nodes[parent_id as usize].last_child;
        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
        child_id
    }

    /// Get root element ID
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get element name as string
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings.get_str(node.name_id)
        } else {
            None
        }
    }

    /// Get raw content of a text node
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_text() {
            self.strings.get_str(node.name_id)
        } else {
            None
        }
    }

    /// Get attributes for an element
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        let Some(node) = self.get_node(id) else {
            return &[];
        };
        let start = node.attr_start as usize;
        let end = start + node.attr_count as usize;
        self.attributes.get(start..end).unwrap_or(&[])
    }

    /// Get attribute value by name
    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.attributes(node_id)
            .iter()
            .find(|attr| self.strings.get_str(attr.name_id) == Some(name))
            .and_then(|attr| self.strings.get_str(attr.value_id))
    }

    /// Iterate over all children of a node (any kind)
    pub fn child_nodes(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node (depth-first, document order)
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.get_node(id) {
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                stack.push(cid);
                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        DescendantIter { doc: self, stack }
    }

    /// Absolute location path of an element, e.g. `/html/body/div[2]/p`
    ///
    /// Positions are written only where siblings share the tag.
    pub fn node_path(&self, id: NodeId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = id;
        loop {
            let node = self.get_node(current)?;
            if !node.is_element() {
                break;
            }
            let name = self.node_name(current)?;
            let parent = node.parent.unwrap_or(0);
            let same: Vec<NodeId> = self
                .child_nodes(parent)
                .filter(|&c| self.node_name(c) == Some(name))
                .collect();
            if same.len() > 1 {
                let position = same.iter().position(|&c| c == current)? + 1;
                segments.push(format!("{}[{}]", name, position));
            } else {
                segments.push(name.to_string());
            }
            current = parent;
        }
        if segments.is_empty() {
            return None;
        }
        segments.reverse();
        Some(format!("/{}", segments.join("/")))
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first)
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Add children to stack in reverse order (so first child is processed first)
        if let Some(node) = self.doc.get_node(current) {
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.doc.get_node(id).and_then(|n| n.prev_sibling);
            }
        }

        Some(current)
    }
}

impl TreeAccessor for Document {
    fn document_node_id(&self) -> NodeId {
        0
    }

    fn tag(&self, id: NodeId) -> Option<&str> {
        if id == 0 {
            return Some(DOCUMENT_TAG);
        }
        self.node_name(id)
    }

    fn raw_text(&self, id: NodeId) -> Option<&str> {
        self.child_nodes(id)
            .find(|&c| self.get_node(c).is_some_and(Node::is_text))
            .and_then(|c| self.text_content(c))
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_nodes(id)
            .filter(|&c| self.get_node(c).is_some_and(Node::is_element))
            .collect()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent
    }

    fn elements(&self) -> Vec<NodeId> {
        self.descendants(0)
            .filter(|&c| self.get_node(c).is_some_and(Node::is_element))
            .collect()
    }
}
