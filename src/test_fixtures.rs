//! Shared documents and trees for unit tests

use crate::dom::{Document, NodeId, TreeAccessor};

/// Three cards built from one template, differing only in text
pub const CARDS_HTML: &str = r#"<!DOCTYPE html>
<html>
  <body>
    <div class="container">
      <div class="card">
        <h3>Card One</h3>
        <div class="card-body">
          <p>First description of the item</p>
        </div>
        <div class="card-footer">
          <a href="/one">Read more</a>
          <span>2024-01-01</span>
        </div>
      </div>
      <div class="card">
        <h3>Card Two</h3>
        <div class="card-body">
          <p>Second description, a little longer</p>
        </div>
        <div class="card-footer">
          <a href="/two">Read more</a>
          <span>2024-02-02</span>
        </div>
      </div>
      <div class="card">
        <h3>Card Three</h3>
        <div class="card-body">
          <p>Third description</p>
        </div>
        <div class="card-footer">
          <a href="/three">Read more</a>
          <span>2024-03-03</span>
        </div>
      </div>
    </div>
  </body>
</html>
"#;

/// Elements with `tag`, in document order
pub fn find_all(doc: &Document, tag: &str) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|&id| doc.tag(id) == Some(tag))
        .collect()
}

/// Tree spelled out as a table, able to express shapes the parser never
/// produces (shared children, children their parent does not list)
pub struct TableTree {
    tags: Vec<String>,
    texts: Vec<Option<String>>,
    parents: Vec<Option<NodeId>>,
    children: Vec<Vec<NodeId>>,
}

impl TableTree {
    /// Rows are `(tag, text, parent)`; row 0 is the document node and each
    /// parent lists its children in row order
    pub fn new(rows: &[(&str, Option<&str>, Option<NodeId>)]) -> Self {
        let mut tree = TableTree {
            tags: Vec::new(),
            texts: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
        };
        for &(tag, text, parent) in rows {
            let id = tree.push(tag, text, parent);
            if let Some(parent) = parent {
                tree.children[parent as usize].push(id);
            }
        }
        tree
    }

    /// List `child` under `parent` as well, leaving its parent link alone
    pub fn with_extra_child(mut self, parent: NodeId, child: NodeId) -> Self {
        self.children[parent as usize].push(child);
        self
    }

    /// Add a node whose parent does not list it
    pub fn with_orphan(mut self, tag: &str, text: Option<&str>, parent: NodeId) -> Self {
        self.push(tag, text, Some(parent));
        self
    }

    fn push(&mut self, tag: &str, text: Option<&str>, parent: Option<NodeId>) -> NodeId {
        let id = self.tags.len() as NodeId;
        self.tags.push(tag.to_string());
        self.texts.push(text.map(str::to_string));
        self.parents.push(parent);
        self.children.push(Vec::new());
        id
    }
}

impl TreeAccessor for TableTree {
    fn document_node_id(&self) -> NodeId {
        0
    }

    fn tag(&self, id: NodeId) -> Option<&str> {
        self.tags.get(id as usize).map(String::as_str)
    }

    fn raw_text(&self, id: NodeId) -> Option<&str> {
        self.texts.get(id as usize)?.as_deref()
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.children.get(id as usize).cloned().unwrap_or_default()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id as usize).copied().flatten()
    }

    fn elements(&self) -> Vec<NodeId> {
        (1..self.tags.len() as NodeId).collect()
    }
}
