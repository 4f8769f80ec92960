//! Position-annotated tree of a line-oriented (YAML block style) document.
//!
//! The tree only records keys, raw scalar text and byte spans. It is used to
//! point diagnostics at source lines, never to decode the document.

#[derive(Debug, PartialEq, Clone)]
pub struct DocDocument {
    pub nodes: Vec<DocNode>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum DocNodeKind {
    /// `key: value` or `key:` followed by a nested block.
    Entry { key: String, value: Option<String> },
    /// `- ...` sequence item; its content lives in `children`.
    Item,
    /// A bare scalar, e.g. the `Read` in `- Read`.
    Scalar(String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct DocNode {
    pub kind: DocNodeKind,
    pub children: Vec<DocNode>,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl DocNode {
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            DocNodeKind::Entry { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The raw scalar text carried by this node, if any.
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            DocNodeKind::Entry { value, .. } => value.as_deref(),
            DocNodeKind::Scalar(s) => Some(s),
            DocNodeKind::Item => None,
        }
    }

    /// Pre-order search: the node itself, then its children in order.
    pub fn find<'a>(&'a self, predicate: &dyn Fn(&DocNode) -> bool) -> Option<&'a DocNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }
}

impl DocDocument {
    /// Pre-order search for the first node accepted by `predicate`.
    pub fn find<'a>(&'a self, predicate: &dyn Fn(&DocNode) -> bool) -> Option<&'a DocNode> {
        self.nodes.iter().find_map(|node| node.find(predicate))
    }
}
