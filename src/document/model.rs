/*!
 * Core tree types for pack content.
 *
 * A `Document` owns a single root `DocumentNode`. Nodes own their children
 * exclusively; the rest of the crate refers to nodes by their position in the
 * pre-order node list (`NodeId`).
 */

use std::fmt;

/// Position of a node in the pre-order node list of its document.
pub type NodeId = usize;

/// A translatable field of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    /// Text owned directly by the node, before its first child
    Text,
    /// Value of the named attribute
    Attribute(String),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Attribute(name) => write!(f, "@{}", name),
        }
    }
}

/// Ordered attribute list with unique names.
///
/// Lookups are linear; elements in pack content carry a handful of attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the named attribute, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute value.
    ///
    /// An existing attribute keeps its position and its previous value is
    /// returned; a new one is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((name, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Iterate with mutable access to values; names are fixed.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.0.iter_mut().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

/// A node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentNode {
    /// Element name, kept as written (including any namespace prefix)
    pub tag: String,

    /// Text directly owned by the node, before its first child
    pub text: Option<String>,

    /// Text following the node's end tag, up to the next sibling.
    /// Kept for faithful output only; it is never a translation field.
    pub tail: Option<String>,

    /// Attributes in document order
    pub attributes: Attributes,

    /// Child nodes in document order
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Create a node with no text, attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set the direct text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the tail text
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    /// Add or replace an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Current value of a field
    pub fn field_value(&self, field: &Field) -> Option<&str> {
        match field {
            Field::Text => self.text.as_deref(),
            Field::Attribute(name) => self.attributes.get(name),
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(DocumentNode::subtree_len).sum::<usize>()
    }
}

/// A parsed content file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Raw markup before the root element (declaration, doctype, comments, whitespace)
    pub prolog: String,

    /// The root element
    pub root: DocumentNode,

    /// Whitespace after the root element
    pub epilogue: String,
}

impl Document {
    /// Wrap a root node with no surrounding markup
    pub fn from_root(root: DocumentNode) -> Self {
        Self {
            prolog: String::new(),
            root,
            epilogue: String::new(),
        }
    }
}
