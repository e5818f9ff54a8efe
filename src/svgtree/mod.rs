// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::num::NonZeroU32;

mod parse;

pub use parse::decompress_svgz;

pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub(crate) const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A mutable SVG tree container.
///
/// Unlike the XML it was parsed from, contains only root, element,
/// text and comment nodes.
/// Whitespace-only text nodes are kept only inside elements that contain
/// some text already, like `text` or `style`.
///
/// The structure of the tree cannot be changed after parsing.
/// Only attribute values can.
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> SvgNode {
        self.get(NodeId::new(0))
    }

    /// Returns the root element.
    #[inline]
    pub fn root_element(&self) -> SvgNode {
        // `unwrap` is safe, because `Document` is guaranteed to have at least one element.
        self.root().first_element_child().unwrap()
    }

    /// Returns an iterator over document's descendant nodes.
    ///
    /// Shorthand for `doc.root().descendants()`.
    #[inline]
    pub fn descendants(&self) -> Descendants {
        self.root().descendants()
    }

    /// Returns a node by ID.
    ///
    /// # Panics
    ///
    /// When ID belongs to a different document.
    #[inline]
    pub fn get(&self, id: NodeId) -> SvgNode {
        SvgNode {
            id,
            d: &self.nodes[id.get_usize()],
            doc: self,
        }
    }

    /// Sets an unprefixed attribute value.
    ///
    /// An existing attribute keeps its position. A new one is appended.
    /// Does nothing for non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let attributes = match self.nodes[id.get_usize()].kind {
            NodeKind::Element {
                ref mut attributes, ..
            } => attributes,
            _ => return,
        };

        let value = value.into();
        match attributes
            .iter_mut()
            .find(|a| a.name.namespace.is_none() && a.name.local == name)
        {
            Some(attr) => attr.value = value,
            None => attributes.push(Attribute {
                name: QName::new(None, None, name),
                value,
            }),
        }
    }

    fn append(&mut self, parent_id: NodeId, kind: NodeKind) -> NodeId {
        let new_child_id = NodeId::from(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent_id),
            next_sibling: None,
            children: None,
            kind,
        });

        let last_child_id = self.nodes[parent_id.get_usize()].children.map(|(_, id)| id);

        if let Some(id) = last_child_id {
            self.nodes[id.get_usize()].next_sibling = Some(new_child_id);
        }

        self.nodes[parent_id.get_usize()].children = Some(
            if let Some((first_child_id, _)) = self.nodes[parent_id.get_usize()].children {
                (first_child_id, new_child_id)
            } else {
                (new_child_id, new_child_id)
            },
        );

        new_child_id
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        if !self.root().has_children() {
            return write!(f, "Document []");
        }

        macro_rules! writeln_indented {
            ($depth:expr, $f:expr, $fmt:expr) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt)?;
            };
            ($depth:expr, $f:expr, $fmt:expr, $($arg:tt)*) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt, $($arg)*)?;
            };
        }

        fn print_children(
            parent: SvgNode,
            depth: usize,
            f: &mut std::fmt::Formatter,
        ) -> Result<(), std::fmt::Error> {
            for child in parent.children() {
                if let Some(tag_name) = child.tag_name() {
                    writeln_indented!(depth, f, "Element {{");
                    writeln_indented!(depth, f, "    tag_name: {:?}", tag_name);

                    if !child.attributes().is_empty() {
                        writeln_indented!(depth + 1, f, "attributes: [");
                        for attr in child.attributes() {
                            writeln_indented!(depth + 2, f, "{:?}", attr);
                        }
                        writeln_indented!(depth + 1, f, "]");
                    }

                    if child.has_children() {
                        writeln_indented!(depth, f, "    children: [");
                        print_children(child, depth + 2, f)?;
                        writeln_indented!(depth, f, "    ]");
                    }

                    writeln_indented!(depth, f, "}}");
                } else {
                    writeln_indented!(depth, f, "{:?}", child);
                }
            }

            Ok(())
        }

        writeln!(f, "Document [")?;
        print_children(self.root(), 1, f)?;
        writeln!(f, "]")?;

        Ok(())
    }
}

/// A node handle.
///
/// Stays valid for the whole lifetime of the [`Document`] it came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    #[inline]
    fn new(id: u32) -> Self {
        debug_assert!(id < core::u32::MAX);

        // We are using `NonZeroU32` to reduce overhead of `Option<NodeId>`.
        NodeId(NonZeroU32::new(id + 1).unwrap())
    }

    #[inline]
    fn get(self) -> u32 {
        self.0.get() - 1
    }

    #[inline]
    fn get_usize(self) -> usize {
        self.get() as usize
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(id: usize) -> Self {
        // We already checked that `id` is limited by u32::MAX.
        debug_assert!(id <= core::u32::MAX as usize);
        NodeId::new(id as u32)
    }
}

enum NodeKind {
    Root,
    Element {
        tag_name: QName,
        namespaces: Vec<Namespace>,
        attributes: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
}

struct NodeData {
    parent: Option<NodeId>,
    next_sibling: Option<NodeId>,
    children: Option<(NodeId, NodeId)>,
    kind: NodeKind,
}

/// A namespace-qualified name.
///
/// Keeps the prefix used by the source document,
/// so the tree can be written back without synthetic prefixes.
#[derive(Clone, PartialEq, Eq)]
pub struct QName {
    namespace: Option<String>,
    prefix: Option<String>,
    local: String,
}

impl QName {
    pub(crate) fn new(namespace: Option<&str>, prefix: Option<&str>, local: &str) -> Self {
        QName {
            namespace: namespace.map(String::from),
            prefix: prefix.map(String::from),
            local: local.to_string(),
        }
    }

    /// Returns the namespace URI.
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the prefix used by the source document.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the local (unprefixed) part of the name.
    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.prefix {
            Some(ref prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

impl std::fmt::Debug for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.namespace {
            Some(ref ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// A namespace declaration.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Namespace {
    /// Namespace prefix. `None` for the default namespace.
    pub prefix: Option<String>,
    /// Namespace URI.
    pub uri: String,
}

/// An attribute.
#[derive(Clone)]
pub struct Attribute {
    /// Attribute's name.
    pub name: QName,
    /// Attribute's value.
    pub value: String,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "Attribute {{ name: {:?}, value: {} }}",
            self.name, self.value
        )
    }
}

/// An SVG node.
#[derive(Clone, Copy)]
pub struct SvgNode<'a> {
    id: NodeId,
    doc: &'a Document,
    d: &'a NodeData,
}

impl Eq for SvgNode<'_> {}

impl PartialEq for SvgNode<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.doc, other.doc) && std::ptr::eq(self.d, other.d)
    }
}

impl<'a> SvgNode<'a> {
    /// Returns node's ID.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Checks if the current node is an element.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.d.kind, NodeKind::Element { .. })
    }

    /// Checks if the current node is a text.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.d.kind, NodeKind::Text(_))
    }

    /// Checks if the current node is a comment.
    #[inline]
    pub fn is_comment(&self) -> bool {
        matches!(self.d.kind, NodeKind::Comment(_))
    }

    /// Returns element's tag name, unless the current node is not an element.
    #[inline]
    pub fn tag_name(&self) -> Option<&'a QName> {
        match self.d.kind {
            NodeKind::Element { ref tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// Checks that the current node is an element with the specified local name.
    ///
    /// Namespace is ignored.
    #[inline]
    pub fn has_local_name(&self, name: &str) -> bool {
        self.tag_name().map(|n| n.local_name() == name) == Some(true)
    }

    /// Returns an unprefixed attribute value.
    ///
    /// An empty value is still `Some`.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Returns a namespaced attribute value.
    #[inline]
    pub fn ns_attribute(&self, namespace: &str, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name.namespace() == Some(namespace) && a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Returns a list of all element's attributes.
    #[inline]
    pub fn attributes(&self) -> &'a [Attribute] {
        match self.d.kind {
            NodeKind::Element { ref attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns namespaces declared by this element.
    ///
    /// Namespaces inherited from ancestors are not included.
    #[inline]
    pub fn namespaces(&self) -> &'a [Namespace] {
        match self.d.kind {
            NodeKind::Element { ref namespaces, .. } => namespaces,
            _ => &[],
        }
    }

    /// Returns node's text data.
    ///
    /// For text and comment nodes returns its content.
    /// For elements returns the first child node text.
    #[inline]
    pub fn text(&self) -> &'a str {
        match self.d.kind {
            NodeKind::Element { .. } => match self.first_child() {
                Some(child) if child.is_text() => child.text(),
                _ => "",
            },
            NodeKind::Text(ref text) | NodeKind::Comment(ref text) => text,
            NodeKind::Root => "",
        }
    }

    /// Returns a parent node.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.d.parent.map(|id| self.doc.get(id))
    }

    /// Returns the parent element.
    #[inline]
    pub fn parent_element(&self) -> Option<Self> {
        self.ancestors().skip(1).find(|n| n.is_element())
    }

    /// Returns the next sibling.
    #[inline]
    pub fn next_sibling(&self) -> Option<Self> {
        self.d.next_sibling.map(|id| self.doc.get(id))
    }

    /// Returns the first child.
    #[inline]
    pub fn first_child(&self) -> Option<Self> {
        self.d.children.map(|(id, _)| self.doc.get(id))
    }

    /// Returns the first child element.
    #[inline]
    pub fn first_element_child(&self) -> Option<Self> {
        self.children().find(|n| n.is_element())
    }

    /// Returns the last child.
    #[inline]
    pub fn last_child(&self) -> Option<Self> {
        self.d.children.map(|(_, id)| self.doc.get(id))
    }

    /// Checks if the node has child nodes.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.d.children.is_some()
    }

    /// Returns an iterator over ancestor nodes starting at this node.
    #[inline]
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors(Some(*self))
    }

    /// Returns an iterator over children nodes.
    #[inline]
    pub fn children(&self) -> Children<'a> {
        Children {
            front: self.first_child(),
            back: self.last_child(),
        }
    }

    /// Returns an iterator which traverses the subtree starting at this node.
    #[inline]
    fn traverse(&self) -> Traverse<'a> {
        Traverse {
            root: *self,
            edge: None,
        }
    }

    /// Returns an iterator over this node and its descendants.
    #[inline]
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants(self.traverse())
    }
}

impl std::fmt::Debug for SvgNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.d.kind {
            NodeKind::Root => write!(f, "Root"),
            NodeKind::Element {
                ref tag_name,
                ref attributes,
                ..
            } => {
                write!(
                    f,
                    "Element {{ tag_name: {:?}, attributes: {:?} }}",
                    tag_name, attributes
                )
            }
            NodeKind::Text(ref text) => write!(f, "Text({:?})", text),
            NodeKind::Comment(ref text) => write!(f, "Comment({:?})", text),
        }
    }
}

/// An iterator over ancestor nodes.
#[derive(Clone, Debug)]
pub struct Ancestors<'a>(Option<SvgNode<'a>>);

impl<'a> Iterator for Ancestors<'a> {
    type Item = SvgNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.0.take();
        self.0 = node.as_ref().and_then(SvgNode::parent);
        node
    }
}

/// An iterator over children nodes.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    front: Option<SvgNode<'a>>,
    back: Option<SvgNode<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = SvgNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.front.take();
        if self.front == self.back {
            self.back = None;
        } else {
            self.front = node.as_ref().and_then(SvgNode::next_sibling);
        }
        node
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Edge<'a> {
    Open(SvgNode<'a>),
    Close(SvgNode<'a>),
}

#[derive(Clone, Debug)]
struct Traverse<'a> {
    root: SvgNode<'a>,
    edge: Option<Edge<'a>>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Edge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.edge {
            Some(Edge::Open(node)) => {
                self.edge = Some(match node.first_child() {
                    Some(first_child) => Edge::Open(first_child),
                    None => Edge::Close(node),
                });
            }
            Some(Edge::Close(node)) => {
                if node == self.root {
                    self.edge = None;
                } else if let Some(next_sibling) = node.next_sibling() {
                    self.edge = Some(Edge::Open(next_sibling));
                } else {
                    self.edge = node.parent().map(Edge::Close);
                }
            }
            None => {
                self.edge = Some(Edge::Open(self.root));
            }
        }

        self.edge
    }
}

/// A descendants iterator.
#[derive(Clone, Debug)]
pub struct Descendants<'a>(Traverse<'a>);

impl<'a> Iterator for Descendants<'a> {
    type Item = SvgNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for edge in &mut self.0 {
            if let Edge::Open(node) = edge {
                return Some(node);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_presence() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><linearGradient id=''/><rect/></svg>",
        )
        .unwrap();

        let gradient = doc.root_element().first_element_child().unwrap();
        assert_eq!(gradient.attribute("id"), Some(""));

        let rect = gradient.next_sibling().unwrap();
        assert_eq!(rect.attribute("id"), None);
    }

    #[test]
    fn local_name_ignores_namespace() {
        let doc = Document::parse_str(
            "<svg:svg xmlns:svg='http://www.w3.org/2000/svg'><svg:defs/><defs/></svg:svg>",
        )
        .unwrap();

        let root = doc.root_element();
        assert!(root.has_local_name("svg"));
        assert_eq!(root.children().filter(|n| n.has_local_name("defs")).count(), 2);
        assert_eq!(root.tag_name().unwrap().namespace(), Some(SVG_NS));
        assert_eq!(root.tag_name().unwrap().prefix(), Some("svg"));
    }

    #[test]
    fn set_attribute_keeps_order() {
        let mut doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect x='1' fill='red' y='2'/></svg>",
        )
        .unwrap();

        let rect = doc.root_element().first_element_child().unwrap().id();
        doc.set_attribute(rect, "fill", "green");
        doc.set_attribute(rect, "stroke", "blue");

        let names: Vec<_> = doc
            .get(rect)
            .attributes()
            .iter()
            .map(|a| a.name.local_name().to_string())
            .collect();
        assert_eq!(names, ["x", "fill", "y", "stroke"]);
        assert_eq!(doc.get(rect).attribute("fill"), Some("green"));
    }

    #[test]
    fn descendants_in_document_order() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><g id='a'><rect id='b'/></g><rect id='c'/></svg>",
        )
        .unwrap();

        let ids: Vec<_> = doc.descendants().filter_map(|n| n.attribute("id")).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
