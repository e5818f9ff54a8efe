// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use roxmltree::Error;

use super::{
    Attribute, Document, Namespace, NodeData, NodeId, NodeKind, QName, XML_NAMESPACE_NS,
};

impl Document {
    /// Parses a [`Document`] from a string.
    pub fn parse_str(text: &str) -> Result<Document, Error> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, xml_opt)?;
        Self::parse_tree(&xml)
    }

    /// Parses a [`Document`] from raw data.
    ///
    /// Handles both plain and compressed (SVGZ) SVG.
    pub fn parse_data(data: &[u8]) -> Result<Document, crate::Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| crate::Error::NotAnUtf8Str)?;
            Ok(Self::parse_str(text)?)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| crate::Error::NotAnUtf8Str)?;
            Ok(Self::parse_str(text)?)
        }
    }

    /// Parses a [`Document`] from a [`roxmltree::Document`].
    pub fn parse_tree(xml: &roxmltree::Document) -> Result<Document, Error> {
        parse(xml)
    }
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, crate::Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| crate::Error::MalformedGZip)?;
    Ok(decoded)
}

fn parse(xml: &roxmltree::Document) -> Result<Document, Error> {
    let mut doc = Document { nodes: Vec::new() };

    // Add a root node.
    doc.nodes.push(NodeData {
        parent: None,
        next_sibling: None,
        children: None,
        kind: NodeKind::Root,
    });

    let root_id = doc.root().id;
    parse_xml_node_children(xml.root(), root_id, false, 0, &mut doc)?;

    Ok(doc)
}

fn parse_xml_node_children(
    parent: roxmltree::Node,
    parent_id: NodeId,
    keep_whitespaces: bool,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    for node in parent.children() {
        parse_xml_node(node, parent_id, keep_whitespaces, depth, doc)?;
    }

    Ok(())
}

fn parse_xml_node(
    node: roxmltree::Node,
    parent_id: NodeId,
    keep_whitespaces: bool,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    if depth > 1024 {
        return Err(Error::NodesLimitReached);
    }

    match node.node_type() {
        roxmltree::NodeType::Element => {
            let kind = NodeKind::Element {
                tag_name: parse_tag_name(node),
                namespaces: collect_declared_namespaces(node),
                attributes: collect_attributes(node),
            };
            let node_id = doc.append(parent_id, kind);

            // Whitespaces are significant only inside `text` and in elements
            // with some text, like `style`. Everywhere else they will be
            // replaced by the writer's indent.
            let keep_whitespaces = keep_whitespaces
                || node.tag_name().name() == "text"
                || has_text_children(node);
            parse_xml_node_children(node, node_id, keep_whitespaces, depth + 1, doc)?;
        }
        roxmltree::NodeType::Text => {
            let text = node.text().unwrap_or_default();
            if keep_whitespaces || !is_whitespace_only(text) {
                doc.append(parent_id, NodeKind::Text(text.to_string()));
            }
        }
        roxmltree::NodeType::Comment => {
            let text = node.text().unwrap_or_default();
            doc.append(parent_id, NodeKind::Comment(text.to_string()));
        }
        // Processing instructions are not preserved.
        roxmltree::NodeType::PI | roxmltree::NodeType::Root => {}
    }

    Ok(())
}

fn parse_tag_name(node: roxmltree::Node) -> QName {
    let tag_name = node.tag_name();
    let prefix = tag_name
        .namespace()
        .and_then(|uri| lookup_element_prefix(node, uri));
    QName::new(tag_name.namespace(), prefix.as_deref(), tag_name.name())
}

fn collect_attributes(node: roxmltree::Node) -> Vec<Attribute> {
    node.attributes()
        .map(|attr| {
            let prefix = attr
                .namespace()
                .and_then(|uri| lookup_attribute_prefix(node, uri));
            Attribute {
                name: QName::new(attr.namespace(), prefix.as_deref(), attr.name()),
                value: attr.value().to_string(),
            }
        })
        .collect()
}

/// Returns namespaces that were declared on this element
/// and are not inherited from the parent.
fn collect_declared_namespaces(node: roxmltree::Node) -> Vec<Namespace> {
    let parent = node.parent_element();
    let is_inherited = |prefix: Option<&str>, uri: &str| match parent {
        Some(parent) => parent
            .namespaces()
            .any(|ns| ns.name() == prefix && ns.uri() == uri),
        None => false,
    };

    node.namespaces()
        .filter(|ns| ns.uri() != XML_NAMESPACE_NS)
        .filter(|ns| !is_inherited(ns.name(), ns.uri()))
        .map(|ns| Namespace {
            prefix: ns.name().map(String::from),
            uri: ns.uri().to_string(),
        })
        .collect()
}

/// Elements prefer the default namespace, if it matches.
fn lookup_element_prefix(node: roxmltree::Node, uri: &str) -> Option<String> {
    let mut prefix = None;
    for ns in node.namespaces().filter(|ns| ns.uri() == uri) {
        match ns.name() {
            None => return None,
            Some(name) => {
                if prefix.is_none() {
                    prefix = Some(name.to_string());
                }
            }
        }
    }

    prefix
}

/// Attributes are never in the default namespace.
fn lookup_attribute_prefix(node: roxmltree::Node, uri: &str) -> Option<String> {
    if uri == XML_NAMESPACE_NS {
        return Some("xml".to_string());
    }

    node.namespaces()
        .filter(|ns| ns.uri() == uri)
        .find_map(|ns| ns.name().map(String::from))
}

fn has_text_children(node: roxmltree::Node) -> bool {
    node.children()
        .any(|child| child.is_text() && !is_whitespace_only(child.text().unwrap_or_default()))
}

fn is_whitespace_only(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_whitespace())
}
