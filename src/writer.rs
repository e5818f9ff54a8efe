// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use xmlwriter::{Indent, XmlWriter};

use crate::svgtree::{Document, SvgNode};

/// XML writing options.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Use single quote marks instead of double quote.
    ///
    /// Default: disabled
    pub use_single_quote: bool,

    /// Set XML nodes indention.
    ///
    /// Elements with text content are written as is.
    ///
    /// Default: 2 spaces
    pub indent: Indent,

    /// Set XML attributes indention.
    ///
    /// Default: `None`
    pub attributes_indent: Indent,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            use_single_quote: false,
            indent: Indent::Spaces(2),
            attributes_indent: Indent::None,
        }
    }
}

impl Document {
    /// Writes the document back to SVG.
    ///
    /// The output always starts with an XML declaration.
    pub fn to_string(&self, opt: &WriteOptions) -> String {
        convert(self, opt)
    }
}

fn convert(doc: &Document, opt: &WriteOptions) -> String {
    let mut xml = XmlWriter::new(xmlwriter::Options {
        use_single_quote: opt.use_single_quote,
        indent: opt.indent,
        attributes_indent: opt.attributes_indent,
    });

    xml.write_declaration();
    write_children(doc.root(), &mut xml);
    xml.end_document()
}

fn write_children(parent: SvgNode, xml: &mut XmlWriter) {
    for node in parent.children() {
        write_node(node, xml);
    }
}

fn write_node(node: SvgNode, xml: &mut XmlWriter) {
    if node.is_text() {
        xml.write_text(&escape_text(node.text()));
        return;
    }

    if node.is_comment() {
        xml.write_comment(node.text());
        return;
    }

    let tag_name = match node.tag_name() {
        Some(v) => v,
        None => return,
    };

    xml.start_element(&tag_name.to_string());

    for ns in node.namespaces() {
        match ns.prefix {
            Some(ref prefix) => {
                xml.write_attribute(&format!("xmlns:{}", prefix), &escape_attribute(&ns.uri))
            }
            None => xml.write_attribute("xmlns", &escape_attribute(&ns.uri)),
        }
    }

    for attr in node.attributes() {
        xml.write_attribute(&attr.name.to_string(), &escape_attribute(&attr.value));
    }

    // Indent inside mixed content would alter the text.
    let preserve_whitespaces = is_whitespace_sensitive(node);
    if preserve_whitespaces {
        xml.set_preserve_whitespaces(true);
    }

    write_children(node, xml);
    xml.end_element();

    if preserve_whitespaces {
        xml.set_preserve_whitespaces(is_inside_whitespace_sensitive(node));
    }
}

fn is_whitespace_sensitive(node: SvgNode) -> bool {
    node.has_local_name("text") || node.children().any(|n| n.is_text())
}

fn is_inside_whitespace_sensitive(node: SvgNode) -> bool {
    node.ancestors()
        .skip(1)
        .filter(|n| n.is_element())
        .any(is_whitespace_sensitive)
}

/// `xmlwriter` escapes only `<` in text.
///
/// `>` must be escaped too, since `]]>` is not allowed in character data.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// `xmlwriter` escapes only quotes in attributes.
///
/// Whitespace characters are written as references,
/// otherwise the attribute value normalization would replace them with spaces.
fn escape_attribute(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' => escaped.push_str("&#10;"),
            '\t' => escaped.push_str("&#9;"),
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
