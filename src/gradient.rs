// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{HashMap, HashSet};

use crate::report::{Event, Reporter};
use crate::style::StyleDeclaration;
use crate::svgtree::{Document, SvgNode, XLINK_NS};

/// An ordered map of gradient IDs to solid colors.
///
/// Contains only gradients that were resolved successfully.
/// Entries are stored in the document order of gradient definitions.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct GradientColorMap {
    entries: Vec<(String, String)>,
}

impl GradientColorMap {
    /// Returns a color for the gradient ID.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(gid, _)| gid == id)
            .map(|(_, color)| color.as_str())
    }

    /// Checks that the gradient ID has a color.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns an iterator over `(id, color)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, color)| (id.as_str(), color.as_str()))
    }

    /// Returns the number of resolved gradients.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks that no gradients were resolved.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the position of the gradient ID.
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|(gid, _)| gid == id)
    }

    /// The first color for an ID wins.
    fn insert(&mut self, id: &str, color: String) {
        if !self.contains(id) {
            self.entries.push((id.to_string(), color));
        }
    }
}

/// Returns all `linearGradient` elements that are direct children of a `defs` element.
///
/// Namespaces are ignored.
pub fn find_linear_gradients(doc: &Document) -> Vec<SvgNode> {
    doc.descendants()
        .filter(|n| n.has_local_name("defs"))
        .flat_map(|defs| defs.children())
        .filter(|n| n.has_local_name("linearGradient"))
        .collect()
}

/// Resolves a solid color for each `linearGradient` under `defs`.
///
/// A color is taken from the first `stop` that has one.
/// Gradients without stops inherit the color of a gradient they reference via `href`.
///
/// Gradients without an ID and gradients without a color are skipped.
pub fn resolve_gradients(doc: &Document, reporter: &mut dyn Reporter) -> GradientColorMap {
    let gradients = find_linear_gradients(doc);
    resolve(&gradients, reporter)
}

pub(crate) fn resolve<'a>(
    gradients: &[SvgNode<'a>],
    reporter: &mut dyn Reporter,
) -> GradientColorMap {
    // `href` targets the last definition of a duplicated ID.
    let mut links: HashMap<&'a str, SvgNode<'a>> = HashMap::new();
    for gradient in gradients {
        if let Some(id) = element_id(*gradient) {
            links.insert(id, *gradient);
        }
    }

    let mut map = GradientColorMap::default();
    for gradient in gradients {
        let id = match element_id(*gradient) {
            Some(id) => id,
            None => {
                reporter.report(Event::MissingId);
                continue;
            }
        };

        let mut visited = HashSet::new();
        match first_gradient_color(*gradient, &links, &mut visited) {
            Ok(color) => map.insert(id, color),
            Err(Unresolved::Recursive) => {
                reporter.report(Event::RecursiveReference(id.to_string()));
            }
            Err(Unresolved::NoColor) => {
                reporter.report(Event::Unresolved(id.to_string()));
            }
        }
    }

    map
}

enum Unresolved {
    NoColor,
    Recursive,
}

/// Returns a non-empty `id` attribute.
fn element_id(node: SvgNode) -> Option<&str> {
    node.attribute("id").filter(|id| !id.is_empty())
}

fn first_gradient_color<'a>(
    gradient: SvgNode<'a>,
    links: &HashMap<&'a str, SvgNode<'a>>,
    visited: &mut HashSet<&'a str>,
) -> Result<String, Unresolved> {
    let mut gradient = gradient;
    loop {
        if let Some(id) = element_id(gradient) {
            visited.insert(id);
        }

        if let Some(color) = gradient
            .children()
            .filter(|n| n.has_local_name("stop"))
            .find_map(stop_color)
        {
            return Ok(color);
        }

        let link = href(gradient).ok_or(Unresolved::NoColor)?;
        if visited.contains(link) {
            return Err(Unresolved::Recursive);
        }

        gradient = *links.get(link).ok_or(Unresolved::NoColor)?;
    }
}

/// Extracts a color from `stop-color="..."` or `style="stop-color:..."`.
///
/// A blank `stop-color` attribute still takes priority over the style.
fn stop_color(stop: SvgNode) -> Option<String> {
    let color = match stop.attribute("stop-color") {
        Some(color) => color.trim(),
        None => {
            let style = StyleDeclaration::parse(stop.attribute("style")?);
            return style
                .get("stop-color")
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from);
        }
    };

    if color.is_empty() {
        return None;
    }

    Some(color.to_string())
}

/// Returns an ID referenced via `xlink:href` or `href`.
fn href(node: SvgNode) -> Option<&str> {
    let value = node
        .ns_attribute(XLINK_NS, "href")
        .or_else(|| node.attribute("href"))
        .or_else(|| node.ns_attribute(XLINK_NS, "HREF"))
        .or_else(|| node.attribute("HREF"))?;

    if !value.starts_with('#') {
        return None;
    }

    svgtypes::IRI::from_str(value).ok().map(|v| v.0)
}
