// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::gradient::GradientColorMap;
use crate::paint::parse_fill_reference;
use crate::report::{Event, Reporter};
use crate::style::StyleDeclaration;
use crate::svgtree::{Document, NodeId};

/// Replaces `fill="url(#id)"` and `style="fill:url(#id)"` with solid colors.
///
/// Both the attribute and the style property are checked on every element,
/// so an element can have two replacements.
///
/// Reports the number of replacements for each gradient in `colors`,
/// even when it's zero. Returns the total number of replacements.
pub fn replace_fills(
    doc: &mut Document,
    colors: &GradientColorMap,
    reporter: &mut dyn Reporter,
) -> usize {
    let mut counts = vec![0; colors.len()];

    let elements: Vec<NodeId> = doc
        .descendants()
        .filter(|n| n.is_element())
        .map(|n| n.id())
        .collect();

    for id in elements {
        if let Some(idx) = replace_fill_attribute(doc, id, colors) {
            counts[idx] += 1;
        }

        if let Some(idx) = replace_style_fill(doc, id, colors) {
            counts[idx] += 1;
        }
    }

    for ((id, color), count) in colors.iter().zip(&counts) {
        reporter.report(Event::Replaced {
            id: id.to_string(),
            color: color.to_string(),
            count: *count,
        });
    }

    counts.iter().sum()
}

/// Returns the position of the replaced gradient.
fn replace_fill_attribute(
    doc: &mut Document,
    id: NodeId,
    colors: &GradientColorMap,
) -> Option<usize> {
    let (idx, color) = {
        let fill = doc.get(id).attribute("fill")?;
        lookup(parse_fill_reference(fill)?, colors)?
    };

    doc.set_attribute(id, "fill", color);
    Some(idx)
}

fn replace_style_fill(doc: &mut Document, id: NodeId, colors: &GradientColorMap) -> Option<usize> {
    let mut style = StyleDeclaration::parse(doc.get(id).attribute("style")?);
    let (idx, color) = lookup(parse_fill_reference(style.get("fill")?)?, colors)?;

    style.set("fill", &color);
    doc.set_attribute(id, "style", style.to_string());
    Some(idx)
}

fn lookup(gradient_id: &str, colors: &GradientColorMap) -> Option<(usize, String)> {
    let idx = colors.position(gradient_id)?;
    let color = colors.get(gradient_id)?;
    Some((idx, color.to_string()))
}
