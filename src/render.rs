// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PDF output.

use std::path::{Path, PathBuf};

use svg2pdf::usvg;

use crate::Error;

/// Converts an SVG file into a PDF file.
///
/// Relative paths inside the SVG are resolved against the SVG file directory.
///
/// Any failure, including I/O, is reported as [`Error::RenderingFailed`].
pub fn svg_to_pdf(svg_path: &Path, pdf_path: &Path) -> Result<(), Error> {
    let svg_data = std::fs::read(svg_path).map_err(|e| Error::RenderingFailed(e.to_string()))?;

    // Get input file absolute directory.
    let resources_dir = std::fs::canonicalize(svg_path)
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    let pdf = convert(&svg_data, resources_dir)?;
    std::fs::write(pdf_path, pdf).map_err(|e| Error::RenderingFailed(e.to_string()))
}

/// Converts SVG data into PDF data.
pub fn convert(svg_data: &[u8], resources_dir: Option<PathBuf>) -> Result<Vec<u8>, Error> {
    let mut opt = usvg::Options {
        resources_dir,
        ..usvg::Options::default()
    };

    // fontdb initialization is pretty expensive, so perform it only when needed.
    if has_text_nodes(svg_data) {
        opt.fontdb_mut().load_system_fonts();
    }

    let tree = usvg::Tree::from_data(svg_data, &opt)
        .map_err(|e| Error::RenderingFailed(e.to_string()))?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| Error::RenderingFailed(e.to_string()))
}

fn has_text_nodes(svg_data: &[u8]) -> bool {
    let text = match std::str::from_utf8(svg_data) {
        Ok(v) => v,
        Err(_) => return false,
    };

    let xml_opt = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };

    match roxmltree::Document::parse_with_options(text, xml_opt) {
        Ok(xml) => xml
            .descendants()
            .any(|n| n.has_tag_name((crate::svgtree::SVG_NS, "text"))),
        Err(_) => false,
    }
}
