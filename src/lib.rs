// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`flatgrad` replaces SVG `linearGradient` fills with solid colors.

Many PDF converters do not support gradients. `flatgrad` takes the first
color-bearing stop of each `linearGradient` and substitutes it for every
`fill="url(#id)"` and `style="fill:url(#id)"` reference, so the document
can be converted to PDF without losing the shapes.

```no_run
let mut reporter = flatgrad::LogReporter;
flatgrad::process_svg(
    std::path::Path::new("in.svg"),
    std::path::Path::new("out.svg"),
    &mut reporter,
).unwrap();
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::Path;

mod error;
mod fill;
mod gradient;
mod paint;
pub mod render;
mod report;
mod style;
mod svgtree;
mod writer;

pub use crate::error::Error;
pub use crate::fill::replace_fills;
pub use crate::gradient::{find_linear_gradients, resolve_gradients, GradientColorMap};
pub use crate::paint::{is_fill_reference_to, parse_fill_reference};
pub use crate::report::{Event, LogReporter, NullReporter, Reporter};
pub use crate::style::StyleDeclaration;
pub use crate::svgtree::*;
pub use crate::writer::WriteOptions;

pub use roxmltree;
pub use xmlwriter::Indent;

/// Replaces all resolvable gradient fills in the document.
///
/// Returns the number of replaced `fill` values.
pub fn flatten_gradients(doc: &mut Document, reporter: &mut dyn Reporter) -> usize {
    let colors = {
        let gradients = find_linear_gradients(doc);
        if gradients.is_empty() {
            reporter.report(Event::NoGradients);
            return 0;
        }

        reporter.report(Event::GradientsFound(gradients.len()));
        gradient::resolve(&gradients, reporter)
    };

    replace_fills(doc, &colors, reporter)
}

/// Reads an SVG file, replaces gradient fills and writes the result.
///
/// The output file is written only when the input was parsed successfully.
/// A document without gradients is written as is.
pub fn process_svg(
    input: &Path,
    output: &Path,
    reporter: &mut dyn Reporter,
) -> Result<usize, Error> {
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }

    let data = std::fs::read(input)?;
    let mut doc = Document::parse_data(&data)?;
    let count = flatten_gradients(&mut doc, reporter);

    let opt = WriteOptions::default();
    std::fs::write(output, doc.to_string(&opt))?;

    Ok(count)
}
