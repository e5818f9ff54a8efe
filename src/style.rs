// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

/// A parsed `style` attribute.
///
/// Declarations are kept in the insertion order.
/// When a property is set twice, the last value wins,
/// but the property keeps its first position.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct StyleDeclaration {
    declarations: Vec<(String, String)>,
}

impl StyleDeclaration {
    /// Parses a `style` attribute value.
    ///
    /// Chunks without a `:` are ignored. Property names and values are trimmed.
    pub fn parse(text: &str) -> Self {
        let mut style = StyleDeclaration::default();
        for chunk in text.split(';') {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }

            if let Some((name, value)) = chunk.split_once(':') {
                style.set(name.trim(), value.trim());
            }
        }

        style
    }

    /// Returns a property value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a property value.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.declarations.iter_mut().find(|(n, _)| n == name) {
            Some(decl) => decl.1 = value.to_string(),
            None => self
                .declarations
                .push((name.to_string(), value.to_string())),
        }
    }

    /// Checks that there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Writes declarations as `name: value` pairs separated by `; `,
/// followed by a trailing `;`.
///
/// Declarations with an empty name or value are skipped.
impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut is_first = true;
        for (name, value) in &self.declarations {
            if name.is_empty() || value.is_empty() {
                continue;
            }

            if !is_first {
                write!(f, "; ")?;
            }

            write!(f, "{}: {}", name, value)?;
            is_first = false;
        }

        if !self.is_empty() {
            write!(f, ";")?;
        }

        Ok(())
    }
}
