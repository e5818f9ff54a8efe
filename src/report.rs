// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Diagnostics produced while flattening gradients.

The transformation itself never talks to the global logger.
Instead, it sends [`Event`]s to a [`Reporter`], which the caller provides.
*/

use std::fmt;

/// A diagnostic event.
#[derive(Clone, PartialEq, Debug)]
pub enum Event {
    /// The document has no `linearGradient` under `defs`.
    NoGradients,

    /// Gradient definitions were collected.
    GradientsFound(usize),

    /// A `linearGradient` without an `id` attribute.
    MissingId,

    /// A gradient references itself via `href`, directly or through a cycle.
    RecursiveReference(String),

    /// A gradient has no color-bearing stops and no usable `href`.
    Unresolved(String),

    /// Fill references to a gradient were replaced.
    Replaced {
        /// Gradient ID.
        id: String,
        /// The solid color that was used.
        color: String,
        /// Number of replaced `fill` values.
        count: usize,
    },
}

impl Event {
    /// Checks that the event should be shown as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::MissingId | Event::RecursiveReference(_) | Event::Unresolved(_)
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::NoGradients => {
                write!(f, "No <linearGradient> found under <defs>; writing SVG unchanged.")
            }
            Event::GradientsFound(n) => write!(f, "Found {} <linearGradient> element(s).", n),
            Event::MissingId => write!(f, "Skipping <linearGradient> without id."),
            Event::RecursiveReference(id) => {
                write!(f, "Gradient '{}' references itself via 'href'.", id)
            }
            Event::Unresolved(id) => write!(f, "Gradient '{}' has no stop-color; skipping.", id),
            Event::Replaced { id, color, count } => write!(
                f,
                "Replaced {} occurrence(s) of url(#{}) with '{}'.",
                count, id, color
            ),
        }
    }
}

/// A sink for diagnostic events.
pub trait Reporter {
    /// Handles a single event.
    fn report(&mut self, event: Event);
}

/// Collects events in memory.
impl Reporter for Vec<Event> {
    #[inline]
    fn report(&mut self, event: Event) {
        self.push(event);
    }
}

/// Forwards events to the `log` crate.
#[derive(Clone, Copy, Default, Debug)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: Event) {
        if event.is_warning() {
            log::warn!("{}", event);
        } else {
            log::info!("{}", event);
        }
    }
}

/// Drops all events.
#[derive(Clone, Copy, Default, Debug)]
pub struct NullReporter;

impl Reporter for NullReporter {
    #[inline]
    fn report(&mut self, _: Event) {}
}
