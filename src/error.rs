// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// The input file doesn't exist.
    InputNotFound(PathBuf),

    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),

    /// Failed to read or write a file.
    Io(std::io::Error),

    /// The PDF converter has rejected the document.
    RenderingFailed(String),
}

impl Error {
    /// Returns a process exit code for this error.
    ///
    /// `2` for a missing input, `3` for an input that cannot be parsed
    /// and `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::InputNotFound(_) => 2,
            Error::NotAnUtf8Str | Error::MalformedGZip | Error::ParsingFailed(_) => 3,
            Error::Io(_) | Error::RenderingFailed(_) => 1,
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::InputNotFound(ref path) => {
                write!(f, "input SVG not found: {}", path.display())
            }
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "failed to parse SVG/XML cause {}", e)
            }
            Error::Io(ref e) => {
                write!(f, "{}", e)
            }
            Error::RenderingFailed(ref e) => {
                write!(f, "PDF conversion failed cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::ParsingFailed(ref e) => Some(e),
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}
