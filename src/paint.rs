// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Parses a fill reference, aka `url(#id)`, and returns the referenced ID.
///
/// The whole value must be a reference. Leading and trailing whitespaces are allowed.
/// The ID can be quoted with either `'` or `"`.
/// The ID itself cannot contain quotes, whitespaces and `)`.
///
/// Unlike [`svgtypes::FuncIRI`], doesn't allow whitespaces between the quote and the ID
/// and accepts double quotes.
pub fn parse_fill_reference(text: &str) -> Option<&str> {
    let mut s = Stream::new(text.trim());
    s.consume_str("url(")?;
    s.skip_spaces();
    s.skip_quote();
    s.consume_byte(b'#')?;
    let id = s.consume_bytes(|c| !is_quote(c) && c != b')' && !c.is_ascii_whitespace());
    if id.is_empty() {
        return None;
    }
    s.skip_quote();
    s.skip_spaces();
    s.consume_byte(b')')?;
    s.skip_spaces();

    if s.at_end() {
        Some(id)
    } else {
        None
    }
}

/// Checks that `text` is a fill reference to the `id`.
#[inline]
pub fn is_fill_reference_to(text: &str, id: &str) -> bool {
    parse_fill_reference(text) == Some(id)
}

#[inline]
fn is_quote(c: u8) -> bool {
    c == b'\'' || c == b'"'
}

/// A minimal byte stream.
///
/// Only ASCII bytes are matched, so slicing at the current position
/// always happens at a char boundary.
struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Stream<'a> {
    #[inline]
    fn new(text: &'a str) -> Self {
        Stream { text, pos: 0 }
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    fn curr_byte(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn consume_byte(&mut self, c: u8) -> Option<()> {
        if self.curr_byte() == Some(c) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn consume_str(&mut self, text: &str) -> Option<()> {
        if self.text[self.pos..].starts_with(text) {
            self.pos += text.len();
            Some(())
        } else {
            None
        }
    }

    fn consume_bytes<F: Fn(u8) -> bool>(&mut self, f: F) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.curr_byte() {
            if !f(c) {
                break;
            }

            self.pos += 1;
        }

        &self.text[start..self.pos]
    }

    fn skip_spaces(&mut self) {
        self.consume_bytes(|c| c.is_ascii_whitespace());
    }

    fn skip_quote(&mut self) {
        if self.curr_byte().map(is_quote) == Some(true) {
            self.pos += 1;
        }
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(parse_fill_reference($text), $result);
            }
        )
    }

    test!(parse_1, "url(#g1)", Some("g1"));
    test!(parse_2, "  url(#g1)  ", Some("g1"));
    test!(parse_3, "url(  #g1  )", Some("g1"));
    test!(parse_4, "url('#g1')", Some("g1"));
    test!(parse_5, "url(\"#g1\")", Some("g1"));
    test!(parse_6, "url( '#linearGradient-1' )", Some("linearGradient-1"));
    test!(parse_7, "url(#1)", Some("1"));
    test!(parse_8, "url(#grad\u{e9})", Some("grad\u{e9}"));

    test!(parse_err_1, "url(#)", None);
    test!(parse_err_2, "url(g1)", None);
    test!(parse_err_3, "url(#g1) red", None);
    test!(parse_err_4, "URL(#g1)", None);
    test!(parse_err_5, "url(#g 1)", None);
    test!(parse_err_6, "url(#g1", None);
    test!(parse_err_7, "red", None);
    test!(parse_err_8, "", None);
    test!(parse_err_9, "url(' #g1')", None);
    test!(parse_err_10, "none url(#g1)", None);

    #[test]
    fn reference_to() {
        assert!(is_fill_reference_to("url(#g1)", "g1"));
        assert!(!is_fill_reference_to("url(#g10)", "g1"));
        assert!(!is_fill_reference_to("url(#g)", "g1"));
    }
}
