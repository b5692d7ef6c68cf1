//! Width-limited field scanner for fixed-column element lines.
//!
//! Each conversion skips leading whitespace, then reads at most `width` bytes of the field
//! (a sign counts against the width). The first conversion that fails stops the scan: every
//! later conversion returns `None` and [`FieldScanner::scanned`] keeps the count of the
//! fields read so far. This is the behavior of a classic `scanf` format string, which the
//! element set layout was designed around.
use nom::{
    branch::alt,
    bytes::complete::{take, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map_opt, opt, recognize},
    IResult, Parser,
};
use std::str::FromStr;

fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn parse_text<T: FromStr>(text: &[u8]) -> Option<T> {
    std::str::from_utf8(text).ok()?.parse().ok()
}

fn blanks(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while(is_blank).parse(input)
}

/// `[+-]digits`
fn integer(input: &[u8]) -> IResult<&[u8], i64> {
    map_opt(recognize((opt(one_of("+-")), digit1)), parse_text::<i64>).parse(input)
}

/// `[+-](digits[.digits] | .digits)[(e|E)[+-]digits]`
fn real(input: &[u8]) -> IResult<&[u8], f64> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ));
    let exponent = (one_of("eE"), opt(one_of("+-")), digit1);

    map_opt(
        recognize((opt(one_of("+-")), mantissa, opt(exponent))),
        parse_text::<f64>,
    )
    .parse(input)
}

fn word(input: &[u8]) -> IResult<&[u8], String> {
    take_while1(|byte| !is_blank(byte))
        .map(|text: &[u8]| String::from_utf8_lossy(text).into_owned())
        .parse(input)
}

fn single(input: &[u8]) -> IResult<&[u8], u8> {
    map_opt(take(1usize), |text: &[u8]| text.first().copied()).parse(input)
}

/// Sequential reader over one element line.
pub(crate) struct FieldScanner<'a> {
    line: &'a [u8],
    rest: &'a [u8],
    scanned: usize,
    stopped: bool,
}

impl<'a> FieldScanner<'a> {
    pub(crate) fn new(line: &'a [u8]) -> Self {
        FieldScanner {
            line,
            rest: line,
            scanned: 0,
            stopped: false,
        }
    }

    /// Number of fields converted so far, positions excluded.
    pub(crate) fn scanned(&self) -> usize {
        self.scanned
    }

    fn skip_blanks(&mut self) {
        if let Ok((rest, _)) = blanks(self.rest) {
            self.rest = rest;
        }
    }

    fn convert<T>(
        &mut self,
        width: usize,
        mut parser: impl FnMut(&'a [u8]) -> IResult<&'a [u8], T>,
    ) -> Option<T> {
        if self.stopped {
            return None;
        }
        self.skip_blanks();

        let window = &self.rest[..width.min(self.rest.len())];
        match parser(window) {
            Ok((remaining, value)) => {
                self.rest = &self.rest[window.len() - remaining.len()..];
                self.scanned += 1;
                Some(value)
            }
            Err(_) => {
                self.stopped = true;
                None
            }
        }
    }

    /// Signed decimal integer of at most `width` bytes.
    pub(crate) fn signed(&mut self, width: usize) -> Option<i64> {
        self.convert(width, integer)
    }

    /// Unsigned decimal integer of at most `width` bytes. A leading minus wraps around.
    pub(crate) fn unsigned(&mut self, width: usize) -> Option<u64> {
        self.signed(width).map(|value| value as u64)
    }

    /// Real number of at most `width` bytes.
    pub(crate) fn real(&mut self, width: usize) -> Option<f64> {
        self.convert(width, real)
    }

    /// Run of at most `width` non-blank bytes.
    pub(crate) fn word(&mut self, width: usize) -> Option<String> {
        self.convert(width, word)
    }

    /// Next non-blank byte.
    pub(crate) fn byte(&mut self) -> Option<u8> {
        self.convert(1, single)
    }

    /// Offset of the cursor from the start of the line, after skipping blanks.
    ///
    /// Reading the position is not a conversion and does not change [`FieldScanner::scanned`].
    pub(crate) fn position(&mut self) -> Option<usize> {
        if self.stopped {
            return None;
        }
        self.skip_blanks();
        Some(self.line.len() - self.rest.len())
    }
}

#[cfg(test)]
mod scanner_test {
    use super::*;

    #[test]
    fn test_width_limits() {
        let mut scanner = FieldScanner::new(b"1234567 12.345678");
        assert_eq!(scanner.unsigned(3), Some(123));
        assert_eq!(scanner.unsigned(5), Some(4567));
        assert_eq!(scanner.real(4), Some(12.3));
        assert_eq!(scanner.real(10), Some(45678.0));
        assert_eq!(scanner.scanned(), 4);
        assert_eq!(scanner.position(), Some(17));
    }

    #[test]
    fn test_sign_counts_against_width() {
        let mut scanner = FieldScanner::new(b"-12345 +7 -");
        assert_eq!(scanner.signed(2), Some(-1));
        assert_eq!(scanner.signed(6), Some(2345));
        assert_eq!(scanner.signed(2), Some(7));
        // a lone sign is not a number
        assert_eq!(scanner.signed(2), None);
        assert_eq!(scanner.scanned(), 3);
    }

    #[test]
    fn test_unsigned_wraps() {
        let mut scanner = FieldScanner::new(b"-5");
        assert_eq!(scanner.unsigned(2).map(|v| v as u32), Some(u32::MAX - 4));
    }

    #[test]
    fn test_real_forms() {
        let mut scanner = FieldScanner::new(b".00021395 -.5 3. 1e-3 2E+2");
        assert_eq!(scanner.real(10), Some(0.00021395));
        assert_eq!(scanner.real(10), Some(-0.5));
        assert_eq!(scanner.real(10), Some(3.0));
        assert_eq!(scanner.real(10), Some(1e-3));
        assert_eq!(scanner.real(10), Some(200.0));

        // the exponent marker is only consumed when digits follow
        let mut scanner = FieldScanner::new(b"00000-0");
        assert_eq!(scanner.real(6), Some(0.0));
        assert_eq!(scanner.signed(2), Some(-0));
        assert_eq!(scanner.position(), Some(7));

        let mut scanner = FieldScanner::new(b".");
        assert_eq!(scanner.real(6), None);
    }

    #[test]
    fn test_stops_after_failure() {
        let mut scanner = FieldScanner::new(b"12 * 34");
        assert_eq!(scanner.unsigned(2), Some(12));
        assert_eq!(scanner.unsigned(2), None);
        assert_eq!(scanner.unsigned(2), None);
        assert_eq!(scanner.position(), None);
        assert_eq!(scanner.scanned(), 1);
    }

    #[test]
    fn test_words_and_bytes() {
        let mut scanner = FieldScanner::new(b"1 25544U 98067A   22");
        assert_eq!(scanner.unsigned(1), Some(1));
        assert_eq!(scanner.word(5).as_deref(), Some("25544"));
        assert_eq!(scanner.byte(), Some(b'U'));
        assert_eq!(scanner.unsigned(2), Some(98));
        assert_eq!(scanner.unsigned(3), Some(67));
        assert_eq!(scanner.word(3).as_deref(), Some("A"));
        assert_eq!(scanner.unsigned(2), Some(22));
        assert_eq!(scanner.byte(), None);
        assert_eq!(scanner.scanned(), 7);
    }
}
