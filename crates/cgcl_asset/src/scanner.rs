//! Byte cursor over an in-memory text asset.
//!
//! Numbers are read with C-locale "longest valid prefix" rules: a token is
//! accepted as long as at least one character at the cursor forms a number,
//! and the cursor stops right after the longest such prefix.

use std::fmt;

/// Where in the source a problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-based line number.
    pub line: usize,
    /// 0-based byte offset from the start of the input.
    pub offset: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, byte {}", self.line, self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    Float,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Integer => write!(f, "integer"),
            NumberKind::Float => write!(f, "float"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Failed to parse {expected} at {location}")]
pub struct NumericParseError {
    pub expected: NumberKind,
    pub location: Location,
}

/// Control characters count as whitespace, like in most OBJ exporters.
fn is_whitespace(byte: u8) -> bool {
    byte <= b' '
}

fn is_inline_whitespace(byte: u8) -> bool {
    is_whitespace(byte) && byte != b'\n' && byte != b'\r'
}

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            offset: self.pos,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn rest(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    /// Skips all whitespace and returns how many line breaks were crossed.
    /// `\r\n`, `\n` and a lone `\r` each count as one.
    pub fn skip_whitespace(&mut self) -> usize {
        let mut new_lines = 0;
        while let Some(byte) = self.peek() {
            if !is_whitespace(byte) {
                break;
            }
            let crlf = byte == b'\r' && self.input.get(self.pos + 1) == Some(&b'\n');
            if byte == b'\n' || (byte == b'\r' && !crlf) {
                new_lines += 1;
            }
            self.pos += 1;
        }
        self.line += new_lines;
        new_lines
    }

    /// Skips whitespace up to, but not across, the next line break.
    pub fn skip_inline_whitespace(&mut self) {
        while self.peek().map_or(false, is_inline_whitespace) {
            self.pos += 1;
        }
    }

    /// Moves the cursor onto the next line break (or the end of input).
    pub fn skip_line(&mut self) {
        while let Some(byte) = self.peek() {
            if byte == b'\n' || byte == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }

    /// True if nothing but whitespace or a comment remains on this line.
    pub fn at_line_end(&mut self) -> bool {
        self.skip_inline_whitespace();
        matches!(self.peek(), None | Some(b'\n') | Some(b'\r') | Some(b'#'))
    }

    /// Consumes `keyword` if it is at the cursor and followed by whitespace
    /// or the end of input. The trailing whitespace is left in place.
    pub fn expect_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        let keyword = keyword.as_bytes();
        if !rest.starts_with(keyword) {
            return false;
        }
        if rest.get(keyword.len()).map_or(false, |&b| !is_whitespace(b)) {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    /// Consumes `byte` if it is at the cursor.
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Returns the remainder of the current line with surrounding whitespace
    /// removed. The cursor stops on the line break.
    pub fn rest_of_line(&mut self) -> &'a str {
        self.skip_inline_whitespace();
        let start = self.pos;
        self.skip_line();
        let line = &self.input[start..self.pos];
        std::str::from_utf8(line).map_or("", |s| s.trim_end())
    }

    /// Reads the next whitespace-delimited token on this line without
    /// interpreting it.
    pub fn word(&mut self) -> &'a str {
        self.skip_inline_whitespace();
        let start = self.pos;
        while self.peek().map_or(false, |b| !is_whitespace(b)) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.input[start..self.pos]).unwrap_or("")
    }

    fn numeric_error(&self, expected: NumberKind) -> NumericParseError {
        NumericParseError {
            expected,
            location: self.location(),
        }
    }

    /// Parses a float after skipping whitespace on the current line.
    pub fn parse_float(&mut self) -> Result<f32, NumericParseError> {
        self.skip_inline_whitespace();
        let len = float_prefix_len(self.rest());
        if len == 0 {
            return Err(self.numeric_error(NumberKind::Float));
        }

        let text = std::str::from_utf8(&self.rest()[..len])
            .map_err(|_| self.numeric_error(NumberKind::Float))?;
        let value =
            parse_float_text(text).ok_or_else(|| self.numeric_error(NumberKind::Float))?;
        self.pos += len;
        Ok(value)
    }

    /// Parses an integer directly at the cursor. The base is detected from
    /// the prefix: `0x` is hexadecimal, a leading `0` octal, else decimal.
    pub fn parse_int(&mut self) -> Result<i64, NumericParseError> {
        let rest = self.rest();
        let mut i = 0;
        let negative = match rest.first() {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            _ => false,
        };

        let hex_prefix = rest.get(i) == Some(&b'0')
            && matches!(rest.get(i + 1), Some(b'x') | Some(b'X'))
            && rest.get(i + 2).map_or(false, u8::is_ascii_hexdigit);
        let radix = if hex_prefix {
            i += 2;
            16
        } else if rest.get(i) == Some(&b'0') {
            8
        } else {
            10
        };

        let digits_start = i;
        while rest
            .get(i)
            .map_or(false, |&b| (b as char).to_digit(radix).is_some())
        {
            i += 1;
        }
        if i == digits_start {
            return Err(self.numeric_error(NumberKind::Integer));
        }

        let digits = std::str::from_utf8(&rest[digits_start..i])
            .map_err(|_| self.numeric_error(NumberKind::Integer))?;
        let magnitude = i64::from_str_radix(digits, radix)
            .map_err(|_| self.numeric_error(NumberKind::Integer))?;
        self.pos += i;
        Ok(if negative { -magnitude } else { magnitude })
    }
}

fn parse_float_text(text: &str) -> Option<f32> {
    let unsigned = text.trim_start_matches(|c| c == '+' || c == '-');
    let sign = if text.starts_with('-') { -1.0 } else { 1.0 };
    match unsigned.as_bytes().first() {
        Some(b'i') | Some(b'I') => Some(sign * f32::INFINITY),
        Some(b'n') | Some(b'N') => Some(f32::NAN),
        _ => text.parse().ok(),
    }
}

/// Length of the longest prefix of `bytes` that reads as a decimal float,
/// or 0 if there is none.
fn float_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let candidate = &bytes[i.min(bytes.len())..];
    for special in [&b"infinity"[..], &b"inf"[..], &b"nan"[..]] {
        if candidate.len() >= special.len()
            && candidate[..special.len()].eq_ignore_ascii_case(special)
        {
            return i + special.len();
        }
    }

    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = count_digits(i);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_digits = if j <= bytes.len() { count_digits(j) } else { 0 };
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    i
}
