//! Parser for the list literals the trend endpoint embeds in string fields.
//!
//! Trend metrics arrive as strings such as `"['10.0', '20.5', None]"`: a list
//! serialized with Python literal syntax rather than as a JSON array. This
//! module accepts that literal grammar (the subset the API emits plus a little
//! slack) and nothing more:
//!
//! - lists `[..]` and tuples `(..)`, trailing comma allowed
//! - single- or double-quoted strings with backslash escapes
//! - integers / floats with optional sign and exponent
//! - `None`, `True`, `False`
//!
//! Anything else is a `LiteralError`. Callers in `decode::series` turn errors
//! into empty series; nothing here is surfaced to the user.

use std::fmt;

/// Deepest bracket nesting accepted before parsing gives up.
pub const MAX_DEPTH: usize = 64;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub offset: usize,
    pub reason: &'static str,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.reason, self.offset)
    }
}

impl std::error::Error for LiteralError {}

/// Parse a complete literal; trailing non-whitespace is an error.
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        src: input.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != parser.src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &'static str) -> LiteralError {
        LiteralError { offset: self.pos, reason }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'[') => self.sequence(b']').map(Literal::List),
            Some(b'(') => self.sequence(b')').map(Literal::Tuple),
            Some(q @ (b'\'' | b'"')) => self.string(q).map(Literal::Str),
            Some(b) if b == b'-' || b == b'+' || b == b'.' || b.is_ascii_digit() => self.number(),
            Some(b) if b.is_ascii_alphabetic() => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    fn sequence(&mut self, close: u8) -> Result<Vec<Literal>, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let items = self.sequence_items(close);
        self.depth -= 1;
        items
    }

    fn sequence_items(&mut self, close: u8) -> Result<Vec<Literal>, LiteralError> {
        // Consume the opening bracket.
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => return Err(self.error("expected ',' or closing bracket")),
                None => return Err(self.error("unterminated sequence")),
            }
        }
    }

    fn string(&mut self, quote: u8) -> Result<String, LiteralError> {
        self.pos += 1;
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            self.pos += 1;
            match b {
                b'\\' => {
                    let Some(esc) = self.peek() else {
                        return Err(self.error("unterminated escape"));
                    };
                    self.pos += 1;
                    match esc {
                        b'n' => buf.push(b'\n'),
                        b't' => buf.push(b'\t'),
                        b'r' => buf.push(b'\r'),
                        b'\\' | b'\'' | b'"' => buf.push(esc),
                        other => {
                            // Unknown escapes are kept verbatim, backslash included.
                            buf.push(b'\\');
                            buf.push(other);
                        }
                    }
                }
                b'\n' => return Err(self.error("newline in string")),
                _ if b == quote => break,
                _ => buf.push(b),
            }
        }
        String::from_utf8(buf).map_err(|_| self.error("invalid utf-8 in string"))
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        while let Some(b) = self.peek() {
            let in_exponent_sign = matches!(b, b'-' | b'+')
                && matches!(self.src.get(self.pos.wrapping_sub(1)), Some(b'e' | b'E'));
            if b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || in_exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        // `start..pos` only spans ASCII bytes, so this slice is valid UTF-8.
        let text = std::str::from_utf8(&self.src[start..self.pos]).map_err(|_| self.error("invalid number"))?;
        text.parse::<f64>()
            .map(Literal::Number)
            .map_err(|_| LiteralError { offset: start, reason: "invalid number" })
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            b"None" => Ok(Literal::None),
            b"True" => Ok(Literal::Bool(true)),
            b"False" => Ok(Literal::Bool(false)),
            _ => Err(LiteralError { offset: start, reason: "unknown identifier" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_list_with_none() {
        let lit = parse_literal("['1.5', '2.5', None, 'bad']").unwrap();
        assert_eq!(
            lit,
            Literal::List(vec![
                Literal::Str("1.5".into()),
                Literal::Str("2.5".into()),
                Literal::None,
                Literal::Str("bad".into()),
            ])
        );
    }

    #[test]
    fn parses_numbers_nested_lists_and_trailing_comma() {
        let lit = parse_literal(" [1, -2.5e3, [True, False], (\"x\",), ] ").unwrap();
        assert_eq!(
            lit,
            Literal::List(vec![
                Literal::Number(1.0),
                Literal::Number(-2500.0),
                Literal::List(vec![Literal::Bool(true), Literal::Bool(false)]),
                Literal::Tuple(vec![Literal::Str("x".into())]),
            ])
        );
    }

    #[test]
    fn handles_escapes_inside_strings() {
        let lit = parse_literal(r"['it\'s', 'a\\b', 'q\d']").unwrap();
        assert_eq!(
            lit,
            Literal::List(vec![
                Literal::Str("it's".into()),
                Literal::Str("a\\b".into()),
                Literal::Str("q\\d".into()),
            ])
        );
    }

    #[test]
    fn empty_list_is_valid() {
        assert_eq!(parse_literal("[]").unwrap(), Literal::List(vec![]));
        assert_eq!(parse_literal("  [ ]  ").unwrap(), Literal::List(vec![]));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_literal("['1.0', '2.0'").is_err());
        assert!(parse_literal("['1.0' '2.0']").is_err());
        assert!(parse_literal("['unterminated]").is_err());
        assert!(parse_literal("[1.0]]").is_err());
        assert!(parse_literal("[nan]").is_err());
        assert!(parse_literal("").is_err());
        assert!(parse_literal("{'a': 1}").is_err());
    }

    #[test]
    fn limits_nesting_depth() {
        let nested = |d: usize| format!("{}{}", "[".repeat(d), "]".repeat(d));
        assert!(parse_literal(&nested(MAX_DEPTH)).is_ok());

        let err = parse_literal(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.reason, "nesting too deep");
        assert_eq!(err.offset, MAX_DEPTH);

        assert!(parse_literal(&nested(5_000)).is_err());
        assert!(parse_literal(&"[".repeat(100_000)).is_err());
        assert!(parse_literal(&"(".repeat(100_000)).is_err());
    }
}
