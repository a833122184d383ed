//! Tokenizer for effect source
//!
//! Produces the token stream consumed by both the preprocessor and the
//! parser. Comments and line continuations are dropped here; each token keeps
//! enough layout information (line start, leading space) for directive
//! detection and macro stringification.

use std::fmt;
use std::sync::Arc;

use crate::diagnostic::{Diagnostic, Location};

/// Punctuators, longest first so that matching is greedy
const PUNCTUATORS: &[&str] = &[
    "<<=", ">>=", "...", "##", "::", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "++", "--",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "#", "+", "-", "*", "/", "%", "<", ">", "=",
    "!", "~", "&", "|", "^", "?", ":", ";", ",", ".", "(", ")", "[", "]", "{", "}",
];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int { value: i64, unsigned: bool },
    Float(f64),
    Str(String),
    Punct(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
    /// First token on its logical source line
    pub line_start: bool,
    /// Preceded by whitespace or a comment
    pub space_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self {
            kind,
            location,
            line_start: false,
            space_before: false,
        }
    }

    pub fn is_punct(&self, p: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(q) if q == p)
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.ident() == Some(name)
    }

    /// Source text that lexes back to this token
    pub fn spelling(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Int { value, unsigned } => {
                if *unsigned {
                    format!("{value}u")
                } else {
                    value.to_string()
                }
            }
            TokenKind::Float(v) => {
                let text = v.to_string();
                if text.contains(['.', 'e', 'E', 'i', 'N']) {
                    text
                } else {
                    format!("{text}.0")
                }
            }
            TokenKind::Str(s) => quote(s),
            TokenKind::Punct(p) => p.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling())
    }
}

/// Wrap `s` in double quotes, escaping so the result lexes back to `s`
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            // Three octal digits never run into a following digit
            c if (c as u32) < 0x20 => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Split `source` into tokens, attributing them to `file`
pub fn tokenize(source: &str, file: impl Into<Arc<str>>) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(source, file.into()).run()
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: u32,
    file: Arc<str>,
    line_start: bool,
    space_before: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, file: Arc<str>) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            file,
            line_start: true,
            space_before: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.pos >= self.src.len() {
                break;
            }
            let location = self.location();
            let kind = self.token()?;
            tokens.push(Token {
                kind,
                location,
                line_start: self.line_start,
                space_before: self.space_before,
            });
            self.line_start = false;
            self.space_before = false;
        }
        Ok(tokens)
    }

    fn location(&self) -> Location {
        Location {
            file: self.file.clone(),
            line: self.line,
        }
    }

    fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.location(), message)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Length of a backslash-newline at the cursor, if any
    fn continuation(&self) -> Option<usize> {
        match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some(b'\\'), Some(b'\n'), _) => Some(2),
            (Some(b'\\'), Some(b'\r'), Some(b'\n')) => Some(3),
            _ => None,
        }
    }

    fn skip_trivia(&mut self) -> Result<(), Diagnostic> {
        while let Some(c) = self.peek() {
            if let Some(len) = self.continuation() {
                self.pos += len;
                self.line += 1;
                self.space_before = true;
                continue;
            }
            match c {
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = true;
                    self.space_before = true;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    self.pos += 1;
                    self.space_before = true;
                }
                b'/' if self.peek_at(1) == Some(b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        if let Some(len) = self.continuation() {
                            self.pos += len;
                            self.line += 1;
                        } else {
                            self.pos += 1;
                        }
                    }
                    self.space_before = true;
                }
                b'/' if self.peek_at(1) == Some(b'*') => {
                    let start = self.location();
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => return Err(Diagnostic::error(start, "unterminated comment")),
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(b'\n') => {
                                self.line += 1;
                                self.pos += 1;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                    self.space_before = true;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn token(&mut self) -> Result<TokenKind, Diagnostic> {
        let c = self.src[self.pos];
        if c.is_ascii_alphabetic() || c == b'_' {
            return Ok(self.identifier());
        }
        if c.is_ascii_digit() || (c == b'.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) {
            return self.number();
        }
        match c {
            b'"' => return self.string(),
            b'\'' => return self.character(),
            _ => {}
        }
        let rest = &self.src[self.pos..];
        if let Some(p) = PUNCTUATORS.iter().find(|p| rest.starts_with(p.as_bytes())) {
            self.pos += p.len();
            return Ok(TokenKind::Punct(*p));
        }
        let ch = std::str::from_utf8(rest)
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        Err(self.error(format!("unexpected character '{ch}'")))
    }

    fn identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        TokenKind::Ident(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn eat_digits(&mut self, radix: u32) {
        while self.peek().is_some_and(|c| (c as char).is_digit(radix)) {
            self.pos += 1;
        }
    }

    fn number(&mut self) -> Result<TokenKind, Diagnostic> {
        let start = self.pos;

        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            self.eat_digits(16);
            let digits = String::from_utf8_lossy(&self.src[digits_start..self.pos]).into_owned();
            let value = i64::from_str_radix(&digits, 16)
                .map_err(|_| self.error(format!("invalid hexadecimal literal '0x{digits}'")))?;
            return Ok(TokenKind::Int {
                value,
                unsigned: self.integer_suffix(),
            });
        }

        let mut is_float = false;
        self.eat_digits(10);
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            self.eat_digits(10);
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some(b'+' | b'-')));
            if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += 1 + sign;
                self.eat_digits(10);
            }
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();

        if matches!(self.peek(), Some(b'f' | b'F' | b'h' | b'H')) {
            self.pos += 1;
            is_float = true;
        }

        if is_float {
            let value = text
                .parse::<f64>()
                .map_err(|_| self.error(format!("invalid floating-point literal '{text}'")))?;
            return Ok(TokenKind::Float(value));
        }

        let unsigned = self.integer_suffix();
        let (digits, radix) = if text.len() > 1 && text.starts_with('0') {
            (&text[1..], 8)
        } else {
            (text.as_str(), 10)
        };
        let value = i64::from_str_radix(digits, radix)
            .map_err(|_| self.error(format!("invalid integer literal '{text}'")))?;
        Ok(TokenKind::Int { value, unsigned })
    }

    fn integer_suffix(&mut self) -> bool {
        let mut unsigned = false;
        while let Some(c) = self.peek() {
            match c {
                b'u' | b'U' => unsigned = true,
                b'l' | b'L' => {}
                _ => break,
            }
            self.pos += 1;
        }
        unsigned
    }

    fn string(&mut self) -> Result<TokenKind, Diagnostic> {
        let start = self.location();
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => return Err(Diagnostic::error(start, "unterminated string literal")),
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    if let Some(len) = self.continuation() {
                        self.pos += len;
                        self.line += 1;
                    } else {
                        self.pos += 1;
                        self.escape(&mut bytes);
                    }
                }
                Some(c) => {
                    bytes.push(c);
                    self.pos += 1;
                }
            }
        }
        Ok(TokenKind::Str(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn character(&mut self) -> Result<TokenKind, Diagnostic> {
        let start = self.location();
        self.pos += 1;
        let mut bytes = Vec::new();
        match self.peek() {
            Some(b'\\') => {
                self.pos += 1;
                self.escape(&mut bytes);
            }
            Some(c) if c != b'\'' && c != b'\n' => {
                bytes.push(c);
                self.pos += 1;
            }
            _ => return Err(Diagnostic::error(start, "empty character literal")),
        }
        if self.peek() != Some(b'\'') {
            return Err(Diagnostic::error(start, "unterminated character literal"));
        }
        self.pos += 1;
        Ok(TokenKind::Int {
            value: i64::from(bytes.first().copied().unwrap_or(0)),
            unsigned: false,
        })
    }

    /// Decode the escape sequence following a backslash
    fn escape(&mut self, out: &mut Vec<u8>) {
        let Some(c) = self.peek() else {
            return;
        };
        self.pos += 1;
        let byte = match c {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'0'..=b'7' => {
                let mut value = u32::from(c - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                (value & 0xff) as u8
            }
            b'x' => {
                let mut value = 0u32;
                for _ in 0..2 {
                    match self.peek().and_then(|d| (d as char).to_digit(16)) {
                        Some(d) => {
                            value = value * 16 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                value as u8
            }
            other => other,
        };
        out.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, "test.fx").unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    fn int(value: i64) -> TokenKind {
        TokenKind::Int { value, unsigned: false }
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            kinds("uniform float Strength < ui_min = 0.0; >;"),
            vec![
                ident("uniform"),
                ident("float"),
                ident("Strength"),
                TokenKind::Punct("<"),
                ident("ui_min"),
                TokenKind::Punct("="),
                TokenKind::Float(0.0),
                TokenKind::Punct(";"),
                TokenKind::Punct(">"),
                TokenKind::Punct(";"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42"), vec![int(42)]);
        assert_eq!(kinds("0x20000"), vec![int(0x20000)]);
        assert_eq!(kinds("017"), vec![int(15)]);
        assert_eq!(kinds("3u"), vec![TokenKind::Int { value: 3, unsigned: true }]);
        assert_eq!(kinds("1."), vec![TokenKind::Float(1.0)]);
        assert_eq!(kinds(".5"), vec![TokenKind::Float(0.5)]);
        assert_eq!(kinds("2.5e-1f"), vec![TokenKind::Float(0.25)]);
        assert_eq!(kinds("1e3"), vec![TokenKind::Float(1000.0)]);
        assert_eq!(kinds("0"), vec![int(0)]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""Off\0On\0" "a\"b" "\x41\101""#),
            vec![
                TokenKind::Str("Off\0On\0".to_string()),
                TokenKind::Str("a\"b".to_string()),
                TokenKind::Str("AA".to_string()),
            ]
        );
        assert_eq!(kinds("'A'"), vec![int(65)]);
    }

    #[test]
    fn test_greedy_punctuators() {
        assert_eq!(
            kinds("a::b <<= c ## d ..."),
            vec![
                ident("a"),
                TokenKind::Punct("::"),
                ident("b"),
                TokenKind::Punct("<<="),
                ident("c"),
                TokenKind::Punct("##"),
                ident("d"),
                TokenKind::Punct("..."),
            ]
        );
    }

    #[test]
    fn test_comments_and_layout() {
        let tokens = tokenize("a /* x\ny */ b // tail\n  #define", "test.fx").unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(tokens[0].line_start);
        assert!(!tokens[1].line_start);
        assert!(tokens[1].space_before);
        assert_eq!(tokens[1].location.line, 2);
        assert!(tokens[2].line_start);
        assert!(tokens[2].is_punct("#"));
        assert_eq!(tokens[2].location.line, 3);
        assert!(!tokens[3].space_before);
    }

    #[test]
    fn test_line_continuation() {
        let tokens = tokenize("#define A 1 \\\n + 2\nB", "test.fx").unwrap();
        let b = tokens.last().unwrap();
        assert!(b.is_ident("B"));
        assert!(b.line_start);
        assert_eq!(b.location.line, 3);
        assert!(tokens.iter().filter(|t| t.line_start).count() == 2);
    }

    #[test]
    fn test_errors() {
        assert!(tokenize("\"open", "test.fx").is_err());
        assert!(tokenize("/* open", "test.fx").is_err());
        let err = tokenize("a $ b", "test.fx").unwrap_err();
        assert!(err.message.contains('$'));
    }

    #[test]
    fn test_spelling_relexes() {
        for source in ["name", "12", "7u", "0.5", "2.0", "\"a\\0b\"", "<<="] {
            let token = &tokenize(source, "test.fx").unwrap()[0];
            let again = &tokenize(&token.spelling(), "test.fx").unwrap()[0];
            assert_eq!(token.kind, again.kind, "{source}");
        }
    }
}
