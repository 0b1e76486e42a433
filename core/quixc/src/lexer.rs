//! A minimal hand-rolled tokenizer standing in for the "real" external
//! lexer that §1 of the specification treats as out of scope. Unlike the
//! integration test crate's fixture (built directly against small, literal
//! token lists), this one has to turn arbitrary source text typed into a
//! file on disk into a [`quixc_parser::token::TokenStream`], since `qcc`
//! has to be runnable against real input. It covers the punctuator,
//! keyword, and literal grammar the parser actually dispatches on
//! (`quixc_parser::lib::STATEMENT_KEYWORDS` plus the word-operator and
//! literal keywords) and nothing more exotic than that — no hex/octal
//! integers, no raw strings, no nested block comments.

use quixc_ast::Span;
use quixc_parser::token::{Token, TokenStream};

const KEYWORDS: &[&str] = &[
    "var", "let", "const", "enum", "struct", "region", "group", "union", "class", "type",
    "subsystem", "fn", "pub", "sec", "pro", "import", "return", "retif", "retz", "retv", "break",
    "continue", "if", "else", "while", "for", "form", "foreach", "switch", "case", "default",
    "__asm__", "safe", "unsafe", "volatile", "with",
    "as", "is", "in", "sizeof", "alignof", "bitsizeof", "typeof", "bitcast_as", "reinterpret_as",
    "offsetof",
    "true", "false", "null", "undef",
];

/// Longest-match-first; entries of equal length are in no particular order
/// since the scanner always tries 3 before 2 before 1 regardless.
const PUNCTUATORS_3: &[&str] = &["...", "<<=", ">>=", "&&=", "||=", "^^="];
const PUNCTUATORS_2: &[&str] = &[
    "::", "->", "==", "!=", "<=", ">=", "<<", ">>", "&&", "||", "^^", "**", "++", "--", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=",
];
const PUNCTUATORS_1: &[char] = &[
    '(', ')', '{', '}', '[', ']', ',', ';', ':', '.', '<', '>', '=', '+', '-', '*', '/', '%',
    '&', '|', '^', '!', '~', '?',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokKind {
    Keyword,
    Name,
    Int,
    Float,
    Str,
    Char,
    Punct,
    Eof,
}

#[derive(Debug, Clone)]
pub struct RawToken {
    kind: TokKind,
    text: String,
    span: Span,
}

impl Token for RawToken {
    fn kind_id(&self) -> u32 {
        self.kind as u32
    }

    fn span(&self) -> Span {
        self.span
    }

    fn is_eof(&self) -> bool {
        self.kind == TokKind::Eof
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokKind::Keyword && self.text == keyword
    }

    fn is_punctuator(&self, punct: &str) -> bool {
        self.kind == TokKind::Punct && self.text == punct
    }

    fn is_operator(&self) -> bool {
        self.kind == TokKind::Punct && quixc_parser::precedence::lookup(&self.text).is_some()
    }

    fn is_name(&self) -> bool {
        self.kind == TokKind::Name
    }

    fn is_integer_literal(&self) -> bool {
        self.kind == TokKind::Int
    }

    fn is_float_literal(&self) -> bool {
        self.kind == TokKind::Float
    }

    fn is_string_literal(&self) -> bool {
        self.kind == TokKind::Str
    }

    fn is_char_literal(&self) -> bool {
        self.kind == TokKind::Char
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// Scans `src` one token at a time, keeping a single lookahead slot so
/// `peek` can be idempotent per [`TokenStream`]'s contract.
pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    peeked: Option<RawToken>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { src, bytes: src.as_bytes(), pos: 0, peeked: None }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek_byte_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_byte_at(1) == Some(b'*') => {
                    self.pos += 2;
                    while self.pos < self.bytes.len() && !(self.peek_byte() == Some(b'*') && self.peek_byte_at(1) == Some(b'/')) {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.bytes.len());
                }
                _ => break,
            }
        }
    }

    fn scan_one(&mut self) -> RawToken {
        self.skip_trivia();
        let start = self.pos as u32;
        let Some(b) = self.peek_byte() else {
            return RawToken { kind: TokKind::Eof, text: String::new(), span: Span::new(start, start) };
        };

        if b.is_ascii_alphabetic() || b == b'_' {
            return self.scan_name(start);
        }
        if b.is_ascii_digit() {
            return self.scan_number(start);
        }
        if b == b'"' {
            return self.scan_string(start);
        }
        if b == b'\'' {
            return self.scan_char(start);
        }
        self.scan_punctuator(start)
    }

    fn scan_name(&mut self, start: u32) -> RawToken {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.src[start as usize..self.pos].to_string();
        let kind = if KEYWORDS.contains(&text.as_str()) { TokKind::Keyword } else { TokKind::Name };
        RawToken { kind, text, span: Span::new(start, self.pos as u32) }
    }

    fn scan_number(&mut self, start: u32) -> RawToken {
        while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek_byte() == Some(b'.') && matches!(self.peek_byte_at(1), Some(b) if b.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek_byte(), Some(b'e') | Some(b'E')) {
            let mut look = self.pos + 1;
            if matches!(self.bytes.get(look), Some(b'+') | Some(b'-')) {
                look += 1;
            }
            if matches!(self.bytes.get(look), Some(b) if b.is_ascii_digit()) {
                is_float = true;
                self.pos = look;
                while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        let text = self.src[start as usize..self.pos].to_string();
        let kind = if is_float { TokKind::Float } else { TokKind::Int };
        RawToken { kind, text, span: Span::new(start, self.pos as u32) }
    }

    fn scan_escape(&mut self) -> char {
        self.pos += 1; // the backslash
        let c = self.peek_byte().map(|b| b as char).unwrap_or('\\');
        self.pos += 1;
        match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        }
    }

    fn scan_string(&mut self, start: u32) -> RawToken {
        self.pos += 1; // opening quote
        let mut text = String::new();
        loop {
            match self.peek_byte() {
                None | Some(b'"') => break,
                Some(b'\\') => text.push(self.scan_escape()),
                Some(_) => {
                    let ch = self.src[self.pos..].chars().next().unwrap_or('\0');
                    text.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
        if self.peek_byte() == Some(b'"') {
            self.pos += 1;
        }
        RawToken { kind: TokKind::Str, text, span: Span::new(start, self.pos as u32) }
    }

    fn scan_char(&mut self, start: u32) -> RawToken {
        self.pos += 1; // opening quote
        let ch = match self.peek_byte() {
            Some(b'\\') => self.scan_escape(),
            Some(_) => {
                let c = self.src[self.pos..].chars().next().unwrap_or('\0');
                self.pos += c.len_utf8();
                c
            }
            None => '\0',
        };
        if self.peek_byte() == Some(b'\'') {
            self.pos += 1;
        }
        RawToken { kind: TokKind::Char, text: ch.to_string(), span: Span::new(start, self.pos as u32) }
    }

    fn scan_punctuator(&mut self, start: u32) -> RawToken {
        let rest = &self.src[self.pos..];
        for p in PUNCTUATORS_3 {
            if rest.starts_with(p) {
                self.pos += p.len();
                return RawToken { kind: TokKind::Punct, text: (*p).to_string(), span: Span::new(start, self.pos as u32) };
            }
        }
        for p in PUNCTUATORS_2 {
            if rest.starts_with(p) {
                self.pos += p.len();
                return RawToken { kind: TokKind::Punct, text: (*p).to_string(), span: Span::new(start, self.pos as u32) };
            }
        }
        let c = rest.chars().next().unwrap_or('\0');
        if PUNCTUATORS_1.contains(&c) {
            self.pos += c.len_utf8();
            return RawToken { kind: TokKind::Punct, text: c.to_string(), span: Span::new(start, self.pos as u32) };
        }
        // Unrecognized byte: consume it as a single-char punctuator anyway
        // so the parser's own error recovery can report it, rather than
        // looping forever on a character the scanner doesn't understand.
        self.pos += c.len_utf8().max(1);
        RawToken { kind: TokKind::Punct, text: c.to_string(), span: Span::new(start, self.pos as u32) }
    }
}

impl<'a> TokenStream for Lexer<'a> {
    type Tok = RawToken;

    fn peek(&mut self) -> RawToken {
        if self.peeked.is_none() {
            self.peeked = Some(self.scan_one());
        }
        self.peeked.clone().expect("just populated")
    }

    fn next(&mut self) -> RawToken {
        if let Some(tok) = self.peeked.take() {
            return tok;
        }
        self.scan_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_small_function() {
        let mut lexer = Lexer::new("fn add(x: u32, y: u32) -> u32 { return x + y; }");
        let mut kinds = Vec::new();
        loop {
            let tok = lexer.next();
            if tok.is_eof() {
                break;
            }
            kinds.push(tok.text().to_string());
        }
        assert_eq!(
            kinds,
            vec![
                "fn", "add", "(", "x", ":", "u32", ",", "y", ":", "u32", ")", "->", "u32", "{",
                "return", "x", "+", "y", ";", "}"
            ]
        );
    }

    #[test]
    fn peek_is_idempotent() {
        let mut lexer = Lexer::new("let x = 1;");
        let a = lexer.peek();
        let b = lexer.peek();
        assert_eq!(a.text(), b.text());
        assert_eq!(lexer.next().text(), a.text());
    }

    #[test]
    fn scans_string_and_int_literals() {
        let mut lexer = Lexer::new(r#""hi" 42 3.5"#);
        let s = lexer.next();
        assert!(s.is_string_literal());
        assert_eq!(s.text(), "hi");
        let i = lexer.next();
        assert!(i.is_integer_literal());
        let f = lexer.next();
        assert!(f.is_float_literal());
    }
}
