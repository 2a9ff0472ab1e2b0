//! The grammar tokenizer (spec component 2).
//!
//! Produces `GrammarToken`s lazily from a `ByteReader`. Grounded on the
//! reference implementation's keyword-list-then-dispatch-by-first-byte
//! strategy (`examples/original_source/grammar/gtoken.go`), but fixes the
//! bug flagged in spec section 9: a bare `-` no longer starts an integer
//! scan unless it is immediately followed by a digit.

use crate::error::{GenResult, GeneratorError};
use crate::position::Position;
use crate::reader::ByteReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarTokenKind {
    Id,
    CppCode,
    String,
    Int,
    Prefix,
    Suffix,
    Tok,
    Skip,
    Arrow,
    Eq,
    OBrace,
    CBrace,
    OParen,
    CParen,
    Semi,
    Star,
    Plus,
    Opt,
    Pipe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarToken {
    pub kind: GrammarTokenKind,
    pub text: String,
    pub pos: Position,
}

impl GrammarToken {
    fn new(kind: GrammarTokenKind, text: impl Into<String>, pos: Position) -> Self {
        Self { kind, text: text.into(), pos }
    }
}

/// Fixed keyword/punctuator table, tried in order (longest multi-char
/// tokens like `->` must precede anything that could be confused with a
/// prefix of a later entry; none of these share a prefix so order beyond
/// that is cosmetic).
const KEYWORDS: &[(&str, GrammarTokenKind)] = &[
    ("prefix", GrammarTokenKind::Prefix),
    ("suffix", GrammarTokenKind::Suffix),
    ("tok", GrammarTokenKind::Tok),
    ("skip", GrammarTokenKind::Skip),
    ("->", GrammarTokenKind::Arrow),
    ("=", GrammarTokenKind::Eq),
    ("{", GrammarTokenKind::OBrace),
    ("}", GrammarTokenKind::CBrace),
    ("(", GrammarTokenKind::OParen),
    (")", GrammarTokenKind::CParen),
    (";", GrammarTokenKind::Semi),
    ("*", GrammarTokenKind::Star),
    ("+", GrammarTokenKind::Plus),
    ("?", GrammarTokenKind::Opt),
    ("|", GrammarTokenKind::Pipe),
];

fn is_id_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_id_continue(b: u8) -> bool {
    is_id_start(b) || b.is_ascii_digit()
}

fn skip_whitespace(r: &mut ByteReader) {
    while let Some(b) = r.peek() {
        if b.is_ascii_whitespace() {
            r.read();
        } else {
            break;
        }
    }
}

/// Read the next grammar token, or `Ok(None)` at a clean end-of-input.
pub fn read_grammar_token(r: &mut ByteReader) -> GenResult<Option<GrammarToken>> {
    skip_whitespace(r);
    if r.is_eof() {
        return Ok(None);
    }

    let start = r.position();

    // An identifier that happens to spell a keyword (e.g. a construct
    // named `tokfoo`) must not match the keyword table; keywords only
    // match when the next byte after them is not itself an identifier
    // continuation.
    for (kw, kind) in KEYWORDS {
        if r.matches(kw.as_bytes()) {
            let is_word_kw = kw.as_bytes()[0].is_ascii_alphabetic();
            let next = r.peek_at(kw.len());
            if is_word_kw && next.map(is_id_continue).unwrap_or(false) {
                continue;
            }
            r.discard(kw.len());
            return Ok(Some(GrammarToken::new(*kind, *kw, start)));
        }
    }

    match r.peek().unwrap() {
        b'"' | b'\'' => read_string(r).map(Some),
        b'[' => read_code(r).map(Some),
        b if b.is_ascii_digit() => read_int(r).map(Some),
        b'-' if r.peek_at(1).map(|n| n.is_ascii_digit()).unwrap_or(false) => {
            read_int(r).map(Some)
        }
        b if is_id_start(b) => read_id(r).map(Some),
        b => Err(GeneratorError::lex(
            format!("unexpected character '{}'", b as char),
            start,
        )),
    }
}

fn read_int(r: &mut ByteReader) -> GenResult<GrammarToken> {
    let start = r.position();
    let mut text = String::new();
    if r.peek() == Some(b'-') {
        text.push('-');
        r.read();
    }
    let mut saw_digit = false;
    while let Some(b) = r.peek() {
        if b.is_ascii_digit() {
            text.push(b as char);
            r.read();
            saw_digit = true;
        } else {
            break;
        }
    }
    if !saw_digit {
        return Err(GeneratorError::lex("expected digits after '-'", start));
    }
    Ok(GrammarToken::new(GrammarTokenKind::Int, text, start))
}

/// Unescape a single backslash sequence, returning the decoded byte(s).
fn unescape(r: &mut ByteReader, start: Position) -> GenResult<String> {
    let esc = r.read().ok_or_else(|| {
        GeneratorError::lex("unterminated escape sequence", start)
    })?;
    Ok(match esc {
        b'n' => "\n".to_string(),
        b't' => "\t".to_string(),
        b'r' => "\r".to_string(),
        b'\\' => "\\".to_string(),
        b'"' => "\"".to_string(),
        b'\'' => "'".to_string(),
        b'x' => {
            let hi = r.read().ok_or_else(|| GeneratorError::lex("unterminated \\x escape", start))?;
            let lo = r.read().ok_or_else(|| GeneratorError::lex("unterminated \\x escape", start))?;
            let byte = u8::from_str_radix(&format!("{}{}", hi as char, lo as char), 16)
                .map_err(|_| GeneratorError::lex("invalid \\xHH escape", start))?;
            (byte as char).to_string()
        }
        other => {
            return Err(GeneratorError::lex(
                format!("unknown escape sequence '\\{}'", other as char),
                start,
            ))
        }
    })
}

fn read_string(r: &mut ByteReader) -> GenResult<GrammarToken> {
    let start = r.position();
    let quote = r.read().unwrap();
    let mut text = String::new();
    loop {
        let b = r.read().ok_or_else(|| GeneratorError::lex("unterminated string literal", start))?;
        if b == b'\\' {
            text.push_str(&unescape(r, start)?);
            continue;
        }
        if b == quote {
            break;
        }
        text.push(b as char);
    }
    Ok(GrammarToken::new(GrammarTokenKind::String, text, start))
}

fn read_code(r: &mut ByteReader) -> GenResult<GrammarToken> {
    let start = r.position();
    r.read(); // '['
    let mut depth = 1i32;
    let mut text = String::new();
    loop {
        let b = r.read().ok_or_else(|| GeneratorError::lex("unterminated code block", start))?;
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        text.push(b as char);
    }
    Ok(GrammarToken::new(GrammarTokenKind::CppCode, text, start))
}

fn read_id(r: &mut ByteReader) -> GenResult<GrammarToken> {
    let start = r.position();
    let mut text = String::new();
    while let Some(b) = r.peek() {
        if is_id_continue(b) {
            text.push(b as char);
            r.read();
        } else {
            break;
        }
    }
    Ok(GrammarToken::new(GrammarTokenKind::Id, text, start))
}

/// A one-token-lookahead cursor over the grammar token stream, needed
/// because combinator/grammar parsing is LL(1) over grammar tokens
/// (spec section 4.1).
pub struct GrammarTokenStream<'a> {
    reader: ByteReader<'a>,
    lookahead: Option<GrammarToken>,
}

impl<'a> GrammarTokenStream<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { reader: ByteReader::new(bytes), lookahead: None }
    }

    pub fn peek(&mut self) -> GenResult<Option<&GrammarToken>> {
        if self.lookahead.is_none() {
            self.lookahead = read_grammar_token(&mut self.reader)?;
        }
        Ok(self.lookahead.as_ref())
    }

    pub fn next(&mut self) -> GenResult<Option<GrammarToken>> {
        if let Some(tok) = self.lookahead.take() {
            return Ok(Some(tok));
        }
        read_grammar_token(&mut self.reader)
    }

    /// Position of the next unconsumed byte; used for error reporting
    /// when a caller needs "here" rather than "where the last token
    /// started".
    pub fn position(&self) -> Position {
        self.lookahead.as_ref().map(|t| t.pos).unwrap_or_else(|| self.reader.position())
    }

    pub fn byte_reader_mut(&mut self) -> &mut ByteReader<'a> {
        &mut self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<GrammarToken> {
        let mut r = ByteReader::new(src.as_bytes());
        let mut out = Vec::new();
        while let Some(t) = read_grammar_token(&mut r).unwrap() {
            out.push(t);
        }
        out
    }

    #[test]
    fn keywords_and_punctuation() {
        let kinds: Vec<_> = toks("tok skip -> = { } ( ) ; * + ? |")
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                GrammarTokenKind::Tok,
                GrammarTokenKind::Skip,
                GrammarTokenKind::Arrow,
                GrammarTokenKind::Eq,
                GrammarTokenKind::OBrace,
                GrammarTokenKind::CBrace,
                GrammarTokenKind::OParen,
                GrammarTokenKind::CParen,
                GrammarTokenKind::Semi,
                GrammarTokenKind::Star,
                GrammarTokenKind::Plus,
                GrammarTokenKind::Opt,
                GrammarTokenKind::Pipe,
            ]
        );
    }

    #[test]
    fn identifier_that_starts_with_keyword_text() {
        let result = toks("tokenizer");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, GrammarTokenKind::Id);
        assert_eq!(result[0].text, "tokenizer");
    }

    #[test]
    fn string_with_escapes() {
        let result = toks(r#""a\nb\"c""#);
        assert_eq!(result[0].kind, GrammarTokenKind::String);
        assert_eq!(result[0].text, "a\nb\"c");
    }

    #[test]
    fn nested_code_block() {
        let result = toks("[ if (a[0]) { return 1; } ]");
        assert_eq!(result[0].kind, GrammarTokenKind::CppCode);
        assert_eq!(result[0].text, " if (a[0]) { return 1; } ");
    }

    #[test]
    fn negative_integer() {
        let result = toks("-12");
        assert_eq!(result[0].kind, GrammarTokenKind::Int);
        assert_eq!(result[0].text, "-12");
    }

    #[test]
    fn bare_dash_is_a_lex_error() {
        let mut r = ByteReader::new(b"- x");
        let err = read_grammar_token(&mut r).unwrap_err();
        assert!(matches!(err, GeneratorError::Lex { .. }));
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut r = ByteReader::new(b"\"abc");
        assert!(read_grammar_token(&mut r).is_err());
    }
}
