//! Grammar parser (spec component 4): consumes the grammar token stream
//! into a `ReadData`. Grounded on the reference reader's top-level
//! dispatch loop (`examples/original_source/grammar/reader.go`), with the
//! suffix-list bug fixed per spec section 9.

use crate::error::{GenResult, GeneratorError};
use crate::fix::read_fix_block;
use crate::grammar_token::{GrammarToken, GrammarTokenKind, GrammarTokenStream};
use crate::token::{Token, TokenKind};

/// A construct's unparsed right-hand side: the flat token sequence between
/// `=` and `;`. The combinator builder gives this structure.
#[derive(Debug, Clone)]
pub struct SimpleConstruct {
    pub name: String,
    pub entry_point: bool,
    pub body: Vec<GrammarToken>,
}

#[derive(Debug, Clone, Default)]
pub struct ReadData {
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    pub tokens: Vec<Token>,
    pub simple_constructs: Vec<SimpleConstruct>,
}

pub fn parse_grammar(source: &[u8]) -> GenResult<ReadData> {
    let mut stream = GrammarTokenStream::new(source);
    let mut data = ReadData::default();
    let mut pending_entry = false;

    loop {
        let tok = match stream.next()? {
            Some(t) => t,
            None => break,
        };

        match tok.kind {
            GrammarTokenKind::Semi => continue,
            GrammarTokenKind::Prefix => {
                expect(&mut stream, GrammarTokenKind::OBrace)?;
                let text = read_fix_block(stream.byte_reader_mut())?;
                data.prefixes.push(text);
            }
            GrammarTokenKind::Suffix => {
                expect(&mut stream, GrammarTokenKind::OBrace)?;
                let text = read_fix_block(stream.byte_reader_mut())?;
                data.suffixes.push(text);
            }
            GrammarTokenKind::Tok | GrammarTokenKind::Skip => {
                let token = parse_token_decl(&mut stream, tok.kind == GrammarTokenKind::Skip)?;
                data.tokens.push(token);
            }
            GrammarTokenKind::Arrow => {
                if pending_entry {
                    return Err(GeneratorError::parse(
                        "duplicate '->' with no construct in between",
                        tok.pos,
                    ));
                }
                pending_entry = true;
            }
            GrammarTokenKind::Id => {
                let entry_point = std::mem::take(&mut pending_entry);
                let construct = parse_construct(&mut stream, tok, entry_point)?;
                data.simple_constructs.push(construct);
            }
            _ => {
                return Err(GeneratorError::parse(
                    format!("unexpected token '{}' at top level", tok.text),
                    tok.pos,
                ))
            }
        }
    }

    if pending_entry {
        return Err(GeneratorError::parse(
            "'->' not followed by a construct declaration",
            stream.position(),
        ));
    }

    validate_entry_points(&data)?;
    Ok(data)
}

fn validate_entry_points(data: &ReadData) -> GenResult<()> {
    let count = data.simple_constructs.iter().filter(|c| c.entry_point).count();
    if count > 1 {
        return Err(GeneratorError::parse("only one entry point allowed", Default::default()));
    }
    if data.simple_constructs.is_empty() {
        return Err(GeneratorError::integrity("grammar declares no constructs"));
    }
    if count == 0 {
        return Err(GeneratorError::integrity("no entry point declared"));
    }
    Ok(())
}

fn expect(stream: &mut GrammarTokenStream, kind: GrammarTokenKind) -> GenResult<GrammarToken> {
    match stream.next()? {
        Some(tok) if tok.kind == kind => Ok(tok),
        Some(tok) => Err(GeneratorError::parse(
            format!("expected {:?}, found '{}'", kind, tok.text),
            tok.pos,
        )),
        None => Err(GeneratorError::parse(
            format!("expected {:?}, found end of input", kind),
            stream.position(),
        )),
    }
}

fn parse_token_decl(stream: &mut GrammarTokenStream, skip: bool) -> GenResult<Token> {
    let mut precedence = 0i64;
    if let Some(tok) = stream.peek()? {
        if tok.kind == GrammarTokenKind::Int {
            precedence = tok.text.parse().expect("lexer guarantees valid integer text");
            if precedence < 0 {
                return Err(GeneratorError::integrity(format!(
                    "token precedence must be non-negative, found {precedence}"
                )));
            }
            stream.next()?;
        }
    }

    let name_tok = expect(stream, GrammarTokenKind::Id)?;
    expect(stream, GrammarTokenKind::Eq)?;

    let value_tok = match stream.next()? {
        Some(t) if t.kind == GrammarTokenKind::String => t,
        Some(t) if t.kind == GrammarTokenKind::CppCode => t,
        Some(t) => {
            return Err(GeneratorError::parse(
                format!("token value must be a string or code block, found '{}'", t.text),
                t.pos,
            ))
        }
        None => {
            return Err(GeneratorError::parse(
                "expected token value, found end of input",
                stream.position(),
            ))
        }
    };

    let kind = if value_tok.kind == GrammarTokenKind::String {
        TokenKind::Literal
    } else {
        TokenKind::Code
    };

    if kind == TokenKind::Literal && value_tok.text.is_empty() {
        return Err(GeneratorError::integrity(format!(
            "literal token '{}' has an empty value",
            name_tok.text
        )));
    }

    expect(stream, GrammarTokenKind::Semi)?;

    Ok(Token { name: name_tok.text, kind, value: value_tok.text, skip, precedence })
}

fn parse_construct(
    stream: &mut GrammarTokenStream,
    name_tok: GrammarToken,
    entry_point: bool,
) -> GenResult<SimpleConstruct> {
    expect(stream, GrammarTokenKind::Eq)?;

    let mut body = Vec::new();
    loop {
        match stream.next()? {
            Some(t) if t.kind == GrammarTokenKind::Semi => break,
            Some(t) => body.push(t),
            None => {
                return Err(GeneratorError::parse(
                    format!("construct '{}' is missing a terminating ';'", name_tok.text),
                    stream.position(),
                ))
            }
        }
    }

    if body.is_empty() {
        return Err(GeneratorError::parse(
            format!("construct '{}' has an empty body", name_tok.text),
            name_tok.pos,
        ));
    }

    Ok(SimpleConstruct { name: name_tok.text, entry_point, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefix_and_suffix_into_distinct_lists() {
        let data = parse_grammar(
            br#"
            prefix { #include <a> }
            suffix { // tail
            }
            tok EQ = "=";
            -> A = EQ;
        "#,
        )
        .unwrap();
        assert_eq!(data.prefixes.len(), 1);
        assert_eq!(data.suffixes.len(), 1);
        assert!(data.prefixes[0].contains("#include"));
        assert!(data.suffixes[0].contains("tail"));
    }

    #[test]
    fn parses_token_and_construct() {
        let data = parse_grammar(br#"tok EQ = "="; -> A = EQ;"#).unwrap();
        assert_eq!(data.tokens.len(), 1);
        assert_eq!(data.tokens[0].name, "EQ");
        assert_eq!(data.tokens[0].kind, TokenKind::Literal);
        assert_eq!(data.simple_constructs.len(), 1);
        assert!(data.simple_constructs[0].entry_point);
    }

    #[test]
    fn token_with_precedence() {
        let data = parse_grammar(br#"tok 3 EQ = "="; -> A = EQ;"#).unwrap();
        assert_eq!(data.tokens[0].precedence, 3);
    }

    #[test]
    fn skip_token_is_marked() {
        let data = parse_grammar(br#"tok A="a"; skip WS=[ \s+ ]; -> S = A;"#).unwrap();
        let ws = data.tokens.iter().find(|t| t.name == "WS").unwrap();
        assert!(ws.skip);
        assert_eq!(ws.kind, TokenKind::Code);
    }

    #[test]
    fn rejects_two_entry_points() {
        let err = parse_grammar(br#"tok A="a"; -> S = A; -> T = A;"#).unwrap_err();
        assert!(matches!(err, GeneratorError::Parse { .. }));
    }

    #[test]
    fn rejects_missing_entry_point() {
        let err = parse_grammar(br#"tok A="a"; S = A;"#).unwrap_err();
        assert!(matches!(err, GeneratorError::Integrity { .. }));
    }

    #[test]
    fn rejects_empty_literal_value() {
        let err = parse_grammar(br#"tok A=""; -> S = A;"#).unwrap_err();
        assert!(matches!(err, GeneratorError::Integrity { .. }));
    }

    #[test]
    fn rejects_negative_precedence() {
        let err = parse_grammar(br#"tok -1 A="a"; -> S = A;"#).unwrap_err();
        assert!(matches!(err, GeneratorError::Integrity { .. }));
    }
}
