//! Combinator builder / "realizer" (spec component 5).
//!
//! Parses each construct's flat body into a `Combinator` tree using
//! recursive descent over the precedence ladder `Or > Chain > Postfix >
//! Primary`. Grounded on the reference realizer's primary/postfix/chain/or
//! cascade (`examples/original_source/grammar/realize.go`), but fixes the
//! string-literal-resolution bug flagged in spec section 9: a `String`
//! primary resolves against a declared literal token's *value*, never an
//! empty placeholder.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::combinator::{Combinator, Construct};
use crate::error::{GenResult, GeneratorError};
use crate::grammar::{ReadData, SimpleConstruct};
use crate::grammar_token::{GrammarToken, GrammarTokenKind};
use crate::token::TokenKind;

/// Realize every construct in `data` into a fully resolved combinator
/// forest. Token/construct name resolution happens here; nothing
/// downstream re-checks identifiers.
pub fn realize(data: &ReadData) -> GenResult<Vec<Construct>> {
    let token_names: HashSet<&str> = data.tokens.iter().map(|t| t.name.as_str()).collect();
    let construct_names: HashSet<&str> =
        data.simple_constructs.iter().map(|c| c.name.as_str()).collect();
    let literal_values: HashMap<&str, &str> = data
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Literal)
        .map(|t| (t.value.as_str(), t.name.as_str()))
        .collect();

    data.simple_constructs
        .iter()
        .map(|sc| realize_construct(sc, &token_names, &construct_names, &literal_values))
        .collect()
}

fn realize_construct(
    sc: &SimpleConstruct,
    token_names: &HashSet<&str>,
    construct_names: &HashSet<&str>,
    literal_values: &HashMap<&str, &str>,
) -> GenResult<Construct> {
    let mut cur = Cursor { tokens: &sc.body, pos: 0 };
    let value = parse_or(&mut cur, token_names, construct_names, literal_values)?;
    if !cur.at_end() {
        let tok = cur.peek().unwrap();
        return Err(GeneratorError::parse(
            format!("unexpected '{}' in body of construct '{}'", tok.text, sc.name),
            tok.pos,
        ));
    }
    Ok(Construct { name: sc.name.clone(), value, entry_point: sc.entry_point })
}

struct Cursor<'a> {
    tokens: &'a [GrammarToken],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a GrammarToken> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'a GrammarToken> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn stops_chain(&self) -> bool {
        match self.peek() {
            None => true,
            Some(t) => matches!(t.kind, GrammarTokenKind::Pipe | GrammarTokenKind::CParen),
        }
    }
}

fn parse_or(
    cur: &mut Cursor,
    token_names: &HashSet<&str>,
    construct_names: &HashSet<&str>,
    literal_values: &HashMap<&str, &str>,
) -> GenResult<Rc<Combinator>> {
    let mut children = vec![parse_chain(cur, token_names, construct_names, literal_values)?];
    while let Some(tok) = cur.peek() {
        if tok.kind != GrammarTokenKind::Pipe {
            break;
        }
        cur.bump();
        children.push(parse_chain(cur, token_names, construct_names, literal_values)?);
    }
    Ok(if children.len() == 1 {
        children.pop().unwrap()
    } else {
        Rc::new(Combinator::Or { children })
    })
}

fn parse_chain(
    cur: &mut Cursor,
    token_names: &HashSet<&str>,
    construct_names: &HashSet<&str>,
    literal_values: &HashMap<&str, &str>,
) -> GenResult<Rc<Combinator>> {
    let mut children = Vec::new();
    loop {
        children.push(parse_postfix(cur, token_names, construct_names, literal_values)?);
        if cur.stops_chain() {
            break;
        }
    }
    Ok(if children.len() == 1 {
        children.pop().unwrap()
    } else {
        Rc::new(Combinator::Chain { children })
    })
}

fn parse_postfix(
    cur: &mut Cursor,
    token_names: &HashSet<&str>,
    construct_names: &HashSet<&str>,
    literal_values: &HashMap<&str, &str>,
) -> GenResult<Rc<Combinator>> {
    let inner = parse_primary(cur, token_names, construct_names, literal_values)?;
    let op = match cur.peek() {
        Some(t)
            if matches!(
                t.kind,
                GrammarTokenKind::Star | GrammarTokenKind::Plus | GrammarTokenKind::Opt
            ) =>
        {
            cur.bump()
        }
        _ => return Ok(inner),
    }
    .unwrap();

    if let Some(next) = cur.peek() {
        if matches!(
            next.kind,
            GrammarTokenKind::Star | GrammarTokenKind::Plus | GrammarTokenKind::Opt
        ) {
            return Err(GeneratorError::parse("postfix operators do not stack", next.pos));
        }
    }

    Ok(match op.kind {
        GrammarTokenKind::Star => Rc::new(Combinator::Multi { inner, require_one: false }),
        GrammarTokenKind::Plus => Rc::new(Combinator::Multi { inner, require_one: true }),
        GrammarTokenKind::Opt => Rc::new(Combinator::Opt { inner }),
        _ => unreachable!(),
    })
}

fn parse_primary(
    cur: &mut Cursor,
    token_names: &HashSet<&str>,
    construct_names: &HashSet<&str>,
    literal_values: &HashMap<&str, &str>,
) -> GenResult<Rc<Combinator>> {
    let tok = cur.bump().ok_or_else(|| {
        GeneratorError::parse("expected a token, identifier, or '('", Default::default())
    })?;

    match tok.kind {
        GrammarTokenKind::String => match literal_values.get(tok.text.as_str()) {
            Some(name) => Ok(Rc::new(Combinator::TokenRef { token: name.to_string() })),
            None => Err(GeneratorError::parse(
                format!("no literal token declared with value \"{}\"", tok.text),
                tok.pos,
            )),
        },
        GrammarTokenKind::Id => {
            if construct_names.contains(tok.text.as_str()) {
                Ok(Rc::new(Combinator::Nested { construct: tok.text.clone() }))
            } else if token_names.contains(tok.text.as_str()) {
                Ok(Rc::new(Combinator::TokenRef { token: tok.text.clone() }))
            } else {
                Err(GeneratorError::parse(
                    format!("'{}' is not a declared token or construct", tok.text),
                    tok.pos,
                ))
            }
        }
        GrammarTokenKind::OParen => {
            let inner = parse_or(cur, token_names, construct_names, literal_values)?;
            match cur.bump() {
                Some(t) if t.kind == GrammarTokenKind::CParen => {
                    Ok(Rc::new(Combinator::Captured { inner }))
                }
                Some(t) => Err(GeneratorError::parse(
                    format!("expected ')', found '{}'", t.text),
                    t.pos,
                )),
                None => Err(GeneratorError::parse("unmatched '('", tok.pos)),
            }
        }
        _ => Err(GeneratorError::parse(
            format!("unexpected '{}', expected a token, identifier, or '('", tok.text),
            tok.pos,
        )),
    }
}
