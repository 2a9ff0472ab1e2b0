//! Trie planner (spec component 7).
//!
//! Groups literal tokens into precedence bands — sort by ascending
//! precedence, start a new band whenever the precedence jump to the next
//! literal exceeds 1 — then builds one byte-trie per band for longest-match
//! lookup. Grounded on the reference planner's `GroupStaticTokens`/
//! `KnownTrieInserts` pairing (`examples/original_source/grammar/write.go`).

use std::collections::BTreeMap;

use crate::token::{Token, TokenKind};

#[derive(Debug, Default)]
pub struct TrieNode {
    pub children: BTreeMap<u8, TrieNode>,
    /// Name of the literal token that terminates exactly here, if any.
    pub terminal: Option<String>,
}

impl TrieNode {
    fn insert(&mut self, value: &[u8], token_name: &str) {
        let mut node = self;
        for &b in value {
            node = node.children.entry(b).or_default();
        }
        node.terminal = Some(token_name.to_string());
    }

    /// Longest literal match starting at the front of `input`.
    pub fn longest_match<'a>(&self, input: &'a [u8]) -> Option<(&str, usize)> {
        let mut node = self;
        let mut best: Option<(&str, usize)> = None;
        for (i, &b) in input.iter().enumerate() {
            match node.children.get(&b) {
                Some(next) => {
                    node = next;
                    if let Some(name) = &node.terminal {
                        best = Some((name.as_str(), i + 1));
                    }
                }
                None => break,
            }
        }
        best
    }
}

#[derive(Debug)]
pub struct Band {
    pub precedence_lo: i64,
    pub precedence_hi: i64,
    pub tokens: Vec<Token>,
    pub trie: TrieNode,
}

/// Build one trie per precedence band over every literal token in
/// `tokens`. Bands are returned in ascending precedence order.
pub fn plan_tries(tokens: &[Token]) -> Vec<Band> {
    let mut literals: Vec<&Token> = tokens.iter().filter(|t| t.kind == TokenKind::Literal).collect();
    literals.sort_by_key(|t| t.precedence);

    let mut bands = Vec::new();
    let mut current: Vec<&Token> = Vec::new();
    let mut last_precedence: Option<i64> = None;

    for tok in literals {
        if let Some(last) = last_precedence {
            if tok.precedence - last > 1 {
                bands.push(finish_band(std::mem::take(&mut current)));
            }
        }
        last_precedence = Some(tok.precedence);
        current.push(tok);
    }
    if !current.is_empty() {
        bands.push(finish_band(current));
    }
    bands
}

fn finish_band(tokens: Vec<&Token>) -> Band {
    let precedence_lo = tokens.iter().map(|t| t.precedence).min().unwrap();
    let precedence_hi = tokens.iter().map(|t| t.precedence).max().unwrap();
    let mut trie = TrieNode::default();
    for tok in &tokens {
        trie.insert(tok.value.as_bytes(), &tok.name);
    }
    Band { precedence_lo, precedence_hi, tokens: tokens.into_iter().cloned().collect(), trie }
}
