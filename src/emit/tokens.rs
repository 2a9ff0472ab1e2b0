//! Token enumeration, static-literal singletons, trie data, `lex()`, and
//! the skip-token dispatch (spec section 4.7 items 2-5, section 6.3).

use crate::token::{Token, TokenKind};
use crate::trie::{plan_tries, Band, TrieNode};

pub fn emit_token_enum(tokens: &[Token]) -> String {
    let mut out = String::from("enum class TokenKind {\n");
    for tok in tokens.iter().filter(|t| !t.skip) {
        out.push_str(&format!("    {},\n", tok.name));
    }
    out.push_str("};\n");
    out
}

/// Each literal token gets a stable-identity singleton (spec section 5:
/// "no global mutable state in the emitted code except the static token
/// singletons").
pub fn emit_static_singletons(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens.iter().filter(|t| t.kind == TokenKind::Literal) {
        out.push_str(&format!(
            "static const Token TOKEN_{name} = Token::make_static(TokenKind::{name}, \"{value}\");\n",
            name = tok.name,
            value = escape_cpp_string(&tok.value),
        ));
    }
    out
}

fn escape_cpp_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn emit_trie_data(bands: &[Band]) -> String {
    let mut out = String::new();
    for (i, band) in bands.iter().enumerate() {
        out.push_str(&format!(
            "// precedence band [{}, {}]\n",
            band.precedence_lo, band.precedence_hi
        ));
        out.push_str(&format!("static LiteralTrie trie_band_{i};\n"));
        out.push_str(&format!("static void init_trie_band_{i}() {{\n"));
        emit_trie_inserts(&band.trie, Vec::new(), i, &mut out);
        out.push_str("}\n");
    }
    out
}

fn emit_trie_inserts(node: &TrieNode, prefix: Vec<u8>, band_idx: usize, out: &mut String) {
    if let Some(name) = &node.terminal {
        let literal = String::from_utf8_lossy(&prefix);
        out.push_str(&format!(
            "    trie_band_{band_idx}.insert(\"{}\", TokenKind::{name});\n",
            escape_cpp_string(&literal)
        ));
    }
    for (&byte, child) in &node.children {
        let mut next = prefix.clone();
        next.push(byte);
        emit_trie_inserts(child, next, band_idx, out);
    }
}

/// Build the precedence-ordered lexer dispatch: for each band, first the
/// band's trie, then any code tokens whose own precedence falls in the
/// same region, interleaved by ascending precedence (spec section 4.6).
pub fn emit_lex_function(tokens: &[Token], bands: &[Band]) -> String {
    let code_tokens: Vec<&Token> =
        tokens.iter().filter(|t| t.kind == TokenKind::Code && !t.skip).collect();

    let mut steps: Vec<(i64, String)> = Vec::new();
    for (i, band) in bands.iter().enumerate() {
        steps.push((
            band.precedence_lo,
            format!(
                "    if (auto m = trie_band_{i}.longest_match(s)) {{ return lex_result(*m); }}\n"
            ),
        ));
    }
    for tok in &code_tokens {
        steps.push((
            tok.precedence,
            format!(
                "    {{ Token tok; if (scan_{name}(s, tok)) return lex_result(tok); }}\n",
                name = tok.name
            ),
        ));
    }
    steps.sort_by_key(|(precedence, _)| *precedence);

    let mut out = String::from("LexResult lex(Stream& s) {\n");
    for (_, step) in steps {
        out.push_str(&step);
    }
    out.push_str("    return lex_result_failure();\n}\n");
    out
}

pub fn emit_skip_dispatch(tokens: &[Token]) -> String {
    let mut out = String::from("void skip_tokens(Stream& s) {\n    bool progressed = true;\n    while (progressed) {\n        progressed = false;\n");
    for tok in tokens.iter().filter(|t| t.skip) {
        out.push_str(&format!(
            "        {{ Token tok; if (scan_{name}(s, tok)) progressed = true; }}\n",
            name = tok.name
        ));
    }
    out.push_str("    }\n}\n");
    out
}

pub fn emit_token_scanners(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        out.push_str(&format!("bool scan_{}(Stream& s, Token& out);\n", tok.name));
    }
    out.push('\n');
    for tok in tokens {
        match tok.kind {
            TokenKind::Literal => out.push_str(&format!(
                "bool scan_{name}(Stream& s, Token& out) {{\n\
                 \x20   return s.match_literal(\"{value}\", TokenKind::{name}, out);\n\
                 }}\n",
                name = tok.name,
                value = escape_cpp_string(&tok.value),
            )),
            TokenKind::Code => out.push_str(&format!(
                "bool scan_{name}(Stream& s, Token& out) {{\n{body}\n}}\n",
                name = tok.name,
                body = tok.value,
            )),
        }
    }
    out
}

pub fn plan_and_emit_tokens(tokens: &[Token]) -> (Vec<Band>, String) {
    let bands = plan_tries(tokens);
    let mut out = String::new();
    out.push_str(&emit_token_enum(tokens));
    out.push_str(&emit_static_singletons(tokens));
    out.push_str(&emit_trie_data(&bands));
    out.push_str(&emit_lex_function(tokens, &bands));
    out.push_str(&emit_skip_dispatch(tokens));
    out.push_str(&emit_token_scanners(tokens));
    (bands, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(name: &str, value: &str, precedence: i64) -> Token {
        Token { name: name.into(), kind: TokenKind::Literal, value: value.into(), skip: false, precedence }
    }

    #[test]
    fn enum_skips_skip_tokens() {
        let tokens = vec![
            lit("A", "a", 0),
            Token { name: "WS".into(), kind: TokenKind::Code, value: "".into(), skip: true, precedence: 0 },
        ];
        let enum_text = emit_token_enum(&tokens);
        assert!(enum_text.contains("A"));
        assert!(!enum_text.contains("WS"));
    }

    #[test]
    fn lex_checks_trie_before_code_at_same_precedence() {
        let tokens = vec![
            lit("A", "a", 0),
            Token { name: "NUM".into(), kind: TokenKind::Code, value: "return false;".into(), skip: false, precedence: 0 },
        ];
        let (bands, _) = plan_and_emit_tokens(&tokens);
        let lex_text = emit_lex_function(&tokens, &bands);
        let trie_pos = lex_text.find("trie_band_0").unwrap();
        let code_pos = lex_text.find("scan_NUM").unwrap();
        assert!(trie_pos < code_pos);
    }
}
