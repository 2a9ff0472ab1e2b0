//! End-to-end scenario tests exercising the full pipeline: grammar source
//! bytes in, emitted C++ text out. The emitted text is never compiled or
//! run; assertions check for the shapes the schema table in the emitter
//! contract promises.

use crate::builder::realize;
use crate::emit::emit;
use crate::error::GeneratorError;
use crate::grammar::parse_grammar;

fn generate(src: &str) -> crate::emit::EmitOutput {
    let data = parse_grammar(src.as_bytes()).unwrap();
    let constructs = realize(&data).unwrap();
    emit(&data, &constructs)
}

#[test]
fn scenario_1_single_token_entry_point() {
    let out = generate(r#"tok EQ = "="; -> A = EQ;"#);
    assert!(out.parser_source.contains("enum class TokenKind"));
    assert!(out.parser_source.contains("EQ"));
    assert!(out.parser_source.contains("scan_EQ"));
    assert!(out.parser_source.contains("ParseResult parse(Stream& s)"));
}

#[test]
fn scenario_2_chain_of_two_tokens() {
    let out = generate(r#"tok A="a"; tok B="b"; -> S = A B;"#);
    assert!(out.parser_source.contains("std::vector<ParseResult> parts"));
    assert!(out.parser_source.contains("s.seek(offset)"));
}

#[test]
fn scenario_4_alternation() {
    let out = generate(r#"tok A="a"; tok B="b"; -> S = A | B;"#);
    assert!(out.parser_source.contains("if (r.ok) return r;"));
}

#[test]
fn scenario_5_star_always_succeeds() {
    let out = generate(r#"tok A="a"; -> S = A*;"#);
    assert!(!out.parser_source.contains("if (parts.empty())"));
}

#[test]
fn scenario_6_plus_requires_one() {
    let out = generate(r#"tok A="a"; -> S = A+;"#);
    assert!(out.parser_source.contains("if (parts.empty())"));
}

#[test]
fn scenario_7_skip_token_between_two_matches() {
    let out = generate(r#"tok A="a"; skip WS=[ while (s.peek()==' ') s.advance(); return false; ]; -> S = A A;"#);
    assert!(out.parser_source.contains("void skip_tokens(Stream& s)"));
    assert!(out.parser_source.contains("scan_WS"));
    let enum_start = out.parser_source.find("enum class TokenKind {").unwrap();
    let enum_end = out.parser_source[enum_start..].find("};").unwrap() + enum_start;
    assert!(!out.parser_source[enum_start..enum_end].contains("WS,"));
}

#[test]
fn trie_determinism_longest_match_wins() {
    use crate::token::{Token, TokenKind};
    use crate::trie::plan_tries;

    let tokens = vec![
        Token { name: "LT".into(), kind: TokenKind::Literal, value: "<".into(), skip: false, precedence: 0 },
        Token { name: "LE".into(), kind: TokenKind::Literal, value: "<=".into(), skip: false, precedence: 0 },
        Token { name: "SHL".into(), kind: TokenKind::Literal, value: "<<".into(), skip: false, precedence: 0 },
    ];
    let bands = plan_tries(&tokens);
    let (name, len) = bands[0].trie.longest_match(b"<=x").unwrap();
    assert_eq!(name, "LE");
    assert_eq!(len, 2);
}

#[test]
fn negative_two_entry_points_fails_at_generation_time() {
    let err = parse_grammar(br#"tok A="a"; -> S = A; -> T = A;"#).unwrap_err();
    assert!(matches!(err, GeneratorError::Parse { .. }));
    assert!(format!("{err}").contains("only one entry point"));
}

#[test]
fn captured_transparency_elides_its_own_function() {
    let out = generate(r#"tok A="a"; -> S = (A);"#);
    // Captured contributes no function of its own; only the TokenRef's
    // `unit_0` should be defined, there is no function for the grouping.
    assert!(out.parser_source.contains("unit_0(Stream& s) {"));
    assert!(!out.parser_source.contains("captured_0"));
}

#[test]
fn nested_construct_reference_calls_a_function_that_is_actually_defined() {
    let out = generate(r#"tok A="a"; B = A; -> S = B;"#);
    let nested_fn_start = out.parser_source.find("nested_0(Stream& s) {").unwrap();
    let body = &out.parser_source[nested_fn_start..];
    let call_marker = "ParseResult r = ";
    let call_start = body.find(call_marker).unwrap() + call_marker.len();
    let call_end = body[call_start..].find("(s);").unwrap() + call_start;
    let callee = &body[call_start..call_end];
    assert!(out.parser_source.contains(&format!("{callee}(Stream& s) {{")));
}

#[test]
fn structurally_identical_subtrees_share_one_function() {
    let out = generate(r#"tok A="a"; tok B="b"; -> S = A B | A B;"#);
    let chain_bodies = out.parser_source.matches("chain_0(Stream& s) {").count();
    assert_eq!(chain_bodies, 1);
    assert!(!out.parser_source.contains("chain_1"));
}
