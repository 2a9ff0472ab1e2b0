//! Combinator function bodies (spec section 4.7 item 7, the schema table).
//!
//! Every body obeys the stream-position restoration contract: a failed
//! combinator leaves the stream offset exactly as it found it.

use std::rc::Rc;

use crate::combinator::{Combinator, Construct};
use crate::emission::{EmissionContext, SlotId};

use super::plan::function_name_of;

pub fn emit_prototype(slot: SlotId) -> String {
    format!("ParseResult {}(Stream& s);", slot.function_name())
}

/// `constructs` is needed only for the `Nested` case: its call target is
/// not `slot`/`node` themselves but whatever function is already assigned
/// to the named construct's root combinator (the same function `parse()`
/// calls for the entry point, and the same function a sibling `Nested`
/// referencing the same construct would share).
pub fn emit_body(
    slot: SlotId,
    node: &Rc<Combinator>,
    ctx: &mut EmissionContext,
    constructs: &[Construct],
) -> String {
    let name = slot.function_name();
    match node.as_ref() {
        Combinator::TokenRef { token } => format!(
            "ParseResult {name}(Stream& s) {{\n\
             \x20   Token tok;\n\
             \x20   if (!scan_{token}(s, tok)) return ParseResult::fail();\n\
             \x20   return ParseResult::leaf(tok);\n\
             }}\n"
        ),
        Combinator::Nested { construct } => {
            let target = constructs.iter().find(|c| &c.name == construct).expect(
                "the builder already validated that every Nested reference names a declared construct",
            );
            let target_fn = function_name_of(&target.value, ctx);
            format!(
                "ParseResult {name}(Stream& s) {{\n\
                 \x20   ParseResult r = {target_fn}(s);\n\
                 \x20   if (!r.ok) return ParseResult::fail();\n\
                 \x20   return ParseResult::subtree(ConstructTag::{construct}, std::move(r));\n\
                 }}\n"
            )
        }
        Combinator::Chain { children } => emit_chain(&name, children, ctx),
        Combinator::Or { children } => emit_or(&name, children, ctx),
        Combinator::Multi { inner, require_one } => emit_multi(&name, inner, *require_one, ctx),
        Combinator::Opt { inner } => emit_opt(&name, inner, ctx),
        Combinator::Captured { .. } => {
            unreachable!("Captured has no emitted function; callers invoke inner directly")
        }
    }
}

fn emit_chain(name: &str, children: &[Rc<Combinator>], ctx: &mut EmissionContext) -> String {
    let mut body = String::new();
    body.push_str(&format!("ParseResult {name}(Stream& s) {{\n"));
    body.push_str("    size_t offset = s.offset();\n");
    body.push_str("    std::vector<ParseResult> parts;\n");
    body.push_str("    ParseResult r;\n");
    for child in children {
        let fname = function_name_of(child, ctx);
        body.push_str(&format!(
            "    r = {fname}(s);\n\
             \x20   if (!r.ok) {{ s.seek(offset); return ParseResult::fail(); }}\n\
             \x20   parts.push_back(std::move(r));\n"
        ));
    }
    body.push_str("    return ParseResult::chain(std::move(parts));\n}\n");
    body
}

fn emit_or(name: &str, children: &[Rc<Combinator>], ctx: &mut EmissionContext) -> String {
    let mut body = String::new();
    body.push_str(&format!("ParseResult {name}(Stream& s) {{\n"));
    body.push_str("    size_t offset = s.offset();\n");
    body.push_str("    ParseResult r;\n");
    for child in children {
        let fname = function_name_of(child, ctx);
        body.push_str(&format!(
            "    r = {fname}(s);\n    if (r.ok) return r;\n    s.seek(offset);\n"
        ));
    }
    body.push_str("    return ParseResult::fail();\n}\n");
    body
}

fn emit_multi(name: &str, inner: &Rc<Combinator>, require_one: bool, ctx: &mut EmissionContext) -> String {
    let fname = function_name_of(inner, ctx);
    let guard = if require_one {
        "    if (parts.empty()) { s.seek(offset); return ParseResult::fail(); }\n"
    } else {
        ""
    };
    format!(
        "ParseResult {name}(Stream& s) {{\n\
         \x20   size_t offset = s.offset();\n\
         \x20   std::vector<ParseResult> parts;\n\
         \x20   while (true) {{\n\
         \x20       size_t before = s.offset();\n\
         \x20       ParseResult r = {fname}(s);\n\
         \x20       if (!r.ok) {{ s.seek(before); break; }}\n\
         \x20       parts.push_back(std::move(r));\n\
         \x20   }}\n\
         {guard}\
         \x20   return ParseResult::chain(std::move(parts));\n\
         }}\n"
    )
}

fn emit_opt(name: &str, inner: &Rc<Combinator>, ctx: &mut EmissionContext) -> String {
    let fname = function_name_of(inner, ctx);
    format!(
        "ParseResult {name}(Stream& s) {{\n\
         \x20   size_t offset = s.offset();\n\
         \x20   ParseResult r = {fname}(s);\n\
         \x20   if (!r.ok) {{ s.seek(offset); return ParseResult::opt_empty(); }}\n\
         \x20   return r;\n\
         }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::realize;
    use crate::emit::plan::plan_combinators;
    use crate::grammar::parse_grammar;

    #[test]
    fn chain_body_restores_offset_on_failure() {
        let data = parse_grammar(br#"tok A="a"; tok B="b"; -> S = A B;"#).unwrap();
        let constructs = realize(&data).unwrap();
        let mut ctx = EmissionContext::new();
        let plan = plan_combinators(&constructs, &mut ctx);
        let (slot, node) =
            plan.order.iter().find(|(s, _)| s.kind == crate::emission::SlotKind::Chain).unwrap();
        let body = emit_body(*slot, node, &mut ctx, &constructs);
        assert!(body.contains("s.seek(offset)"));
        assert!(body.contains("return ParseResult::fail()"));
    }

    #[test]
    fn multi_plus_rejects_zero_iterations() {
        let data = parse_grammar(br#"tok A="a"; -> S = A+;"#).unwrap();
        let constructs = realize(&data).unwrap();
        let mut ctx = EmissionContext::new();
        let plan = plan_combinators(&constructs, &mut ctx);
        let (slot, node) =
            plan.order.iter().find(|(s, _)| s.kind == crate::emission::SlotKind::Multi).unwrap();
        let body = emit_body(*slot, node, &mut ctx, &constructs);
        assert!(body.contains("parts.empty()"));
    }

    #[test]
    fn multi_star_has_no_empty_guard() {
        let data = parse_grammar(br#"tok A="a"; -> S = A*;"#).unwrap();
        let constructs = realize(&data).unwrap();
        let mut ctx = EmissionContext::new();
        let plan = plan_combinators(&constructs, &mut ctx);
        let (slot, node) =
            plan.order.iter().find(|(s, _)| s.kind == crate::emission::SlotKind::Multi).unwrap();
        let body = emit_body(*slot, node, &mut ctx, &constructs);
        assert!(!body.contains("parts.empty()"));
    }
}
