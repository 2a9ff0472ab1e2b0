//! Emitter (spec component 8): renders the realized grammar into parser
//! and visitor source text, in the order spec section 4.7 lists.

mod bodies;
mod plan;
mod tokens;
mod visitor;

use crate::combinator::Construct;
use crate::emission::EmissionContext;
use crate::grammar::ReadData;

pub struct EmitOutput {
    pub parser_source: String,
    pub visitor_source: String,
}

pub fn emit(data: &ReadData, constructs: &[Construct]) -> EmitOutput {
    let mut ctx = EmissionContext::new();
    let plan = plan::plan_combinators(constructs, &mut ctx);
    let (_bands, token_section) = tokens::plan_and_emit_tokens(&data.tokens);

    let mut parser = String::new();

    for prefix in &data.prefixes {
        parser.push_str(prefix);
        parser.push('\n');
    }

    parser.push_str(&token_section);

    parser.push_str(&visitor::emit_construct_tag_enum(constructs));
    parser.push_str("struct ParseNode { ConstructTag tag; /* ... */ };\n");

    for (slot, _) in &plan.order {
        parser.push_str(&bodies::emit_prototype(*slot));
        parser.push('\n');
    }
    parser.push('\n');

    for (slot, node) in &plan.order {
        parser.push_str(&bodies::emit_body(*slot, node, &mut ctx, constructs));
        parser.push('\n');
    }

    let entry = constructs
        .iter()
        .find(|c| c.entry_point)
        .expect("grammar parser already validated exactly one entry point");
    parser.push_str(&emit_parser_entry(entry, &mut ctx));

    for suffix in &data.suffixes {
        parser.push_str(suffix);
        parser.push('\n');
    }

    let visitor_source = visitor::emit_visitor(constructs);

    EmitOutput { parser_source: parser, visitor_source }
}

fn emit_parser_entry(entry: &Construct, ctx: &mut EmissionContext) -> String {
    let fname = plan::function_name_of(&entry.value, ctx);
    format!(
        "ParseResult parse(Stream& s) {{\n\
         \x20   skip_tokens(s);\n\
         \x20   ParseResult r = {fname}(s);\n\
         \x20   if (!r.ok) return ParseResult::fail();\n\
         \x20   return ParseResult::subtree(ConstructTag::{name}, std::move(r));\n\
         }}\n",
        name = entry.name,
    )
}
