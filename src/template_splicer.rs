//! Template splicer (spec component 9, SPEC_FULL section 4.11).
//!
//! Substitutes `{{Name}}` holes in a bundled template with caller-supplied
//! values. Templates are embedded via `include_str!` rather than read from
//! the grammar author's filesystem at run time — the only template this
//! crate ships is the `-t` starter `main.cpp`. A single left-to-right scan;
//! no recursive expansion, so a substituted value containing `{{...}}` is
//! left untouched.

use std::collections::HashMap;

const MAIN_CPP_TEMPLATE: &str = include_str!("templates/main.cpp.tpl");

/// Replace every `{{Name}}` occurrence in `template_text` using `holes`.
/// An unrecognized hole name is left as-is in the output (it is not an
/// error here; the compiled C++ would simply fail to find the include).
pub fn splice(template_text: &str, holes: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template_text.len());
    let bytes = template_text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if template_text[i..].starts_with("{{") {
            if let Some(end) = template_text[i + 2..].find("}}") {
                let name = &template_text[i + 2..i + 2 + end];
                match holes.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&template_text[i..i + 2 + end + 2]),
                }
                i += 2 + end + 2;
                continue;
            }
        }
        let ch = template_text[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

pub fn render_main_cpp(parser_header: &str, visitor_header: &str) -> String {
    let mut holes = HashMap::new();
    holes.insert("ParserHeader", parser_header);
    holes.insert("VisitorHeader", visitor_header);
    splice(MAIN_CPP_TEMPLATE, &holes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_holes() {
        let mut holes = HashMap::new();
        holes.insert("Name", "World");
        assert_eq!(splice("Hello, {{Name}}!", &holes), "Hello, World!");
    }

    #[test]
    fn leaves_unknown_holes_untouched() {
        let holes = HashMap::new();
        assert_eq!(splice("{{Missing}}", &holes), "{{Missing}}");
    }

    #[test]
    fn main_cpp_includes_both_headers() {
        let rendered = render_main_cpp("chisel.hpp", "visitor.hpp");
        assert!(rendered.contains("#include \"chisel.hpp\""));
        assert!(rendered.contains("#include \"visitor.hpp\""));
    }
}
