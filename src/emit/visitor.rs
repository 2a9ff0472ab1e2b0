//! Visitor skeleton (spec section 4.7 item 10, section 6.3).

use crate::combinator::Construct;

pub fn emit_construct_tag_enum(constructs: &[Construct]) -> String {
    let mut out = String::from("enum class ConstructTag {\n");
    for c in constructs {
        out.push_str(&format!("    {},\n", c.name));
    }
    out.push_str("};\n");
    out
}

pub fn emit_visitor(constructs: &[Construct]) -> String {
    let mut out = String::from("class Visitor {\npublic:\n    virtual ~Visitor() = default;\n\n");
    for c in constructs {
        out.push_str(&format!(
            "    virtual void visit{name}(const ParseNode& node, int passCount) = 0;\n",
            name = c.name
        ));
    }
    out.push_str("\n    void dispatch(const ParseNode& node, int passCount) {\n        switch (node.tag) {\n");
    for c in constructs {
        out.push_str(&format!(
            "            case ConstructTag::{name}: visit{name}(node, passCount); break;\n",
            name = c.name
        ));
    }
    out.push_str("        }\n    }\n};\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::realize;
    use crate::grammar::parse_grammar;

    #[test]
    fn one_hook_per_construct() {
        let data = parse_grammar(br#"tok A="a"; B = A; -> S = B;"#).unwrap();
        let constructs = realize(&data).unwrap();
        let visitor = emit_visitor(&constructs);
        assert!(visitor.contains("visitB"));
        assert!(visitor.contains("visitS"));
    }
}
