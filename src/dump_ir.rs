//! `--dump-ir` debug pretty-printer (SPEC_FULL section 4.10) for the
//! canonicalized combinator forest, built on `ptree` the way the teacher
//! crate uses it for its own debug tree dumps.

use std::borrow::Cow;
use std::io;
use std::rc::Rc;

use ptree::{Style, TreeItem};

use crate::combinator::{Combinator, Construct};

#[derive(Clone)]
pub struct IrNode {
    label: String,
    children: Vec<IrNode>,
}

impl IrNode {
    fn from_combinator(c: &Rc<Combinator>) -> IrNode {
        match c.as_ref() {
            Combinator::TokenRef { token } => {
                IrNode { label: format!("TokenRef({token})"), children: vec![] }
            }
            Combinator::Nested { construct } => {
                IrNode { label: format!("Nested({construct})"), children: vec![] }
            }
            Combinator::Chain { children } => IrNode {
                label: "Chain".to_string(),
                children: children.iter().map(IrNode::from_combinator).collect(),
            },
            Combinator::Or { children } => IrNode {
                label: "Or".to_string(),
                children: children.iter().map(IrNode::from_combinator).collect(),
            },
            Combinator::Captured { inner } => {
                IrNode { label: "Captured".to_string(), children: vec![IrNode::from_combinator(inner)] }
            }
            Combinator::Multi { inner, require_one } => IrNode {
                label: format!("Multi(requireOne={require_one})"),
                children: vec![IrNode::from_combinator(inner)],
            },
            Combinator::Opt { inner } => {
                IrNode { label: "Opt".to_string(), children: vec![IrNode::from_combinator(inner)] }
            }
        }
    }
}

impl TreeItem for IrNode {
    type Child = IrNode;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        write!(f, "{}", style.paint(&self.label))
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(&self.children)
    }
}

pub fn dump_ir(constructs: &[Construct]) -> io::Result<()> {
    for c in constructs {
        let label = if c.entry_point { format!("{} (entry)", c.name) } else { c.name.clone() };
        let root = IrNode { label, children: vec![IrNode::from_combinator(&c.value)] };
        ptree::print_tree(&root)?;
    }
    Ok(())
}
