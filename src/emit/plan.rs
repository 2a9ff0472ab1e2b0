//! Reachability walk from the entry-point construct, assigning emission
//! slots and recording emission order (spec section 4.5/4.7 item 6/7).
//!
//! `Nested` holds a construct *name*, never a pointer (spec section 9,
//! "Cyclic references") — `visited_constructs` is what keeps a
//! self-recursive or mutually-recursive grammar from looping forever
//! while still emitting every construct's combinator tree exactly once.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::combinator::{Combinator, Construct};
use crate::emission::{resolve_transparent, EmissionContext, SlotId};

pub struct CombinatorPlan {
    /// Every distinct combinator shape reachable from the entry point,
    /// in the order its prototype/body should be emitted.
    pub order: Vec<(SlotId, Rc<Combinator>)>,
}

pub fn plan_combinators(constructs: &[Construct], ctx: &mut EmissionContext) -> CombinatorPlan {
    let by_name: HashMap<&str, &Construct> =
        constructs.iter().map(|c| (c.name.as_str(), c)).collect();
    let mut order = Vec::new();
    let mut visited_constructs: HashSet<String> = HashSet::new();

    let entry = constructs
        .iter()
        .find(|c| c.entry_point)
        .expect("grammar parser already validated exactly one entry point");
    walk_construct(entry, &by_name, ctx, &mut visited_constructs, &mut order);

    CombinatorPlan { order }
}

fn walk_construct<'a>(
    construct: &'a Construct,
    by_name: &HashMap<&str, &'a Construct>,
    ctx: &mut EmissionContext,
    visited_constructs: &mut HashSet<String>,
    order: &mut Vec<(SlotId, Rc<Combinator>)>,
) {
    if !visited_constructs.insert(construct.name.clone()) {
        return;
    }
    walk(&construct.value, by_name, ctx, visited_constructs, order);
}

fn walk<'a>(
    node: &Rc<Combinator>,
    by_name: &HashMap<&str, &'a Construct>,
    ctx: &mut EmissionContext,
    visited_constructs: &mut HashSet<String>,
    order: &mut Vec<(SlotId, Rc<Combinator>)>,
) {
    let resolved = resolve_transparent(node);
    let slot = ctx.slot_for(resolved);
    if !ctx.mark_prototyped(slot) {
        return;
    }
    order.push((slot, Rc::clone(resolved)));

    match resolved.as_ref() {
        Combinator::TokenRef { .. } => {}
        Combinator::Nested { construct } => {
            if let Some(target) = by_name.get(construct.as_str()) {
                walk_construct(target, by_name, ctx, visited_constructs, order);
            }
        }
        Combinator::Chain { children } | Combinator::Or { children } => {
            for child in children {
                walk(child, by_name, ctx, visited_constructs, order);
            }
        }
        Combinator::Multi { inner, .. } | Combinator::Opt { inner } => {
            walk(inner, by_name, ctx, visited_constructs, order);
        }
        Combinator::Captured { .. } => unreachable!("resolve_transparent strips Captured"),
    }
}

/// Look up (without allocating) the function name for an already-walked
/// node, resolving through `Captured` first.
pub fn function_name_of(node: &Rc<Combinator>, ctx: &mut EmissionContext) -> String {
    let resolved = resolve_transparent(node);
    ctx.slot_for(resolved).function_name()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::realize;
    use crate::grammar::parse_grammar;

    #[test]
    fn visits_each_distinct_shape_once() {
        let data = parse_grammar(br#"tok A="a"; tok B="b"; -> S = A B | A B;"#).unwrap();
        let constructs = realize(&data).unwrap();
        let mut ctx = EmissionContext::new();
        let plan = plan_combinators(&constructs, &mut ctx);
        // Both `A B` chains are structurally identical, so there are
        // exactly 3 distinct shapes: unit(A), unit(B), chain(A,B). The Or
        // wrapping them collapses via realize() since "A B | A B" still
        // produces an Or of two identical chains (Or keeps both children
        // even when identical — only the *emission slot* collapses).
        let chain_slots: Vec<_> =
            plan.order.iter().filter(|(s, _)| s.kind == crate::emission::SlotKind::Chain).collect();
        assert_eq!(chain_slots.len(), 1);
    }

    #[test]
    fn self_recursive_construct_terminates() {
        let data = parse_grammar(br#"tok A="a"; -> S = A | S A;"#).unwrap();
        let constructs = realize(&data).unwrap();
        let mut ctx = EmissionContext::new();
        let plan = plan_combinators(&constructs, &mut ctx);
        assert!(!plan.order.is_empty());
    }
}
