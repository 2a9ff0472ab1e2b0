//! Canonicalizer / emission-slot allocator (spec component 6, REDESIGN
//! FLAG in spec section 9).
//!
//! The reference implementation tracks emission slots with process-wide
//! counters and pointer-identity dedup (a `prototyped` flag stored inside
//! each combinator node, see `examples/original_source/grammar/counter.go`
//! and `grammar/transpilable.go`). Here that state lives in one
//! `EmissionContext` passed by `&mut` through the whole walk, and dedup is
//! by canonical shape rather than pointer identity, so two structurally
//! identical subtrees collapse onto a single emitted function.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::combinator::Combinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKind {
    Unit,
    Nested,
    Chain,
    Or,
    Multi,
    Opt,
}

impl SlotKind {
    pub fn prefix(self) -> &'static str {
        match self {
            SlotKind::Unit => "unit",
            SlotKind::Nested => "nested",
            SlotKind::Chain => "chain",
            SlotKind::Or => "or",
            SlotKind::Multi => "multi",
            SlotKind::Opt => "opt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub kind: SlotKind,
    pub id: u32,
}

impl SlotId {
    pub fn function_name(&self) -> String {
        format!("{}_{}", self.kind.prefix(), self.id)
    }
}

/// A structural key identifying a combinator's *shape*: two nodes with
/// the same key are interchangeable and may share one emitted function.
/// `Captured` nodes are transparent and never appear here — their key is
/// their inner's key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CanonicalKey {
    TokenRef(String),
    Nested(String),
    Chain(Vec<CanonicalKey>),
    Or(Vec<CanonicalKey>),
    Multi(Box<CanonicalKey>, bool),
    Opt(Box<CanonicalKey>),
}

/// Peel away `Captured` wrappers to find the node that actually owns an
/// emitted function (or none, for the degenerate all-`Captured` case,
/// which cannot occur post-build since a `Captured`'s inner is always a
/// non-`Captured` node or another `Captured` — resolution always
/// terminates at a concrete variant).
pub fn resolve_transparent(c: &Rc<Combinator>) -> &Rc<Combinator> {
    let mut cur = c;
    while let Combinator::Captured { inner } = cur.as_ref() {
        cur = inner;
    }
    cur
}

fn canonical_key(c: &Combinator) -> CanonicalKey {
    match c {
        Combinator::TokenRef { token } => CanonicalKey::TokenRef(token.clone()),
        Combinator::Nested { construct } => CanonicalKey::Nested(construct.clone()),
        Combinator::Chain { children } => CanonicalKey::Chain(
            children.iter().map(|c| canonical_key(resolve_transparent(c))).collect(),
        ),
        Combinator::Or { children } => {
            CanonicalKey::Or(children.iter().map(|c| canonical_key(resolve_transparent(c))).collect())
        }
        Combinator::Multi { inner, require_one } => {
            CanonicalKey::Multi(Box::new(canonical_key(resolve_transparent(inner))), *require_one)
        }
        Combinator::Opt { inner } => {
            CanonicalKey::Opt(Box::new(canonical_key(resolve_transparent(inner))))
        }
        Combinator::Captured { inner } => canonical_key(resolve_transparent(inner)),
    }
}

fn slot_kind(c: &Combinator) -> SlotKind {
    match c {
        Combinator::TokenRef { .. } => SlotKind::Unit,
        Combinator::Nested { .. } => SlotKind::Nested,
        Combinator::Chain { .. } => SlotKind::Chain,
        Combinator::Or { .. } => SlotKind::Or,
        Combinator::Multi { .. } => SlotKind::Multi,
        Combinator::Opt { .. } => SlotKind::Opt,
        Combinator::Captured { .. } => unreachable!("Captured is resolved before slot_kind"),
    }
}

/// Owns all emission bookkeeping for one generator run. Never global,
/// never shared across runs — construct a fresh one per invocation.
#[derive(Default)]
pub struct EmissionContext {
    counters: HashMap<SlotKind, u32>,
    slots: HashMap<CanonicalKey, SlotId>,
    prototyped: HashSet<SlotId>,
}

impl EmissionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `combinator`, allocating one the first time a
    /// given shape is seen. `combinator` must not be `Captured` — resolve
    /// through `resolve_transparent` first.
    pub fn slot_for(&mut self, combinator: &Combinator) -> SlotId {
        debug_assert!(!matches!(combinator, Combinator::Captured { .. }));
        let key = canonical_key(combinator);
        if let Some(slot) = self.slots.get(&key) {
            return *slot;
        }
        let kind = slot_kind(combinator);
        let id = self.counters.entry(kind).or_insert(0);
        let slot = SlotId { kind, id: *id };
        *id += 1;
        self.slots.insert(key, slot);
        slot
    }

    /// Records that `slot`'s prototype has now been emitted. Returns
    /// `true` the first time (the caller should emit the prototype text),
    /// `false` on any later call for the same slot.
    pub fn mark_prototyped(&mut self, slot: SlotId) -> bool {
        self.prototyped.insert(slot)
    }
}
