//! The combinator IR (spec section 3, `Combinator`/`Construct`).
//!
//! A closed sum type, per spec section 9: the reference implementation
//! used an open interface hierarchy with a `default: fatal` catch-all;
//! here the match in every consumer (canonicalizer, trie planner, emitter)
//! is exhaustive and the compiler enforces it.

use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Combinator {
    /// Matches one terminal.
    TokenRef { token: String },
    /// Matches a named construct.
    Nested { construct: String },
    /// Concatenation; all children must succeed in order. `len >= 2`.
    Chain { children: Vec<Rc<Combinator>> },
    /// Alternation; first success wins. `len >= 2`.
    Or { children: Vec<Rc<Combinator>> },
    /// Transparent grouping — forwards to `inner`, emits no function of
    /// its own.
    Captured { inner: Rc<Combinator> },
    /// `*` (require_one = false) or `+` (require_one = true).
    Multi { inner: Rc<Combinator>, require_one: bool },
    /// `?` — zero or one.
    Opt { inner: Rc<Combinator> },
}

#[derive(Debug, Clone)]
pub struct Construct {
    pub name: String,
    pub value: Rc<Combinator>,
    pub entry_point: bool,
}
