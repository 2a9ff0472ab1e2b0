//! chisel-gen: reads a grammar description and emits a self-contained
//! recursive-descent parser for a C++ host.
//!
//! The pipeline is strictly linear and single-pass (see [`driver`]):
//! bytes -> grammar tokens ([`grammar_token`]) -> `ReadData`
//! ([`grammar`]) -> combinator forest ([`builder`], [`combinator`]) ->
//! canonicalized forest ([`emission`], [`trie`]) -> emitted text
//! ([`emit`]).

pub mod builder;
pub mod combinator;
pub mod driver;
pub mod dump_ir;
pub mod emission;
pub mod emit;
pub mod error;
pub mod fix;
pub mod grammar;
pub mod grammar_token;
pub mod position;
pub mod reader;
pub mod template_splicer;
pub mod token;
pub mod trie;

#[cfg(test)]
mod __tests__;

pub use error::{GenResult, GeneratorError};
