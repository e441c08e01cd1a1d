//! Vue template tree model.
//!
//! This crate holds the read-only, directive-annotated tree that lint rules
//! inspect: elements with their start tags, plain and directive attributes,
//! bound-expression containers, and the scope variables introduced by
//! `v-for`. It also provides the stateless queries shared by the rules.
//!
//! Trees are built by a parser (see `vue-template-parser`); nothing here
//! reads template source text.

pub mod ast;
pub mod expression;
pub mod query;
pub mod tags;

pub use ast::*;
pub use expression::*;
pub use source_text::Span;
