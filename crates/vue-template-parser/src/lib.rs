//! Template parser for Vue single-file components.
//!
//! Builds the directive-annotated tree of `vue-template-ast` from source
//! text:
//!
//! - locates the top-level `<template>` block of a `.vue` file,
//! - reads its markup into an element arena,
//! - splits directive attributes into name, argument and modifiers,
//! - parses bound values (including the `v-for` grammar) and records
//!   syntax errors in their containers,
//! - declares `v-for` and slot-scope variables and links every reference
//!   to the nearest variable of the same name.
//!
//! # Example
//!
//! ```
//! use vue_template_parser::parse_program;
//!
//! let program = parse_program("<template><li v-for=\"x in xs\">{{ x }}</li></template>").unwrap();
//! let ast = program.template_body.as_ref().unwrap();
//! assert_eq!(ast.len(), 2);
//! ```

mod attributes;
pub mod error;
mod expression;
mod html;
mod scanner;
mod scope;
mod sfc;

pub use error::{ErrorCode, ParseError, ParseResult};

use vue_template_ast::Program;

/// Parse a single-file component.
///
/// The program has no template body when the file has no `<template>`
/// block or the block is not HTML.
pub fn parse_program(source: &str) -> ParseResult<Program> {
    let template_body = sfc::parse_template_block(source)?;
    tracing::debug!(
        elements = template_body.as_ref().map_or(0, |ast| ast.len()),
        "parsed single-file component"
    );
    Ok(Program::new(source, template_body))
}

/// Parse bare template markup, as found inside a `<template>` block.
///
/// The whole input becomes the template body.
pub fn parse_template(source: &str) -> Program {
    let ast = html::TreeBuilder::parse_fragment(source);
    Program::new(source, Some(ast))
}
