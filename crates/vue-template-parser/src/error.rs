//! Error types for single-file component parsing.

use source_text::Span;
use std::fmt;
use thiserror::Error;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that prevents building a tree for a file.
///
/// Syntax errors inside bound expressions are not `ParseError`s; they are
/// recorded in the expression container of the offending attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The span where the error occurred.
    pub span: Span,
    /// The error code.
    pub code: ErrorCode,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// Create a duplicate block error.
    pub fn duplicate_block(block: &str, span: Span) -> Self {
        Self::new(
            format!("Duplicate <{}> block", block),
            span,
            ErrorCode::DuplicateBlock,
        )
    }

    /// Create an unclosed block error.
    pub fn unclosed_block(block: &str, span: Span) -> Self {
        Self::new(
            format!("Unclosed <{}> block", block),
            span,
            ErrorCode::UnclosedBlock,
        )
    }
}

/// Error codes for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// More than one top-level `<template>` block.
    DuplicateBlock,
    /// A top-level `<template>` without its end tag.
    UnclosedBlock,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DuplicateBlock => "duplicate-block",
            ErrorCode::UnclosedBlock => "unclosed-block",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_uses_message() {
        let err = ParseError::duplicate_block("template", Span::new(10, 20));
        assert_eq!(err.to_string(), "Duplicate <template> block");
        assert_eq!(err.code.as_str(), "duplicate-block");
    }
}
