//! Attribute classification and directive key parsing.

use crate::expression::{parse_value, Grammar};
use smol_str::SmolStr;
use source_text::Span;
use vue_template_ast::{
    Attribute, AttributeValue, DirectiveArgument, DirectiveAttribute, DirectiveKey,
    PlainAttribute, ScopeVariable, VariableKind,
};

/// An attribute as scanned from a start tag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawAttribute<'a> {
    pub name: &'a str,
    /// Byte offset of the name.
    pub name_start: usize,
    pub value: Option<RawValue<'a>>,
    pub span: Span,
}

/// A scanned attribute value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawValue<'a> {
    /// The value without quotes.
    pub text: &'a str,
    /// Byte offset of `text`.
    pub text_start: usize,
    /// Span including quotes.
    pub span: Span,
}

/// An attribute plus the scope variables it declares on its element.
#[derive(Debug)]
pub(crate) struct BuiltAttribute {
    pub attribute: Attribute,
    pub variables: Vec<ScopeVariable>,
}

/// Turn a scanned attribute into a plain attribute or a directive.
///
/// Inside a `v-pre` subtree every attribute is plain. `scope` is a
/// directive only on `<template>`; elsewhere it is the HTML attribute.
pub(crate) fn build_attribute(raw: RawAttribute<'_>, directives: bool, tag: &str) -> BuiltAttribute {
    let parsed_key = if directives {
        parse_directive_key(raw.name, raw.name_start, tag == "template")
    } else {
        None
    };
    let Some(key) = parsed_key else {
        return BuiltAttribute {
            attribute: Attribute::Plain(PlainAttribute {
                name: SmolStr::new(raw.name),
                value: raw.value.map(|v| AttributeValue {
                    value: v.text.to_string(),
                    span: v.span,
                }),
                span: raw.span,
            }),
            variables: Vec::new(),
        };
    };

    let (grammar, kind) = match key.name.as_str() {
        "for" => (Grammar::VFor, Some(VariableKind::VFor)),
        "on" => (Grammar::Handler, None),
        "slot" | "slot-scope" | "scope" => (Grammar::SlotParams, Some(VariableKind::Scope)),
        _ => (Grammar::Expression, None),
    };

    let mut variables = Vec::new();
    let value = raw.value.map(|v| {
        let parsed = parse_value(grammar, v.text, v.text_start as u32);
        if let Some(kind) = kind {
            variables.extend(
                parsed
                    .variables
                    .into_iter()
                    .map(|id| ScopeVariable { id, kind }),
            );
        }
        parsed.container
    });

    BuiltAttribute {
        attribute: Attribute::Directive(DirectiveAttribute {
            key,
            value,
            span: raw.span,
        }),
        variables,
    }
}

/// Split a directive attribute name into name, argument and modifiers.
///
/// Returns `None` for plain attributes.
fn parse_directive_key(raw: &str, start: usize, allow_scope: bool) -> Option<DirectiveKey> {
    let (name, rest, rest_offset) = if let Some(rest) = raw.strip_prefix("v-") {
        let end = rest.find([':', '.']).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        let name = &rest[..end];
        let after = &rest[end..];
        match after.strip_prefix(':') {
            Some(arg) => (name, Some(arg), 2 + end + 1),
            None => (name, after.strip_prefix('.').map(|_| after), 2 + end),
        }
    } else if let Some(arg) = raw.strip_prefix(':') {
        ("bind", Some(arg), 1)
    } else if let Some(arg) = raw.strip_prefix('@') {
        ("on", Some(arg), 1)
    } else if let Some(arg) = raw.strip_prefix('#') {
        ("slot", Some(arg), 1)
    } else if raw == "slot-scope" || (allow_scope && raw == "scope") {
        (raw, None, raw.len())
    } else {
        return None;
    };

    let key_span = Span::new(start as u32, (start + raw.len()) as u32);
    let mut argument = None;
    let mut modifiers = Vec::new();

    if let Some(rest) = rest {
        let base = start + rest_offset;
        let modifier_text = if let Some(stripped) = rest.strip_prefix('.') {
            // `v-name.mod` without an argument
            Some(stripped)
        } else if rest.starts_with('[') {
            let close = matching_bracket(rest).unwrap_or(rest.len());
            let inner_end = close.min(rest.len());
            let inner = &rest[1..inner_end];
            let parsed = parse_value(Grammar::Expression, inner, (base + 1) as u32);
            let mut container = parsed.container;
            container.span = Span::new(base as u32, (base + (close + 1).min(rest.len())) as u32);
            argument = Some(DirectiveArgument::Dynamic(container));
            rest.get(close + 1..).and_then(|m| m.strip_prefix('.'))
        } else {
            let end = rest.find('.').unwrap_or(rest.len());
            if end > 0 {
                argument = Some(DirectiveArgument::Static {
                    name: SmolStr::new(&rest[..end]),
                    span: Span::new(base as u32, (base + end) as u32),
                });
            }
            rest.get(end..).and_then(|m| m.strip_prefix('.'))
        };
        if let Some(text) = modifier_text {
            modifiers.extend(text.split('.').filter(|m| !m.is_empty()).map(SmolStr::new));
        }
    }

    Some(DirectiveKey {
        name: SmolStr::new(name),
        argument,
        modifiers,
        raw: SmolStr::new(raw),
        span: key_span,
    })
}

/// Index of the `]` matching the `[` at index 0.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
