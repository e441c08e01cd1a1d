//! Free identifier collection and binding-name extraction.

use smol_str::SmolStr;
use vue_template_ast::{Expression, ExpressionKind, Identifier};

/// Collect the free identifiers of `expr` in source order.
///
/// `this`, non-computed member properties and object keys are not
/// references; arrow parameters shadow names inside the arrow body.
pub(crate) fn free_references(expr: &Expression) -> Vec<Identifier> {
    let mut out = Vec::new();
    let mut shadowed = Vec::new();
    walk(expr, &mut shadowed, &mut out);
    out
}

/// References made by default values and computed keys of a binding
/// pattern. The bound names themselves are not references.
pub(crate) fn pattern_references(pattern: &Expression) -> Vec<Identifier> {
    let mut out = Vec::new();
    let mut shadowed = Vec::new();
    walk_pattern(pattern, &mut shadowed, &mut out);
    out
}

/// The names a binding pattern declares, in source order.
pub(crate) fn binding_names(pattern: &Expression, out: &mut Vec<Identifier>) {
    match &pattern.kind {
        ExpressionKind::Identifier(name) => out.push(Identifier {
            name: name.clone(),
            span: pattern.span,
        }),
        ExpressionKind::Array(elements) => {
            for element in elements.iter().flatten() {
                binding_names(element, out);
            }
        }
        ExpressionKind::Object(properties) => {
            for property in properties {
                match &property.kind {
                    ExpressionKind::Property { value, .. } => binding_names(value, out),
                    ExpressionKind::Spread(argument) => binding_names(argument, out),
                    _ => {}
                }
            }
        }
        ExpressionKind::Spread(argument) => binding_names(argument, out),
        ExpressionKind::Assignment { left, .. } => binding_names(left, out),
        _ => {}
    }
}

fn walk(expr: &Expression, shadowed: &mut Vec<SmolStr>, out: &mut Vec<Identifier>) {
    match &expr.kind {
        ExpressionKind::Identifier(name) => {
            if name != "this" && !shadowed.contains(name) {
                out.push(Identifier {
                    name: name.clone(),
                    span: expr.span,
                });
            }
        }
        ExpressionKind::Literal(_) => {}
        ExpressionKind::Template { expressions } => {
            for e in expressions {
                walk(e, shadowed, out);
            }
        }
        ExpressionKind::Array(elements) => {
            for e in elements.iter().flatten() {
                walk(e, shadowed, out);
            }
        }
        ExpressionKind::Object(properties) => {
            for p in properties {
                walk(p, shadowed, out);
            }
        }
        ExpressionKind::Property {
            key,
            value,
            computed,
            ..
        } => {
            if *computed {
                walk(key, shadowed, out);
            }
            walk(value, shadowed, out);
        }
        ExpressionKind::Spread(argument) => walk(argument, shadowed, out),
        ExpressionKind::Member {
            object,
            property,
            computed,
            ..
        } => {
            walk(object, shadowed, out);
            if *computed {
                walk(property, shadowed, out);
            }
        }
        ExpressionKind::Call {
            callee, arguments, ..
        }
        | ExpressionKind::New { callee, arguments } => {
            walk(callee, shadowed, out);
            for a in arguments {
                walk(a, shadowed, out);
            }
        }
        ExpressionKind::Unary { argument, .. } | ExpressionKind::Update { argument, .. } => {
            walk(argument, shadowed, out)
        }
        ExpressionKind::Binary { left, right, .. }
        | ExpressionKind::Logical { left, right, .. }
        | ExpressionKind::Assignment { left, right, .. } => {
            walk(left, shadowed, out);
            walk(right, shadowed, out);
        }
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            walk(test, shadowed, out);
            walk(consequent, shadowed, out);
            walk(alternate, shadowed, out);
        }
        ExpressionKind::Sequence(items) => {
            for e in items {
                walk(e, shadowed, out);
            }
        }
        ExpressionKind::Arrow { params, body } => {
            let depth = shadowed.len();
            let mut names = Vec::new();
            for param in params {
                walk_pattern(param, shadowed, out);
                binding_names(param, &mut names);
            }
            shadowed.extend(names.into_iter().map(|id| id.name));
            walk(body, shadowed, out);
            shadowed.truncate(depth);
        }
        ExpressionKind::VFor(for_expr) => walk(&for_expr.right, shadowed, out),
    }
}

fn walk_pattern(pattern: &Expression, shadowed: &mut Vec<SmolStr>, out: &mut Vec<Identifier>) {
    match &pattern.kind {
        ExpressionKind::Array(elements) => {
            for e in elements.iter().flatten() {
                walk_pattern(e, shadowed, out);
            }
        }
        ExpressionKind::Object(properties) => {
            for p in properties {
                match &p.kind {
                    ExpressionKind::Property {
                        key,
                        value,
                        computed,
                        ..
                    } => {
                        if *computed {
                            walk(key, shadowed, out);
                        }
                        walk_pattern(value, shadowed, out);
                    }
                    ExpressionKind::Spread(argument) => walk_pattern(argument, shadowed, out),
                    _ => {}
                }
            }
        }
        ExpressionKind::Spread(argument) => walk_pattern(argument, shadowed, out),
        ExpressionKind::Assignment { left, right, .. } => {
            walk_pattern(left, shadowed, out);
            walk(right, shadowed, out);
        }
        _ => {}
    }
}
