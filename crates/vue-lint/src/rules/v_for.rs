//! `no-invalid-v-for`: `v-for` placement and grammar.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::query::is_root_element;
use vue_template_ast::tags::is_reserved_tag_name;
use vue_template_ast::{DirectiveAttribute, Element, Expression};

const ON_ROOT: &str = "The root element can't have 'v-for' directives.";
const MISSING_KEY: &str = "'v-for' directives on custom elements require 'v-bind:key' directives.";
const ARGUMENT: &str = "'v-for' directives require no argument.";
const MODIFIER: &str = "'v-for' directives require no modifier.";
const NO_VALUE: &str = "'v-for' directives require that attribute value.";
const NOT_FOR_SYNTAX: &str =
    "'v-for' directives require the special syntax '<alias> in <expression>'.";
const EMPTY_ALIAS: &str = "Invalid alias ''.";
const INVALID_ALIAS: &str = "Invalid alias '{{text}}'.";

static META: RuleMeta = RuleMeta {
    id: "no-invalid-v-for",
    description: "disallow invalid `v-for` directives",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct NoInvalidVFor;

impl Rule for NoInvalidVFor {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Directive("for")]
    }

    fn check_directive(
        &self,
        ctx: &mut RuleContext<'_>,
        element: &Element,
        directive: &DirectiveAttribute,
    ) {
        if is_root_element(ctx.ast(), element.id) {
            ctx.report(directive.span, ON_ROOT);
        }
        if !is_reserved_tag_name(&element.tag)
            && element.tag != "template"
            && !element.start_tag.has_directive_with_arg("bind", "key")
        {
            ctx.report(directive.span, MISSING_KEY);
        }
        if directive.key.argument.is_some() {
            ctx.report(directive.span, ARGUMENT);
        }
        if !directive.key.modifiers.is_empty() {
            ctx.report(directive.span, MODIFIER);
        }

        if !directive.has_value() {
            ctx.report(directive.span, NO_VALUE);
            return;
        }
        let Some(container) = &directive.value else {
            return;
        };
        // Syntax errors belong to `no-parsing-error`.
        let Some(expression) = container.expression() else {
            return;
        };
        let Some(for_expression) = expression.as_for() else {
            ctx.report(container.span, NOT_FOR_SYNTAX);
            return;
        };

        if for_expression.alias().is_none() {
            ctx.report(expression.span, EMPTY_ALIAS);
        }
        check_alias_slot(ctx, expression, for_expression.key());
        check_alias_slot(ctx, expression, for_expression.index());
    }
}

/// Key and index aliases must be bare identifiers when declared.
fn check_alias_slot(
    ctx: &mut RuleContext<'_>,
    expression: &Expression,
    slot: Option<Option<&Expression>>,
) {
    match slot {
        None => {}
        Some(Some(alias)) if alias.is_identifier() => {}
        Some(Some(alias)) => {
            let text = ctx.text(alias.span).to_string();
            ctx.report_data(alias.span, INVALID_ALIAS, vec![("text", text)]);
        }
        Some(None) => {
            ctx.report_data(expression.span, INVALID_ALIAS, vec![("text", String::new())]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{lint, messages};
    use pretty_assertions::assert_eq;

    fn check(source: &str) -> Vec<String> {
        messages(NoInvalidVFor, source)
    }

    fn wrap(inner: &str) -> String {
        format!("<template><div>{inner}</div></template>")
    }

    #[test]
    fn test_valid() {
        for inner in [
            r#"<div v-for="x in foo"></div>"#,
            r#"<div v-for="x of foo"></div>"#,
            r#"<div v-for="(x, i) in foo"></div>"#,
            r#"<div v-for="(x, i, k) in foo"></div>"#,
            r#"<div v-for="({id, name}, i) in foo"></div>"#,
            r#"<div v-for="([a, b]) in foo"></div>"#,
            r#"<div v-for="n in 10"></div>"#,
            r#"<template v-for="x in foo"><p></p></template>"#,
            r#"<your-component v-for="x in foo" :key="x.id"></your-component>"#,
            r#"<your-component v-for="x in foo" v-bind:key="x.id"></your-component>"#,
        ] {
            assert_eq!(check(&wrap(inner)), Vec::<String>::new(), "{inner}");
        }
    }

    #[test]
    fn test_root_element() {
        assert_eq!(
            check(r#"<template><div v-for="x in foo"></div></template>"#),
            vec![ON_ROOT]
        );
    }

    #[test]
    fn test_argument_and_modifier() {
        assert_eq!(check(&wrap(r#"<div v-for:aaa="x in foo"></div>"#)), vec![ARGUMENT]);
        assert_eq!(check(&wrap(r#"<div v-for.aaa="x in foo"></div>"#)), vec![MODIFIER]);
    }

    #[test]
    fn test_missing_value_short_circuits() {
        assert_eq!(check(&wrap("<div v-for></div>")), vec![NO_VALUE]);
        assert_eq!(check(&wrap(r#"<div v-for=""></div>"#)), vec![NO_VALUE]);
    }

    #[test]
    fn test_not_for_syntax() {
        assert_eq!(check(&wrap(r#"<div v-for="foo"></div>"#)), vec![NOT_FOR_SYNTAX]);
    }

    #[test]
    fn test_syntax_error_is_left_to_parsing_error() {
        assert!(check(&wrap(r#"<div v-for="x in"></div>"#)).is_empty());
    }

    #[test]
    fn test_three_aliases_parse_cleanly() {
        let source = wrap(r#"<div v-for="(item, key, index) in list"></div>"#);
        assert!(lint(NoInvalidVFor, &source).is_empty());

        let program = vue_template_parser::parse_program(&source).unwrap();
        let ast = program.template_body.unwrap();
        let element = ast.iter().find(|e| e.start_tag.has_directive("for")).unwrap();
        let value = element.start_tag.directive("for").and_then(|d| d.value.as_ref()).unwrap();
        let for_expression = value.expression().and_then(Expression::as_for).unwrap();
        let names: Vec<_> = for_expression
            .left
            .iter()
            .map(|slot| slot.as_ref().and_then(Expression::as_identifier))
            .collect();
        assert_eq!(names, vec![Some("item"), Some("key"), Some("index")]);
    }

    #[test]
    fn test_empty_alias() {
        assert_eq!(check(&wrap(r#"<div v-for="in list"></div>"#)), vec![EMPTY_ALIAS]);
        assert_eq!(check(&wrap(r#"<div v-for="(,a,b) in foo"></div>"#)), vec![EMPTY_ALIAS]);
    }

    #[test]
    fn test_empty_key_slot() {
        let source = wrap(r#"<div v-for="(a,,b) in foo"></div>"#);
        let diagnostics = lint(NoInvalidVFor, &source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, EMPTY_ALIAS);
        assert_eq!(diagnostics[0].data, vec![("text", String::new())]);
        assert_eq!(&source[diagnostics[0].span.to_range()], "(a,,b) in foo");
    }

    #[test]
    fn test_trailing_comma_is_not_a_key_slot() {
        assert!(check(&wrap(r#"<p v-for="(a,) in x" :key="a"></p>"#)).is_empty());
        assert!(check(&wrap(r#"<p v-for="(a, ) in x"></p>"#)).is_empty());
    }

    #[test]
    fn test_destructured_key_and_index() {
        assert_eq!(
            check(&wrap(r#"<div v-for="(a,{b,c}) in foo"></div>"#)),
            vec!["Invalid alias '{b,c}'."]
        );
        assert_eq!(
            check(&wrap(r#"<div v-for="(a,b,{c,d}) in foo"></div>"#)),
            vec!["Invalid alias '{c,d}'."]
        );
    }

    #[test]
    fn test_custom_element_requires_key() {
        let without_key = wrap(r#"<your-component v-for="x in foo"></your-component>"#);
        assert_eq!(check(&without_key), vec![MISSING_KEY]);
        let with_key = wrap(r#"<your-component v-for="x in foo" :key="x"></your-component>"#);
        assert!(check(&with_key).is_empty());
    }

    #[test]
    fn test_key_must_be_a_static_key_binding() {
        let source = wrap(r#"<MyItem v-for="x in foo" :[key]="x" :id="x"></MyItem>"#);
        assert_eq!(check(&source), vec![MISSING_KEY]);
    }

    #[test]
    fn test_all_violations_are_reported() {
        let source = r#"<template><my-comp v-for:a.b></my-comp></template>"#;
        assert_eq!(check(source), vec![ON_ROOT, MISSING_KEY, ARGUMENT, MODIFIER, NO_VALUE]);
    }
}
