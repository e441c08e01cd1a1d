//! `no-parsing-error`: surface syntax errors recorded by the parser.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::ExpressionContainer;

const PARSING_ERROR: &str = "Parsing error: {{message}}.";

static META: RuleMeta = RuleMeta {
    id: "no-parsing-error",
    description: "disallow parsing errors in `<template>`",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct NoParsingError;

impl Rule for NoParsingError {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::ExpressionContainer]
    }

    fn check_container(&self, ctx: &mut RuleContext<'_>, container: &ExpressionContainer) {
        if let Some(error) = container.syntax_error() {
            ctx.report_data(error.span, PARSING_ERROR, vec![("message", error.message.clone())]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{lint, messages};
    use pretty_assertions::assert_eq;

    fn check(inner: &str) -> Vec<String> {
        messages(NoParsingError, &format!("<template><div>{inner}</div></template>"))
    }

    #[test]
    fn test_valid() {
        for inner in [
            "{{ a + b }}",
            r#"<p :title="a ? b : c" @click="count++; emit('x')"></p>"#,
            r#"<p v-for="(x, i) in list" :key="i"></p>"#,
            r#"<p :[name]="value"></p>"#,
            r#"<p v-pre>{{ a b }}</p>"#,
            r#"<comp #default="{ item }">{{ item }}</comp>"#,
        ] {
            assert_eq!(check(inner), Vec::<String>::new(), "{inner}");
        }
    }

    #[test]
    fn test_interpolation_error() {
        assert_eq!(check("{{ a b }}"), vec!["Parsing error: Unexpected token 'b'."]);
    }

    #[test]
    fn test_directive_value_error() {
        assert_eq!(
            check(r#"<p :title="a +"></p>"#),
            vec!["Parsing error: Unexpected end of expression."]
        );
    }

    #[test]
    fn test_dynamic_argument_error() {
        assert_eq!(check(r#"<p :[a b]="x"></p>"#), vec!["Parsing error: Unexpected token 'b'."]);
    }

    #[test]
    fn test_reported_at_error_location() {
        let source = "<template><div>{{ a b }}</div></template>";
        let diagnostics = lint(NoParsingError, source);
        assert_eq!(&source[diagnostics[0].span.to_range()], "b");
        assert_eq!(diagnostics[0].data, vec![("message", "Unexpected token 'b'".to_string())]);
    }

    #[test]
    fn test_every_container_reports() {
        let found = check(r#"<p :a="1 2" :b="3 4">{{ 5 6 }}</p>"#);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_deeply_nested_expression() {
        let value = format!("{}x{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(
            check(&format!(r#"<p :a="{value}"></p>"#)),
            vec!["Parsing error: Expression nested too deeply."]
        );
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(check("é{{ é }}"), Vec::<String>::new());
        assert_eq!(
            check(r#"<p :title="größe + café" @click="$emit(ñandú)"></p>"#),
            Vec::<String>::new()
        );
    }
}
