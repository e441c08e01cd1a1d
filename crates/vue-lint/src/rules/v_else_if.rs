//! `no-invalid-v-else-if`: `v-else-if` continues a conditional chain.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::query::prev_element_has_if;
use vue_template_ast::{DirectiveAttribute, Element};

const NOT_PRECEDED: &str =
    "'v-else-if' directives require being preceded by the element which has a 'v-if' or 'v-else-if' directive.";
const WITH_V_IF: &str = "'v-else-if' and 'v-if' directives can't exist on the same element.";
const ARGUMENT: &str = "'v-else-if' directives require no argument.";
const MODIFIER: &str = "'v-else-if' directives require no modifier.";
const NO_VALUE: &str = "'v-else-if' directives require that attribute value.";

static META: RuleMeta = RuleMeta {
    id: "no-invalid-v-else-if",
    description: "disallow invalid `v-else-if` directives",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct NoInvalidVElseIf;

impl Rule for NoInvalidVElseIf {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Directive("else-if")]
    }

    fn check_directive(
        &self,
        ctx: &mut RuleContext<'_>,
        element: &Element,
        directive: &DirectiveAttribute,
    ) {
        let span = directive.span;
        if !prev_element_has_if(ctx.ast(), element.id) {
            ctx.report(span, NOT_PRECEDED);
        }
        if element.start_tag.has_directive("if") {
            ctx.report(span, WITH_V_IF);
        }
        if directive.key.argument.is_some() {
            ctx.report(span, ARGUMENT);
        }
        if !directive.key.modifiers.is_empty() {
            ctx.report(span, MODIFIER);
        }
        if !directive.has_value() {
            ctx.report(span, NO_VALUE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::messages;
    use pretty_assertions::assert_eq;

    fn check(inner: &str) -> Vec<String> {
        messages(NoInvalidVElseIf, &format!("<template><div>{inner}</div></template>"))
    }

    #[test]
    fn test_valid() {
        for inner in [
            r#"<div v-if="a"></div><div v-else-if="b"></div>"#,
            r#"<div v-if="a"></div><div v-else-if="b"></div><div v-else-if="c"></div>"#,
            "<div v-if=\"a\"></div>\n  <!-- note -->\n  <div v-else-if=\"b\"></div>",
        ] {
            assert_eq!(check(inner), Vec::<String>::new(), "{inner}");
        }
    }

    #[test]
    fn test_not_preceded_by_if() {
        assert_eq!(check(r#"<div v-else-if="b"></div>"#), vec![NOT_PRECEDED]);
        assert_eq!(check(r#"<div></div><div v-else-if="b"></div>"#), vec![NOT_PRECEDED]);
        assert_eq!(
            check(r#"<div v-if="a"></div><div v-else></div><div v-else-if="b"></div>"#),
            vec![NOT_PRECEDED]
        );
        assert_eq!(
            check(r#"<div v-if="a"><div v-else-if="b"></div></div>"#),
            vec![NOT_PRECEDED]
        );
    }

    #[test]
    fn test_with_v_if() {
        assert_eq!(
            check(r#"<div v-if="a"></div><div v-if="b" v-else-if="c"></div>"#),
            vec![WITH_V_IF]
        );
    }

    #[test]
    fn test_shape() {
        assert_eq!(check(r#"<div v-if="a"></div><div v-else-if:x="b"></div>"#), vec![ARGUMENT]);
        assert_eq!(check(r#"<div v-if="a"></div><div v-else-if.x="b"></div>"#), vec![MODIFIER]);
        assert_eq!(check(r#"<div v-if="a"></div><div v-else-if></div>"#), vec![NO_VALUE]);
    }
}
