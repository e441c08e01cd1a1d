//! `no-invalid-v-else`: `v-else` closes a conditional chain.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::query::prev_element_has_if;
use vue_template_ast::{DirectiveAttribute, Element};

const NOT_PRECEDED: &str =
    "'v-else' directives require being preceded by the element which has a 'v-if' or 'v-else-if' directive.";
const WITH_V_IF: &str =
    "'v-else' and 'v-if' directives can't exist on the same element. You may want 'v-else-if' directives.";
const WITH_V_ELSE_IF: &str = "'v-else' and 'v-else-if' directives can't exist on the same element.";
const ARGUMENT: &str = "'v-else' directives require no argument.";
const MODIFIER: &str = "'v-else' directives require no modifier.";
const VALUE: &str = "'v-else' directives require no attribute value.";

static META: RuleMeta = RuleMeta {
    id: "no-invalid-v-else",
    description: "disallow invalid `v-else` directives",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct NoInvalidVElse;

impl Rule for NoInvalidVElse {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Directive("else")]
    }

    fn check_directive(
        &self,
        ctx: &mut RuleContext<'_>,
        element: &Element,
        directive: &DirectiveAttribute,
    ) {
        let span = directive.span;
        let start_tag = &element.start_tag;
        if !prev_element_has_if(ctx.ast(), element.id) {
            ctx.report(span, NOT_PRECEDED);
        }
        if start_tag.has_directive("if") {
            ctx.report(span, WITH_V_IF);
        }
        if start_tag.has_directive("else-if") {
            ctx.report(span, WITH_V_ELSE_IF);
        }
        if directive.key.argument.is_some() {
            ctx.report(span, ARGUMENT);
        }
        if !directive.key.modifiers.is_empty() {
            ctx.report(span, MODIFIER);
        }
        if directive.value.is_some() {
            ctx.report(span, VALUE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::messages;
    use pretty_assertions::assert_eq;

    fn check(inner: &str) -> Vec<String> {
        messages(NoInvalidVElse, &format!("<template><div>{inner}</div></template>"))
    }

    #[test]
    fn test_valid() {
        for inner in [
            r#"<div v-if="a"></div><div v-else></div>"#,
            r#"<div v-if="a"></div><div v-else-if="b"></div><div v-else></div>"#,
            "<div v-if=\"a\"></div>\n  text\n  <div v-else></div>",
        ] {
            assert_eq!(check(inner), Vec::<String>::new(), "{inner}");
        }
    }

    #[test]
    fn test_not_preceded_by_if() {
        assert_eq!(check("<div v-else></div>"), vec![NOT_PRECEDED]);
        assert_eq!(
            check(r#"<div v-if="a"></div><div v-else></div><div v-else></div>"#),
            vec![NOT_PRECEDED]
        );
    }

    #[test]
    fn test_conflicting_conditionals() {
        assert_eq!(
            check(r#"<div v-if="a"></div><div v-if="b" v-else></div>"#),
            vec![WITH_V_IF]
        );
        assert_eq!(
            check(r#"<div v-if="a"></div><div v-else-if="b" v-else></div>"#),
            vec![WITH_V_ELSE_IF]
        );
    }

    #[test]
    fn test_shape() {
        assert_eq!(
            check(r#"<div v-if="a"></div><div v-else:x.y="z"></div>"#),
            vec![ARGUMENT, MODIFIER, VALUE]
        );
    }
}
