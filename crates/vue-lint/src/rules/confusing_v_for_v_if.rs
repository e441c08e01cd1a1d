//! `no-confusing-v-for-v-if`: a `v-if` next to `v-for` should filter by the
//! iteration variables, otherwise it belongs on a wrapper element.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::query::uses_iteration_variable;
use vue_template_ast::Element;

const MOVE_V_IF: &str = "This 'v-if' should be moved to the wrapper element.";

static META: RuleMeta = RuleMeta {
    id: "no-confusing-v-for-v-if",
    description: "disallow confusing `v-for` and `v-if` on the same element",
    category: Category::BestPractices,
    recommended: true,
    fixable: false,
};

pub struct NoConfusingVForVIf;

impl Rule for NoConfusingVForVIf {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Element]
    }

    fn check_element(&self, ctx: &mut RuleContext<'_>, element: &Element) {
        let start_tag = &element.start_tag;
        let Some(v_if) = start_tag.directive("if") else {
            return;
        };
        if !start_tag.has_directive("for") {
            return;
        }
        let scoped = v_if
            .value
            .as_ref()
            .is_some_and(|value| uses_iteration_variable(value, element));
        if !scoped {
            ctx.report(v_if.span, MOVE_V_IF);
        }
    }
}
