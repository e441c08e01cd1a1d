//! `require-v-for-key`: native elements rendered by `v-for` bind a key
//! derived from the iteration.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::query::uses_iteration_variable;
use vue_template_ast::tags::is_custom_component;
use vue_template_ast::Element;

const KEY_UNUSED: &str =
    "Expected 'v-bind:key' directive to use the variables which are defined by the 'v-for' directive.";
const KEY_MISSING: &str = "'v-for' directives require 'v-bind:key' directives.";

static META: RuleMeta = RuleMeta {
    id: "require-v-for-key",
    description: "require `v-bind:key` with `v-for` directives",
    category: Category::BestPractices,
    recommended: false,
    fixable: false,
};

pub struct RequireVForKey;

impl Rule for RequireVForKey {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::StartTag]
    }

    fn check_start_tag(&self, ctx: &mut RuleContext<'_>, element: &Element) {
        let start_tag = &element.start_tag;
        if !start_tag.has_directive("for") {
            return;
        }
        match start_tag.directive_with_arg("bind", "key") {
            Some(key) => {
                let uses_alias = key
                    .value
                    .as_ref()
                    .is_some_and(|value| uses_iteration_variable(value, element));
                if !uses_alias {
                    ctx.report(start_tag.span, KEY_UNUSED);
                }
            }
            None if !is_custom_component(element) => ctx.report(start_tag.span, KEY_MISSING),
            None => {}
        }
    }
}
