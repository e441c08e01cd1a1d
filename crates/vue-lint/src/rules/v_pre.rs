//! `no-invalid-v-pre`: `v-pre` takes nothing.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::{DirectiveAttribute, Element};

const ARGUMENT: &str = "'v-pre' directives require no argument.";
const MODIFIER: &str = "'v-pre' directives require no modifier.";
const VALUE: &str = "'v-pre' directives require no attribute value.";

static META: RuleMeta = RuleMeta {
    id: "no-invalid-v-pre",
    description: "disallow invalid `v-pre` directives",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct NoInvalidVPre;

impl Rule for NoInvalidVPre {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Directive("pre")]
    }

    fn check_directive(
        &self,
        ctx: &mut RuleContext<'_>,
        _element: &Element,
        directive: &DirectiveAttribute,
    ) {
        if directive.key.argument.is_some() {
            ctx.report(directive.span, ARGUMENT);
        }
        if !directive.key.modifiers.is_empty() {
            ctx.report(directive.span, MODIFIER);
        }
        // Any written value counts, even an empty one.
        if directive.value.is_some() {
            ctx.report(directive.span, VALUE);
        }
    }
}
