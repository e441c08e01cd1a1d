//! `no-invalid-template-root`: the template must render exactly one root
//! element.
//!
//! Several top-level elements are allowed when they form a `v-if` /
//! `v-else-if` / `v-else` chain, because exactly one of them renders.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::tags::is_reserved_root_tag;
use vue_template_ast::{Node, TemplateAst};

pub(crate) const TEXT_ROOT: &str = "The template root requires an element rather than texts.";
pub(crate) const NOT_ONE_ROOT: &str = "The template root requires exactly one element.";
const RESERVED_ROOT: &str = "The template root disallows '<{{name}}>' elements.";
const OPEN_CHAIN: &str =
    "The template root requires the next element which has 'v-else' directives if it has 'v-if' directives.";
const ROOT_V_FOR: &str = "The template root disallows 'v-for' directives.";

static META: RuleMeta = RuleMeta {
    id: "no-invalid-template-root",
    description: "disallow invalid template root",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct NoInvalidTemplateRoot;

impl Rule for NoInvalidTemplateRoot {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Program]
    }

    fn check_program(&self, ctx: &mut RuleContext<'_>, ast: &TemplateAst) {
        let mut root_name = None;
        let mut root_has_if = false;
        let mut root_has_for = false;
        let mut extra_text = false;
        let mut extra_element = false;

        for child in &ast.body().children {
            let Node::Element(id) = child else {
                extra_text |= is_stray_text(ctx, child);
                continue;
            };
            let element = ast.element(*id);
            let start_tag = &element.start_tag;
            if root_name.is_none() {
                root_name = Some(&element.tag);
                root_has_if = start_tag.has_directive("if");
                root_has_for = start_tag.has_directive("for");
            } else if root_has_if && start_tag.has_directive("else-if") {
                // the chain continues
            } else if root_has_if && start_tag.has_directive("else") {
                root_has_if = false;
            } else {
                extra_element = true;
            }
        }

        let span = ast.span();
        if extra_text {
            ctx.report(span, TEXT_ROOT);
            return;
        }
        let Some(root_name) = root_name.filter(|_| !extra_element) else {
            ctx.report(span, NOT_ONE_ROOT);
            return;
        };

        if is_reserved_root_tag(root_name) {
            ctx.report_data(span, RESERVED_ROOT, vec![("name", root_name.to_string())]);
        }
        if root_has_if {
            ctx.report(span, OPEN_CHAIN);
        }
        if root_has_for {
            ctx.report(span, ROOT_V_FOR);
        }
    }
}

/// Whether a non-element child of the body renders visible content.
///
/// Interpolations always count; comments never do.
pub(crate) fn is_stray_text(ctx: &RuleContext<'_>, node: &Node) -> bool {
    match node {
        Node::Text(text) => !ctx.text(text.span).trim().is_empty(),
        Node::Interpolation(_) => true,
        Node::Element(_) | Node::Comment(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{lint, messages};
    use pretty_assertions::assert_eq;

    fn check(source: &str) -> Vec<String> {
        messages(NoInvalidTemplateRoot, source)
    }

    #[test]
    fn test_valid() {
        for source in [
            "",
            "<template><div>abc</div></template>",
            "<template>\n    <div>abc</div>\n</template>",
            "<template>\n    <!-- comment -->\n    <div>abc</div>\n</template>",
            "<template>\n    <div v-if=\"foo\">abc</div>\n    <div v-else>abc</div>\n</template>",
            "<template>\n    <div v-if=\"foo\">abc</div>\n    <div v-else-if=\"bar\">abc</div>\n    <div v-else>abc</div>\n</template>",
            "<template>\n    <c1 v-if=\"1\" />\n    <c2 v-else-if=\"1\" />\n    <c3 v-else />\n</template>",
        ] {
            assert_eq!(check(source), Vec::<String>::new(), "{source}");
        }
    }

    #[test]
    fn test_single_root_without_stray_text_is_valid() {
        for source in [
            "<template><my-comp/></template>",
            "<template>\n\t<section><p>{{ a }}</p> text</section>\n</template>",
            "<template><input></template>",
        ] {
            assert!(check(source).is_empty(), "{source}");
        }
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(check("<template>\n</template>"), vec![NOT_ONE_ROOT]);
    }

    #[test]
    fn test_multiple_roots_without_if() {
        for source in [
            "<template><div></div><div></div></template>",
            "<template>\n    <div></div>\n    <div></div>\n</template>",
            "<template><div v-else-if=\"a\"></div><div v-else></div></template>",
            "<template><div v-if=\"a\"></div><div v-else></div><div v-else></div></template>",
            "<template><div v-if=\"a\"></div><div></div></template>",
        ] {
            assert_eq!(check(source), vec![NOT_ONE_ROOT], "{source}");
        }
    }

    #[test]
    fn test_text_root() {
        for source in [
            "<template>{{a b c}}</template>",
            "<template><div></div>aaaaaa</template>",
            "<template>aaaaaa<div></div></template>",
            "<template><div></div><div></div>text</template>",
        ] {
            assert_eq!(check(source), vec![TEXT_ROOT], "{source}");
        }
    }

    #[test]
    fn test_reserved_roots() {
        assert_eq!(
            check("<template><template></template></template>"),
            vec!["The template root disallows '<template>' elements."]
        );
        assert_eq!(
            check("<template><slot></slot></template>"),
            vec!["The template root disallows '<slot>' elements."]
        );
    }

    #[test]
    fn test_conditional_chain_without_else() {
        assert_eq!(check("<template><div v-if=\"a\"></div></template>"), vec![OPEN_CHAIN]);
        assert_eq!(
            check("<template><div v-if=\"a\"></div><div v-else-if=\"b\"></div></template>"),
            vec![OPEN_CHAIN]
        );
    }

    #[test]
    fn test_v_for_root() {
        assert_eq!(
            check("<template><div v-for=\"x in list\"></div></template>"),
            vec![ROOT_V_FOR]
        );
    }

    #[test]
    fn test_attribute_checks_are_independent() {
        assert_eq!(
            check("<template><template v-if=\"a\" v-for=\"x in list\"></template></template>"),
            vec![
                "The template root disallows '<template>' elements.".to_string(),
                OPEN_CHAIN.to_string(),
                ROOT_V_FOR.to_string(),
            ]
        );
    }

    #[test]
    fn test_reported_on_template_body() {
        let source = "<script></script>\n<template><p/><p/></template>";
        let diagnostics = lint(NoInvalidTemplateRoot, source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].span.start, 18);
        assert_eq!(diagnostics[0].span.end as usize, source.len());
    }
}
