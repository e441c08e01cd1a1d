//! `html-no-self-closing`: HTML elements use explicit end tags.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use source_text::{Span, TextEdit};
use vue_template_ast::tags::is_svg_element_name;
use vue_template_ast::{Element, ElementId, Namespace};

const SELF_CLOSING: &str = "Self-closing should not be used.";

static META: RuleMeta = RuleMeta {
    id: "html-no-self-closing",
    description: "enforce end tag style",
    category: Category::BestPractices,
    recommended: true,
    fixable: true,
};

pub struct HtmlNoSelfClosing;

impl Rule for HtmlNoSelfClosing {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::StartTag]
    }

    fn check_start_tag(&self, ctx: &mut RuleContext<'_>, element: &Element) {
        let start_tag = &element.start_tag;
        // A self-closing `<template/>` block has no end tag to fall back on.
        if !start_tag.self_closing
            || element.id == ElementId::BODY
            || element.namespace == Namespace::Svg
            || is_svg_element_name(&element.tag)
        {
            return;
        }
        // `/` sits right before the closing `>`.
        let slash = start_tag.span.end - 2;
        ctx.report_fix(start_tag.span, SELF_CLOSING, |_source| {
            vec![TextEdit::delete(Span::new(slash, slash + 1))]
        });
    }
}
