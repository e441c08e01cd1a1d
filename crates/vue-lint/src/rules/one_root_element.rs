//! `require-one-root-element`: the lenient root check, cardinality only.

use super::template_root::{is_stray_text, NOT_ONE_ROOT, TEXT_ROOT};
use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use vue_template_ast::{Node, TemplateAst};

static META: RuleMeta = RuleMeta {
    id: "require-one-root-element",
    description: "require exactly one root element for `<template>`",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct RequireOneRootElement;

impl Rule for RequireOneRootElement {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Program]
    }

    fn check_program(&self, ctx: &mut RuleContext<'_>, ast: &TemplateAst) {
        let mut elements = 0usize;
        let mut extra_text = false;
        for child in &ast.body().children {
            match child {
                Node::Element(_) => elements += 1,
                node => extra_text |= is_stray_text(ctx, node),
            }
        }

        if extra_text {
            ctx.report(ast.span(), TEXT_ROOT);
        } else if elements != 1 {
            ctx.report(ast.span(), NOT_ONE_ROOT);
        }
    }
}
