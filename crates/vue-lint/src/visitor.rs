//! Typed event dispatch over the template tree.
//!
//! Rules register [`Interest`]s; [`Dispatch`] turns them into per-event
//! handler lists once, and [`Walker`] walks a template depth-first in
//! document order, calling the handlers of each event it meets.

use crate::context::RuleContext;
use crate::linter::EnabledRule;
use crate::rule::Interest;
use crate::DiagnosticSink;
use rustc_hash::FxHashMap;
use vue_template_ast::{
    Attribute, DirectiveArgument, ElementId, ExpressionContainer, Node, TemplateAst,
};

/// Handler lists keyed by event. Entries index the enabled rule list.
#[derive(Debug, Default)]
pub(crate) struct Dispatch {
    program: Vec<usize>,
    element: Vec<usize>,
    start_tag: Vec<usize>,
    directive: FxHashMap<&'static str, Vec<usize>>,
    container: Vec<usize>,
}

impl Dispatch {
    pub(crate) fn new(rules: &[EnabledRule]) -> Self {
        let mut dispatch = Self::default();
        for (index, enabled) in rules.iter().enumerate() {
            for interest in enabled.rule.interests() {
                match interest {
                    Interest::Program => dispatch.program.push(index),
                    Interest::Element => dispatch.element.push(index),
                    Interest::StartTag => dispatch.start_tag.push(index),
                    Interest::Directive(name) => {
                        dispatch.directive.entry(*name).or_default().push(index)
                    }
                    Interest::ExpressionContainer => dispatch.container.push(index),
                }
            }
        }
        dispatch
    }

    /// Whether any handler needs template-body traversal.
    pub(crate) fn has_template_body_handlers(&self) -> bool {
        !self.element.is_empty()
            || !self.start_tag.is_empty()
            || !self.directive.is_empty()
            || !self.container.is_empty()
    }
}

/// Pending work of a traversal, in document order once popped.
enum Visit<'a> {
    Element(ElementId),
    Container(&'a ExpressionContainer),
}

/// One traversal of one template.
pub(crate) struct Walker<'a> {
    rules: &'a [EnabledRule],
    dispatch: &'a Dispatch,
    source: &'a str,
    ast: &'a TemplateAst,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        rules: &'a [EnabledRule],
        dispatch: &'a Dispatch,
        source: &'a str,
        ast: &'a TemplateAst,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            rules,
            dispatch,
            source,
            ast,
            sink,
        }
    }

    fn context(&mut self, enabled: &EnabledRule) -> RuleContext<'_> {
        RuleContext::new(
            self.source,
            self.ast,
            enabled.rule.meta(),
            enabled.severity,
            &mut *self.sink,
        )
    }

    /// Run the program handlers.
    pub(crate) fn run_program(&mut self) {
        let (rules, dispatch, ast) = (self.rules, self.dispatch, self.ast);
        for &index in &dispatch.program {
            let enabled = &rules[index];
            enabled.rule.check_program(&mut self.context(enabled), ast);
        }
    }

    /// Walk the template body.
    ///
    /// Uses an explicit stack so nesting depth is bounded by memory only.
    pub(crate) fn walk(&mut self) {
        let ast = self.ast;
        let mut stack = vec![Visit::Element(ElementId::BODY)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Element(id) => {
                    self.visit_element(id);
                    for child in ast.element(id).children.iter().rev() {
                        match child {
                            Node::Element(child) => stack.push(Visit::Element(*child)),
                            Node::Interpolation(container) => {
                                stack.push(Visit::Container(container))
                            }
                            Node::Text(_) | Node::Comment(_) => {}
                        }
                    }
                }
                Visit::Container(container) => self.visit_container(container),
            }
        }
    }

    /// Element, start tag and directive handlers of one element.
    fn visit_element(&mut self, id: ElementId) {
        let (rules, dispatch, ast) = (self.rules, self.dispatch, self.ast);
        let element = ast.element(id);
        tracing::trace!(tag = %element.tag, start = element.span.start, "visit element");

        for &index in &dispatch.element {
            let enabled = &rules[index];
            enabled.rule.check_element(&mut self.context(enabled), element);
        }
        for &index in &dispatch.start_tag {
            let enabled = &rules[index];
            enabled.rule.check_start_tag(&mut self.context(enabled), element);
        }

        for attribute in &element.start_tag.attributes {
            let Attribute::Directive(directive) = attribute else {
                continue;
            };
            if let Some(indices) = dispatch.directive.get(directive.key.name.as_str()) {
                for &index in indices {
                    let enabled = &rules[index];
                    enabled
                        .rule
                        .check_directive(&mut self.context(enabled), element, directive);
                }
            }
            if let Some(DirectiveArgument::Dynamic(container)) = &directive.key.argument {
                self.visit_container(container);
            }
            if let Some(container) = &directive.value {
                self.visit_container(container);
            }
        }
    }

    fn visit_container(&mut self, container: &ExpressionContainer) {
        let (rules, dispatch) = (self.rules, self.dispatch);
        for &index in &dispatch.container {
            let enabled = &rules[index];
            enabled.rule.check_container(&mut self.context(enabled), container);
        }
    }
}
