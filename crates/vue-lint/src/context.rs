//! Per-rule reporting context.

use crate::{interpolate, Diagnostic, DiagnosticSink, Fix, RuleMeta, Severity};
use source_text::{Span, TextEdit};
use vue_template_ast::TemplateAst;

/// What a rule sees while handling one event.
pub struct RuleContext<'a> {
    source: &'a str,
    ast: &'a TemplateAst,
    meta: &'static RuleMeta,
    severity: Severity,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        source: &'a str,
        ast: &'a TemplateAst,
        meta: &'static RuleMeta,
        severity: Severity,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            source,
            ast,
            meta,
            severity,
            sink,
        }
    }

    /// The full source text of the file.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The template being linted.
    pub fn ast(&self) -> &'a TemplateAst {
        self.ast
    }

    /// Source text covered by `span`; empty when out of range.
    pub fn text(&self, span: Span) -> &'a str {
        span.slice(self.source).unwrap_or_default()
    }

    /// Report a message without placeholders.
    pub fn report(&mut self, span: Span, template: &'static str) {
        self.report_with(span, template, Vec::new(), None);
    }

    /// Report a message template with placeholder values.
    pub fn report_data(
        &mut self,
        span: Span,
        template: &'static str,
        data: Vec<(&'static str, String)>,
    ) {
        self.report_with(span, template, data, None);
    }

    /// Report with a fix computed from the current source text.
    pub fn report_fix<F>(&mut self, span: Span, template: &'static str, fix: F)
    where
        F: FnOnce(&str) -> Vec<TextEdit>,
    {
        let edits = fix(self.source);
        self.report_with(span, template, Vec::new(), Some(Fix { edits }));
    }

    fn report_with(
        &mut self,
        span: Span,
        template: &'static str,
        data: Vec<(&'static str, String)>,
        fix: Option<Fix>,
    ) {
        let message = interpolate(template, &data);
        tracing::trace!(rule = self.meta.id, start = span.start, %message, "report");
        self.sink.report(Diagnostic {
            rule: self.meta.id,
            message,
            template,
            data,
            span,
            severity: self.severity,
            fix,
        });
    }
}
