//! The rule runner.

use crate::rule::{Interest, Rule};
use crate::rules;
use crate::visitor::{Dispatch, Walker};
use crate::{Diagnostic, DiagnosticSink, Severity};
use source_text::Span;
use vue_template_ast::Program;

/// Rule id of the diagnostic emitted when a program has no template
/// traversal capability.
pub const MISSING_SERVICES_RULE: &str = "template-services";

/// Message of the missing-capability diagnostic.
pub const MISSING_SERVICES_MESSAGE: &str = "Template rules require a template-aware parser.";

/// A rule with the severity it reports at.
pub(crate) struct EnabledRule {
    pub(crate) rule: Box<dyn Rule>,
    pub(crate) severity: Severity,
}

/// A set of enabled rules plus their event dispatch table.
///
/// The linter keeps no state between programs; one instance can lint any
/// number of files, from any number of threads.
pub struct Linter {
    rules: Vec<EnabledRule>,
    dispatch: Dispatch,
}

impl Linter {
    /// Create a linter from rules and their severities.
    pub fn new(rules: impl IntoIterator<Item = (Box<dyn Rule>, Severity)>) -> Self {
        let rules: Vec<EnabledRule> = rules
            .into_iter()
            .map(|(rule, severity)| EnabledRule { rule, severity })
            .collect();
        let dispatch = Dispatch::new(&rules);
        tracing::debug!(rules = rules.len(), "linter ready");
        Self { rules, dispatch }
    }

    /// Every recommended rule at error severity.
    pub fn recommended() -> Self {
        Self::new(
            rules::all()
                .into_iter()
                .filter(|rule| rule.meta().recommended)
                .map(|rule| (rule, Severity::Error)),
        )
    }

    /// Ids of the enabled rules, in registration order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|enabled| enabled.rule.meta().id)
    }

    /// Number of enabled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is enabled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Lint one program, reporting to `sink` in traversal order.
    pub fn lint(&self, program: &Program, sink: &mut dyn DiagnosticSink) {
        if program.template_services().is_none() {
            if let Some(severity) = self.template_body_severity() {
                tracing::debug!("program has no template services");
                sink.report(missing_services(severity));
            }
            if let Some(ast) = &program.template_body {
                Walker::new(&self.rules, &self.dispatch, &program.source, ast, sink).run_program();
            }
            return;
        }

        let Some(ast) = &program.template_body else {
            return;
        };
        let mut walker = Walker::new(&self.rules, &self.dispatch, &program.source, ast, sink);
        walker.run_program();
        if self.dispatch.has_template_body_handlers() {
            walker.walk();
        }
    }

    /// Lint one program and collect its diagnostics.
    pub fn lint_to_vec(&self, program: &Program) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        self.lint(program, &mut diagnostics);
        diagnostics
    }

    /// The most severe level among rules that need template traversal.
    fn template_body_severity(&self) -> Option<Severity> {
        self.rules
            .iter()
            .filter(|enabled| {
                enabled
                    .rule
                    .interests()
                    .iter()
                    .any(Interest::is_template_body)
            })
            .map(|enabled| enabled.severity)
            .min()
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::recommended()
    }
}

fn missing_services(severity: Severity) -> Diagnostic {
    Diagnostic {
        rule: MISSING_SERVICES_RULE,
        message: MISSING_SERVICES_MESSAGE.to_string(),
        template: MISSING_SERVICES_MESSAGE,
        data: Vec::new(),
        span: Span::empty(0),
        severity,
        fix: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{NoInvalidTemplateRoot, NoInvalidVPre, RequireOneRootElement};
    use pretty_assertions::assert_eq;
    use vue_template_parser::parse_program;

    #[test]
    fn test_recommended_rules() {
        let linter = Linter::recommended();
        let ids: Vec<_> = linter.rule_ids().collect();
        assert!(ids.contains(&"no-invalid-v-for"));
        assert!(!ids.contains(&"require-v-for-key"));
        assert_eq!(linter.len(), rules::all().len() - 1);
    }

    #[test]
    fn test_missing_services_reported_once() {
        let linter = Linter::recommended();
        let diagnostics = linter.lint_to_vec(&Program::foreign("export default {}"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, MISSING_SERVICES_RULE);
        assert_eq!(diagnostics[0].message, MISSING_SERVICES_MESSAGE);
        assert_eq!(diagnostics[0].span, Span::empty(0));
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_missing_services_uses_most_severe_level() {
        let linter = Linter::new([(Box::new(NoInvalidVPre) as Box<dyn Rule>, Severity::Warning)]);
        let diagnostics = linter.lint_to_vec(&Program::foreign(""));
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_program_rules_do_not_need_services() {
        let linter = Linter::new([
            (Box::new(NoInvalidTemplateRoot) as Box<dyn Rule>, Severity::Error),
            (Box::new(RequireOneRootElement), Severity::Error),
        ]);
        assert!(linter.lint_to_vec(&Program::foreign("")).is_empty());
    }

    #[test]
    fn test_no_template_body() {
        let program = parse_program("<script>export default {}</script>").unwrap();
        assert!(Linter::recommended().lint_to_vec(&program).is_empty());
    }

    #[test]
    fn test_severity_is_per_rule() {
        let linter = Linter::new([(Box::new(NoInvalidVPre) as Box<dyn Rule>, Severity::Warning)]);
        let program = parse_program("<template><div v-pre:a></div></template>").unwrap();
        let diagnostics = linter.lint_to_vec(&program);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].rule, "no-invalid-v-pre");
    }

    #[test]
    fn test_diagnostics_follow_document_order() {
        let program = parse_program(
            "<template><div><p v-pre.x></p><span v-model=\"a\" v-pre=\"b\"></span></div></template>",
        )
        .unwrap();
        let messages: Vec<_> = Linter::recommended()
            .lint_to_vec(&program)
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "'v-pre' directives require no modifier.",
                "'v-model' directives aren't supported on <span> elements.",
                "'v-pre' directives require no attribute value.",
            ]
        );
    }

    #[test]
    fn test_recommended_report() {
        let source = "<template>\n  <ul>\n    <li v-for=\"x in xs\" v-if=\"ok\"></li>\n    <input type=\"file\" v-model.foo=\"a + b\">\n  </ul>\n</template>\n";
        let program = parse_program(source).unwrap();
        let report: Vec<_> = Linter::recommended()
            .lint_to_vec(&program)
            .into_iter()
            .map(|d| format!("{} `{}`: {}", d.rule, &source[d.span.to_range()], d.message))
            .collect();
        insta::assert_snapshot!(report.join("\n"), @r#"
        no-confusing-v-for-v-if `v-if="ok"`: This 'v-if' should be moved to the wrapper element.
        no-invalid-v-model `v-model.foo="a + b"`: 'v-model' directives don't support 'file' input type.
        no-invalid-v-model `v-model.foo="a + b"`: 'v-model' directives don't support the modifier 'foo'.
        no-invalid-v-model `v-model.foo="a + b"`: 'v-model' directives require the attribute value which is valid as LHS.
        "#);
    }

    #[test]
    fn test_deeply_nested_elements() {
        let depth = 5000;
        let source = format!(
            "<template>{}<span v-else></span>{}</template>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let program = parse_program(&source).unwrap();
        let diagnostics = Linter::recommended().lint_to_vec(&program);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "no-invalid-v-else");
        assert_eq!(&source[diagnostics[0].span.to_range()], "v-else");
    }

    #[test]
    fn test_interpolations_keep_document_order() {
        let program = parse_program(
            "<template><div>{{ a + }}<p v-pre.x></p>{{ b + }}</div></template>",
        )
        .unwrap();
        let rules: Vec<_> = Linter::recommended()
            .lint_to_vec(&program)
            .into_iter()
            .map(|d| d.rule)
            .collect();
        assert_eq!(
            rules,
            vec!["no-parsing-error", "no-invalid-v-pre", "no-parsing-error"]
        );
    }
}
