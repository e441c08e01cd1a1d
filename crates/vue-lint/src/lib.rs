//! Directive-semantics validation for Vue templates.
//!
//! This crate provides the template rules:
//! - Template root structure (`no-invalid-template-root`, `require-one-root-element`)
//! - Directive grammar (`no-invalid-v-for`, `no-invalid-v-model`, `no-invalid-v-pre`,
//!   `no-invalid-v-else-if`, `no-invalid-v-else`)
//! - Key and colocation checks (`require-v-for-key`, `no-confusing-v-for-v-if`)
//! - Upstream syntax errors (`no-parsing-error`)
//! - End tag style with an automatic fix (`html-no-self-closing`)
//!
//! Rules never parse source text. They inspect the tree built by
//! `vue-template-parser` and report [`Diagnostic`]s to a [`DiagnosticSink`].

pub mod context;
pub mod linter;
pub mod rule;
pub mod rules;
pub mod visitor;

pub use context::RuleContext;
pub use linter::{Linter, MISSING_SERVICES_MESSAGE, MISSING_SERVICES_RULE};
pub use rule::{Category, Interest, Rule, RuleMeta};

use source_text::{Span, TextEdit};

/// A reported rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Id of the rule that produced it.
    pub rule: &'static str,
    /// The message with `{{placeholders}}` filled in.
    pub message: String,
    /// The message template as declared by the rule.
    pub template: &'static str,
    /// Placeholder values, in declaration order.
    pub data: Vec<(&'static str, String)>,
    /// Location in the file.
    pub span: Span,
    /// The severity level.
    pub severity: Severity,
    /// Proposed correction, if the rule offers one.
    pub fix: Option<Fix>,
}

/// A text correction computed from the source the diagnostic was reported
/// against. The host applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub edits: Vec<TextEdit>,
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// A violation that fails the run.
    Error,
    /// A violation that is reported but does not fail the run by itself.
    Warning,
}

impl Severity {
    /// Get the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of diagnostics, owned by the host.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Fill `{{name}}` placeholders of `template` from `data`.
///
/// Unknown placeholders are left as written.
pub fn interpolate(template: &str, data: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = after[..close].trim();
        match data.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_interpolate() {
        let data = [("name", "slot".to_string())];
        assert_eq!(
            interpolate("The template root disallows '<{{name}}>' elements.", &data),
            "The template root disallows '<slot>' elements."
        );
        assert_eq!(interpolate("Invalid alias '{{text}}'.", &[]), "Invalid alias '{{text}}'.");
        assert_eq!(interpolate("open {{ name", &data), "open {{ name");
        assert_eq!(interpolate("{{ name }}!", &data), "slot!");
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic {
            rule: "no-parsing-error",
            message: "Parsing error: x.".into(),
            template: "Parsing error: {{message}}.",
            data: vec![("message", "x".into())],
            span: Span::new(0, 1),
            severity: Severity::Error,
            fix: None,
        });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].severity.to_string(), "error");
    }
}
