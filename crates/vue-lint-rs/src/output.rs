//! Output formatting for diagnostics.

use crate::cli::OutputFormat;
use crate::orchestrator::CheckResult;
use source_text::LineIndex;
use std::path::Path;
use vue_lint::{Diagnostic, Severity};

/// Formatter for diagnostic output.
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    /// Disable ANSI colors.
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Render every diagnostic of one file, one line each.
    pub fn format_file(
        &self,
        file: &Path,
        source: &str,
        diagnostics: &[Diagnostic],
    ) -> Vec<String> {
        let index = LineIndex::new(source);
        diagnostics
            .iter()
            .map(|diagnostic| {
                let (line, col) = index.line_col(diagnostic.span.start).to_display();
                match self.format {
                    OutputFormat::Human => self.format_human(file, line, col, diagnostic),
                    OutputFormat::Json => format_json(file, line, col, diagnostic),
                    OutputFormat::Machine => format_machine(file, line, col, diagnostic),
                }
            })
            .collect()
    }

    /// Print the diagnostics of one file.
    pub fn print_file(&self, file: &Path, source: &str, diagnostics: &[Diagnostic]) {
        for line in self.format_file(file, source, diagnostics) {
            println!("{line}");
        }
    }

    /// Render the summary, if the format has one.
    pub fn format_summary(&self, result: &CheckResult) -> Option<String> {
        match self.format {
            OutputFormat::Human => Some(self.format_summary_human(result)),
            OutputFormat::Json => Some(format_summary_json(result)),
            OutputFormat::Machine => None,
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, result: &CheckResult) {
        if let Some(summary) = self.format_summary(result) {
            if self.format == OutputFormat::Human {
                println!();
            }
            println!("{summary}");
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    // Human format

    fn format_human(&self, file: &Path, line: u32, col: u32, diagnostic: &Diagnostic) -> String {
        let severity = match diagnostic.severity {
            Severity::Error => self.paint("error", "31"),
            Severity::Warning => self.paint("warning", "33"),
        };
        let fixable = if diagnostic.fix.is_some() {
            " (fixable)"
        } else {
            ""
        };
        format!(
            "{}:{}:{}: {}: {} [{}]{}",
            file.display(),
            line,
            col,
            severity,
            diagnostic.message,
            diagnostic.rule,
            fixable
        )
    }

    fn format_summary_human(&self, result: &CheckResult) -> String {
        let mut lines = Vec::new();
        if result.error_count == 0 && result.warning_count == 0 {
            lines.push(format!(
                "{} No issues found in {} files ({}ms)",
                self.paint("✓", "32"),
                result.file_count,
                result.duration_ms
            ));
        } else {
            if result.error_count > 0 {
                lines.push(format!(
                    "{} Found {} error{} in {} files",
                    self.paint("✗", "31"),
                    result.error_count,
                    plural(result.error_count),
                    result.file_count
                ));
            }
            if result.warning_count > 0 {
                lines.push(format!(
                    "{} Found {} warning{}",
                    self.paint("⚠", "33"),
                    result.warning_count,
                    plural(result.warning_count)
                ));
            }
        }
        if result.fixed_count > 0 {
            lines.push(format!(
                "Fixed {} file{}",
                result.fixed_count,
                plural(result.fixed_count)
            ));
        }
        if result.failed_count > 0 {
            lines.push(format!(
                "{} {} file{} could not be linted",
                self.paint("✗", "31"),
                result.failed_count,
                plural(result.failed_count)
            ));
        }
        lines.join("\n")
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// JSON format

fn format_json(file: &Path, line: u32, col: u32, diagnostic: &Diagnostic) -> String {
    serde_json::json!({
        "type": "diagnostic",
        "file": file.to_string_lossy(),
        "rule": diagnostic.rule,
        "severity": diagnostic.severity.as_str(),
        "message": diagnostic.message,
        "line": line,
        "column": col,
        "span": {
            "start": diagnostic.span.start,
            "end": diagnostic.span.end
        },
        "fixable": diagnostic.fix.is_some()
    })
    .to_string()
}

fn format_summary_json(result: &CheckResult) -> String {
    serde_json::json!({
        "type": "summary",
        "files": result.file_count,
        "errors": result.error_count,
        "warnings": result.warning_count,
        "fixed": result.fixed_count,
        "failed": result.failed_count,
        "duration_ms": result.duration_ms
    })
    .to_string()
}

// Machine format

fn format_machine(file: &Path, line: u32, col: u32, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{}:{}:{}:{}",
        file.display(),
        line,
        col,
        diagnostic.severity.as_str(),
        diagnostic.rule,
        diagnostic.message.replace(':', "\\:")
    )
}
