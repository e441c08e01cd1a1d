//! Orchestrator for running the linter over a workspace.

use crate::cli::Args;
use crate::config::Config;
use crate::output::OutputFormatter;
use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use source_text::apply_edits;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;
use vue_lint::{Diagnostic, Linter, Severity};
use vue_template_ast::Program;

/// Upper bound on lint-and-fix rounds per file.
const MAX_FIX_PASSES: usize = 10;

/// Result of a check run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Number of files checked.
    pub file_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Number of files rewritten by `--fix`.
    pub fixed_count: usize,
    /// Number of files that could not be read or parsed.
    pub failed_count: usize,
    /// Time taken.
    pub duration_ms: u64,
}

impl CheckResult {
    /// Whether the run should exit with a failure status.
    pub fn is_failure(&self, max_warnings: Option<usize>) -> bool {
        self.error_count > 0
            || self.failed_count > 0
            || max_warnings.is_some_and(|max| self.warning_count > max)
    }
}

/// Lint outcome of a single file.
#[derive(Debug)]
struct FileReport {
    /// Source after any fixes.
    source: String,
    diagnostics: Vec<Diagnostic>,
    fixed: bool,
}

/// Orchestrator for running vue-lint-rs.
pub struct Orchestrator {
    config: Config,
    args: Args,
    formatter: OutputFormatter,
    linter: Linter,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(workspace: PathBuf, args: Args) -> Result<Self> {
        let config = Config::load(&workspace, &args)
            .into_diagnostic()
            .wrap_err("Failed to load configuration")?;
        tracing::debug!(config = ?config.config_path, "loaded configuration");
        let mut formatter = OutputFormatter::new(args.output);
        if !std::io::stdout().is_terminal() {
            formatter = formatter.without_color();
        }
        let linter = config.linter();
        tracing::debug!(rules = ?linter.rule_ids().collect::<Vec<_>>(), "enabled rules");

        Ok(Self {
            config,
            args,
            formatter,
            linter,
        })
    }

    /// Run a single check.
    pub fn run_single_check(&self) -> Result<CheckResult> {
        let start = Instant::now();

        let files = self.find_files()?;
        tracing::debug!(count = files.len(), "found files");

        let reports: Vec<(PathBuf, Result<FileReport>)> = files
            .par_iter()
            .map(|file| (file.clone(), self.check_file(file)))
            .collect();

        let mut result = CheckResult {
            file_count: files.len(),
            ..CheckResult::default()
        };
        for (file, report) in &reports {
            let report = match report {
                Ok(report) => report,
                Err(err) => {
                    tracing::error!(file = %file.display(), "{err:?}");
                    result.failed_count += 1;
                    continue;
                }
            };
            if report.fixed {
                result.fixed_count += 1;
            }
            for diagnostic in &report.diagnostics {
                match diagnostic.severity {
                    Severity::Error => result.error_count += 1,
                    Severity::Warning => result.warning_count += 1,
                }
            }
            self.formatter
                .print_file(self.display_path(file), &report.source, &report.diagnostics);
        }
        result.duration_ms = start.elapsed().as_millis() as u64;

        if self.args.timings {
            eprintln!("\nTiming: {}ms", result.duration_ms);
        }
        self.formatter.print_summary(&result);

        Ok(result)
    }

    /// Run in watch mode.
    pub fn run_watch_mode(&self) -> Result<()> {
        use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
        use std::sync::mpsc::{channel, RecvTimeoutError};
        use std::time::Duration;

        eprintln!("Starting watch mode...\n");

        if let Err(err) = self.run_single_check() {
            tracing::error!("{err:?}");
        }

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
        )
        .into_diagnostic()?;

        watcher
            .watch(&self.config.workspace, RecursiveMode::Recursive)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to watch {}", self.config.workspace.display()))?;

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    let relevant = event
                        .paths
                        .iter()
                        .any(|path| self.config.should_process(path));
                    if !relevant {
                        continue;
                    }
                    if !self.args.preserve_watch_output {
                        print!("\x1B[2J\x1B[1;1H");
                    }
                    eprintln!("File change detected. Rerunning...\n");
                    if let Err(err) = self.run_single_check() {
                        tracing::error!("{err:?}");
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(())
    }

    /// Collect the files to lint, in path order.
    fn find_files(&self) -> Result<Vec<PathBuf>> {
        let roots: Vec<PathBuf> = if self.args.paths.is_empty() {
            vec![self.config.workspace.clone()]
        } else {
            self.args
                .paths
                .iter()
                .map(|path| self.config.workspace.join(path))
                .collect()
        };

        let mut files = Vec::new();
        for root in &roots {
            if !root.exists() {
                return Err(miette::miette!("Path does not exist: {}", root.display()));
            }
            for entry in walkdir::WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !self.is_ignored_dir(entry.path()))
                .filter_map(|entry| entry.ok())
            {
                let path = entry.path();
                if entry.file_type().is_file() && self.config.should_process(path) {
                    files.push(path.to_path_buf());
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn is_ignored_dir(&self, path: &Path) -> bool {
        path.is_dir()
            && path
                .file_name()
                .is_some_and(|name| name == "node_modules" || name == ".git")
    }

    /// Lint one file, applying fixes when requested.
    fn check_file(&self, path: &Path) -> Result<FileReport> {
        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

        if !self.args.fix {
            let diagnostics = lint_source(&self.linter, path, &source)?;
            return Ok(FileReport {
                source,
                diagnostics,
                fixed: false,
            });
        }

        let (fixed_source, diagnostics) = fix_source(&self.linter, path, &source)?;
        let fixed = fixed_source != source;
        if fixed {
            std::fs::write(path, &fixed_source)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(file = %path.display(), "wrote fixes");
        }
        Ok(FileReport {
            source: fixed_source,
            diagnostics,
            fixed,
        })
    }

    fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.config.workspace).unwrap_or(path)
    }
}

/// Lint `source` as the contents of `path`.
fn lint_source(linter: &Linter, path: &Path, source: &str) -> Result<Vec<Diagnostic>> {
    let program = if Config::is_template_file(path) {
        vue_template_parser::parse_program(source)
            .into_diagnostic()
            .wrap_err_with(|| format!("Parse error in {}", path.display()))?
    } else {
        Program::foreign(source)
    };
    Ok(linter.lint_to_vec(&program))
}

/// Lint and apply fixes until no fix applies, returning the final text and
/// the diagnostics that remain on it.
fn fix_source(linter: &Linter, path: &Path, source: &str) -> Result<(String, Vec<Diagnostic>)> {
    let mut text = source.to_string();
    let mut diagnostics = lint_source(linter, path, &text)?;
    for pass in 0..MAX_FIX_PASSES {
        let edits: Vec<_> = diagnostics
            .iter()
            .filter_map(|diagnostic| diagnostic.fix.as_ref())
            .flat_map(|fix| fix.edits.iter().cloned())
            .collect();
        if edits.is_empty() {
            break;
        }
        let applied = apply_edits(&text, &edits)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to apply fixes to {}", path.display()))?;
        tracing::trace!(pass, applied = applied.applied, skipped = applied.skipped, "fix pass");
        if applied.applied == 0 || applied.text == text {
            break;
        }
        text = applied.text;
        diagnostics = lint_source(linter, path, &text)?;
    }
    Ok((text, diagnostics))
}
