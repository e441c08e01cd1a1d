//! Configuration loading and management.

use crate::cli::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use vue_lint::{rules, Linter, Rule, Severity};

/// Name of the configuration file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "vuelint.json";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
    #[error("invalid ignore pattern `{pattern}`")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// How a rule is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    /// The diagnostic severity, or `None` when the rule is disabled.
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warn => Some(Severity::Warning),
            RuleLevel::Error => Some(Severity::Error),
        }
    }
}

impl FromStr for RuleLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(RuleLevel::Off),
            "warn" => Ok(RuleLevel::Warn),
            "error" => Ok(RuleLevel::Error),
            other => Err(format!("unknown rule level `{other}` (expected off, warn or error)")),
        }
    }
}

/// Contents of `vuelint.json`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub rules: IndexMap<String, RuleLevel>,
    pub extensions: Option<Vec<String>>,
    pub ignore: Vec<String>,
}

impl ConfigFile {
    /// Read and parse a configuration file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory.
    pub workspace: PathBuf,
    /// Path of the loaded configuration file, if any.
    pub config_path: Option<PathBuf>,
    /// Level per rule id, in registry order.
    pub rules: IndexMap<&'static str, RuleLevel>,
    /// File extensions to process, with the leading dot.
    pub extensions: Vec<String>,
    ignore: GlobSet,
}

impl Config {
    /// Load configuration from CLI arguments and workspace.
    pub fn load(workspace: &Path, args: &Args) -> Result<Self, ConfigError> {
        let config_path = args.config.clone().or_else(|| {
            let candidate = workspace.join(CONFIG_FILE_NAME);
            candidate.is_file().then_some(candidate)
        });
        let file = match &config_path {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(workspace, config_path, file, args)
    }

    fn resolve(
        workspace: &Path,
        config_path: Option<PathBuf>,
        file: ConfigFile,
        args: &Args,
    ) -> Result<Self, ConfigError> {
        let mut levels: IndexMap<&'static str, RuleLevel> = rules::all()
            .iter()
            .map(|rule| {
                let meta = rule.meta();
                let level = if meta.recommended {
                    RuleLevel::Error
                } else {
                    RuleLevel::Off
                };
                (meta.id, level)
            })
            .collect();

        let overrides = file
            .rules
            .iter()
            .map(|(id, level)| (id.as_str(), *level))
            .chain(args.rules.iter().map(|(id, level)| (id.as_str(), *level)));
        for (id, level) in overrides {
            match levels.get_mut(id) {
                Some(slot) => *slot = level,
                None => return Err(ConfigError::UnknownRule(id.to_string())),
            }
        }

        let extensions = file
            .extensions
            .unwrap_or_else(|| vec![".vue".to_string()])
            .into_iter()
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();

        let mut ignore_patterns = vec![
            "**/node_modules/**".to_string(),
            "**/dist/**".to_string(),
            "**/.git/**".to_string(),
        ];
        ignore_patterns.extend(file.ignore);
        ignore_patterns.extend(args.ignore.iter().cloned());

        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: ignore_patterns.join(", "),
            source,
        })?;

        Ok(Self {
            workspace: workspace.to_path_buf(),
            config_path,
            rules: levels,
            extensions,
            ignore,
        })
    }

    /// Build a linter with every enabled rule at its configured severity.
    pub fn linter(&self) -> Linter {
        Linter::new(rules::all().into_iter().filter_map(|rule| {
            let level = self.rules.get(rule.meta().id).copied()?;
            level.severity().map(|severity| (rule, severity))
        }))
    }

    /// Whether files of this path are linted with the template parser.
    pub fn is_template_file(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "vue")
    }

    /// Check if a file should be processed.
    pub fn should_process(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        if !self.extensions.iter().any(|e| e == &ext) {
            return false;
        }

        let relative = path.strip_prefix(&self.workspace).unwrap_or(path);
        !self.ignore.is_match(relative) && !self.ignore.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["vue-lint-rs"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn resolve(json: &str, extra: &[&str]) -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE_NAME);
        let file = ConfigFile::parse(json, path)?;
        Config::resolve(Path::new("/project"), None, file, &args(extra))
    }

    #[test]
    fn test_default_levels() {
        let config = resolve("{}", &[]).unwrap();
        assert_eq!(config.rules.len(), rules::all().len());
        assert_eq!(config.rules["no-invalid-v-for"], RuleLevel::Error);
        assert_eq!(config.rules["require-v-for-key"], RuleLevel::Off);
        assert_eq!(config.extensions, vec![".vue".to_string()]);

        let linter = config.linter();
        assert!(!linter.rule_ids().any(|id| id == "require-v-for-key"));
        assert!(linter.rule_ids().any(|id| id == "html-no-self-closing"));
    }

    #[test]
    fn test_file_and_cli_overrides() {
        let config = resolve(
            r#"{ "rules": { "require-v-for-key": "warn", "no-invalid-v-pre": "off" } }"#,
            &["--rule", "require-v-for-key=error"],
        )
        .unwrap();
        assert_eq!(config.rules["require-v-for-key"], RuleLevel::Error);
        assert_eq!(config.rules["no-invalid-v-pre"], RuleLevel::Off);
        assert!(!config.linter().rule_ids().any(|id| id == "no-invalid-v-pre"));
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        let err = resolve(r#"{ "rules": { "no-such-rule": "warn" } }"#, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule(ref id) if id == "no-such-rule"));

        let err = resolve("{}", &["--rule", "nope=off"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown rule `nope`");
    }

    #[test]
    fn test_invalid_level_and_field() {
        assert!(matches!(
            resolve(r#"{ "rules": { "no-invalid-v-for": "loud" } }"#, &[]),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            resolve(r#"{ "plugins": [] }"#, &[]),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_should_process() {
        let config = resolve(
            r#"{ "extensions": [".vue", "html"], "ignore": ["**/legacy/**"] }"#,
            &["--ignore", "**/*.spec.vue"],
        )
        .unwrap();
        assert_eq!(config.extensions, vec![".vue".to_string(), ".html".to_string()]);
        assert!(config.should_process(Path::new("/project/src/App.vue")));
        assert!(config.should_process(Path::new("/project/index.html")));
        assert!(!config.should_process(Path::new("/project/src/main.ts")));
        assert!(!config.should_process(Path::new("/project/node_modules/lib/A.vue")));
        assert!(!config.should_process(Path::new("/project/src/legacy/Old.vue")));
        assert!(!config.should_process(Path::new("/project/src/App.spec.vue")));
    }

    #[test]
    fn test_invalid_glob() {
        let err = resolve("{}", &["--ignore", "a/[b"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { .. }));
    }

    #[test]
    fn test_load_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "rules": { "html-no-self-closing": "warn" } }"#,
        )
        .unwrap();
        let config = Config::load(dir.path(), &args(&[])).unwrap();
        assert_eq!(config.config_path, Some(dir.path().join(CONFIG_FILE_NAME)));
        assert_eq!(config.rules["html-no-self-closing"], RuleLevel::Warn);
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = Config::load(dir.path(), &args(&["--config", missing.to_str().unwrap()]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
