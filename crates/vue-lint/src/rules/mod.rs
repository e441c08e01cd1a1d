//! Rule registry.

mod confusing_v_for_v_if;
mod one_root_element;
mod parsing_error;
mod self_closing;
mod template_root;
mod v_else;
mod v_else_if;
mod v_for;
mod v_for_key;
mod v_model;
mod v_pre;

pub use confusing_v_for_v_if::NoConfusingVForVIf;
pub use one_root_element::RequireOneRootElement;
pub use parsing_error::NoParsingError;
pub use self_closing::HtmlNoSelfClosing;
pub use template_root::NoInvalidTemplateRoot;
pub use v_else::NoInvalidVElse;
pub use v_else_if::NoInvalidVElseIf;
pub use v_for::NoInvalidVFor;
pub use v_for_key::RequireVForKey;
pub use v_model::NoInvalidVModel;
pub use v_pre::NoInvalidVPre;

use crate::rule::Rule;

/// Every rule, sorted by id.
pub fn all() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(HtmlNoSelfClosing),
        Box::new(NoConfusingVForVIf),
        Box::new(NoInvalidTemplateRoot),
        Box::new(NoInvalidVElse),
        Box::new(NoInvalidVElseIf),
        Box::new(NoInvalidVFor),
        Box::new(NoInvalidVModel),
        Box::new(NoInvalidVPre),
        Box::new(NoParsingError),
        Box::new(RequireOneRootElement),
        Box::new(RequireVForKey),
    ]
}

/// Look up a rule by id.
pub fn find(id: &str) -> Option<Box<dyn Rule>> {
    all().into_iter().find(|rule| rule.meta().id == id)
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::{Diagnostic, Linter, Rule, Severity};
    use vue_template_parser::parse_program;

    /// Lint a `.vue` source with a single rule.
    pub(crate) fn lint<R: Rule + 'static>(rule: R, source: &str) -> Vec<Diagnostic> {
        let program = parse_program(source).unwrap();
        Linter::new([(Box::new(rule) as Box<dyn Rule>, Severity::Error)]).lint_to_vec(&program)
    }

    /// Messages reported by a single rule.
    pub(crate) fn messages<R: Rule + 'static>(rule: R, source: &str) -> Vec<String> {
        lint(rule, source).into_iter().map(|d| d.message).collect()
    }
}
