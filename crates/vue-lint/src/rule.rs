//! The rule trait and rule metadata.

use crate::context::RuleContext;
use vue_template_ast::{DirectiveAttribute, Element, ExpressionContainer, TemplateAst};

/// Rule categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Code that is certainly wrong.
    PossibleErrors,
    /// Code that works but is likely a mistake or hard to read.
    BestPractices,
}

impl Category {
    /// Get the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PossibleErrors => "possible-errors",
            Self::BestPractices => "best-practices",
        }
    }
}

/// Static description of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    /// Rule id, e.g. `no-invalid-v-for`.
    pub id: &'static str,
    /// One-line description.
    pub description: &'static str,
    pub category: Category,
    /// Enabled by default.
    pub recommended: bool,
    /// Some reports carry a fix.
    pub fixable: bool,
}

/// A traversal event a rule can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interest {
    /// Once per program that has a template body.
    Program,
    /// Every element of the template body, including the body itself.
    Element,
    /// Every start tag; delivered with its element.
    StartTag,
    /// Every directive attribute with the given name (without `v-`).
    Directive(&'static str),
    /// Every expression container: directive values, dynamic arguments
    /// and interpolations.
    ExpressionContainer,
}

impl Interest {
    /// Whether the event needs template-body traversal.
    pub fn is_template_body(&self) -> bool {
        !matches!(self, Interest::Program)
    }
}

/// A template rule.
///
/// A rule declares its [`Interest`]s and implements the matching handlers.
/// Handlers only read the tree and report through the context; rules keep
/// no state between calls.
pub trait Rule: Send + Sync {
    /// Static metadata.
    fn meta(&self) -> &'static RuleMeta;

    /// The events this rule listens to.
    fn interests(&self) -> &'static [Interest];

    fn check_program(&self, _ctx: &mut RuleContext<'_>, _ast: &TemplateAst) {}

    fn check_element(&self, _ctx: &mut RuleContext<'_>, _element: &Element) {}

    fn check_start_tag(&self, _ctx: &mut RuleContext<'_>, _element: &Element) {}

    fn check_directive(
        &self,
        _ctx: &mut RuleContext<'_>,
        _element: &Element,
        _directive: &DirectiveAttribute,
    ) {
    }

    fn check_container(&self, _ctx: &mut RuleContext<'_>, _container: &ExpressionContainer) {}
}
