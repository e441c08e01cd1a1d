//! `no-invalid-v-model`: `v-model` targets and binding expressions.

use crate::context::RuleContext;
use crate::rule::{Category, Interest, Rule, RuleMeta};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use vue_template_ast::{DirectiveAttribute, Element, Expression, Namespace};

const UNSUPPORTED_TAG: &str = "'v-model' directives aren't supported on <{{name}}> elements.";
const DYNAMIC_TYPE: &str = "'v-model' directives don't support dynamic input types.";
const FILE_TYPE: &str = "'v-model' directives don't support 'file' input type.";
const ARGUMENT: &str = "'v-model' directives require no argument.";
const MODIFIER: &str = "'v-model' directives don't support the modifier '{{name}}'.";
const NO_VALUE: &str = "'v-model' directives require that attribute value.";
const NOT_LHS: &str = "'v-model' directives require the attribute value which is valid as LHS.";

const VALID_MODIFIERS: &[&str] = &["lazy", "number", "trim"];

/// Elements that never hold an editable value.
const INVALID_TAGS: &[&str] = &[
    "html", "body", "base", "head", "link", "meta", "style", "title", "address", "article",
    "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6", "hgroup", "nav", "section",
    "div", "dd", "dl", "dt", "figcaption", "figure", "hr", "img", "li", "main", "ol", "p", "pre",
    "ul", "a", "b", "abbr", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
    "mark", "q", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span", "strong", "sub", "sup",
    "time", "u", "var", "wbr", "area", "audio", "map", "track", "video", "embed", "object",
    "param", "source", "canvas", "script", "noscript", "del", "ins", "caption", "col",
    "colgroup", "table", "thead", "tbody", "td", "th", "tr", "button", "datalist", "fieldset",
    "form", "label", "legend", "meter", "optgroup", "option", "output", "progress", "details",
    "dialog", "menu", "menuitem", "summary", "content", "element", "shadow", "template", "svg",
    "animate", "circle", "clippath", "cursor", "defs", "desc", "ellipse", "filter", "font-face",
    "foreignObject", "g", "glyph", "image", "line", "marker", "mask", "missing-glyph", "path",
    "pattern", "polygon", "polyline", "rect", "switch", "symbol", "text", "textpath", "tspan",
    "use", "view",
];

static INVALID_TAG_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| INVALID_TAGS.iter().copied().collect());

static META: RuleMeta = RuleMeta {
    id: "no-invalid-v-model",
    description: "disallow invalid `v-model` directives",
    category: Category::PossibleErrors,
    recommended: true,
    fixable: false,
};

pub struct NoInvalidVModel;

impl Rule for NoInvalidVModel {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn interests(&self) -> &'static [Interest] {
        &[Interest::Directive("model")]
    }

    fn check_directive(
        &self,
        ctx: &mut RuleContext<'_>,
        element: &Element,
        directive: &DirectiveAttribute,
    ) {
        let span = directive.span;
        let start_tag = &element.start_tag;

        let tag = match element.namespace {
            Namespace::Html => element.tag.to_ascii_lowercase(),
            Namespace::Svg | Namespace::MathMl => element.tag.to_string(),
        };
        if INVALID_TAG_SET.contains(tag.as_str()) {
            ctx.report_data(span, UNSUPPORTED_TAG, vec![("name", element.tag.to_string())]);
        }
        if element.namespace == Namespace::Html && tag == "input" {
            if start_tag.has_directive_with_arg("bind", "type") {
                ctx.report(span, DYNAMIC_TYPE);
            }
            if start_tag.has_attribute("type", Some("file")) {
                ctx.report(span, FILE_TYPE);
            }
        }
        if directive.key.argument.is_some() {
            ctx.report(span, ARGUMENT);
        }
        for modifier in &directive.key.modifiers {
            if !VALID_MODIFIERS.contains(&modifier.as_str()) {
                ctx.report_data(span, MODIFIER, vec![("name", modifier.to_string())]);
            }
        }
        if !directive.has_value() {
            ctx.report(span, NO_VALUE);
        }
        let parsed = directive.value.as_ref().and_then(|value| value.expression());
        if parsed.is_some_and(|expression| !is_lhs(expression)) {
            ctx.report(span, NOT_LHS);
        }
    }
}

/// A bare identifier or a property access.
fn is_lhs(expression: &Expression) -> bool {
    expression.is_identifier() || expression.is_member()
}
