//! Tag name classification.

use crate::ast::{Element, Namespace};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// HTML tags.
const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col", "colgroup",
    "content", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "element", "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img",
    "input", "ins", "kbd", "label", "legend", "li", "link", "main", "map", "mark", "math", "menu",
    "menuitem", "meta", "meter", "nav", "noscript", "object", "ol", "optgroup", "option",
    "output", "p", "param", "picture", "pre", "progress", "q", "rp", "rt", "rtc", "ruby", "s",
    "samp", "script", "search", "section", "select", "shadow", "slot", "small", "source", "span",
    "strong", "style", "sub", "summary", "sup", "svg", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u", "ul", "var", "video",
    "wbr",
];

/// SVG tags.
const SVG_TAGS: &[&str] = &[
    "svg", "a", "animate", "animateMotion", "animateTransform", "circle", "clipPath", "cursor",
    "defs", "desc", "ellipse", "feBlend", "feColorMatrix", "feComponentTransfer", "feComposite",
    "feConvolveMatrix", "feDiffuseLighting", "feDisplacementMap", "feDistantLight",
    "feDropShadow", "feFlood", "feFuncA", "feFuncB", "feFuncG", "feFuncR", "feGaussianBlur",
    "feImage", "feMerge", "feMergeNode", "feMorphology", "feOffset", "fePointLight",
    "feSpecularLighting", "feSpotLight", "feTile", "feTurbulence", "filter", "font-face",
    "foreignObject", "g", "glyph", "image", "line", "linearGradient", "marker", "mask",
    "metadata", "missing-glyph", "mpath", "path", "pattern", "polygon", "polyline",
    "radialGradient", "rect", "set", "stop", "switch", "symbol", "text", "textPath", "tspan",
    "use", "view",
];

/// Elements that never have children or an end tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

static HTML_SET: Lazy<FxHashSet<&'static str>> = Lazy::new(|| HTML_TAGS.iter().copied().collect());

static SVG_SET: Lazy<FxHashSet<String>> =
    Lazy::new(|| SVG_TAGS.iter().map(|t| t.to_ascii_lowercase()).collect());

static VOID_SET: Lazy<FxHashSet<&'static str>> = Lazy::new(|| VOID_TAGS.iter().copied().collect());

/// Whether `name` is a well-known HTML element name.
///
/// HTML names are matched exactly, so `Button` is not `button`.
pub fn is_html_element_name(name: &str) -> bool {
    HTML_SET.contains(name)
}

/// Whether `name` is a well-known SVG element name, ignoring case.
pub fn is_svg_element_name(name: &str) -> bool {
    SVG_SET.contains(name.to_ascii_lowercase().as_str())
}

/// Whether `name` is a built-in HTML or SVG tag rather than a component.
pub fn is_reserved_tag_name(name: &str) -> bool {
    is_html_element_name(name) || is_svg_element_name(name)
}

/// Whether `name` is a void element.
pub fn is_void_element(name: &str) -> bool {
    VOID_SET.contains(name.to_ascii_lowercase().as_str())
}

/// Whether `name` cannot be rendered as a template root.
pub fn is_reserved_root_tag(name: &str) -> bool {
    name == "template" || name == "slot"
}

/// Whether the element renders a component rather than a native tag.
pub fn is_custom_component(element: &Element) -> bool {
    let native = match element.namespace {
        Namespace::Html => is_html_element_name(&element.tag),
        Namespace::Svg => is_svg_element_name(&element.tag),
        Namespace::MathMl => true,
    };
    !native
        || element.start_tag.has_attribute("is", None)
        || element.start_tag.has_directive_with_arg("bind", "is")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_names_are_exact() {
        assert!(is_html_element_name("div"));
        assert!(!is_html_element_name("Div"));
        assert!(!is_html_element_name("my-comp"));
    }

    #[test]
    fn test_svg_names_ignore_case() {
        assert!(is_svg_element_name("circle"));
        assert!(is_svg_element_name("clipPath"));
        assert!(is_svg_element_name("clippath"));
        assert!(!is_svg_element_name("div"));
    }

    #[test]
    fn test_reserved_and_void() {
        assert!(is_reserved_tag_name("template"));
        assert!(is_reserved_tag_name("foreignObject"));
        assert!(!is_reserved_tag_name("MyComponent"));
        assert!(is_void_element("input"));
        assert!(is_void_element("BR"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn test_reserved_root_tags() {
        assert!(is_reserved_root_tag("template"));
        assert!(is_reserved_root_tag("slot"));
        assert!(!is_reserved_root_tag("div"));
    }
}
