//! Template tree builder.
//!
//! A forgiving HTML reader tuned for component templates: self-closing
//! syntax closes any element, end tags close the nearest open element with
//! the same name, and stray end tags are ignored. Raw-text elements
//! (`script`, `style`) keep their content as a single text node.

use crate::attributes::{build_attribute, RawAttribute, RawValue};
use crate::error::{ParseError, ParseResult};
use crate::expression::{parse_value, Grammar};
use crate::scanner::Scanner;
use crate::scope;
use source_text::Span;
use vue_template_ast::tags::is_void_element;
use vue_template_ast::{
    Comment, Element, ElementId, Namespace, Node, ScopeVariable, StartTag, TemplateAst, Text,
};

/// An open element.
#[derive(Debug, Clone, Copy)]
struct Frame {
    id: ElementId,
    /// Inside a `v-pre` subtree.
    pre: bool,
}

/// A scanned start tag.
struct ScannedTag<'a> {
    name: &'a str,
    start_tag: StartTag,
    variables: Vec<ScopeVariable>,
    has_v_pre: bool,
}

pub(crate) struct TreeBuilder<'a> {
    source: &'a str,
    scanner: Scanner<'a>,
    ast: TemplateAst,
    stack: Vec<Frame>,
    /// Whether an end tag may close the body.
    body_closable: bool,
}

impl<'a> TreeBuilder<'a> {
    /// Parse the `<template>` block whose `<` is at `start`.
    ///
    /// Returns the tree and the position after `</template>`.
    pub(crate) fn parse_block(source: &'a str, start: usize) -> ParseResult<(TemplateAst, usize)> {
        let mut scanner = Scanner::at(source, start);
        let tag = scan_start_tag(&mut scanner, true);
        let mut body = Element::new(tag.name, Namespace::Html, tag.start_tag);
        body.variables = tag.variables;
        let self_closing = body.start_tag.self_closing;
        let start_span = body.start_tag.span;

        let mut builder = TreeBuilder {
            source,
            scanner,
            ast: TemplateAst::new(body),
            stack: Vec::new(),
            body_closable: true,
        };
        scope::resolve_start_tag(&mut builder.ast, ElementId::BODY);

        if self_closing {
            return Ok((builder.ast, builder.scanner.pos()));
        }

        builder.stack.push(Frame {
            id: ElementId::BODY,
            pre: tag.has_v_pre,
        });
        builder.parse_content();

        if builder.ast.body().end_tag.is_none() {
            return Err(ParseError::unclosed_block("template", start_span));
        }
        let end = builder.scanner.pos();
        Ok((builder.ast, end))
    }

    /// Parse bare template markup; the whole input becomes the body.
    pub(crate) fn parse_fragment(source: &'a str) -> TemplateAst {
        let start_tag = StartTag {
            span: Span::empty(0),
            ..Default::default()
        };
        let mut body = Element::new("template", Namespace::Html, start_tag);
        body.span = Span::new(0, source.len() as u32);

        let mut builder = TreeBuilder {
            source,
            scanner: Scanner::new(source),
            ast: TemplateAst::new(body),
            stack: vec![Frame {
                id: ElementId::BODY,
                pre: false,
            }],
            body_closable: false,
        };
        builder.parse_content();
        builder.ast
    }

    fn parse_content(&mut self) {
        while let Some(frame) = self.stack.last().copied() {
            if self.scanner.is_eof() {
                self.close_all_at_eof();
                return;
            }
            if self.scanner.starts_with("</") {
                let is_end_tag = self.source[self.scanner.pos() + 2..]
                    .starts_with(|c: char| c.is_ascii_alphabetic());
                if is_end_tag {
                    self.parse_end_tag();
                } else {
                    self.parse_bogus_comment(frame);
                }
            } else if self.scanner.starts_with("<!--") {
                self.parse_comment(frame);
            } else if self.scanner.starts_with("<!") || self.scanner.starts_with("<?") {
                self.parse_bogus_comment(frame);
            } else if self.scanner.starts_with("<")
                && self.scanner.peek_second().is_some_and(|c| c.is_ascii_alphabetic())
            {
                self.parse_element(frame);
            } else if frame.pre
                || !self.scanner.starts_with("{{")
                || !self.parse_interpolation(frame)
            {
                self.parse_text(frame);
            }
        }
    }

    fn push_child(&mut self, parent: ElementId, node: Node) {
        self.ast.element_mut(parent).children.push(node);
    }

    fn parse_element(&mut self, parent: Frame) {
        let parent_element = self.ast.element(parent.id);
        let namespace = child_namespace(parent_element, self.peek_tag_name());
        let tag = scan_start_tag(&mut self.scanner, !parent.pre);

        let mut element = Element::new(tag.name, namespace, tag.start_tag);
        element.parent = Some(parent.id);
        element.variables = tag.variables;
        let self_closing = element.start_tag.self_closing;
        let id = self.ast.alloc(element);
        self.push_child(parent.id, Node::Element(id));
        scope::resolve_start_tag(&mut self.ast, id);

        let name = tag.name;
        if self_closing || (namespace == Namespace::Html && is_void_element(name)) {
            return;
        }
        if namespace == Namespace::Html
            && (name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style"))
        {
            self.parse_raw_text(id, name);
            return;
        }
        self.stack.push(Frame {
            id,
            pre: parent.pre || tag.has_v_pre,
        });
    }

    /// The tag name at `<name`, without consuming it.
    fn peek_tag_name(&self) -> &'a str {
        let mut scanner = Scanner::at(self.source, self.scanner.pos() + 1);
        scanner.read_tag_name()
    }

    fn parse_raw_text(&mut self, id: ElementId, name: &str) {
        let start = self.scanner.pos();
        let text = self.scanner.read_raw_text(name);
        if !text.is_empty() {
            self.push_child(
                id,
                Node::Text(Text {
                    value: text.to_string(),
                    span: self.scanner.span_from(start),
                }),
            );
        }
        if self.scanner.is_eof() {
            self.ast.element_mut(id).span.end = self.source.len() as u32;
            return;
        }
        let end_start = self.scanner.pos();
        self.scanner.consume_until(">");
        self.scanner.consume(">");
        let end_tag = self.scanner.span_from(end_start);
        let element = self.ast.element_mut(id);
        element.end_tag = Some(end_tag);
        element.span.end = end_tag.end;
    }

    fn parse_end_tag(&mut self) {
        let start = self.scanner.pos();
        self.scanner.consume("</");
        let name = self.scanner.read_tag_name();
        self.scanner.consume_until(">");
        self.scanner.consume(">");
        let span = self.scanner.span_from(start);

        let lowest = if self.body_closable { 0 } else { 1 };
        let found = (lowest..self.stack.len())
            .rev()
            .find(|&i| self.ast.element(self.stack[i].id).tag.eq_ignore_ascii_case(name));
        let Some(index) = found else {
            tracing::debug!(tag = name, start, "ignoring stray end tag");
            return;
        };

        for frame in self.stack.drain(index + 1..).rev() {
            self.ast.element_mut(frame.id).span.end = start as u32;
        }
        if let Some(frame) = self.stack.pop() {
            let element = self.ast.element_mut(frame.id);
            element.end_tag = Some(span);
            element.span.end = span.end;
        }
    }

    fn close_all_at_eof(&mut self) {
        let end = self.source.len() as u32;
        for frame in self.stack.drain(..) {
            self.ast.element_mut(frame.id).span.end = end;
        }
    }

    fn parse_comment(&mut self, parent: Frame) {
        let start = self.scanner.pos();
        let value = self.scanner.read_comment().unwrap_or_default().to_string();
        let span = self.scanner.span_from(start);
        self.push_child(parent.id, Node::Comment(Comment { value, span }));
    }

    fn parse_bogus_comment(&mut self, parent: Frame) {
        let start = self.scanner.pos();
        self.scanner.consume("<");
        let value = self.scanner.consume_until(">").to_string();
        self.scanner.consume(">");
        let span = self.scanner.span_from(start);
        self.push_child(parent.id, Node::Comment(Comment { value, span }));
    }

    /// Parse `{{ expr }}`. Returns false, consuming nothing, when the
    /// mustache is never closed.
    fn parse_interpolation(&mut self, parent: Frame) -> bool {
        let start = self.scanner.pos();
        let Some(close) = self.scanner.remaining()[2..].find("}}") else {
            return false;
        };
        let inner_start = start + 2;
        let inner = &self.source[inner_start..inner_start + close];
        let mut container = parse_value(Grammar::Expression, inner, inner_start as u32).container;
        let end = inner_start + close + 2;
        container.span = Span::new(start as u32, end as u32);
        scope::resolve_container(&self.ast, parent.id, true, &mut container);
        self.scanner = Scanner::at(self.source, end);
        self.push_child(parent.id, Node::Interpolation(container));
        true
    }

    fn parse_text(&mut self, parent: Frame) {
        let start = self.scanner.pos();
        self.scanner.next_char();
        loop {
            self.scanner.consume_while(|c| c != '<' && c != '{');
            if self.scanner.is_eof()
                || self.scanner.starts_with("<")
                || (!parent.pre && self.scanner.starts_with("{{"))
            {
                break;
            }
            self.scanner.next_char();
        }
        let span = self.scanner.span_from(start);
        let value = &self.source[span.to_range()];

        let children = &mut self.ast.element_mut(parent.id).children;
        if let Some(Node::Text(previous)) = children.last_mut() {
            if previous.span.end == span.start {
                previous.value.push_str(value);
                previous.span.end = span.end;
                return;
            }
        }
        children.push(Node::Text(Text {
            value: value.to_string(),
            span,
        }));
    }
}

/// Namespace of a child element named `tag` of `parent`.
fn child_namespace(parent: &Element, tag: &str) -> Namespace {
    if tag.eq_ignore_ascii_case("svg") {
        return Namespace::Svg;
    }
    if tag.eq_ignore_ascii_case("math") {
        return Namespace::MathMl;
    }
    match parent.namespace {
        Namespace::Svg if parent.tag != "foreignObject" => Namespace::Svg,
        Namespace::MathMl if parent.tag != "annotation-xml" => Namespace::MathMl,
        _ => Namespace::Html,
    }
}

/// Scan a start tag at `<`, leaving the scanner after `>`.
fn scan_start_tag<'a>(scanner: &mut Scanner<'a>, directives: bool) -> ScannedTag<'a> {
    let start = scanner.pos();
    scanner.consume("<");
    let name = scanner.read_tag_name();
    let mut attributes = Vec::new();
    let mut variables = Vec::new();
    let mut has_v_pre = false;
    let mut self_closing = false;

    loop {
        scanner.skip_whitespace();
        if scanner.is_eof() {
            break;
        }
        if scanner.consume("/>") {
            self_closing = true;
            break;
        }
        if scanner.consume(">") {
            break;
        }
        if scanner.consume("/") {
            continue;
        }

        let name_start = scanner.pos();
        let attr_name = scanner.read_attr_name();
        if attr_name.is_empty() {
            // A quote or `=` where a name should be.
            scanner.next_char();
            continue;
        }
        let name_end = scanner.pos();

        let mut value = None;
        let before_equals = scanner.pos();
        scanner.skip_whitespace();
        if scanner.consume("=") {
            scanner.skip_whitespace();
            let value_start = scanner.pos();
            value = match scanner.read_quoted() {
                Some((text, _closed)) => Some(RawValue {
                    text,
                    text_start: value_start + 1,
                    span: scanner.span_from(value_start),
                }),
                None => {
                    let text = scanner.read_unquoted_value();
                    Some(RawValue {
                        text,
                        text_start: value_start,
                        span: scanner.span_from(value_start),
                    })
                }
            };
        } else {
            scanner.reset(before_equals);
        }

        let end = value.map_or(name_end, |v: RawValue<'_>| v.span.end as usize);
        let raw = RawAttribute {
            name: attr_name,
            name_start,
            value,
            span: Span::new(name_start as u32, end as u32),
        };
        if directives && attr_name == "v-pre" {
            has_v_pre = true;
        }
        let built = build_attribute(raw, directives, name);
        attributes.push(built.attribute);
        variables.extend(built.variables);
    }

    ScannedTag {
        name,
        start_tag: StartTag {
            span: scanner.span_from(start),
            self_closing,
            attributes,
        },
        variables,
        has_v_pre,
    }
}
