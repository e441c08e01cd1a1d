//! Tree types for Vue templates.

use crate::expression::Expression;
use smol_str::SmolStr;
use source_text::Span;

/// A parsed file as seen by lint rules.
#[derive(Debug, Clone)]
pub struct Program {
    /// The full source text of the file.
    pub source: String,
    /// The `<template>` body, if the file has one.
    pub template_body: Option<TemplateAst>,
    services: Option<TemplateServices>,
}

impl Program {
    /// A program produced by a template-aware parser.
    pub fn new(source: impl Into<String>, template_body: Option<TemplateAst>) -> Self {
        Self {
            source: source.into(),
            template_body,
            services: Some(TemplateServices { _private: () }),
        }
    }

    /// A program produced without template support.
    ///
    /// Template-body traversal is unavailable for such programs.
    pub fn foreign(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            template_body: None,
            services: None,
        }
    }

    /// The template traversal capability, if the parser provided it.
    pub fn template_services(&self) -> Option<&TemplateServices> {
        self.services.as_ref()
    }
}

/// Marker proving that template-body traversal is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateServices {
    _private: (),
}

/// Index of an element inside a [`TemplateAst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// The id of the template body element.
    pub const BODY: ElementId = ElementId(0);

    /// Position of the element in its tree's arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The element tree of one `<template>` block.
///
/// Elements live in an arena indexed by [`ElementId`]. Element 0 is the
/// `<template>` element itself (the body); its children are the template
/// root candidates. Parents own their children through `Node::Element`
/// ids; `Element::parent` is a plain back index.
#[derive(Debug, Clone)]
pub struct TemplateAst {
    elements: Vec<Element>,
}

impl TemplateAst {
    /// Create a tree containing only the body element.
    ///
    /// The body's id and parent are overwritten.
    pub fn new(mut body: Element) -> Self {
        body.id = ElementId::BODY;
        body.parent = None;
        Self {
            elements: vec![body],
        }
    }

    /// Add an element to the arena and return its id.
    ///
    /// The caller links it into its parent's `children`.
    pub fn alloc(&mut self, mut element: Element) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        element.id = id;
        self.elements.push(element);
        id
    }

    /// The `<template>` body element.
    pub fn body(&self) -> &Element {
        &self.elements[0]
    }

    /// Look up an element.
    ///
    /// Ids are only minted by [`TemplateAst::alloc`], so indexing is in
    /// bounds for ids from this tree.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    /// Mutable access for tree builders.
    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.index()]
    }

    /// The parent element, if any.
    pub fn parent(&self, id: ElementId) -> Option<&Element> {
        self.element(id).parent.map(|p| self.element(p))
    }

    /// Element children of `id`, in document order.
    pub fn child_elements(&self, id: ElementId) -> impl Iterator<Item = &Element> + '_ {
        self.element(id).children.iter().filter_map(move |child| match child {
            Node::Element(child_id) => Some(self.element(*child_id)),
            _ => None,
        })
    }

    /// All elements in allocation order, which is start-tag order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter()
    }

    /// Number of elements, body included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the arena holds only the body.
    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    /// The source span of the whole `<template>` element.
    pub fn span(&self) -> Span {
        self.body().span
    }
}

/// An element node.
#[derive(Debug, Clone)]
pub struct Element {
    /// Arena id, assigned by [`TemplateAst`].
    pub id: ElementId,
    /// The tag name as written.
    pub tag: SmolStr,
    /// Namespace the element was parsed in.
    pub namespace: Namespace,
    /// The start tag with its attributes.
    pub start_tag: StartTag,
    /// Span of the end tag, if one was written.
    pub end_tag: Option<Span>,
    /// Child nodes, in document order.
    pub children: Vec<Node>,
    /// Enclosing element (None only for the body).
    pub parent: Option<ElementId>,
    /// Variables this element introduces to its subtree.
    pub variables: Vec<ScopeVariable>,
    /// Source span from `<` of the start tag to the end of the element.
    pub span: Span,
}

impl Element {
    /// Create an element without children.
    pub fn new(tag: impl Into<SmolStr>, namespace: Namespace, start_tag: StartTag) -> Self {
        let span = start_tag.span;
        Self {
            id: ElementId::BODY,
            tag: tag.into(),
            namespace,
            start_tag,
            end_tag: None,
            children: Vec::new(),
            parent: None,
            variables: Vec::new(),
            span,
        }
    }
}

/// Markup namespace of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

/// A child of an element.
#[derive(Debug, Clone)]
pub enum Node {
    /// A nested element.
    Element(ElementId),
    /// Raw text.
    Text(Text),
    /// A mustache interpolation (`{{ expr }}`).
    Interpolation(ExpressionContainer),
    /// An HTML comment.
    Comment(Comment),
}

impl Node {
    /// Source span of this node, when it is not an element.
    ///
    /// Element spans live in the arena; use [`TemplateAst::element`].
    pub fn inline_span(&self) -> Option<Span> {
        match self {
            Node::Element(_) => None,
            Node::Text(text) => Some(text.span),
            Node::Interpolation(container) => Some(container.span),
            Node::Comment(comment) => Some(comment.span),
        }
    }
}

/// A text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Text as written; entities are not decoded.
    pub value: String,
    /// Source span.
    pub span: Span,
}

/// A comment node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Text between `<!--` and `-->`.
    pub value: String,
    /// Source span.
    pub span: Span,
}

/// The start tag of an element.
#[derive(Debug, Clone, Default)]
pub struct StartTag {
    /// Source span from `<` to `>` inclusive.
    pub span: Span,
    /// Whether the tag was written `<tag/>`.
    pub self_closing: bool,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
}

/// An attribute: either plain or a directive, never both.
#[derive(Debug, Clone)]
pub enum Attribute {
    Plain(PlainAttribute),
    Directive(DirectiveAttribute),
}

impl Attribute {
    /// Source span of the whole attribute.
    pub fn span(&self) -> Span {
        match self {
            Attribute::Plain(attr) => attr.span,
            Attribute::Directive(attr) => attr.span,
        }
    }

    /// The directive, if this is one.
    pub fn as_directive(&self) -> Option<&DirectiveAttribute> {
        match self {
            Attribute::Directive(attr) => Some(attr),
            Attribute::Plain(_) => None,
        }
    }

    /// The plain attribute, if this is one.
    pub fn as_plain(&self) -> Option<&PlainAttribute> {
        match self {
            Attribute::Plain(attr) => Some(attr),
            Attribute::Directive(_) => None,
        }
    }
}

/// A plain `name="value"` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainAttribute {
    /// Attribute name as written.
    pub name: SmolStr,
    /// Literal value, if one was given.
    pub value: Option<AttributeValue>,
    /// Source span.
    pub span: Span,
}

/// A literal attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    /// Value with quotes removed.
    pub value: String,
    /// Span of the value, quotes included.
    pub span: Span,
}

/// A directive attribute (`v-*`, `:`, `@`, `#`).
#[derive(Debug, Clone)]
pub struct DirectiveAttribute {
    /// Name, argument and modifiers.
    pub key: DirectiveKey,
    /// The bound value, if the attribute has `=`.
    pub value: Option<ExpressionContainer>,
    /// Source span of the whole attribute.
    pub span: Span,
}

/// The key part of a directive attribute.
#[derive(Debug, Clone)]
pub struct DirectiveKey {
    /// Directive name without the `v-` prefix (`for`, `bind`, `model`...).
    pub name: SmolStr,
    /// The argument after `:`.
    pub argument: Option<DirectiveArgument>,
    /// Modifiers after `.`, in order.
    pub modifiers: Vec<SmolStr>,
    /// The attribute name as written (`v-bind:key`, `:key`...).
    pub raw: SmolStr,
    /// Source span of the attribute name.
    pub span: Span,
}

/// A directive argument.
#[derive(Debug, Clone)]
pub enum DirectiveArgument {
    /// A static argument (`v-bind:foo`).
    Static { name: SmolStr, span: Span },
    /// A dynamic argument (`v-bind:[foo]`).
    Dynamic(ExpressionContainer),
}

impl DirectiveArgument {
    /// The argument as a static name, if it is one.
    pub fn as_static(&self) -> Option<&str> {
        match self {
            DirectiveArgument::Static { name, .. } => Some(name.as_str()),
            DirectiveArgument::Dynamic(_) => None,
        }
    }

    /// Source span of the argument.
    pub fn span(&self) -> Span {
        match self {
            DirectiveArgument::Static { span, .. } => *span,
            DirectiveArgument::Dynamic(container) => container.span,
        }
    }
}

/// A bound-expression container.
#[derive(Debug, Clone)]
pub struct ExpressionContainer {
    /// What the container holds.
    pub content: ContainerContent,
    /// Free identifiers used by the expression.
    pub references: Vec<Reference>,
    /// Source span of the container (value without quotes, or `{{ }}`).
    pub span: Span,
}

impl ExpressionContainer {
    /// A container holding a parsed expression.
    pub fn with_expression(expression: Expression, references: Vec<Reference>, span: Span) -> Self {
        Self {
            content: ContainerContent::Expression(expression),
            references,
            span,
        }
    }

    /// A container whose value failed to parse.
    pub fn with_syntax_error(error: SyntaxError, span: Span) -> Self {
        Self {
            content: ContainerContent::SyntaxError(error),
            references: Vec::new(),
            span,
        }
    }

    /// A container with no usable value (e.g. `v-if=""`).
    pub fn empty(span: Span) -> Self {
        Self {
            content: ContainerContent::Empty,
            references: Vec::new(),
            span,
        }
    }

    /// The parsed expression, if any.
    pub fn expression(&self) -> Option<&Expression> {
        match &self.content {
            ContainerContent::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    /// The syntax error, if the value failed to parse.
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match &self.content {
            ContainerContent::SyntaxError(err) => Some(err),
            _ => None,
        }
    }
}

/// Content of an [`ExpressionContainer`].
#[derive(Debug, Clone)]
pub enum ContainerContent {
    Expression(Expression),
    SyntaxError(SyntaxError),
    Empty,
}

/// A syntax error found while parsing a bound expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable message, without trailing period.
    pub message: String,
    /// Location of the error.
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: SmolStr,
    pub span: Span,
}

/// A variable introduced on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeVariable {
    /// The declared identifier.
    pub id: Identifier,
    /// What introduced it.
    pub kind: VariableKind,
}

/// The directive that introduced a [`ScopeVariable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// An alias, key or index of `v-for`.
    VFor,
    /// A slot-scope binding (`v-slot`, `slot-scope`, `scope`).
    Scope,
}

/// A free identifier used inside a bound expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The identifier as written.
    pub id: Identifier,
    /// The scope variable it resolves to, nearest enclosing scope first.
    pub variable: Option<VariableRef>,
}

/// Points at `ast.element(element).variables[index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableRef {
    pub element: ElementId,
    pub index: usize,
}
