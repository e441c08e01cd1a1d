//! Expression trees for bound values.

use smol_str::SmolStr;
use source_text::Span;

/// A JavaScript expression inside a directive value or interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this is a bare identifier.
    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, ExpressionKind::Identifier(_))
    }

    /// Whether this is a member access (`a.b`, `a[b]`).
    pub fn is_member(&self) -> bool {
        matches!(self.kind, ExpressionKind::Member { .. })
    }

    /// The identifier name, if this is one.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// The `v-for` expression, if this is one.
    pub fn as_for(&self) -> Option<&ForExpression> {
        match &self.kind {
            ExpressionKind::VFor(expr) => Some(expr),
            _ => None,
        }
    }
}

/// Kinds of expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Identifier(SmolStr),
    Literal(Literal),
    /// A template literal; `expressions` are the `${}` substitutions.
    Template {
        expressions: Vec<Expression>,
    },
    /// `[a, , b]`; `None` marks a hole.
    Array(Vec<Option<Expression>>),
    /// `{ a, b: c, ...d }`; entries are `Property` or `Spread`.
    Object(Vec<Expression>),
    /// One entry of an object literal.
    Property {
        key: Box<Expression>,
        value: Box<Expression>,
        computed: bool,
        shorthand: bool,
    },
    Spread(Box<Expression>),
    Member {
        object: Box<Expression>,
        property: Box<Expression>,
        computed: bool,
        optional: bool,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        optional: bool,
    },
    New {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Unary {
        operator: &'static str,
        argument: Box<Expression>,
    },
    Update {
        operator: &'static str,
        prefix: bool,
        argument: Box<Expression>,
    },
    Binary {
        operator: &'static str,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logical {
        operator: &'static str,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    Assignment {
        operator: &'static str,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Sequence(Vec<Expression>),
    Arrow {
        params: Vec<Expression>,
        body: Box<Expression>,
    },
    /// The special `v-for` grammar.
    VFor(ForExpression),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

/// `<alias>[, <key>][, <index>] in <iterable>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForExpression {
    /// Alias slots in order. The length is the number of slots the grammar
    /// declared; `None` marks a declared but empty slot (`in list`,
    /// `(a, ) in list`).
    pub left: Vec<Option<Expression>>,
    /// The iterated expression.
    pub right: Box<Expression>,
}

impl ForExpression {
    /// The value alias, if not empty.
    pub fn alias(&self) -> Option<&Expression> {
        self.left.first().and_then(Option::as_ref)
    }

    /// The key slot: `None` if not declared, `Some(None)` if declared empty.
    pub fn key(&self) -> Option<Option<&Expression>> {
        self.left.get(1).map(Option::as_ref)
    }

    /// The index slot: `None` if not declared, `Some(None)` if declared empty.
    pub fn index(&self) -> Option<Option<&Expression>> {
        self.left.get(2).map(Option::as_ref)
    }
}
