//! Precedence-climbing parser for bound expressions.

use super::token::{tokenize, Tok, Token};
use smol_str::SmolStr;
use source_text::Span;
use vue_template_ast::{Expression, ExpressionKind, Literal, SyntaxError};

pub(crate) type PResult<T> = Result<T, SyntaxError>;

/// Binary operators with their binding power. Higher binds tighter.
const BINARY_OPERATORS: &[(&str, u8)] = &[
    ("??", 1),
    ("||", 2),
    ("&&", 3),
    ("|", 4),
    ("^", 5),
    ("&", 6),
    ("==", 7),
    ("!=", 7),
    ("===", 7),
    ("!==", 7),
    ("<", 8),
    (">", 8),
    ("<=", 8),
    (">=", 8),
    ("in", 8),
    ("instanceof", 8),
    ("<<", 9),
    (">>", 9),
    (">>>", 9),
    ("+", 10),
    ("-", 10),
    ("*", 11),
    ("/", 11),
    ("%", 11),
    ("**", 12),
];

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

/// Deepest recursion accepted before giving up with a syntax error.
const MAX_NESTING: u32 = 64;

/// Most binary, member and call nodes one expression may fold.
const MAX_FOLDS: u32 = 1024;

const PREFIX_OPERATORS: &[&str] = &["!", "-", "+", "~", "typeof", "void", "delete"];

/// Words that can never be an identifier reference.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
    "instanceof", "new", "return", "super", "switch", "throw", "try", "typeof", "var", "void",
    "while", "with", "yield",
];

pub(crate) struct Parser<'a> {
    source: &'a str,
    offset: u32,
    tokens: Vec<Tok>,
    pos: usize,
    depth: u32,
    folds: u32,
}

impl<'a> Parser<'a> {
    /// Tokenize `source`, whose first byte sits at `offset` in the file.
    pub(crate) fn new(source: &'a str, offset: u32) -> PResult<Self> {
        let tokens = tokenize(source, offset)?;
        Ok(Self::from_tokens(source, offset, tokens))
    }

    /// Parse a subrange of an already tokenized `source`.
    pub(crate) fn from_tokens(source: &'a str, offset: u32, tokens: Vec<Tok>) -> Self {
        Self {
            source,
            offset,
            tokens,
            pos: 0,
            depth: 0,
            folds: 0,
        }
    }

    /// Parse the input as exactly one expression.
    pub(crate) fn parse_complete(mut self) -> PResult<Expression> {
        let expr = self.parse_expression()?;
        self.finish()?;
        Ok(expr)
    }

    /// Parse the input as exactly one binding pattern.
    pub(crate) fn parse_pattern_complete(mut self) -> PResult<Expression> {
        let pattern = self.parse_binding_element()?;
        self.finish()?;
        Ok(pattern)
    }

    /// Parse `;`-separated expression statements, as written in event
    /// handlers. A single statement is returned as is.
    pub(crate) fn parse_statements(mut self) -> PResult<Expression> {
        let first = self.peek();
        let mut items = Vec::new();
        loop {
            while self.eat(";") {}
            if self.at_end() {
                break;
            }
            items.push(self.parse_expression()?);
            if !self.at_end() && !self.eat(";") {
                return Err(self.unexpected());
            }
        }
        match items.len() {
            0 => Err(match first {
                Some(tok) => self.unexpected_token(tok),
                None => self.end_of_input(),
            }),
            1 => Ok(items.remove(0)),
            _ => {
                let span = items[0].span.merge(items[items.len() - 1].span);
                Ok(Expression::new(ExpressionKind::Sequence(items), span))
            }
        }
    }

    /// Parse a comma-separated parameter list without parentheses.
    pub(crate) fn parse_params_complete(mut self) -> PResult<Vec<Expression>> {
        let mut params = Vec::new();
        while !self.at_end() {
            params.push(self.parse_binding_element()?);
            if !self.at_end() {
                self.expect(",")?;
            }
        }
        self.finish()?;
        Ok(params)
    }

    // -- token helpers ------------------------------------------------------

    fn text(&self, tok: Tok) -> &'a str {
        let start = (tok.span.start - self.offset) as usize;
        let end = (tok.span.end - self.offset) as usize;
        &self.source[start..end]
    }

    fn peek(&self) -> Option<Tok> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<Tok> {
        self.tokens.get(self.pos + n).copied()
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.peek()?;
        self.pos += 1;
        Some(tok)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn is_punct_tok(&self, tok: Tok, punct: &str) -> bool {
        tok.kind == Token::Punct && self.text(tok) == punct
    }

    fn is_punct(&self, punct: &str) -> bool {
        self.peek().is_some_and(|tok| self.is_punct_tok(tok, punct))
    }

    fn is_chain_continuation(&self) -> bool {
        [".", "?.", "[", "("].iter().any(|punct| self.is_punct(punct))
    }

    fn is_word(&self, word: &str) -> bool {
        self.peek()
            .is_some_and(|tok| tok.kind == Token::Ident && self.text(tok) == word)
    }

    fn eat(&mut self, punct: &str) -> bool {
        if self.is_punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &str) -> PResult<Tok> {
        match self.peek() {
            Some(tok) if self.is_punct_tok(tok, punct) => {
                self.pos += 1;
                Ok(tok)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn finish(&self) -> PResult<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn end_of_input(&self) -> SyntaxError {
        let end = self
            .tokens
            .last()
            .map_or(self.offset + self.source.len() as u32, |tok| tok.span.end);
        SyntaxError::new("Unexpected end of expression", Span::empty(end))
    }

    fn unexpected_token(&self, tok: Tok) -> SyntaxError {
        SyntaxError::new(format!("Unexpected token '{}'", self.text(tok)), tok.span)
    }

    fn too_deep(&self) -> SyntaxError {
        let span = self
            .peek()
            .map_or_else(|| self.end_of_input().span, |tok| tok.span);
        SyntaxError::new("Expression nested too deeply", span)
    }

    fn fold(&mut self) -> PResult<()> {
        if self.folds >= MAX_FOLDS {
            return Err(self.too_deep());
        }
        self.folds += 1;
        Ok(())
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn unexpected(&self) -> SyntaxError {
        match self.peek() {
            Some(tok) => self.unexpected_token(tok),
            None => self.end_of_input(),
        }
    }

    /// Index of the token closing the bracket at `open`.
    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, tok) in self.tokens.iter().enumerate().skip(open) {
            if tok.kind != Token::Punct {
                continue;
            }
            match self.text(*tok) {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    // -- expressions --------------------------------------------------------

    fn parse_expression(&mut self) -> PResult<Expression> {
        let first = self.parse_assignment()?;
        if !self.is_punct(",") {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(",") {
            items.push(self.parse_assignment()?);
        }
        let span = items[0].span.merge(items[items.len() - 1].span);
        Ok(Expression::new(ExpressionKind::Sequence(items), span))
    }

    fn parse_assignment(&mut self) -> PResult<Expression> {
        self.nested(Self::parse_assignment_unguarded)
    }

    fn parse_assignment_unguarded(&mut self) -> PResult<Expression> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }

        let left = self.parse_conditional()?;
        let Some(tok) = self.peek() else {
            return Ok(left);
        };
        if tok.kind != Token::Punct {
            return Ok(left);
        }
        let text = self.text(tok);
        let Some(operator) = ASSIGNMENT_OPERATORS.iter().copied().find(|op| *op == text) else {
            return Ok(left);
        };

        let valid_target = left.is_identifier()
            || left.is_member()
            || (operator == "="
                && matches!(
                    left.kind,
                    ExpressionKind::Array(_) | ExpressionKind::Object(_)
                ));
        if !valid_target || left.as_identifier() == Some("this") {
            return Err(SyntaxError::new(
                "Invalid left-hand side in assignment",
                left.span,
            ));
        }

        self.bump();
        let right = self.parse_assignment()?;
        let span = left.span.merge(right.span);
        Ok(Expression::new(
            ExpressionKind::Assignment {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    fn try_parse_arrow(&mut self) -> PResult<Option<Expression>> {
        let Some(first) = self.peek() else {
            return Ok(None);
        };

        let params = if first.kind == Token::Ident
            && self
                .peek_nth(1)
                .is_some_and(|tok| self.is_punct_tok(tok, "=>"))
        {
            let name = self.text(first);
            if RESERVED_WORDS.contains(&name) {
                return Err(self.unexpected_token(first));
            }
            self.bump();
            vec![Expression::new(
                ExpressionKind::Identifier(SmolStr::new(name)),
                first.span,
            )]
        } else if self.is_punct_tok(first, "(") {
            let Some(close) = self.matching_close(self.pos) else {
                return Ok(None);
            };
            let is_arrow = self
                .tokens
                .get(close + 1)
                .is_some_and(|tok| self.is_punct_tok(*tok, "=>"));
            if !is_arrow {
                return Ok(None);
            }
            self.bump();
            let mut params = Vec::new();
            while !self.eat(")") {
                params.push(self.parse_binding_element()?);
                if !self.is_punct(")") {
                    self.expect(",")?;
                }
            }
            params
        } else {
            return Ok(None);
        };

        self.expect("=>")?;
        let body = if self.is_punct("{") {
            self.parse_block_body()?
        } else {
            self.parse_assignment()?
        };
        let span = first.span.merge(body.span);
        Ok(Some(Expression::new(
            ExpressionKind::Arrow {
                params,
                body: Box::new(body),
            },
            span,
        )))
    }

    /// `{ a(); return b }` as a sequence of its expression statements.
    fn parse_block_body(&mut self) -> PResult<Expression> {
        let open = self.expect("{")?;
        let mut items = Vec::new();
        loop {
            while self.eat(";") {}
            if let Some(close) = self.peek().filter(|tok| self.is_punct_tok(*tok, "}")) {
                self.bump();
                return Ok(Expression::new(
                    ExpressionKind::Sequence(items),
                    open.span.merge(close.span),
                ));
            }
            if self.is_word("return") {
                self.bump();
                if self.eat(";") || self.is_punct("}") {
                    continue;
                }
            }
            items.push(self.parse_expression()?);
            if !self.is_punct("}") {
                self.expect(";")?;
            }
        }
    }

    /// A binding pattern with an optional default or rest prefix.
    fn parse_binding_element(&mut self) -> PResult<Expression> {
        if let Some(dots) = self.peek().filter(|tok| self.is_punct_tok(*tok, "...")) {
            self.bump();
            let argument = self.nested(Self::parse_binding_element)?;
            let span = dots.span.merge(argument.span);
            return Ok(Expression::new(
                ExpressionKind::Spread(Box::new(argument)),
                span,
            ));
        }
        let pattern = self.parse_assignment()?;
        if !is_binding_pattern(&pattern) {
            return Err(SyntaxError::new("Invalid binding pattern", pattern.span));
        }
        Ok(pattern)
    }

    fn parse_conditional(&mut self) -> PResult<Expression> {
        let test = self.parse_binary(1)?;
        if !self.eat("?") {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(":")?;
        let alternate = self.parse_assignment()?;
        let span = test.span.merge(alternate.span);
        Ok(Expression::new(
            ExpressionKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    fn binary_operator(&self, tok: Tok) -> Option<(&'static str, u8)> {
        let text = self.text(tok);
        match tok.kind {
            Token::Punct => {}
            Token::Ident if text == "in" || text == "instanceof" => {}
            _ => return None,
        }
        BINARY_OPERATORS
            .iter()
            .copied()
            .find(|(op, _)| *op == text)
    }

    fn parse_binary(&mut self, min_power: u8) -> PResult<Expression> {
        let mut left = self.parse_unary()?;
        while let Some(tok) = self.peek() {
            let Some((operator, power)) = self.binary_operator(tok) else {
                break;
            };
            if power < min_power {
                break;
            }
            self.fold()?;
            self.bump();
            let next_min = if operator == "**" { power } else { power + 1 };
            let right = self.nested(|parser| parser.parse_binary(next_min))?;
            let span = left.span.merge(right.span);
            let (left_box, right_box) = (Box::new(left), Box::new(right));
            let kind = if matches!(operator, "??" | "||" | "&&") {
                ExpressionKind::Logical {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            } else {
                ExpressionKind::Binary {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            };
            left = Expression::new(kind, span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expression> {
        let Some(tok) = self.peek() else {
            return Err(self.end_of_input());
        };
        let text = self.text(tok);

        if matches!(tok.kind, Token::Punct | Token::Ident) {
            if let Some(operator) = PREFIX_OPERATORS.iter().copied().find(|op| *op == text) {
                let is_word_operator = operator.chars().all(|c| c.is_ascii_alphabetic());
                if (tok.kind == Token::Ident) == is_word_operator {
                    self.bump();
                    let argument = self.nested(Self::parse_unary)?;
                    let span = tok.span.merge(argument.span);
                    return Ok(Expression::new(
                        ExpressionKind::Unary {
                            operator,
                            argument: Box::new(argument),
                        },
                        span,
                    ));
                }
            }
        }

        if tok.kind == Token::Punct && (text == "++" || text == "--") {
            self.bump();
            let argument = self.nested(Self::parse_unary)?;
            check_update_target(&argument)?;
            let span = tok.span.merge(argument.span);
            return Ok(Expression::new(
                ExpressionKind::Update {
                    operator: if text == "++" { "++" } else { "--" },
                    prefix: true,
                    argument: Box::new(argument),
                },
                span,
            ));
        }

        let expr = self.parse_call_member()?;
        if let Some(tok) = self.peek() {
            let text = self.text(tok);
            if tok.kind == Token::Punct && (text == "++" || text == "--") {
                check_update_target(&expr)?;
                self.bump();
                let span = expr.span.merge(tok.span);
                return Ok(Expression::new(
                    ExpressionKind::Update {
                        operator: if text == "++" { "++" } else { "--" },
                        prefix: false,
                        argument: Box::new(expr),
                    },
                    span,
                ));
            }
        }
        Ok(expr)
    }

    fn parse_call_member(&mut self) -> PResult<Expression> {
        let mut expr = if self.is_word("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            if self.is_chain_continuation() {
                self.fold()?;
            }
            if self.eat(".") {
                let property = self.parse_property_name()?;
                expr = member(expr, property, false, false);
            } else if self.eat("?.") {
                if self.is_punct("(") {
                    let (arguments, end) = self.parse_arguments()?;
                    let span = expr.span.merge(end);
                    expr = Expression::new(
                        ExpressionKind::Call {
                            callee: Box::new(expr),
                            arguments,
                            optional: true,
                        },
                        span,
                    );
                } else if self.eat("[") {
                    let property = self.parse_expression()?;
                    let close = self.expect("]")?;
                    expr = member_with_end(expr, property, true, true, close.span);
                } else {
                    let property = self.parse_property_name()?;
                    expr = member(expr, property, false, true);
                }
            } else if self.eat("[") {
                let property = self.parse_expression()?;
                let close = self.expect("]")?;
                expr = member_with_end(expr, property, true, false, close.span);
            } else if self.is_punct("(") {
                let (arguments, end) = self.parse_arguments()?;
                let span = expr.span.merge(end);
                expr = Expression::new(
                    ExpressionKind::Call {
                        callee: Box::new(expr),
                        arguments,
                        optional: false,
                    },
                    span,
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_new(&mut self) -> PResult<Expression> {
        let new = self.bump().ok_or_else(|| self.end_of_input())?;
        let mut callee = if self.is_word("new") {
            self.nested(Self::parse_new)?
        } else {
            self.parse_primary()?
        };
        loop {
            if self.eat(".") {
                let property = self.parse_property_name()?;
                callee = member(callee, property, false, false);
            } else if self.eat("[") {
                let property = self.parse_expression()?;
                let close = self.expect("]")?;
                callee = member_with_end(callee, property, true, false, close.span);
            } else {
                break;
            }
        }
        let (arguments, end) = if self.is_punct("(") {
            self.parse_arguments()?
        } else {
            (Vec::new(), callee.span)
        };
        Ok(Expression::new(
            ExpressionKind::New {
                callee: Box::new(callee),
                arguments,
            },
            new.span.merge(end),
        ))
    }

    /// A property name after `.`; keywords are allowed.
    fn parse_property_name(&mut self) -> PResult<Expression> {
        match self.peek() {
            Some(tok) if tok.kind == Token::Ident => {
                self.bump();
                Ok(Expression::new(
                    ExpressionKind::Identifier(SmolStr::new(self.text(tok))),
                    tok.span,
                ))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `( args )`, returning the arguments and the span of `)`.
    fn parse_arguments(&mut self) -> PResult<(Vec<Expression>, Span)> {
        self.expect("(")?;
        let mut arguments = Vec::new();
        loop {
            if let Some(close) = self.peek().filter(|tok| self.is_punct_tok(*tok, ")")) {
                self.bump();
                return Ok((arguments, close.span));
            }
            arguments.push(self.parse_spread_or_assignment()?);
            if !self.is_punct(")") {
                self.expect(",")?;
            }
        }
    }

    fn parse_spread_or_assignment(&mut self) -> PResult<Expression> {
        if let Some(dots) = self.peek().filter(|tok| self.is_punct_tok(*tok, "...")) {
            self.bump();
            let argument = self.parse_assignment()?;
            let span = dots.span.merge(argument.span);
            return Ok(Expression::new(
                ExpressionKind::Spread(Box::new(argument)),
                span,
            ));
        }
        self.parse_assignment()
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        let Some(tok) = self.peek() else {
            return Err(self.end_of_input());
        };
        let text = self.text(tok);
        match tok.kind {
            Token::Ident => {
                let kind = match text {
                    "true" => ExpressionKind::Literal(Literal::Boolean(true)),
                    "false" => ExpressionKind::Literal(Literal::Boolean(false)),
                    "null" => ExpressionKind::Literal(Literal::Null),
                    _ if RESERVED_WORDS.contains(&text) => {
                        return Err(self.unexpected_token(tok));
                    }
                    _ => ExpressionKind::Identifier(SmolStr::new(text)),
                };
                self.bump();
                Ok(Expression::new(kind, tok.span))
            }
            Token::Number => {
                self.bump();
                let value = parse_number(text)
                    .ok_or_else(|| SyntaxError::new("Invalid number", tok.span))?;
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::Number(value)),
                    tok.span,
                ))
            }
            Token::String => {
                self.bump();
                let value = unescape(&text[1..text.len() - 1]);
                Ok(Expression::new(
                    ExpressionKind::Literal(Literal::String(value)),
                    tok.span,
                ))
            }
            Token::Template => {
                self.bump();
                self.parse_template(tok)
            }
            Token::Punct => match text {
                "(" => {
                    self.bump();
                    let inner = self.parse_expression()?;
                    self.expect(")")?;
                    Ok(inner)
                }
                "[" => self.parse_array(),
                "{" => self.parse_object(),
                _ => Err(self.unexpected_token(tok)),
            },
        }
    }

    fn parse_array(&mut self) -> PResult<Expression> {
        let open = self.expect("[")?;
        let mut elements = Vec::new();
        loop {
            if let Some(close) = self.peek().filter(|tok| self.is_punct_tok(*tok, "]")) {
                self.bump();
                return Ok(Expression::new(
                    ExpressionKind::Array(elements),
                    open.span.merge(close.span),
                ));
            }
            if self.eat(",") {
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_spread_or_assignment()?));
            if !self.is_punct("]") {
                self.expect(",")?;
            }
        }
    }

    fn parse_object(&mut self) -> PResult<Expression> {
        let open = self.expect("{")?;
        let mut properties = Vec::new();
        loop {
            if let Some(close) = self.peek().filter(|tok| self.is_punct_tok(*tok, "}")) {
                self.bump();
                return Ok(Expression::new(
                    ExpressionKind::Object(properties),
                    open.span.merge(close.span),
                ));
            }
            properties.push(self.parse_object_member()?);
            if !self.is_punct("}") {
                self.expect(",")?;
            }
        }
    }

    fn parse_object_member(&mut self) -> PResult<Expression> {
        if self.is_punct("...") {
            return self.parse_spread_or_assignment();
        }

        let Some(tok) = self.bump() else {
            return Err(self.end_of_input());
        };
        let (key, computed) = match tok.kind {
            Token::Ident => (
                Expression::new(
                    ExpressionKind::Identifier(SmolStr::new(self.text(tok))),
                    tok.span,
                ),
                false,
            ),
            Token::String => {
                let text = self.text(tok);
                (
                    Expression::new(
                        ExpressionKind::Literal(Literal::String(unescape(
                            &text[1..text.len() - 1],
                        ))),
                        tok.span,
                    ),
                    false,
                )
            }
            Token::Number => {
                let value = parse_number(self.text(tok))
                    .ok_or_else(|| SyntaxError::new("Invalid number", tok.span))?;
                (
                    Expression::new(ExpressionKind::Literal(Literal::Number(value)), tok.span),
                    false,
                )
            }
            Token::Punct if self.text(tok) == "[" => {
                let key = self.parse_assignment()?;
                self.expect("]")?;
                (key, true)
            }
            _ => return Err(self.unexpected_token(tok)),
        };

        if self.eat(":") {
            let value = self.parse_assignment()?;
            let span = tok.span.merge(value.span);
            return Ok(property(key, value, computed, false, span));
        }

        let shorthand_name = match &key.kind {
            ExpressionKind::Identifier(name)
                if !computed && !RESERVED_WORDS.contains(&name.as_str()) =>
            {
                Some(name.clone())
            }
            _ => None,
        };
        let Some(name) = shorthand_name else {
            return Err(self.unexpected());
        };
        let mut value = Expression::new(ExpressionKind::Identifier(name), key.span);
        if self.eat("=") {
            // `{ a = 1 }` is only meaningful as a destructuring pattern.
            let default = self.parse_assignment()?;
            let span = value.span.merge(default.span);
            value = Expression::new(
                ExpressionKind::Assignment {
                    operator: "=",
                    left: Box::new(value),
                    right: Box::new(default),
                },
                span,
            );
        }
        let span = key.span.merge(value.span);
        Ok(property(key, value, false, true, span))
    }

    fn parse_template(&mut self, tok: Tok) -> PResult<Expression> {
        let text = self.text(tok);
        let base = tok.span.start;
        let mut expressions = Vec::new();
        let bytes = text.as_bytes();
        let mut i = 1;
        while i + 1 < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'$' if bytes[i + 1] == b'{' => {
                    let start = i + 2;
                    let end = find_substitution_end(text, start).ok_or_else(|| {
                        SyntaxError::new("Unterminated template", tok.span)
                    })?;
                    let inner = &text[start..end];
                    let mut parser = Parser::new(inner, base + start as u32)?;
                    if self.depth >= MAX_NESTING {
                        return Err(self.too_deep());
                    }
                    parser.depth = self.depth + 1;
                    expressions.push(parser.parse_complete()?);
                    i = end + 1;
                }
                _ => i += 1,
            }
        }
        Ok(Expression::new(
            ExpressionKind::Template { expressions },
            tok.span,
        ))
    }
}

fn member(object: Expression, property: Expression, computed: bool, optional: bool) -> Expression {
    let end = property.span;
    member_with_end(object, property, computed, optional, end)
}

fn member_with_end(
    object: Expression,
    property: Expression,
    computed: bool,
    optional: bool,
    end: Span,
) -> Expression {
    let span = object.span.merge(end);
    Expression::new(
        ExpressionKind::Member {
            object: Box::new(object),
            property: Box::new(property),
            computed,
            optional,
        },
        span,
    )
}

fn property(
    key: Expression,
    value: Expression,
    computed: bool,
    shorthand: bool,
    span: Span,
) -> Expression {
    Expression::new(
        ExpressionKind::Property {
            key: Box::new(key),
            value: Box::new(value),
            computed,
            shorthand,
        },
        span,
    )
}

fn check_update_target(expr: &Expression) -> PResult<()> {
    if (expr.is_identifier() && expr.as_identifier() != Some("this")) || expr.is_member() {
        Ok(())
    } else {
        Err(SyntaxError::new(
            "Invalid left-hand side expression in update operation",
            expr.span,
        ))
    }
}

/// Whether `expr` can appear where a binding is declared.
pub(crate) fn is_binding_pattern(expr: &Expression) -> bool {
    match &expr.kind {
        ExpressionKind::Identifier(name) => {
            name != "this" && !RESERVED_WORDS.contains(&name.as_str())
        }
        ExpressionKind::Array(elements) => elements.iter().flatten().all(is_binding_pattern),
        ExpressionKind::Object(properties) => properties.iter().all(|p| match &p.kind {
            ExpressionKind::Property { value, .. } => is_binding_pattern(value),
            ExpressionKind::Spread(argument) => argument.is_identifier(),
            _ => false,
        }),
        ExpressionKind::Spread(argument) => is_binding_pattern(argument),
        ExpressionKind::Assignment {
            operator: "=",
            left,
            ..
        } => is_binding_pattern(left),
        _ => false,
    }
}

/// Byte index of the `}` closing a `${` substitution that starts at `start`.
fn find_substitution_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
        } else {
            match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' if depth == 0 => return Some(i),
                b'}' => depth -= 1,
                _ => {}
            }
        }
        i += 1;
    }
    None
}

fn parse_number(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0b" | "0B") => 2,
        Some("0o" | "0O") => 8,
        _ => return digits.parse().ok(),
    };
    u64::from_str_radix(&digits[2..], radix)
        .ok()
        .map(|value| value as f64)
}

/// Decode the escapes of a string literal body.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('\n') => {}
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                {
                    out.push(decoded);
                }
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                {
                    out.push(decoded);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> PResult<Expression> {
        Parser::new(text, 0)?.parse_complete()
    }

    fn ident(name: &str, start: u32) -> Expression {
        Expression::new(
            ExpressionKind::Identifier(name.into()),
            Span::new(start, start + name.len() as u32),
        )
    }

    #[test]
    fn test_identifier_and_member() {
        assert_eq!(parse("foo").unwrap(), ident("foo", 0));

        let expr = parse("a.b[c]").unwrap();
        assert!(expr.is_member());
        assert_eq!(expr.span, Span::new(0, 6));
        let ExpressionKind::Member { object, computed, .. } = &expr.kind else {
            unreachable!()
        };
        assert!(*computed);
        assert!(object.is_member());
    }

    #[test]
    fn test_precedence() {
        let expr = parse("a + b * c").unwrap();
        let ExpressionKind::Binary { operator, right, .. } = &expr.kind else {
            panic!("expected binary, got {:?}", expr.kind);
        };
        assert_eq!(*operator, "+");
        assert!(matches!(right.kind, ExpressionKind::Binary { operator: "*", .. }));
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let expr = parse("a ** b ** c").unwrap();
        let ExpressionKind::Binary { left, right, .. } = &expr.kind else {
            unreachable!()
        };
        assert!(left.is_identifier());
        assert!(matches!(right.kind, ExpressionKind::Binary { operator: "**", .. }));
    }

    #[test]
    fn test_logical_and_conditional() {
        let expr = parse("a && b ? c : d || e").unwrap();
        let ExpressionKind::Conditional { test, alternate, .. } = &expr.kind else {
            unreachable!()
        };
        assert!(matches!(test.kind, ExpressionKind::Logical { operator: "&&", .. }));
        assert!(matches!(alternate.kind, ExpressionKind::Logical { operator: "||", .. }));
    }

    #[test]
    fn test_calls_and_optional_chaining() {
        let expr = parse("foo?.bar(1, ...rest)").unwrap();
        let ExpressionKind::Call { callee, arguments, .. } = &expr.kind else {
            unreachable!()
        };
        assert!(matches!(callee.kind, ExpressionKind::Member { optional: true, .. }));
        assert_eq!(arguments.len(), 2);
        assert!(matches!(arguments[1].kind, ExpressionKind::Spread(_)));
    }

    #[test]
    fn test_assignment_targets() {
        assert!(parse("a = 1").is_ok());
        assert!(parse("a.b += 1").is_ok());
        let err = parse("a + b = 1").unwrap_err();
        assert_eq!(err.message, "Invalid left-hand side in assignment");
        assert_eq!(err.span, Span::new(0, 5));
    }

    #[test]
    fn test_arrow_functions() {
        let expr = parse("(a, { b }) => a + b").unwrap();
        let ExpressionKind::Arrow { params, body } = &expr.kind else {
            unreachable!()
        };
        assert_eq!(params.len(), 2);
        assert!(matches!(body.kind, ExpressionKind::Binary { .. }));

        let expr = parse("x => { foo(x); return x }").unwrap();
        let ExpressionKind::Arrow { body, .. } = &expr.kind else {
            unreachable!()
        };
        assert!(matches!(&body.kind, ExpressionKind::Sequence(items) if items.len() == 2));
    }

    #[test]
    fn test_parenthesized_is_not_arrow() {
        let expr = parse("(a, b)").unwrap();
        assert!(matches!(expr.kind, ExpressionKind::Sequence(_)));
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            parse("'a\\nb'").unwrap().kind,
            ExpressionKind::Literal(Literal::String("a\nb".into()))
        );
        assert_eq!(
            parse("0x10").unwrap().kind,
            ExpressionKind::Literal(Literal::Number(16.0))
        );
        assert_eq!(
            parse("1_000").unwrap().kind,
            ExpressionKind::Literal(Literal::Number(1000.0))
        );
        assert_eq!(
            parse("null").unwrap().kind,
            ExpressionKind::Literal(Literal::Null)
        );
    }

    #[test]
    fn test_objects_and_arrays() {
        let expr = parse("{ a, 'b': 1, [c]: d, ...e }").unwrap();
        let ExpressionKind::Object(properties) = &expr.kind else {
            unreachable!()
        };
        assert_eq!(properties.len(), 4);
        assert!(matches!(
            properties[0].kind,
            ExpressionKind::Property { shorthand: true, .. }
        ));
        assert!(matches!(
            properties[2].kind,
            ExpressionKind::Property { computed: true, .. }
        ));

        let expr = parse("[a, , b]").unwrap();
        assert!(matches!(&expr.kind, ExpressionKind::Array(items) if items[1].is_none()));
    }

    #[test]
    fn test_template_substitutions() {
        let expr = parse("`a${b + c}d${e}`").unwrap();
        let ExpressionKind::Template { expressions } = &expr.kind else {
            unreachable!()
        };
        assert_eq!(expressions.len(), 2);
        assert_eq!(expressions[1], ident("e", 13));
    }

    #[test]
    fn test_new_and_unary() {
        assert!(matches!(
            parse("new Date(1)").unwrap().kind,
            ExpressionKind::New { .. }
        ));
        assert!(matches!(
            parse("typeof a === 'string'").unwrap().kind,
            ExpressionKind::Binary { operator: "===", .. }
        ));
        assert!(matches!(
            parse("!a").unwrap().kind,
            ExpressionKind::Unary { operator: "!", .. }
        ));
        assert!(matches!(
            parse("i++").unwrap().kind,
            ExpressionKind::Update { prefix: false, .. }
        ));
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse("a b c").unwrap_err();
        assert_eq!(err.message, "Unexpected token 'b'");
        assert_eq!(err.span, Span::new(2, 3));

        let err = parse("a +").unwrap_err();
        assert_eq!(err.message, "Unexpected end of expression");
        assert_eq!(err.span, Span::empty(3));

        let err = parse("function () {}").unwrap_err();
        assert_eq!(err.message, "Unexpected token 'function'");

        assert!(parse("1++").is_err());
    }

    #[test]
    fn test_statements() {
        let parser = Parser::new("a++; b()", 0).unwrap();
        let expr = parser.parse_statements().unwrap();
        assert!(matches!(&expr.kind, ExpressionKind::Sequence(items) if items.len() == 2));

        let parser = Parser::new("onClick", 0).unwrap();
        assert!(parser.parse_statements().unwrap().is_identifier());
    }

    #[test]
    fn test_params() {
        let parser = Parser::new("{ item }, index", 0).unwrap();
        let params = parser.parse_params_complete().unwrap();
        assert_eq!(params.len(), 2);

        let parser = Parser::new("a + b", 0).unwrap();
        assert_eq!(
            parser.parse_params_complete().unwrap_err().message,
            "Invalid binding pattern"
        );
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&nested(50)).unwrap().is_identifier());

        let err = parse(&nested(200)).unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");

        let err = parse(&format!("{}x", "!".repeat(200))).unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");

        let err = parse(&format!("{}x", "a ** ".repeat(200))).unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");
    }

    #[test]
    fn test_fold_limit() {
        assert!(parse(&format!("a{}", " + a".repeat(500))).is_ok());

        let err = parse(&format!("a{}", " + a".repeat(2000))).unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");

        let err = parse(&format!("a{}", ".b".repeat(2000))).unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");
    }
}
