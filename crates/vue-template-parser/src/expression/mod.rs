//! Bound-expression parsing.
//!
//! Every directive value and interpolation goes through [`parse_value`],
//! which picks the grammar for the directive and always produces a
//! container: syntax errors are recorded in it rather than returned.

mod parser;
mod references;
mod token;

use parser::{PResult, Parser};
use source_text::Span;
use token::{tokenize, Tok, Token};
use vue_template_ast::{
    Expression, ExpressionContainer, ExpressionKind, ForExpression, Identifier, Reference,
    SyntaxError,
};

/// Which grammar a value is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grammar {
    /// A single expression (`v-if`, `v-bind`, `{{ }}`...).
    Expression,
    /// `<alias> in <expression>`.
    VFor,
    /// `;`-separated statements of an event handler.
    Handler,
    /// Slot parameters (`v-slot`, `slot-scope`).
    SlotParams,
}

/// A container plus the variables its directive declares.
#[derive(Debug)]
pub(crate) struct ParsedValue {
    pub container: ExpressionContainer,
    pub variables: Vec<Identifier>,
}

/// Parse `text`, located at `offset` in the file, with `grammar`.
pub(crate) fn parse_value(grammar: Grammar, text: &str, offset: u32) -> ParsedValue {
    let span = Span::new(offset, offset + text.len() as u32);
    if text.trim().is_empty() {
        return ParsedValue {
            container: ExpressionContainer::empty(span),
            variables: Vec::new(),
        };
    }

    let result = match grammar {
        Grammar::Expression => parse_plain(text, offset),
        Grammar::VFor => parse_v_for(text, offset),
        Grammar::Handler => parse_handler(text, offset),
        Grammar::SlotParams => parse_slot_params(text, offset),
    };

    match result {
        Ok(Parsed {
            expression,
            references,
            variables,
        }) => ParsedValue {
            container: ExpressionContainer::with_expression(
                expression,
                references
                    .into_iter()
                    .map(|id| Reference { id, variable: None })
                    .collect(),
                span,
            ),
            variables,
        },
        Err(error) => {
            tracing::trace!(error = %error.message, start = error.span.start, "syntax error in bound value");
            ParsedValue {
                container: ExpressionContainer::with_syntax_error(error, span),
                variables: Vec::new(),
            }
        }
    }
}

struct Parsed {
    expression: Expression,
    references: Vec<Identifier>,
    variables: Vec<Identifier>,
}

impl Parsed {
    fn from_expression(expression: Expression) -> Self {
        let references = references::free_references(&expression);
        Self {
            expression,
            references,
            variables: Vec::new(),
        }
    }
}

fn parse_plain(text: &str, offset: u32) -> PResult<Parsed> {
    Parser::new(text, offset)?
        .parse_complete()
        .map(Parsed::from_expression)
}

fn parse_handler(text: &str, offset: u32) -> PResult<Parsed> {
    Parser::new(text, offset)?
        .parse_statements()
        .map(Parsed::from_expression)
}

fn parse_slot_params(text: &str, offset: u32) -> PResult<Parsed> {
    let mut params = Parser::new(text, offset)?.parse_params_complete()?;
    let mut variables = Vec::new();
    let mut references = Vec::new();
    for param in &params {
        references::binding_names(param, &mut variables);
        references.extend(references::pattern_references(param));
    }
    let expression = if params.len() == 1 {
        params.remove(0)
    } else {
        let span = params[0].span.merge(params[params.len() - 1].span);
        Expression::new(ExpressionKind::Sequence(params), span)
    };
    Ok(Parsed {
        expression,
        references,
        variables,
    })
}

/// Parse the `v-for` grammar.
///
/// The first `in` or `of` outside any bracket splits aliases from the
/// iterated expression. A value without one is parsed as an ordinary
/// expression, which callers report as a grammar violation.
fn parse_v_for(text: &str, offset: u32) -> PResult<Parsed> {
    let tokens = tokenize(text, offset)?;
    let source_of = |tok: &Tok| token_text(text, offset, tok);

    let mut depth = 0i32;
    let mut split = None;
    for (i, tok) in tokens.iter().enumerate() {
        match (tok.kind, source_of(tok)) {
            (Token::Punct, "(" | "[" | "{") => depth += 1,
            (Token::Punct, ")" | "]" | "}") => depth -= 1,
            (Token::Ident, "in" | "of") if depth == 0 => {
                split = Some(i);
                break;
            }
            _ => {}
        }
    }

    let Some(split) = split else {
        return Parser::from_tokens(text, offset, tokens)
            .parse_complete()
            .map(Parsed::from_expression);
    };

    let rhs = tokens[split + 1..].to_vec();
    let Some(last) = rhs.last().copied() else {
        return Err(SyntaxError::new(
            "Unexpected end of expression",
            Span::empty(tokens[split].span.end),
        ));
    };
    let right = Parser::from_tokens(text, offset, rhs).parse_complete()?;

    let lhs = &tokens[..split];
    let inner = strip_parens(lhs, text, offset);
    let mut left = Vec::new();
    if inner.is_empty() {
        left.push(None);
    } else {
        for group in split_top_level_commas(inner, text, offset) {
            if group.is_empty() {
                left.push(None);
            } else {
                let pattern =
                    Parser::from_tokens(text, offset, group.to_vec()).parse_pattern_complete()?;
                left.push(Some(pattern));
            }
        }
    }

    let mut variables = Vec::new();
    let mut references = Vec::new();
    for pattern in left.iter().flatten() {
        references::binding_names(pattern, &mut variables);
        references.extend(references::pattern_references(pattern));
    }
    references.extend(references::free_references(&right));

    let start = tokens.first().map_or(offset, |tok| tok.span.start);
    let span = Span::new(start, last.span.end);
    Ok(Parsed {
        expression: Expression::new(
            ExpressionKind::VFor(ForExpression {
                left,
                right: Box::new(right),
            }),
            span,
        ),
        references,
        variables,
    })
}

fn token_text<'s>(text: &'s str, offset: u32, tok: &Tok) -> &'s str {
    &text[(tok.span.start - offset) as usize..(tok.span.end - offset) as usize]
}

/// `( a, b )` → `a, b` when the parentheses wrap the whole alias list.
fn strip_parens<'t>(tokens: &'t [Tok], text: &str, offset: u32) -> &'t [Tok] {
    let source_of = |tok: &Tok| token_text(text, offset, tok);
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return tokens;
    };
    if tokens.len() < 2 || source_of(first) != "(" || source_of(last) != ")" {
        return tokens;
    }
    let mut depth = 0i32;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != Token::Punct {
            continue;
        }
        match source_of(tok) {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => {
                depth -= 1;
                if depth == 0 && i != tokens.len() - 1 {
                    return tokens;
                }
            }
            _ => {}
        }
    }
    &tokens[1..tokens.len() - 1]
}

fn split_top_level_commas<'t>(tokens: &'t [Tok], text: &str, offset: u32) -> Vec<&'t [Tok]> {
    let source_of = |tok: &Tok| token_text(text, offset, tok);
    let mut groups = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != Token::Punct {
            continue;
        }
        match source_of(tok) {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth -= 1,
            "," if depth == 0 => {
                groups.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = &tokens[start..];
    if groups.is_empty() || !last.is_empty() {
        groups.push(last);
    }
    groups
}
