//! Tokens of the template expression grammar.

use logos::Logos;
use source_text::Span;
use vue_template_ast::SyntaxError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum Token {
    #[regex(r"[\p{ID_Start}_$][\p{ID_Continue}$\x{200C}\x{200D}]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"0[oO][0-7_]+")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    #[regex(r"`([^`\\]|\\.)*`")]
    Template,

    #[token("(")]
    #[token(")")]
    #[token("[")]
    #[token("]")]
    #[token("{")]
    #[token("}")]
    #[token(",")]
    #[token(";")]
    #[token(":")]
    #[token(".")]
    #[token("...")]
    #[token("?")]
    #[token("?.")]
    #[token("??")]
    #[token("??=")]
    #[token("=>")]
    #[token("=")]
    #[token("==")]
    #[token("===")]
    #[token("!")]
    #[token("!=")]
    #[token("!==")]
    #[token("<")]
    #[token("<=")]
    #[token("<<")]
    #[token("<<=")]
    #[token(">")]
    #[token(">=")]
    #[token(">>")]
    #[token(">>=")]
    #[token(">>>")]
    #[token(">>>=")]
    #[token("+")]
    #[token("+=")]
    #[token("++")]
    #[token("-")]
    #[token("-=")]
    #[token("--")]
    #[token("*")]
    #[token("*=")]
    #[token("**")]
    #[token("**=")]
    #[token("/")]
    #[token("/=")]
    #[token("%")]
    #[token("%=")]
    #[token("&")]
    #[token("&=")]
    #[token("&&")]
    #[token("&&=")]
    #[token("|")]
    #[token("|=")]
    #[token("||")]
    #[token("||=")]
    #[token("^")]
    #[token("^=")]
    #[token("~")]
    Punct,
}

/// A lexed token with its absolute span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tok {
    pub kind: Token,
    pub span: Span,
}

/// Tokenize `text`, whose first byte sits at `offset` in the file.
pub(crate) fn tokenize(text: &str, offset: u32) -> Result<Vec<Tok>, SyntaxError> {
    let mut tokens = Vec::new();
    for (result, range) in Token::lexer(text).spanned() {
        let span = Span::from_range(range.clone()).offset_by(offset);
        match result {
            Ok(kind) => tokens.push(Tok { kind, span }),
            Err(()) => {
                let rest = &text[range.start..];
                let message = match rest.chars().next() {
                    Some('"' | '\'') => "Unterminated string constant".to_string(),
                    Some('`') => "Unterminated template".to_string(),
                    Some(c) => format!("Unexpected character '{}'", c),
                    None => "Unexpected end of expression".to_string(),
                };
                return Err(SyntaxError::new(message, span));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<(Token, &str)> {
        tokenize(text, 0)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, &text[t.span.to_range()]))
            .collect()
    }

    #[test]
    fn test_longest_punctuator_wins() {
        assert_eq!(
            kinds("a === b?.c ?? d"),
            vec![
                (Token::Ident, "a"),
                (Token::Punct, "==="),
                (Token::Ident, "b"),
                (Token::Punct, "?."),
                (Token::Ident, "c"),
                (Token::Punct, "??"),
                (Token::Ident, "d"),
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"1.5e3 0xff 'a\'b' "c" `t${x}`"#),
            vec![
                (Token::Number, "1.5e3"),
                (Token::Number, "0xff"),
                (Token::String, r"'a\'b'"),
                (Token::String, "\"c\""),
                (Token::Template, "`t${x}`"),
            ]
        );
    }

    #[test]
    fn test_offsets_are_absolute() {
        let tokens = tokenize("  foo", 10).unwrap();
        assert_eq!(tokens[0].span, Span::new(12, 15));
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("a # b", 4).unwrap_err();
        assert_eq!(err.message, "Unexpected character '#'");
        assert_eq!(err.span.start, 6);
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(
            kinds("café + größe.ñ $x _y\u{200C}z"),
            vec![
                (Token::Ident, "café"),
                (Token::Punct, "+"),
                (Token::Ident, "größe"),
                (Token::Punct, "."),
                (Token::Ident, "ñ"),
                (Token::Ident, "$x"),
                (Token::Ident, "_y\u{200C}z"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("'abc", 0).unwrap_err();
        assert_eq!(err.message, "Unterminated string constant");
    }
}
