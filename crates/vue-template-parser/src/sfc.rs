//! Top-level block scan of a single-file component.

use crate::error::{ParseError, ParseResult};
use crate::html::TreeBuilder;
use crate::scanner::Scanner;
use vue_template_ast::TemplateAst;

/// Find and parse the top-level `<template>` block.
///
/// Returns `None` when the file has no template or the template is written
/// in a language other than HTML (`lang="pug"`...). Other blocks are
/// skipped as raw text.
pub(crate) fn parse_template_block(source: &str) -> ParseResult<Option<TemplateAst>> {
    let mut scanner = Scanner::new(source);
    let mut found: Option<Option<TemplateAst>> = None;

    loop {
        scanner.consume_until("<");
        if scanner.is_eof() {
            break;
        }
        if scanner.starts_with("<!--") {
            scanner.read_comment();
            continue;
        }
        if scanner.starts_with("</") || scanner.starts_with("<!") || scanner.starts_with("<?") {
            scanner.consume_until(">");
            scanner.consume(">");
            continue;
        }

        let start = scanner.pos();
        scanner.consume("<");
        if !scanner.at_tag_name_start() {
            continue;
        }
        let name = scanner.read_tag_name();

        if name.eq_ignore_ascii_case("template") {
            if found.is_some() {
                return Err(ParseError::duplicate_block(
                    "template",
                    scanner.span_from(start),
                ));
            }
            let (ast, end) = TreeBuilder::parse_block(source, start)?;
            scanner.reset(end);

            let lang = ast
                .body()
                .start_tag
                .attribute("lang")
                .and_then(|attr| attr.value.as_ref())
                .map(|value| value.value.as_str());
            match lang {
                Some(lang) if !lang.eq_ignore_ascii_case("html") => {
                    tracing::debug!(lang, "skipping template in a foreign language");
                    found = Some(None);
                }
                _ => found = Some(Some(ast)),
            }
            continue;
        }

        // `<script>`, `<style>` and custom blocks: skip the start tag, the
        // raw content and the end tag.
        let self_closing = scanner.consume_until(">").ends_with('/');
        scanner.consume(">");
        if !self_closing {
            scanner.read_raw_text(name);
            scanner.consume_until(">");
            scanner.consume(">");
        }
    }

    Ok(found.flatten())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_template() {
        assert!(parse_template_block("").unwrap().is_none());
        assert!(parse_template_block("<script>export default {}</script>")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_template_after_script() {
        let source = "<script>const a = '<template>'</script>\n<template><div/></template>";
        let ast = parse_template_block(source).unwrap().unwrap();
        assert_eq!(ast.child_elements(vue_template_ast::ElementId::BODY).count(), 1);
        assert_eq!(ast.span().start, 40);
    }

    #[test]
    fn test_nested_template_does_not_end_block() {
        let source = "<template><div><template v-if=\"a\"><p/></template></div></template>";
        let ast = parse_template_block(source).unwrap().unwrap();
        assert_eq!(ast.span().end as usize, source.len());
        assert_eq!(ast.len(), 4);
    }

    #[test]
    fn test_foreign_language_template() {
        let source = "<template lang=\"pug\">div</template>";
        assert!(parse_template_block(source).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_template() {
        let source = "<template><div/></template>\n<template><p/></template>";
        let err = parse_template_block(source).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateBlock);
        assert_eq!(err.span.start, 28);
    }

    #[test]
    fn test_unclosed_template() {
        let err = parse_template_block("<template><div>").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnclosedBlock);
    }

    #[test]
    fn test_comment_before_template() {
        let source = "<!-- <template> -->\n<template><div/></template>";
        let ast = parse_template_block(source).unwrap().unwrap();
        assert_eq!(ast.span().start, 20);
    }
}
