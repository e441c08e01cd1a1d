//! Queries over the template tree shared by lint rules.

use crate::ast::*;

impl StartTag {
    /// All directive attributes.
    pub fn directives(&self) -> impl Iterator<Item = &DirectiveAttribute> {
        self.attributes.iter().filter_map(Attribute::as_directive)
    }

    /// The first directive named `name` (without `v-`).
    pub fn directive(&self, name: &str) -> Option<&DirectiveAttribute> {
        self.directives().find(|d| d.key.name == name)
    }

    /// Whether a directive named `name` is present.
    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }

    /// The first directive named `name` whose static argument is `arg`.
    pub fn directive_with_arg(&self, name: &str, arg: &str) -> Option<&DirectiveAttribute> {
        self.directives().find(|d| {
            d.key.name == name
                && d.key
                    .argument
                    .as_ref()
                    .and_then(DirectiveArgument::as_static)
                    == Some(arg)
        })
    }

    /// Whether `v-name:arg` is present.
    pub fn has_directive_with_arg(&self, name: &str, arg: &str) -> bool {
        self.directive_with_arg(name, arg).is_some()
    }

    /// The first plain attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&PlainAttribute> {
        self.attributes
            .iter()
            .filter_map(Attribute::as_plain)
            .find(|a| a.name == name)
    }

    /// Whether a plain attribute named `name` exists, optionally with the
    /// given literal value.
    pub fn has_attribute(&self, name: &str, value: Option<&str>) -> bool {
        self.attribute(name).is_some_and(|attr| match value {
            None => true,
            Some(expected) => attr.value.as_ref().is_some_and(|v| v.value == expected),
        })
    }
}

impl DirectiveAttribute {
    /// Whether the directive carries a value that is either a parsed
    /// expression or a syntax error.
    pub fn has_value(&self) -> bool {
        self.value
            .as_ref()
            .is_some_and(|v| !matches!(v.content, ContainerContent::Empty))
    }
}

/// The nearest element sibling before `id`, skipping text and comments.
pub fn prev_sibling(ast: &TemplateAst, id: ElementId) -> Option<ElementId> {
    let parent = ast.element(id).parent?;
    let mut prev = None;
    for child in &ast.element(parent).children {
        if let Node::Element(child_id) = child {
            if *child_id == id {
                return prev;
            }
            prev = Some(*child_id);
        }
    }
    None
}

/// Whether the previous element sibling carries `v-if` or `v-else-if`.
pub fn prev_element_has_if(ast: &TemplateAst, id: ElementId) -> bool {
    prev_sibling(ast, id).is_some_and(|prev| {
        let start_tag = &ast.element(prev).start_tag;
        start_tag.has_directive("if") || start_tag.has_directive("else-if")
    })
}

/// Whether `id` is a direct child of the template body.
pub fn is_root_element(ast: &TemplateAst, id: ElementId) -> bool {
    ast.element(id).parent == Some(ElementId::BODY)
}

/// Whether `container` references a `v-for` variable declared on `element`.
pub fn uses_iteration_variable(container: &ExpressionContainer, element: &Element) -> bool {
    container.references.iter().any(|reference| {
        element
            .variables
            .iter()
            .any(|variable| variable.kind == VariableKind::VFor && variable.id.name == reference.id.name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use source_text::Span;

    fn directive(name: &str, arg: Option<&str>) -> Attribute {
        Attribute::Directive(DirectiveAttribute {
            key: DirectiveKey {
                name: name.into(),
                argument: arg.map(|a| DirectiveArgument::Static {
                    name: a.into(),
                    span: Span::default(),
                }),
                modifiers: Vec::new(),
                raw: name.into(),
                span: Span::default(),
            },
            value: None,
            span: Span::default(),
        })
    }

    fn element(tag: &str, attributes: Vec<Attribute>) -> Element {
        Element::new(
            tag,
            Namespace::Html,
            StartTag {
                attributes,
                ..Default::default()
            },
        )
    }

    fn push_child(ast: &mut TemplateAst, parent: ElementId, mut el: Element) -> ElementId {
        el.parent = Some(parent);
        let id = ast.alloc(el);
        ast.element_mut(parent).children.push(Node::Element(id));
        id
    }

    fn text(value: &str) -> Node {
        Node::Text(Text {
            value: value.into(),
            span: Span::default(),
        })
    }

    #[test]
    fn test_prev_sibling_skips_text() {
        let mut ast = TemplateAst::new(element("template", Vec::new()));
        let a = push_child(&mut ast, ElementId::BODY, element("div", vec![directive("if", None)]));
        ast.element_mut(ElementId::BODY).children.push(text("\n  "));
        let b = push_child(&mut ast, ElementId::BODY, element("div", vec![directive("else", None)]));

        assert_eq!(prev_sibling(&ast, a), None);
        assert_eq!(prev_sibling(&ast, b), Some(a));
        assert!(prev_element_has_if(&ast, b));
        assert!(!prev_element_has_if(&ast, a));
        assert!(is_root_element(&ast, a));
        assert_eq!(prev_sibling(&ast, ElementId::BODY), None);
    }

    #[test]
    fn test_nested_element_is_not_root() {
        let mut ast = TemplateAst::new(element("template", Vec::new()));
        let root = push_child(&mut ast, ElementId::BODY, element("div", Vec::new()));
        let inner = push_child(&mut ast, root, element("span", Vec::new()));
        assert!(!is_root_element(&ast, inner));
        assert_eq!(ast.child_elements(root).count(), 1);
        assert_eq!(ast.parent(inner).map(|p| p.id), Some(root));
    }

    #[test]
    fn test_directive_lookup() {
        let tag = StartTag {
            attributes: vec![
                directive("bind", Some("key")),
                Attribute::Plain(PlainAttribute {
                    name: "type".into(),
                    value: Some(AttributeValue {
                        value: "file".into(),
                        span: Span::default(),
                    }),
                    span: Span::default(),
                }),
            ],
            ..Default::default()
        };
        assert!(tag.has_directive("bind"));
        assert!(tag.has_directive_with_arg("bind", "key"));
        assert!(!tag.has_directive_with_arg("bind", "type"));
        assert!(tag.has_attribute("type", None));
        assert!(tag.has_attribute("type", Some("file")));
        assert!(!tag.has_attribute("type", Some("text")));
    }

    #[test]
    fn test_has_value() {
        let Attribute::Directive(mut attr) = directive("for", None) else {
            unreachable!()
        };
        assert!(!attr.has_value());
        attr.value = Some(ExpressionContainer::empty(Span::default()));
        assert!(!attr.has_value());
        attr.value = Some(ExpressionContainer::with_syntax_error(
            SyntaxError::new("Unexpected end of expression", Span::default()),
            Span::default(),
        ));
        assert!(attr.has_value());
    }

    #[test]
    fn test_uses_iteration_variable() {
        let ident = |name: &str| Identifier {
            name: name.into(),
            span: Span::default(),
        };
        let mut el = element("li", Vec::new());
        el.variables.push(ScopeVariable {
            id: ident("item"),
            kind: VariableKind::VFor,
        });
        el.variables.push(ScopeVariable {
            id: ident("props"),
            kind: VariableKind::Scope,
        });

        let mut container = ExpressionContainer::empty(Span::default());
        container.references.push(Reference {
            id: ident("props"),
            variable: None,
        });
        assert!(!uses_iteration_variable(&container, &el));

        container.references.push(Reference {
            id: ident("item"),
            variable: None,
        });
        assert!(uses_iteration_variable(&container, &el));
    }
}
