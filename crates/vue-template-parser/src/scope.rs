//! Reference resolution against element scope variables.

use vue_template_ast::{
    Attribute, DirectiveArgument, ElementId, ExpressionContainer, TemplateAst, VariableRef,
};

/// Directives whose value declares variables on their own element.
const DECLARING_DIRECTIVES: &[&str] = &["for", "slot", "slot-scope", "scope"];

/// Resolve every container of `id`'s start tag.
///
/// A declaring directive cannot see its own declarations
/// (`v-for="item in item.children"` iterates the outer `item`); every other
/// container on the element can.
pub(crate) fn resolve_start_tag(ast: &mut TemplateAst, id: ElementId) {
    let mut start_tag = std::mem::take(&mut ast.element_mut(id).start_tag);
    for attribute in &mut start_tag.attributes {
        let Attribute::Directive(directive) = attribute else {
            continue;
        };
        if let Some(DirectiveArgument::Dynamic(container)) = &mut directive.key.argument {
            resolve_container(ast, id, true, container);
        }
        let declares = DECLARING_DIRECTIVES.contains(&directive.key.name.as_str());
        if let Some(container) = &mut directive.value {
            resolve_container(ast, id, !declares, container);
        }
    }
    ast.element_mut(id).start_tag = start_tag;
}

/// Link each reference of `container` to the nearest variable of the same
/// name, starting at `owner` (or its parent when `include_owner` is false)
/// and walking up the ancestor chain.
pub(crate) fn resolve_container(
    ast: &TemplateAst,
    owner: ElementId,
    include_owner: bool,
    container: &mut ExpressionContainer,
) {
    for reference in &mut container.references {
        let mut current = if include_owner {
            Some(owner)
        } else {
            ast.element(owner).parent
        };
        while let Some(id) = current {
            let element = ast.element(id);
            if let Some(index) = element
                .variables
                .iter()
                .rposition(|variable| variable.id.name == reference.id.name)
            {
                reference.variable = Some(VariableRef { element: id, index });
                break;
            }
            current = element.parent;
        }
    }
}
