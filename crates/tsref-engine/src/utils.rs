//! Small syntactic predicates shared by the search phases.

use tsref_model::{ModifierFlags, NodeIndex, NodeKind, Program};

/// `x` in `const { x } = o` (no `property:` part, object pattern).
pub fn is_object_binding_element_without_property_name(program: &Program, node: NodeIndex) -> bool {
    match program.kind(node) {
        Some(NodeKind::BindingElement { property_name, .. }) => {
            property_name.is_none()
                && matches!(
                    program.kind(program.parent(node)),
                    Some(NodeKind::ObjectBindingPattern { .. })
                )
        }
        _ => false,
    }
}

/// `C` in `new C()`.
pub fn is_new_expression_target(program: &Program, node: NodeIndex) -> bool {
    matches!(
        program.kind(program.parent(node)),
        Some(NodeKind::NewExpression { expression, .. }) if *expression == node
    )
}

/// `f` in `f()`.
pub fn is_call_expression_target(program: &Program, node: NodeIndex) -> bool {
    matches!(
        program.kind(program.parent(node)),
        Some(NodeKind::CallExpression { expression, .. }) if *expression == node
    )
}

/// `x` in `o.x`.
pub fn is_right_side_of_property_access(program: &Program, node: NodeIndex) -> bool {
    matches!(
        program.kind(program.parent(node)),
        Some(NodeKind::PropertyAccessExpression { name, .. }) if *name == node
    )
}

/// `L` in `break L` or `continue L`.
pub fn is_jump_statement_target(program: &Program, node: NodeIndex) -> bool {
    matches!(
        program.kind(program.parent(node)),
        Some(NodeKind::BreakStatement { label } | NodeKind::ContinueStatement { label })
            if *label == node
    )
}

/// `L` in `L: for (..) ..`.
pub fn is_label_of_labeled_statement(program: &Program, node: NodeIndex) -> bool {
    matches!(
        program.kind(program.parent(node)),
        Some(NodeKind::LabeledStatement { label, .. }) if *label == node
    )
}

/// A string or numeric literal used as a property name, or as the argument
/// of an element access (`o["x"]`).
pub fn is_literal_name_of_property_declaration_or_index_access(
    program: &Program,
    node: NodeIndex,
) -> bool {
    let parent = program.parent(node);
    match program.kind(parent) {
        Some(NodeKind::ElementAccessExpression { argument, .. }) => *argument == node,
        Some(
            NodeKind::PropertyAssignment { .. }
            | NodeKind::PropertyDeclaration { .. }
            | NodeKind::PropertySignature { .. }
            | NodeKind::MethodDeclaration { .. }
            | NodeKind::MethodSignature { .. }
            | NodeKind::EnumMember { .. }
            | NodeKind::GetAccessor { .. }
            | NodeKind::SetAccessor { .. },
        ) => program.declaration_of_name(node) == Some(parent),
        _ => false,
    }
}

/// A module specifier of an import/export declaration or `import()` call.
pub fn is_module_specifier_like(program: &Program, node: NodeIndex) -> bool {
    match program.kind(program.parent(node)) {
        Some(
            NodeKind::ImportDeclaration {
                module_specifier, ..
            }
            | NodeKind::ExportDeclaration {
                module_specifier, ..
            },
        ) => *module_specifier == node,
        Some(NodeKind::ImportCall { argument }) => *argument == node,
        _ => false,
    }
}

/// The object literal element whose name is `node`.
pub fn containing_object_literal_element(program: &Program, node: NodeIndex) -> Option<NodeIndex> {
    let element = program.declaration_of_name(node)?;
    let is_element = matches!(
        program.kind(element),
        Some(
            NodeKind::PropertyAssignment { .. }
                | NodeKind::ShorthandPropertyAssignment { .. }
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::GetAccessor { .. }
                | NodeKind::SetAccessor { .. }
        )
    );
    let in_literal = matches!(
        program.kind(program.parent(element)),
        Some(NodeKind::ObjectLiteralExpression { .. })
    );
    (is_element && in_literal).then_some(element)
}

/// A method written inside an object literal.
pub fn is_object_literal_method(program: &Program, node: NodeIndex) -> bool {
    matches!(program.kind(node), Some(NodeKind::MethodDeclaration { .. }))
        && matches!(
            program.kind(program.parent(node)),
            Some(NodeKind::ObjectLiteralExpression { .. })
        )
}

/// Whether the node or an ancestor is `declare`d.
pub fn is_in_ambient_context(program: &Program, node: NodeIndex) -> bool {
    std::iter::once(node)
        .chain(program.ancestors(node))
        .any(|n| program.effective_modifiers(n).contains(ModifierFlags::AMBIENT))
}

pub fn has_effective_modifier(program: &Program, node: NodeIndex, flag: ModifierFlags) -> bool {
    program.effective_modifiers(node).contains(flag)
}

/// `"name"` -> `name`; other text is returned unchanged.
pub fn strip_quotes(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return &name[1..name.len() - 1];
        }
    }
    name
}

/// Statements of a file root.
pub fn file_statements(program: &Program, root: NodeIndex) -> &[NodeIndex] {
    match program.kind(root) {
        Some(NodeKind::SourceFile { statements }) => statements,
        _ => &[],
    }
}
