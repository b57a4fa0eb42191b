//! Syntax tree storage.
//!
//! Every file of a program shares one [`NodeArena`]. Nodes are referenced by
//! dense [`NodeIndex`] values and carry their parent link, owning file and
//! syntactic modifiers. The node taxonomy is a single sum type, [`NodeKind`],
//! whose variants hold typed child slots; [`NodeKind::children`] is the one
//! place that enumerates them.

use crate::position::TextSpan;
use bitflags::bitflags;
use serde::Serialize;

/// Index of a node in the program-wide [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Sentinel for an absent child slot or a missing parent.
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }

    /// `Some(self)` unless this is the sentinel.
    #[inline]
    pub fn some(self) -> Option<NodeIndex> {
        if self.is_none() { None } else { Some(self) }
    }
}

/// Index of a source file within a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

bitflags! {
    /// Syntactic modifiers attached to a declaration.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u16 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const STATIC = 1 << 2;
        const PRIVATE = 1 << 3;
        const PROTECTED = 1 << 4;
        const PUBLIC = 1 << 5;
        const ABSTRACT = 1 << 6;
        const READONLY = 1 << 7;
        /// `declare` or inside an ambient context.
        const AMBIENT = 1 << 8;
    }
}

/// Built-in type keywords that may appear where a type name is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKeyword {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
    Object,
}

impl TypeKeyword {
    pub fn text(self) -> &'static str {
        match self {
            TypeKeyword::Any => "any",
            TypeKeyword::Unknown => "unknown",
            TypeKeyword::Never => "never",
            TypeKeyword::Void => "void",
            TypeKeyword::Undefined => "undefined",
            TypeKeyword::Null => "null",
            TypeKeyword::Number => "number",
            TypeKeyword::String => "string",
            TypeKeyword::Boolean => "boolean",
            TypeKeyword::BigInt => "bigint",
            TypeKeyword::Symbol => "symbol",
            TypeKeyword::Object => "object",
        }
    }
}

/// `extends` or `implements`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeritageToken {
    Extends,
    Implements,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Assign,
    /// `+=`, `-=`, `??=` and friends.
    CompoundAssign,
    Comma,
    Arithmetic,
    Comparison,
    Logical,
}

impl BinaryOperator {
    pub fn is_assignment(self) -> bool {
        matches!(self, BinaryOperator::Assign | BinaryOperator::CompoundAssign)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Increment,
    Decrement,
    Not,
    Minus,
    Plus,
    TypeOf,
}

impl UnaryOperator {
    pub fn is_update(self) -> bool {
        matches!(self, UnaryOperator::Increment | UnaryOperator::Decrement)
    }
}

/// The node taxonomy. Child slots hold [`NodeIndex::NONE`] when absent.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    SourceFile {
        statements: Vec<NodeIndex>,
    },

    // Names and tokens
    Identifier {
        text: String,
    },
    PrivateIdentifier {
        text: String,
    },
    StringLiteral {
        text: String,
    },
    NumericLiteral {
        text: String,
    },
    ThisKeyword,
    SuperKeyword,
    ConstructorKeyword,
    KeywordType {
        keyword: TypeKeyword,
    },

    // Declarations
    VariableStatement {
        declarations: Vec<NodeIndex>,
    },
    VariableDeclaration {
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    },
    Parameter {
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    },
    TypeParameter {
        name: NodeIndex,
    },
    FunctionDeclaration {
        name: NodeIndex,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
        body: NodeIndex,
    },
    ClassDeclaration {
        name: NodeIndex,
        type_parameters: Vec<NodeIndex>,
        heritage_clauses: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    },
    InterfaceDeclaration {
        name: NodeIndex,
        type_parameters: Vec<NodeIndex>,
        heritage_clauses: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    },
    HeritageClause {
        token: HeritageToken,
        types: Vec<NodeIndex>,
    },
    ExpressionWithTypeArguments {
        expression: NodeIndex,
    },
    PropertyDeclaration {
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    },
    MethodDeclaration {
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
        body: NodeIndex,
    },
    Constructor {
        keyword: NodeIndex,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    },
    GetAccessor {
        name: NodeIndex,
        return_type: NodeIndex,
        body: NodeIndex,
    },
    SetAccessor {
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    },
    PropertySignature {
        name: NodeIndex,
        type_annotation: NodeIndex,
    },
    MethodSignature {
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    },
    TypeAliasDeclaration {
        name: NodeIndex,
        type_parameters: Vec<NodeIndex>,
        type_node: NodeIndex,
    },
    EnumDeclaration {
        name: NodeIndex,
        members: Vec<NodeIndex>,
    },
    EnumMember {
        name: NodeIndex,
        initializer: NodeIndex,
    },

    // Module-level import/export forms
    ImportDeclaration {
        import_clause: NodeIndex,
        module_specifier: NodeIndex,
    },
    /// `d, { a }` / `d, * as ns` of an import declaration.
    ImportClause {
        name: NodeIndex,
        named_bindings: NodeIndex,
    },
    NamespaceImport {
        name: NodeIndex,
    },
    NamedImports {
        elements: Vec<NodeIndex>,
    },
    ImportSpecifier {
        property_name: NodeIndex,
        name: NodeIndex,
    },
    /// `export { .. } from ".."`, `export { .. }` and `export * from ".."`
    /// (the last has no `export_clause`).
    ExportDeclaration {
        export_clause: NodeIndex,
        module_specifier: NodeIndex,
    },
    NamedExports {
        elements: Vec<NodeIndex>,
    },
    ExportSpecifier {
        property_name: NodeIndex,
        name: NodeIndex,
    },
    /// `export default expr` or `export = expr`.
    ExportAssignment {
        is_export_equals: bool,
        expression: NodeIndex,
    },

    // Statements
    Block {
        statements: Vec<NodeIndex>,
    },
    ExpressionStatement {
        expression: NodeIndex,
    },
    ReturnStatement {
        expression: NodeIndex,
    },
    IfStatement {
        condition: NodeIndex,
        then_statement: NodeIndex,
        else_statement: NodeIndex,
    },
    ForStatement {
        initializer: NodeIndex,
        condition: NodeIndex,
        incrementor: NodeIndex,
        body: NodeIndex,
    },
    ForOfStatement {
        initializer: NodeIndex,
        expression: NodeIndex,
        body: NodeIndex,
    },
    WhileStatement {
        condition: NodeIndex,
        body: NodeIndex,
    },
    DoStatement {
        body: NodeIndex,
        condition: NodeIndex,
    },
    LabeledStatement {
        label: NodeIndex,
        statement: NodeIndex,
    },
    BreakStatement {
        label: NodeIndex,
    },
    ContinueStatement {
        label: NodeIndex,
    },

    // Expressions
    PropertyAccessExpression {
        expression: NodeIndex,
        name: NodeIndex,
    },
    ElementAccessExpression {
        expression: NodeIndex,
        argument: NodeIndex,
    },
    CallExpression {
        expression: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    NewExpression {
        expression: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    /// Dynamic `import("specifier")`.
    ImportCall {
        argument: NodeIndex,
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: NodeIndex,
        right: NodeIndex,
    },
    PrefixUnaryExpression {
        operator: UnaryOperator,
        operand: NodeIndex,
    },
    PostfixUnaryExpression {
        operator: UnaryOperator,
        operand: NodeIndex,
    },
    ParenthesizedExpression {
        expression: NodeIndex,
    },
    ObjectLiteralExpression {
        properties: Vec<NodeIndex>,
    },
    PropertyAssignment {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    ShorthandPropertyAssignment {
        name: NodeIndex,
    },
    ArrayLiteralExpression {
        elements: Vec<NodeIndex>,
    },
    FunctionExpression {
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
        body: NodeIndex,
    },
    ArrowFunction {
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
        body: NodeIndex,
    },
    ClassExpression {
        name: NodeIndex,
        heritage_clauses: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    },
    AsExpression {
        expression: NodeIndex,
        type_node: NodeIndex,
    },

    // Binding patterns
    ObjectBindingPattern {
        elements: Vec<NodeIndex>,
    },
    ArrayBindingPattern {
        elements: Vec<NodeIndex>,
    },
    BindingElement {
        property_name: NodeIndex,
        name: NodeIndex,
        initializer: NodeIndex,
    },

    // Type nodes
    TypeReference {
        type_name: NodeIndex,
    },
    TypeLiteral {
        members: Vec<NodeIndex>,
    },
    UnionType {
        types: Vec<NodeIndex>,
    },
    ArrayType {
        element_type: NodeIndex,
    },
}

impl NodeKind {
    /// Child slots in source order, skipping absent ones.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let one = |idx: NodeIndex, out: &mut Vec<NodeIndex>| {
            if idx.is_some() {
                out.push(idx);
            }
        };
        match self {
            NodeKind::Identifier { .. }
            | NodeKind::PrivateIdentifier { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::ThisKeyword
            | NodeKind::SuperKeyword
            | NodeKind::ConstructorKeyword
            | NodeKind::KeywordType { .. } => {}

            NodeKind::SourceFile { statements }
            | NodeKind::Block { statements } => out.extend(statements.iter().copied()),
            NodeKind::VariableStatement { declarations } => {
                out.extend(declarations.iter().copied())
            }
            NodeKind::VariableDeclaration {
                name,
                type_annotation,
                initializer,
            }
            | NodeKind::Parameter {
                name,
                type_annotation,
                initializer,
            }
            | NodeKind::PropertyDeclaration {
                name,
                type_annotation,
                initializer,
            } => {
                one(*name, &mut out);
                one(*type_annotation, &mut out);
                one(*initializer, &mut out);
            }
            NodeKind::TypeParameter { name } => one(*name, &mut out),
            NodeKind::FunctionDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            } => {
                one(*name, &mut out);
                out.extend(type_parameters.iter().copied());
                out.extend(parameters.iter().copied());
                one(*return_type, &mut out);
                one(*body, &mut out);
            }
            NodeKind::ClassDeclaration {
                name,
                type_parameters,
                heritage_clauses,
                members,
            }
            | NodeKind::InterfaceDeclaration {
                name,
                type_parameters,
                heritage_clauses,
                members,
            } => {
                one(*name, &mut out);
                out.extend(type_parameters.iter().copied());
                out.extend(heritage_clauses.iter().copied());
                out.extend(members.iter().copied());
            }
            NodeKind::HeritageClause { types, .. } => out.extend(types.iter().copied()),
            NodeKind::ExpressionWithTypeArguments { expression } => one(*expression, &mut out),
            NodeKind::MethodDeclaration {
                name,
                parameters,
                return_type,
                body,
            }
            | NodeKind::FunctionExpression {
                name,
                parameters,
                return_type,
                body,
            } => {
                one(*name, &mut out);
                out.extend(parameters.iter().copied());
                one(*return_type, &mut out);
                one(*body, &mut out);
            }
            NodeKind::Constructor {
                keyword,
                parameters,
                body,
            } => {
                one(*keyword, &mut out);
                out.extend(parameters.iter().copied());
                one(*body, &mut out);
            }
            NodeKind::GetAccessor {
                name,
                return_type,
                body,
            } => {
                one(*name, &mut out);
                one(*return_type, &mut out);
                one(*body, &mut out);
            }
            NodeKind::SetAccessor {
                name,
                parameters,
                body,
            } => {
                one(*name, &mut out);
                out.extend(parameters.iter().copied());
                one(*body, &mut out);
            }
            NodeKind::PropertySignature {
                name,
                type_annotation,
            } => {
                one(*name, &mut out);
                one(*type_annotation, &mut out);
            }
            NodeKind::MethodSignature {
                name,
                parameters,
                return_type,
            } => {
                one(*name, &mut out);
                out.extend(parameters.iter().copied());
                one(*return_type, &mut out);
            }
            NodeKind::TypeAliasDeclaration {
                name,
                type_parameters,
                type_node,
            } => {
                one(*name, &mut out);
                out.extend(type_parameters.iter().copied());
                one(*type_node, &mut out);
            }
            NodeKind::EnumDeclaration { name, members } => {
                one(*name, &mut out);
                out.extend(members.iter().copied());
            }
            NodeKind::EnumMember { name, initializer } => {
                one(*name, &mut out);
                one(*initializer, &mut out);
            }
            NodeKind::ImportDeclaration {
                import_clause,
                module_specifier,
            } => {
                one(*import_clause, &mut out);
                one(*module_specifier, &mut out);
            }
            NodeKind::ImportClause {
                name,
                named_bindings,
            } => {
                one(*name, &mut out);
                one(*named_bindings, &mut out);
            }
            NodeKind::NamespaceImport { name } => one(*name, &mut out),
            NodeKind::NamedImports { elements }
            | NodeKind::NamedExports { elements }
            | NodeKind::ArrayLiteralExpression { elements }
            | NodeKind::ObjectBindingPattern { elements }
            | NodeKind::ArrayBindingPattern { elements } => out.extend(elements.iter().copied()),
            NodeKind::ImportSpecifier {
                property_name,
                name,
            }
            | NodeKind::ExportSpecifier {
                property_name,
                name,
            } => {
                one(*property_name, &mut out);
                one(*name, &mut out);
            }
            NodeKind::ExportDeclaration {
                export_clause,
                module_specifier,
            } => {
                one(*export_clause, &mut out);
                one(*module_specifier, &mut out);
            }
            NodeKind::ExportAssignment { expression, .. }
            | NodeKind::ExpressionStatement { expression }
            | NodeKind::ReturnStatement { expression }
            | NodeKind::ParenthesizedExpression { expression } => one(*expression, &mut out),
            NodeKind::IfStatement {
                condition,
                then_statement,
                else_statement,
            } => {
                one(*condition, &mut out);
                one(*then_statement, &mut out);
                one(*else_statement, &mut out);
            }
            NodeKind::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                one(*initializer, &mut out);
                one(*condition, &mut out);
                one(*incrementor, &mut out);
                one(*body, &mut out);
            }
            NodeKind::ForOfStatement {
                initializer,
                expression,
                body,
            } => {
                one(*initializer, &mut out);
                one(*expression, &mut out);
                one(*body, &mut out);
            }
            NodeKind::WhileStatement { condition, body } => {
                one(*condition, &mut out);
                one(*body, &mut out);
            }
            NodeKind::DoStatement { body, condition } => {
                one(*body, &mut out);
                one(*condition, &mut out);
            }
            NodeKind::LabeledStatement { label, statement } => {
                one(*label, &mut out);
                one(*statement, &mut out);
            }
            NodeKind::BreakStatement { label } | NodeKind::ContinueStatement { label } => {
                one(*label, &mut out)
            }
            NodeKind::PropertyAccessExpression { expression, name } => {
                one(*expression, &mut out);
                one(*name, &mut out);
            }
            NodeKind::ElementAccessExpression {
                expression,
                argument,
            } => {
                one(*expression, &mut out);
                one(*argument, &mut out);
            }
            NodeKind::CallExpression {
                expression,
                arguments,
            }
            | NodeKind::NewExpression {
                expression,
                arguments,
            } => {
                one(*expression, &mut out);
                out.extend(arguments.iter().copied());
            }
            NodeKind::ImportCall { argument } => one(*argument, &mut out),
            NodeKind::BinaryExpression { left, right, .. } => {
                one(*left, &mut out);
                one(*right, &mut out);
            }
            NodeKind::PrefixUnaryExpression { operand, .. }
            | NodeKind::PostfixUnaryExpression { operand, .. } => one(*operand, &mut out),
            NodeKind::ObjectLiteralExpression { properties } => {
                out.extend(properties.iter().copied())
            }
            NodeKind::PropertyAssignment { name, initializer } => {
                one(*name, &mut out);
                one(*initializer, &mut out);
            }
            NodeKind::ShorthandPropertyAssignment { name } => one(*name, &mut out),
            NodeKind::ArrowFunction {
                parameters,
                return_type,
                body,
            } => {
                out.extend(parameters.iter().copied());
                one(*return_type, &mut out);
                one(*body, &mut out);
            }
            NodeKind::ClassExpression {
                name,
                heritage_clauses,
                members,
            } => {
                one(*name, &mut out);
                out.extend(heritage_clauses.iter().copied());
                out.extend(members.iter().copied());
            }
            NodeKind::AsExpression {
                expression,
                type_node,
            } => {
                one(*expression, &mut out);
                one(*type_node, &mut out);
            }
            NodeKind::BindingElement {
                property_name,
                name,
                initializer,
            } => {
                one(*property_name, &mut out);
                one(*name, &mut out);
                one(*initializer, &mut out);
            }
            NodeKind::TypeReference { type_name } => one(*type_name, &mut out),
            NodeKind::TypeLiteral { members } => out.extend(members.iter().copied()),
            NodeKind::UnionType { types } => out.extend(types.iter().copied()),
            NodeKind::ArrayType { element_type } => one(*element_type, &mut out),
        }
        out
    }

    /// The `name` slot of a named declaration, if this kind has one.
    pub fn declaration_name(&self) -> Option<NodeIndex> {
        let name = match self {
            NodeKind::VariableDeclaration { name, .. }
            | NodeKind::Parameter { name, .. }
            | NodeKind::TypeParameter { name }
            | NodeKind::FunctionDeclaration { name, .. }
            | NodeKind::ClassDeclaration { name, .. }
            | NodeKind::InterfaceDeclaration { name, .. }
            | NodeKind::PropertyDeclaration { name, .. }
            | NodeKind::MethodDeclaration { name, .. }
            | NodeKind::GetAccessor { name, .. }
            | NodeKind::SetAccessor { name, .. }
            | NodeKind::PropertySignature { name, .. }
            | NodeKind::MethodSignature { name, .. }
            | NodeKind::TypeAliasDeclaration { name, .. }
            | NodeKind::EnumDeclaration { name, .. }
            | NodeKind::EnumMember { name, .. }
            | NodeKind::ImportClause { name, .. }
            | NodeKind::NamespaceImport { name }
            | NodeKind::ImportSpecifier { name, .. }
            | NodeKind::ExportSpecifier { name, .. }
            | NodeKind::PropertyAssignment { name, .. }
            | NodeKind::ShorthandPropertyAssignment { name }
            | NodeKind::FunctionExpression { name, .. }
            | NodeKind::ClassExpression { name, .. }
            | NodeKind::BindingElement { name, .. } => *name,
            NodeKind::Constructor { keyword, .. } => *keyword,
            _ => return None,
        };
        name.some()
    }

    /// Whether this node is a token (a leaf the cursor can touch).
    pub fn is_token(&self) -> bool {
        matches!(
            self,
            NodeKind::Identifier { .. }
                | NodeKind::PrivateIdentifier { .. }
                | NodeKind::StringLiteral { .. }
                | NodeKind::NumericLiteral { .. }
                | NodeKind::ThisKeyword
                | NodeKind::SuperKeyword
                | NodeKind::ConstructorKeyword
                | NodeKind::KeywordType { .. }
        )
    }

    /// Text of an identifier, private identifier or literal.
    pub fn text(&self) -> Option<&str> {
        match self {
            NodeKind::Identifier { text }
            | NodeKind::PrivateIdentifier { text }
            | NodeKind::StringLiteral { text }
            | NodeKind::NumericLiteral { text } => Some(text),
            NodeKind::ThisKeyword => Some("this"),
            NodeKind::SuperKeyword => Some("super"),
            NodeKind::ConstructorKeyword => Some("constructor"),
            NodeKind::KeywordType { keyword } => Some(keyword.text()),
            _ => None,
        }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration { .. }
                | NodeKind::FunctionExpression { .. }
                | NodeKind::ArrowFunction { .. }
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::MethodSignature { .. }
                | NodeKind::Constructor { .. }
                | NodeKind::GetAccessor { .. }
                | NodeKind::SetAccessor { .. }
        )
    }

    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            NodeKind::ClassDeclaration { .. } | NodeKind::ClassExpression { .. }
        )
    }

    /// Members of a class, class expression, interface or type literal.
    pub fn members(&self) -> &[NodeIndex] {
        match self {
            NodeKind::ClassDeclaration { members, .. }
            | NodeKind::ClassExpression { members, .. }
            | NodeKind::InterfaceDeclaration { members, .. }
            | NodeKind::TypeLiteral { members } => members,
            _ => &[],
        }
    }

    pub fn heritage_clauses(&self) -> &[NodeIndex] {
        match self {
            NodeKind::ClassDeclaration {
                heritage_clauses, ..
            }
            | NodeKind::ClassExpression {
                heritage_clauses, ..
            }
            | NodeKind::InterfaceDeclaration {
                heritage_clauses, ..
            } => heritage_clauses,
            _ => &[],
        }
    }

    /// Body of a function-like node.
    pub fn body(&self) -> Option<NodeIndex> {
        match self {
            NodeKind::FunctionDeclaration { body, .. }
            | NodeKind::FunctionExpression { body, .. }
            | NodeKind::ArrowFunction { body, .. }
            | NodeKind::MethodDeclaration { body, .. }
            | NodeKind::Constructor { body, .. }
            | NodeKind::GetAccessor { body, .. }
            | NodeKind::SetAccessor { body, .. } => body.some(),
            _ => None,
        }
    }

    /// Initializer of a variable-like node.
    pub fn initializer(&self) -> Option<NodeIndex> {
        match self {
            NodeKind::VariableDeclaration { initializer, .. }
            | NodeKind::Parameter { initializer, .. }
            | NodeKind::PropertyDeclaration { initializer, .. }
            | NodeKind::PropertyAssignment { initializer, .. }
            | NodeKind::EnumMember { initializer, .. }
            | NodeKind::BindingElement { initializer, .. } => initializer.some(),
            _ => None,
        }
    }

    /// Declared type annotation (or return type for function-likes).
    pub fn type_annotation(&self) -> Option<NodeIndex> {
        match self {
            NodeKind::VariableDeclaration {
                type_annotation, ..
            }
            | NodeKind::Parameter {
                type_annotation, ..
            }
            | NodeKind::PropertyDeclaration {
                type_annotation, ..
            }
            | NodeKind::PropertySignature {
                type_annotation, ..
            } => type_annotation.some(),
            NodeKind::FunctionDeclaration { return_type, .. }
            | NodeKind::FunctionExpression { return_type, .. }
            | NodeKind::ArrowFunction { return_type, .. }
            | NodeKind::MethodDeclaration { return_type, .. }
            | NodeKind::MethodSignature { return_type, .. }
            | NodeKind::GetAccessor { return_type, .. } => return_type.some(),
            NodeKind::AsExpression { type_node, .. } => type_node.some(),
            _ => None,
        }
    }

    pub fn is_type_node(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeReference { .. }
                | NodeKind::TypeLiteral { .. }
                | NodeKind::UnionType { .. }
                | NodeKind::ArrayType { .. }
                | NodeKind::KeywordType { .. }
                | NodeKind::ExpressionWithTypeArguments { .. }
        )
    }

    pub fn is_iteration_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::ForStatement { .. }
                | NodeKind::ForOfStatement { .. }
                | NodeKind::WhileStatement { .. }
                | NodeKind::DoStatement { .. }
        )
    }
}

/// A node in the arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: TextSpan,
    pub parent: NodeIndex,
    pub file: FileId,
    pub modifiers: ModifierFlags,
}

/// Arena-based storage for the nodes of every file in a program.
/// Nodes are stored contiguously and referenced by index.
#[derive(Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    /// Get a node by index
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    pub fn kind(&self, index: NodeIndex) -> Option<&NodeKind> {
        self.get(index).map(|n| &n.kind)
    }

    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
