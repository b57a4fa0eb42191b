//! Program fixtures shared by the integration tests.
//!
//! Each fixture spells out the syntax tree and binder output for a small
//! TypeScript program, next to its source text.

#![allow(dead_code)]

use tsref_engine::{ReferencedSymbol, RenameLocation};
use tsref_model::{
    FileId, HeritageToken, ModifierFlags, NodeIndex, NodeKind, Program, ProgramBuilder,
    SymbolFlags, SymbolId, TextSpan, TypeKeyword,
};

/// Start offset of a node.
pub fn start(program: &Program, node: NodeIndex) -> u32 {
    program.span(node).map(|s| s.start).unwrap_or(u32::MAX)
}

pub fn file_id(program: &Program, name: &str) -> FileId {
    program
        .file_by_name(name)
        .map(|f| f.id)
        .unwrap_or_else(|| panic!("no file named {name}"))
}

/// `(file name, span)` of every reference, sorted.
pub fn reference_spans(groups: &[ReferencedSymbol]) -> Vec<(String, TextSpan)> {
    let mut out: Vec<(String, TextSpan)> = groups
        .iter()
        .flat_map(|g| g.references.iter())
        .map(|r| (r.location.file_name.clone(), r.text_span))
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.start.cmp(&b.1.start)));
    out
}

pub fn rename_spans(locations: &[RenameLocation]) -> Vec<(String, TextSpan)> {
    let mut out: Vec<(String, TextSpan)> = locations
        .iter()
        .map(|l| (l.location.file_name.clone(), l.text_span))
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.start.cmp(&b.1.start)));
    out
}

/// `(file name, span)` of a node.
pub fn node_span(program: &Program, node: NodeIndex) -> (String, TextSpan) {
    let file = program
        .source_file_of(node)
        .map(|f| f.name.clone())
        .unwrap_or_default();
    let span = program.span(node).unwrap_or_default();
    (file, span)
}

pub fn sorted(mut spans: Vec<(String, TextSpan)>) -> Vec<(String, TextSpan)> {
    spans.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.start.cmp(&b.1.start)));
    spans
}

pub struct ConstX {
    pub program: Program,
    pub x_decl: NodeIndex,
    pub x_use: NodeIndex,
    pub x: SymbolId,
}

// const x = 1; function f() { return x; }
pub fn const_x() -> ConstX {
    // Set TSREF_LOG=trace to see the search of a failing test.
    tsref_engine::tracing_config::init_tracing();
    let mut b = ProgramBuilder::new();
    let mut f = b.file("a.ts", "const x = 1; function f() { return x; }");
    let x_decl = f.ident("x", 0);
    let one = f.number("1", 0);
    let decl = f.node(NodeKind::VariableDeclaration {
        name: x_decl,
        type_annotation: NodeIndex::NONE,
        initializer: one,
    });
    let stmt = f.node_at(
        NodeKind::VariableStatement {
            declarations: vec![decl],
        },
        "const",
        0,
    );
    let name = f.ident("f", 0);
    let x_use = f.ident("x", 1);
    let ret = f.node_at(NodeKind::ReturnStatement { expression: x_use }, "return", 0);
    let body = f.node_at(NodeKind::Block { statements: vec![ret] }, "{", 0);
    let func = f.node_at(
        NodeKind::FunctionDeclaration {
            name,
            type_parameters: vec![],
            parameters: vec![],
            return_type: NodeIndex::NONE,
            body,
        },
        "function",
        0,
    );
    let x = f.declare_new("x", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, decl);
    f.bind(x_use, x);
    f.declare_new("f", SymbolFlags::FUNCTION, func);
    f.finish(vec![stmt, func]);
    ConstX {
        program: b.finish().unwrap(),
        x_decl,
        x_use,
        x,
    }
}

pub struct PrivateMember {
    pub program: Program,
    pub p_decl: NodeIndex,
    pub p_use: NodeIndex,
    pub class_c: NodeIndex,
    pub c_ref: NodeIndex,
}

// class C { private p = 1; getP() { return this.p; } }
// class D extends C {}
pub fn private_member() -> PrivateMember {
    let mut b = ProgramBuilder::new();
    let mut f = b.file(
        "p.ts",
        "class C { private p = 1; getP() { return this.p; } }\nclass D extends C {}",
    );
    let c_name = f.ident("C", 0);
    let p_decl = f.ident("p", 0);
    let one = f.number("1", 0);
    let prop = f.node_at(
        NodeKind::PropertyDeclaration {
            name: p_decl,
            type_annotation: NodeIndex::NONE,
            initializer: one,
        },
        "private",
        0,
    );
    f.modifiers(prop, ModifierFlags::PRIVATE);
    let get_p = f.ident("getP", 0);
    let this = f.this_keyword(0);
    let p_use = f.ident("p", 1);
    let access = f.node(NodeKind::PropertyAccessExpression {
        expression: this,
        name: p_use,
    });
    let ret = f.node_at(NodeKind::ReturnStatement { expression: access }, "return", 0);
    let body = f.node_at(NodeKind::Block { statements: vec![ret] }, "{", 1);
    let method = f.node(NodeKind::MethodDeclaration {
        name: get_p,
        parameters: vec![],
        return_type: NodeIndex::NONE,
        body,
    });
    let class_c = f.node_at(
        NodeKind::ClassDeclaration {
            name: c_name,
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![prop, method],
        },
        "class",
        0,
    );

    let d_name = f.ident("D", 0);
    let c_ref = f.ident("C", 1);
    let ewta = f.node(NodeKind::ExpressionWithTypeArguments { expression: c_ref });
    let clause = f.node_at(
        NodeKind::HeritageClause {
            token: HeritageToken::Extends,
            types: vec![ewta],
        },
        "extends",
        0,
    );
    let class_d = f.node_at(
        NodeKind::ClassDeclaration {
            name: d_name,
            type_parameters: vec![],
            heritage_clauses: vec![clause],
            members: vec![],
        },
        "class",
        1,
    );

    let c = f.declare_new("C", SymbolFlags::CLASS, class_c);
    let p = f.declare_new("p", SymbolFlags::PROPERTY, prop);
    f.member(c, p);
    let get_p_sym = f.declare_new("getP", SymbolFlags::METHOD, method);
    f.member(c, get_p_sym);
    f.bind(p_use, p);
    let d = f.declare_new("D", SymbolFlags::CLASS, class_d);
    f.bind(c_ref, c);
    f.declared_type(c);
    f.declared_type(d);
    f.finish(vec![class_c, class_d]);
    PrivateMember {
        program: b.finish().unwrap(),
        p_decl,
        p_use,
        class_c,
        c_ref,
    }
}

pub struct CyclicClasses {
    pub program: Program,
    /// `m` of A, `m` of B, then `m` in `a.m()`.
    pub m: [NodeIndex; 3],
    pub a_m: SymbolId,
    pub b_m: SymbolId,
}

// class A extends B { m() {} }
// class B extends A { m() {} }
// let a: A;
// a.m();
pub fn cyclic_classes() -> CyclicClasses {
    let mut b = ProgramBuilder::new();
    let mut f = b.file(
        "cycle.ts",
        "class A extends B { m() {} }\nclass B extends A { m() {} }\nlet a: A;\na.m();",
    );
    let mut classes = Vec::new();
    let mut class_syms = Vec::new();
    let mut method_syms = Vec::new();
    let mut base_refs = Vec::new();
    let mut method_names = Vec::new();
    for (i, (own, base)) in [("A", "B"), ("B", "A")].into_iter().enumerate() {
        let name = f.ident(own, i);
        let base_ref = f.ident(base, i);
        let ewta = f.node(NodeKind::ExpressionWithTypeArguments {
            expression: base_ref,
        });
        let clause = f.node_at(
            NodeKind::HeritageClause {
                token: HeritageToken::Extends,
                types: vec![ewta],
            },
            "extends",
            i,
        );
        let m = f.ident("m", i);
        let body = f.node_at(NodeKind::Block { statements: vec![] }, "{}", i);
        let method = f.node(NodeKind::MethodDeclaration {
            name: m,
            parameters: vec![],
            return_type: NodeIndex::NONE,
            body,
        });
        let class = f.node_at(
            NodeKind::ClassDeclaration {
                name,
                type_parameters: vec![],
                heritage_clauses: vec![clause],
                members: vec![method],
            },
            "class",
            i,
        );
        let class_sym = f.declare_new(own, SymbolFlags::CLASS, class);
        let method_sym = f.declare_new("m", SymbolFlags::METHOD, method);
        f.member(class_sym, method_sym);
        classes.push(class);
        class_syms.push(class_sym);
        method_syms.push(method_sym);
        base_refs.push(base_ref);
        method_names.push(m);
    }
    f.bind(base_refs[0], class_syms[1]);
    f.bind(base_refs[1], class_syms[0]);
    f.declared_type(class_syms[0]);
    f.declared_type(class_syms[1]);

    let a_name = f.ident("a", 0);
    let a_type = f.ident("A", 2);
    let type_ref = f.node(NodeKind::TypeReference { type_name: a_type });
    let a_decl = f.node(NodeKind::VariableDeclaration {
        name: a_name,
        type_annotation: type_ref,
        initializer: NodeIndex::NONE,
    });
    let a_stmt = f.node_at(
        NodeKind::VariableStatement {
            declarations: vec![a_decl],
        },
        "let",
        0,
    );
    let a_use = f.ident("a", 1);
    let m_use = f.ident("m", 2);
    let access = f.node(NodeKind::PropertyAccessExpression {
        expression: a_use,
        name: m_use,
    });
    let call = f.node(NodeKind::CallExpression {
        expression: access,
        arguments: vec![],
    });
    let call_stmt = f.node(NodeKind::ExpressionStatement { expression: call });
    let a = f.declare_new("a", SymbolFlags::BLOCK_SCOPED_VARIABLE, a_decl);
    f.bind(a_use, a);
    f.bind(a_type, class_syms[0]);
    f.bind(m_use, method_syms[0]);

    let mut statements = classes;
    statements.push(a_stmt);
    statements.push(call_stmt);
    f.finish(statements);
    CyclicClasses {
        program: b.finish().unwrap(),
        m: [method_names[0], method_names[1], m_use],
        a_m: method_syms[0],
        b_m: method_syms[1],
    }
}

pub struct AliasChain {
    pub program: Program,
    /// `foo` declared in m.ts.
    pub foo_decl: NodeIndex,
    /// `foo` in `export { foo as bar } from "./m"` (n.ts).
    pub foo_reexport: NodeIndex,
    /// `bar` in the same specifier.
    pub bar_reexport: NodeIndex,
    /// `bar` in `import { bar } from "./n"` (u.ts).
    pub bar_import: NodeIndex,
    /// `bar;` in u.ts.
    pub bar_use: NodeIndex,
    /// The `"bar"` string literal in u.ts.
    pub bar_string: NodeIndex,
    /// The `"./m"` specifier in n.ts.
    pub m_specifier: NodeIndex,
}

// m.ts: export const foo = 1;
// n.ts: export { foo as bar } from "./m";
// u.ts: import { bar } from "./n"; bar; const s = "bar";
pub fn alias_chain() -> AliasChain {
    let mut b = ProgramBuilder::new();

    let mut m = b.file("m.ts", "export const foo = 1;");
    let foo_decl = m.ident("foo", 0);
    let one = m.number("1", 0);
    let decl = m.node(NodeKind::VariableDeclaration {
        name: foo_decl,
        type_annotation: NodeIndex::NONE,
        initializer: one,
    });
    let stmt = m.node_at(
        NodeKind::VariableStatement {
            declarations: vec![decl],
        },
        "export",
        0,
    );
    m.modifiers(stmt, ModifierFlags::EXPORT);
    let foo = m.declare_new("foo", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, decl);
    m.export(foo);
    m.finish(vec![stmt]);

    let mut n = b.file("n.ts", "export { foo as bar } from \"./m\";");
    let foo_reexport = n.ident("foo", 0);
    let bar_reexport = n.ident("bar", 0);
    let specifier = n.node(NodeKind::ExportSpecifier {
        property_name: foo_reexport,
        name: bar_reexport,
    });
    let named = n.node_at(
        NodeKind::NamedExports {
            elements: vec![specifier],
        },
        "{",
        0,
    );
    let m_specifier = n.string("./m", 0);
    let export_decl = n.node_at(
        NodeKind::ExportDeclaration {
            export_clause: named,
            module_specifier: m_specifier,
        },
        "export",
        0,
    );
    let bar_export = n.declare_new("bar", SymbolFlags::ALIAS, specifier);
    n.export(bar_export);
    n.alias(bar_export, foo);
    n.export_target(specifier, foo);
    n.bind(foo_reexport, foo);
    n.finish(vec![export_decl]);

    let mut u = b.file(
        "u.ts",
        "import { bar } from \"./n\";\nbar;\nconst s = \"bar\";",
    );
    let bar_import = u.ident("bar", 0);
    let import_specifier = u.node(NodeKind::ImportSpecifier {
        property_name: NodeIndex::NONE,
        name: bar_import,
    });
    let named = u.node_at(
        NodeKind::NamedImports {
            elements: vec![import_specifier],
        },
        "{",
        0,
    );
    let clause = u.node(NodeKind::ImportClause {
        name: NodeIndex::NONE,
        named_bindings: named,
    });
    let n_specifier = u.string("./n", 0);
    let import_decl = u.node_at(
        NodeKind::ImportDeclaration {
            import_clause: clause,
            module_specifier: n_specifier,
        },
        "import",
        0,
    );
    let bar_use = u.ident("bar", 1);
    let use_stmt = u.node(NodeKind::ExpressionStatement {
        expression: bar_use,
    });
    let s = u.ident("s", 0);
    let bar_string = u.string("bar", 0);
    let s_decl = u.node(NodeKind::VariableDeclaration {
        name: s,
        type_annotation: NodeIndex::NONE,
        initializer: bar_string,
    });
    let s_stmt = u.node_at(
        NodeKind::VariableStatement {
            declarations: vec![s_decl],
        },
        "const",
        0,
    );
    let bar_local = u.declare_new("bar", SymbolFlags::ALIAS, import_specifier);
    u.alias(bar_local, bar_export);
    u.bind(bar_use, bar_local);
    u.declare_new("s", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, s_decl);
    u.finish(vec![import_decl, use_stmt, s_stmt]);

    AliasChain {
        program: b.finish().unwrap(),
        foo_decl,
        foo_reexport,
        bar_reexport,
        bar_import,
        bar_use,
        bar_string,
        m_specifier,
    }
}

pub struct LocalExport {
    pub program: Program,
    /// `x` in `const x = 1;` (p.ts).
    pub x_decl: NodeIndex,
    /// `x` in `export { x };` (p.ts).
    pub x_export: NodeIndex,
    /// `x` in `import { x } from "./p";` (q.ts).
    pub x_import: NodeIndex,
    /// `x;` in q.ts.
    pub x_use: NodeIndex,
}

// p.ts: const x = 1; export { x };
// q.ts: import { x } from "./p"; x;
pub fn local_export() -> LocalExport {
    let mut b = ProgramBuilder::new();

    let mut p = b.file("p.ts", "const x = 1;\nexport { x };");
    let x_decl = p.ident("x", 0);
    let one = p.number("1", 0);
    let decl = p.node(NodeKind::VariableDeclaration {
        name: x_decl,
        type_annotation: NodeIndex::NONE,
        initializer: one,
    });
    let stmt = p.node_at(
        NodeKind::VariableStatement {
            declarations: vec![decl],
        },
        "const",
        0,
    );
    let x_export = p.ident("x", 1);
    let specifier = p.node(NodeKind::ExportSpecifier {
        property_name: NodeIndex::NONE,
        name: x_export,
    });
    let named = p.node_at(
        NodeKind::NamedExports {
            elements: vec![specifier],
        },
        "{",
        0,
    );
    let export_decl = p.node_at(
        NodeKind::ExportDeclaration {
            export_clause: named,
            module_specifier: NodeIndex::NONE,
        },
        "export",
        0,
    );
    let x = p.declare_new("x", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, decl);
    let x_exported = p.declare_new("x", SymbolFlags::ALIAS, specifier);
    p.export(x_exported);
    p.alias(x_exported, x);
    p.export_target(specifier, x);
    p.finish(vec![stmt, export_decl]);

    let mut q = b.file("q.ts", "import { x } from \"./p\";\nx;");
    let x_import = q.ident("x", 0);
    let import_specifier = q.node(NodeKind::ImportSpecifier {
        property_name: NodeIndex::NONE,
        name: x_import,
    });
    let named = q.node_at(
        NodeKind::NamedImports {
            elements: vec![import_specifier],
        },
        "{",
        0,
    );
    let clause = q.node(NodeKind::ImportClause {
        name: NodeIndex::NONE,
        named_bindings: named,
    });
    let p_specifier = q.string("./p", 0);
    let import_decl = q.node_at(
        NodeKind::ImportDeclaration {
            import_clause: clause,
            module_specifier: p_specifier,
        },
        "import",
        0,
    );
    let x_use = q.ident("x", 1);
    let use_stmt = q.node(NodeKind::ExpressionStatement { expression: x_use });
    let x_local = q.declare_new("x", SymbolFlags::ALIAS, import_specifier);
    q.alias(x_local, x_exported);
    q.bind(x_use, x_local);
    q.finish(vec![import_decl, use_stmt]);

    LocalExport {
        program: b.finish().unwrap(),
        x_decl,
        x_export,
        x_import,
        x_use,
    }
}

pub struct Shorthand {
    pub program: Program,
    pub x_decl: NodeIndex,
    /// `x` in `{ x }`.
    pub x_shorthand: NodeIndex,
}

// const x = 1;
// const o = { x };
pub fn shorthand() -> Shorthand {
    let mut b = ProgramBuilder::new();
    let mut f = b.file("s.ts", "const x = 1;\nconst o = { x };");
    let x_decl = f.ident("x", 0);
    let one = f.number("1", 0);
    let decl = f.node(NodeKind::VariableDeclaration {
        name: x_decl,
        type_annotation: NodeIndex::NONE,
        initializer: one,
    });
    let stmt = f.node_at(
        NodeKind::VariableStatement {
            declarations: vec![decl],
        },
        "const",
        0,
    );
    let o = f.ident("o", 0);
    let x_shorthand = f.ident("x", 1);
    let property = f.node(NodeKind::ShorthandPropertyAssignment { name: x_shorthand });
    let object = f.node_at(
        NodeKind::ObjectLiteralExpression {
            properties: vec![property],
        },
        "{",
        0,
    );
    let o_decl = f.node(NodeKind::VariableDeclaration {
        name: o,
        type_annotation: NodeIndex::NONE,
        initializer: object,
    });
    let o_stmt = f.node_at(
        NodeKind::VariableStatement {
            declarations: vec![o_decl],
        },
        "const",
        1,
    );
    let x = f.declare_new("x", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, decl);
    f.declare_new("o", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, o_decl);
    f.declare_new("x", SymbolFlags::PROPERTY, property);
    f.shorthand_value(property, x);
    f.finish(vec![stmt, o_stmt]);
    Shorthand {
        program: b.finish().unwrap(),
        x_decl,
        x_shorthand,
    }
}

pub struct ShadowedParameter {
    pub program: Program,
    pub param: NodeIndex,
    pub param_use: NodeIndex,
    pub outer_decl: NodeIndex,
    pub outer_use: NodeIndex,
}

// function f(a) { return a; }
// const a = 2;
// a;
pub fn shadowed_parameter() -> ShadowedParameter {
    let mut b = ProgramBuilder::new();
    let mut f = b.file("f.ts", "function f(a) { return a; }\nconst a = 2;\na;");
    let name = f.ident("f", 0);
    let param = f.ident("a", 0);
    let param_node = f.node(NodeKind::Parameter {
        name: param,
        type_annotation: NodeIndex::NONE,
        initializer: NodeIndex::NONE,
    });
    let param_use = f.ident("a", 1);
    let ret = f.node_at(
        NodeKind::ReturnStatement {
            expression: param_use,
        },
        "return",
        0,
    );
    let body = f.node_at(NodeKind::Block { statements: vec![ret] }, "{", 0);
    let func = f.node_at(
        NodeKind::FunctionDeclaration {
            name,
            type_parameters: vec![],
            parameters: vec![param_node],
            return_type: NodeIndex::NONE,
            body,
        },
        "function",
        0,
    );
    let outer_decl = f.ident("a", 2);
    let two = f.number("2", 0);
    let decl = f.node(NodeKind::VariableDeclaration {
        name: outer_decl,
        type_annotation: NodeIndex::NONE,
        initializer: two,
    });
    let stmt = f.node_at(
        NodeKind::VariableStatement {
            declarations: vec![decl],
        },
        "const",
        0,
    );
    let outer_use = f.ident("a", 3);
    let use_stmt = f.node(NodeKind::ExpressionStatement {
        expression: outer_use,
    });
    f.declare_new("f", SymbolFlags::FUNCTION, func);
    let a_param = f.declare_new("a", SymbolFlags::FUNCTION_SCOPED_VARIABLE, param_node);
    f.bind(param_use, a_param);
    let a_outer = f.declare_new("a", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, decl);
    f.bind(outer_use, a_outer);
    f.finish(vec![func, stmt, use_stmt]);
    ShadowedParameter {
        program: b.finish().unwrap(),
        param,
        param_use,
        outer_decl,
        outer_use,
    }
}

pub struct Implementations {
    pub program: Program,
    /// `I` in `interface I`.
    pub i_decl: NodeIndex,
    /// `m` in the interface.
    pub i_m: NodeIndex,
    pub class_name: NodeIndex,
    /// `m` declared in the class.
    pub class_m: NodeIndex,
    pub object: NodeIndex,
    /// `m` declared in the object literal.
    pub object_m: NodeIndex,
}

// interface I { m(): void; }
// class C implements I { m() {} }
// const o: I = { m() {} };
pub fn implementations() -> Implementations {
    let mut b = ProgramBuilder::new();
    let mut f = b.file(
        "i.ts",
        "interface I { m(): void; }\nclass C implements I { m() {} }\nconst o: I = { m() {} };",
    );
    let i_decl = f.ident("I", 0);
    let i_m = f.ident("m", 0);
    let void = f.keyword_type(TypeKeyword::Void, 0);
    let signature = f.node(NodeKind::MethodSignature {
        name: i_m,
        parameters: vec![],
        return_type: void,
    });
    let iface = f.node_at(
        NodeKind::InterfaceDeclaration {
            name: i_decl,
            type_parameters: vec![],
            heritage_clauses: vec![],
            members: vec![signature],
        },
        "interface",
        0,
    );

    let class_name = f.ident("C", 0);
    let i_ref = f.ident("I", 1);
    let ewta = f.node(NodeKind::ExpressionWithTypeArguments { expression: i_ref });
    let clause = f.node_at(
        NodeKind::HeritageClause {
            token: HeritageToken::Implements,
            types: vec![ewta],
        },
        "implements",
        0,
    );
    let class_m = f.ident("m", 1);
    let class_body = f.node_at(NodeKind::Block { statements: vec![] }, "{}", 0);
    let method = f.node(NodeKind::MethodDeclaration {
        name: class_m,
        parameters: vec![],
        return_type: NodeIndex::NONE,
        body: class_body,
    });
    let class = f.node_at(
        NodeKind::ClassDeclaration {
            name: class_name,
            type_parameters: vec![],
            heritage_clauses: vec![clause],
            members: vec![method],
        },
        "class",
        0,
    );

    let o = f.ident("o", 0);
    let i_type = f.ident("I", 2);
    let type_ref = f.node(NodeKind::TypeReference { type_name: i_type });
    let object_m = f.ident("m", 2);
    let object_body = f.node_at(NodeKind::Block { statements: vec![] }, "{}", 1);
    let object_method = f.node(NodeKind::MethodDeclaration {
        name: object_m,
        parameters: vec![],
        return_type: NodeIndex::NONE,
        body: object_body,
    });
    let object = f.node_at(
        NodeKind::ObjectLiteralExpression {
            properties: vec![object_method],
        },
        "{",
        3,
    );
    let o_decl = f.node(NodeKind::VariableDeclaration {
        name: o,
        type_annotation: type_ref,
        initializer: object,
    });
    let o_stmt = f.node_at(
        NodeKind::VariableStatement {
            declarations: vec![o_decl],
        },
        "const",
        0,
    );

    let i = f.declare_new("I", SymbolFlags::INTERFACE, iface);
    let i_m_sym = f.declare_new("m", SymbolFlags::METHOD, signature);
    f.member(i, i_m_sym);
    let c = f.declare_new("C", SymbolFlags::CLASS, class);
    let c_m_sym = f.declare_new("m", SymbolFlags::METHOD, method);
    f.member(c, c_m_sym);
    f.bind(i_ref, i);
    f.bind(i_type, i);
    f.declared_type(i);
    f.declared_type(c);
    f.declare_new("o", SymbolFlags::BLOCK_SCOPED_VARIABLE | SymbolFlags::CONST, o_decl);
    f.declare_new("m", SymbolFlags::METHOD, object_method);
    f.finish(vec![iface, class, o_stmt]);

    Implementations {
        program: b.finish().unwrap(),
        i_decl,
        i_m,
        class_name,
        class_m,
        object,
        object_m,
    }
}
