use super::*;
use crate::cancellation::NeverCancelled;
use crate::imports::ModuleImportTracer;
use crate::options::FindReferencesOptions;
use tsref_model::ProgramBuilder;

struct Labels {
    program: Program,
    l: [NodeIndex; 3],
    w: [NodeIndex; 2],
    plain: NodeIndex,
}

// L: { break L; continue L; }
// W: while (t) { continue W; }
// f;
fn labels() -> Labels {
    let mut b = ProgramBuilder::new();
    let mut f = b.file(
        "labels.ts",
        "L: { break L; continue L; }\nW: while (t) { continue W; }\nf;",
    );
    let l = [f.ident("L", 0), f.ident("L", 1), f.ident("L", 2)];
    let break_l = f.node_at(NodeKind::BreakStatement { label: l[1] }, "break", 0);
    let continue_l = f.node_at(NodeKind::ContinueStatement { label: l[2] }, "continue", 0);
    let block = f.node_at(
        NodeKind::Block {
            statements: vec![break_l, continue_l],
        },
        "{",
        0,
    );
    let labeled_l = f.node(NodeKind::LabeledStatement {
        label: l[0],
        statement: block,
    });

    let w = [f.ident("W", 0), f.ident("W", 1)];
    let t = f.ident("t", 0);
    let continue_w = f.node_at(NodeKind::ContinueStatement { label: w[1] }, "continue", 1);
    let body = f.node_at(
        NodeKind::Block {
            statements: vec![continue_w],
        },
        "{",
        1,
    );
    let while_stmt = f.node_at(NodeKind::WhileStatement { condition: t, body }, "while", 0);
    let labeled_w = f.node(NodeKind::LabeledStatement {
        label: w[0],
        statement: while_stmt,
    });

    let plain = f.ident("f", 0);
    let plain_stmt = f.node(NodeKind::ExpressionStatement { expression: plain });
    f.finish(vec![labeled_l, labeled_w, plain_stmt]);
    Labels {
        program: b.finish().unwrap(),
        l,
        w,
        plain,
    }
}

fn nodes(group: &SymbolAndEntries) -> Vec<NodeIndex> {
    group.references.iter().filter_map(Entry::as_node).collect()
}

#[test]
fn test_continue_needs_a_loop_label() {
    let fx = labels();
    let groups = label_references(&fx.program, fx.l[0]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].definition, Some(Definition::Label(fx.l[0])));
    assert_eq!(nodes(&groups[0]), vec![fx.l[0], fx.l[1]]);

    let groups = label_references(&fx.program, fx.w[0]);
    assert_eq!(nodes(&groups[0]), vec![fx.w[0], fx.w[1]]);
}

#[test]
fn test_jump_target_label() {
    let fx = labels();
    assert_eq!(jump_target_label(&fx.program, fx.l[1], "L"), Some(fx.l[0]));
    assert_eq!(jump_target_label(&fx.program, fx.w[1], "W"), Some(fx.w[0]));
    assert_eq!(jump_target_label(&fx.program, fx.w[1], "L"), None);
}

#[test]
fn test_plain_identifier_is_not_special() {
    let fx = labels();
    let tracer = ModuleImportTracer::new(&fx.program, &fx.program);
    let session = SearchSession::new(
        &fx.program,
        &fx.program,
        &tracer,
        &NeverCancelled,
        FindReferencesOptions::references(),
    );
    assert_eq!(referenced_symbols_special(&session, fx.plain).unwrap(), None);
    let from_jump = referenced_symbols_special(&session, fx.l[1]).unwrap().unwrap();
    assert_eq!(from_jump[0].definition, Some(Definition::Label(fx.l[0])));
}

struct Specifiers {
    program: Program,
    module: SymbolId,
    static_import: NodeIndex,
    dynamic_import: NodeIndex,
    other_file: FileId,
}

fn dynamic_import_file(
    b: &mut ProgramBuilder,
    name: &str,
    text: &str,
    specifier: &str,
) -> (FileId, NodeIndex) {
    let mut f = b.file(name, text);
    let argument = f.string(specifier, 0);
    let call = f.node_at(NodeKind::ImportCall { argument }, "import", 0);
    let stmt = f.node(NodeKind::ExpressionStatement { expression: call });
    let id = f.id();
    f.finish(vec![stmt]);
    (id, argument)
}

// m.ts: z;
// a.ts: import "./m";
// b.ts: import("./m");
// c.ts: import("./other");
fn specifiers() -> Specifiers {
    let mut b = ProgramBuilder::new();
    let mut m = b.file("m.ts", "z;");
    let z = m.ident("z", 0);
    let z_stmt = m.node(NodeKind::ExpressionStatement { expression: z });
    let module = m.module_symbol();
    m.finish(vec![z_stmt]);

    let mut a = b.file("a.ts", "import \"./m\";");
    let static_import = a.string("./m", 0);
    let import = a.node_at(
        NodeKind::ImportDeclaration {
            import_clause: NodeIndex::NONE,
            module_specifier: static_import,
        },
        "import",
        0,
    );
    a.finish(vec![import]);

    let (_, dynamic_import) = dynamic_import_file(&mut b, "b.ts", "import(\"./m\");", "./m");
    let (other_file, _) = dynamic_import_file(&mut b, "c.ts", "import(\"./other\");", "./other");

    Specifiers {
        program: b.finish().unwrap(),
        module,
        static_import,
        dynamic_import,
        other_file,
    }
}

#[test]
fn test_module_references() {
    let fx = specifiers();
    let tracer = ModuleImportTracer::new(&fx.program, &fx.program);
    let session = SearchSession::new(
        &fx.program,
        &fx.program,
        &tracer,
        &NeverCancelled,
        FindReferencesOptions::references(),
    );
    let groups = module_references(&session, fx.module).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].definition, Some(Definition::Symbol(fx.module)));
    assert_eq!(nodes(&groups[0]), vec![fx.static_import, fx.dynamic_import]);
    assert!(
        groups[0]
            .references
            .iter()
            .all(|e| matches!(e, Entry::Node { kind: EntryKind::StringLiteral, .. }))
    );
}

#[test]
fn test_module_references_respect_file_filter() {
    let fx = specifiers();
    let tracer = ModuleImportTracer::new(&fx.program, &fx.program);
    let session = SearchSession::new(
        &fx.program,
        &fx.program,
        &tracer,
        &NeverCancelled,
        FindReferencesOptions::references(),
    )
    .with_files(vec![fx.other_file]);
    let groups = module_references(&session, fx.module).unwrap();
    assert!(groups[0].references.is_empty());
}
