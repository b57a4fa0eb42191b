use super::*;
use crate::cancellation::{AtomicCancellationToken, NeverCancelled};
use crate::error::FindReferencesError;
use tsref_model::{ProgramBuilder, SymbolFlags};

struct Modules {
    program: Program,
    files: Vec<FileId>,
    foo: SymbolId,
    module: SymbolId,
    /// `foo` in `import { foo as f }` (a.ts).
    foo_a: NodeIndex,
    f_a: NodeIndex,
    f_symbol: SymbolId,
    /// `foo` in `import { foo } from "./c"` (d.ts).
    foo_d: NodeIndex,
    foo_d_symbol: SymbolId,
}

fn import_declaration(
    f: &mut tsref_model::FileBuilder<'_>,
    name: NodeIndex,
    named_bindings: NodeIndex,
    specifier: &str,
) -> NodeIndex {
    let clause = f.node(NodeKind::ImportClause {
        name,
        named_bindings,
    });
    let module_specifier = f.string(specifier, 0);
    f.node_at(
        NodeKind::ImportDeclaration {
            import_clause: clause,
            module_specifier,
        },
        "import",
        0,
    )
}

fn named_imports(f: &mut tsref_model::FileBuilder<'_>, specifier: NodeIndex) -> NodeIndex {
    f.node_at(
        NodeKind::NamedImports {
            elements: vec![specifier],
        },
        "{",
        0,
    )
}

// m.ts: export const foo = 1;
// a.ts: import { foo as f } from "./m";
// b.ts: import * as ns from "./m";
// c.ts: export * from "./m";
// d.ts: import { foo } from "./c";
// e.ts: import("./m");
fn modules() -> Modules {
    let mut b = ProgramBuilder::new();
    let mut files = Vec::new();

    let mut m = b.file("m.ts", "export const foo = 1;");
    let foo_name = m.ident("foo", 0);
    let one = m.number("1", 0);
    let decl = m.node(NodeKind::VariableDeclaration {
        name: foo_name,
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
    let foo = m.declare_new("foo", SymbolFlags::BLOCK_SCOPED_VARIABLE, decl);
    m.export(foo);
    let module = m.module_symbol();
    files.push(m.id());
    m.finish(vec![stmt]);

    let mut a = b.file("a.ts", "import { foo as f } from \"./m\";");
    let foo_a = a.ident("foo", 0);
    let f_a = a.ident("f", 0);
    let specifier = a.node(NodeKind::ImportSpecifier {
        property_name: foo_a,
        name: f_a,
    });
    let named = named_imports(&mut a, specifier);
    let import = import_declaration(&mut a, NodeIndex::NONE, named, "./m");
    let f_symbol = a.declare_new("f", SymbolFlags::ALIAS, specifier);
    a.alias(f_symbol, foo);
    a.bind(foo_a, foo);
    files.push(a.id());
    a.finish(vec![import]);

    let mut ns_file = b.file("b.ts", "import * as ns from \"./m\";");
    let ns = ns_file.ident("ns", 0);
    let namespace = ns_file.node_at(NodeKind::NamespaceImport { name: ns }, "*", 0);
    let import = import_declaration(&mut ns_file, NodeIndex::NONE, namespace, "./m");
    let ns_symbol = ns_file.declare_new("ns", SymbolFlags::ALIAS, namespace);
    ns_file.alias(ns_symbol, module);
    files.push(ns_file.id());
    ns_file.finish(vec![import]);

    let mut c = b.file("c.ts", "export * from \"./m\";");
    let m_specifier = c.string("./m", 0);
    let export_all = c.node_at(
        NodeKind::ExportDeclaration {
            export_clause: NodeIndex::NONE,
            module_specifier: m_specifier,
        },
        "export",
        0,
    );
    files.push(c.id());
    c.finish(vec![export_all]);

    let mut d = b.file("d.ts", "import { foo } from \"./c\";");
    let foo_d = d.ident("foo", 0);
    let specifier = d.node(NodeKind::ImportSpecifier {
        property_name: NodeIndex::NONE,
        name: foo_d,
    });
    let named = named_imports(&mut d, specifier);
    let import = import_declaration(&mut d, NodeIndex::NONE, named, "./c");
    let foo_d_symbol = d.declare_new("foo", SymbolFlags::ALIAS, specifier);
    d.alias(foo_d_symbol, foo);
    files.push(d.id());
    d.finish(vec![import]);

    let mut e = b.file("e.ts", "import(\"./m\");");
    let argument = e.string("./m", 0);
    let call = e.node_at(NodeKind::ImportCall { argument }, "import", 0);
    let call_stmt = e.node(NodeKind::ExpressionStatement { expression: call });
    files.push(e.id());
    e.finish(vec![call_stmt]);

    Modules {
        program: b.finish().unwrap(),
        files,
        foo,
        module,
        foo_a,
        f_a,
        f_symbol,
        foo_d,
        foo_d_symbol,
    }
}

fn trace(fx: &Modules, options: TraceOptions, files: &[FileId]) -> ImportsResult {
    let tracer = ModuleImportTracer::new(&fx.program, &fx.program);
    let info = ExportInfo {
        exporting_module: fx.module,
        kind: ExportKind::Named,
    };
    tracer
        .imports_of_export(fx.foo, &info, options, files, &NeverCancelled)
        .unwrap()
}

#[test]
fn test_named_export_importers() {
    let fx = modules();
    let result = trace(&fx, TraceOptions::default(), &fx.files);
    assert_eq!(result.single_references, vec![fx.foo_a]);
    assert_eq!(
        result.import_searches,
        vec![(fx.f_a, fx.f_symbol), (fx.foo_d, fx.foo_d_symbol)],
        "`export *` is followed to its importers"
    );
    assert_eq!(
        result.indirect_users,
        vec![fx.files[2], fx.files[5]],
        "namespace and dynamic imports use the export by name"
    );
}

#[test]
fn test_preserved_alias_is_not_searched() {
    let fx = modules();
    let options = TraceOptions {
        is_for_rename: true,
        preserve_aliases: true,
    };
    let result = trace(&fx, options, &fx.files);
    assert_eq!(result.single_references, vec![fx.foo_a]);
    assert_eq!(result.import_searches, vec![(fx.foo_d, fx.foo_d_symbol)]);
}

#[test]
fn test_importers_outside_files_are_skipped() {
    let fx = modules();
    let result = trace(&fx, TraceOptions::default(), &fx.files[..2]);
    assert_eq!(result.import_searches, vec![(fx.f_a, fx.f_symbol)]);
    assert!(result.indirect_users.is_empty());
}

#[test]
fn test_non_module_exporter_has_no_importers() {
    let fx = modules();
    let tracer = ModuleImportTracer::new(&fx.program, &fx.program);
    let info = ExportInfo {
        exporting_module: fx.foo,
        kind: ExportKind::Named,
    };
    let result = tracer
        .imports_of_export(fx.foo, &info, TraceOptions::default(), &fx.files, &NeverCancelled)
        .unwrap();
    assert_eq!(result, ImportsResult::default());
}

#[test]
fn test_cancelled_trace() {
    let fx = modules();
    let tracer = ModuleImportTracer::new(&fx.program, &fx.program);
    let info = ExportInfo {
        exporting_module: fx.module,
        kind: ExportKind::Named,
    };
    let token = AtomicCancellationToken::new();
    token.cancel();
    let result = tracer.imports_of_export(fx.foo, &info, TraceOptions::default(), &fx.files, &token);
    assert!(matches!(result, Err(FindReferencesError::Cancelled)));
}
