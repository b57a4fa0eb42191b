use super::*;
use tsref_model::{ProgramBuilder, SymbolFlags};

struct Literal {
    program: Program,
    file: FileId,
    name: NodeIndex,
    decl: NodeIndex,
    literal: NodeIndex,
    symbol: SymbolId,
    ghost: SymbolId,
}

// const s = "hi"; // hi
fn literal() -> Literal {
    let mut b = ProgramBuilder::new();
    let mut f = b.file("lit.ts", "const s = \"hi\"; // hi");
    let name = f.ident("s", 0);
    let literal = f.string("hi", 0);
    let decl = f.node(NodeKind::VariableDeclaration {
        name,
        type_annotation: NodeIndex::NONE,
        initializer: literal,
    });
    let stmt = f.node_at(
        NodeKind::VariableStatement {
            declarations: vec![decl],
        },
        "const",
        0,
    );
    let symbol = f.declare_new("s", SymbolFlags::BLOCK_SCOPED_VARIABLE, decl);
    let ghost = f.symbol("ghost", SymbolFlags::PROPERTY);
    let file = f.id();
    f.finish(vec![stmt]);
    Literal {
        program: b.finish().unwrap(),
        file,
        name,
        decl,
        literal,
        symbol,
        ghost,
    }
}

#[test]
fn test_string_literal_span_excludes_quotes() {
    let fx = literal();
    let full = fx.program.span(fx.literal).unwrap();
    assert_eq!(
        reference_span(&fx.program, fx.literal),
        Some(TextSpan::new(full.start + 1, full.end - 1))
    );
    assert_eq!(
        reference_span(&fx.program, fx.name),
        fx.program.span(fx.name)
    );
}

#[test]
fn test_span_entry_reports_its_own_span() {
    let fx = literal();
    let span = TextSpan::new(19, 21);
    let entry = Entry::Span {
        file: fx.file,
        span,
        in_string: false,
    };
    assert_eq!(entry.file(&fx.program), Some(fx.file));
    assert_eq!(entry.text_span(&fx.program), Some(span));
    assert_eq!(entry.as_node(), None);
}

#[test]
fn test_free_text_group_has_no_definition() {
    let fx = literal();
    let group = SymbolAndEntries::new(
        None,
        vec![Entry::Span {
            file: fx.file,
            span: TextSpan::new(11, 13),
            in_string: true,
        }],
    );
    let shown = ReferencedSymbol::from_group(&fx.program, &fx.program, &group);
    assert_eq!(shown.definition, None);
    assert_eq!(shown.references.len(), 1);
    let reference = &shown.references[0];
    assert!(reference.is_in_string);
    assert!(!reference.is_definition);
    assert!(!reference.is_write_access);
    assert_eq!(reference.line_text, "const s = \"hi\"; // hi");
}

#[test]
fn test_definition_info_for_symbol() {
    let fx = literal();
    let info =
        DefinitionInfo::from_definition(&fx.program, &fx.program, &Definition::Symbol(fx.symbol))
            .unwrap();
    assert_eq!(info.kind, DefinitionKind::Symbol);
    assert_eq!(info.name, "s");
    assert_eq!(info.file_name, "lit.ts");
    assert_eq!(info.text_span, fx.program.span(fx.name).unwrap());

    assert_eq!(
        DefinitionInfo::from_definition(&fx.program, &fx.program, &Definition::Symbol(fx.ghost)),
        None,
        "a symbol without declarations has nowhere to point"
    );
}

#[test]
fn test_string_definition_keeps_quotes_in_name() {
    let fx = literal();
    let info =
        DefinitionInfo::from_definition(&fx.program, &fx.program, &Definition::String(fx.literal))
            .unwrap();
    assert_eq!(info.kind, DefinitionKind::String);
    assert_eq!(info.name, "\"hi\"");
}

#[test]
fn test_implementation_location_uses_declaration_name() {
    let fx = literal();
    let location = ImplementationLocation::from_node(&fx.program, fx.decl).unwrap();
    assert_eq!(location.text_span, fx.program.span(fx.name).unwrap());
    assert_eq!(location.location.file_name, "lit.ts");
}
