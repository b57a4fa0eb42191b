//! Find-references over hand-built program snapshots.

mod fixtures;

use fixtures::*;
use tsref_engine::{
    AtomicCancellationToken, DefinitionKind, FindReferencesError, ReferenceFinder,
};
use tsref_model::{NodeIndex, Position, Program, SymbolId, TypeChecker, TypeId};

#[test]
fn test_const_referenced_inside_function() {
    let fx = const_x();
    let file = file_id(&fx.program, "a.ts");
    let finder = ReferenceFinder::new(&fx.program);

    let groups = finder
        .find_references(file, start(&fx.program, fx.x_decl))
        .unwrap()
        .expect("x has references");
    assert_eq!(groups.len(), 1, "one symbol is involved");
    let group = &groups[0];
    let definition = group.definition.as_ref().expect("x has a definition");
    assert_eq!(definition.kind, DefinitionKind::Symbol);
    assert_eq!(definition.name, "x");

    let spans: Vec<_> = group.references.iter().map(|r| r.text_span).collect();
    assert_eq!(
        spans,
        vec![
            fx.program.span(fx.x_decl).unwrap(),
            fx.program.span(fx.x_use).unwrap()
        ]
    );
    assert!(group.references[0].is_definition);
    assert!(
        group.references[0].is_write_access,
        "an initialized declaration writes"
    );
    assert!(!group.references[1].is_definition);
    assert!(!group.references[1].is_write_access);
    assert_eq!(group.references[1].text_span.start, 35);
}

#[test]
fn test_same_result_from_use_and_declaration() {
    let fx = const_x();
    let file = file_id(&fx.program, "a.ts");
    let finder = ReferenceFinder::new(&fx.program);

    let from_decl = finder
        .find_references(file, start(&fx.program, fx.x_decl))
        .unwrap()
        .unwrap();
    let from_use = finder
        .find_references(file, start(&fx.program, fx.x_use))
        .unwrap()
        .unwrap();
    assert_eq!(reference_spans(&from_decl), reference_spans(&from_use));
}

#[test]
fn test_offset_at_end_of_identifier_still_resolves() {
    let fx = const_x();
    let file = file_id(&fx.program, "a.ts");
    let end = fx.program.span(fx.x_use).unwrap().end;
    let groups = ReferenceFinder::new(&fx.program)
        .find_references(file, end)
        .unwrap()
        .expect("the end offset touches the identifier");
    assert_eq!(reference_spans(&groups).len(), 2);
}

#[test]
fn test_position_variant_matches_offset() {
    let fx = const_x();
    let file = file_id(&fx.program, "a.ts");
    let finder = ReferenceFinder::new(&fx.program);
    let by_position = finder
        .find_references_at_position(file, Position::new(0, 35))
        .unwrap()
        .unwrap();
    let by_offset = finder.find_references(file, 35).unwrap().unwrap();
    assert_eq!(by_position, by_offset);
}

#[test]
fn test_no_symbol_returns_none() {
    let fx = const_x();
    let file = file_id(&fx.program, "a.ts");
    let finder = ReferenceFinder::new(&fx.program);
    // The `=` of `const x = 1` touches no token.
    assert_eq!(finder.find_references(file, 8).unwrap(), None);
    // Neither does the `{` of the function body.
    assert_eq!(finder.find_references(file, 26).unwrap(), None);
}

#[test]
fn test_private_member_stays_in_class() {
    let fx = private_member();
    let file = file_id(&fx.program, "p.ts");
    let expected = sorted(vec![
        node_span(&fx.program, fx.p_decl),
        node_span(&fx.program, fx.p_use),
    ]);

    let groups = ReferenceFinder::new(&fx.program)
        .find_references(file, start(&fx.program, fx.p_use))
        .unwrap()
        .unwrap();
    assert_eq!(reference_spans(&groups), expected);
    assert_eq!(groups.len(), 1, "the subclass adds no group");

    let brute_force = ReferenceFinder::new(&fx.program)
        .with_scope_narrowing(false)
        .find_references(file, start(&fx.program, fx.p_use))
        .unwrap()
        .unwrap();
    assert_eq!(reference_spans(&brute_force), expected);
}

#[test]
fn test_cyclic_inheritance_terminates() {
    let fx = cyclic_classes();
    let file = file_id(&fx.program, "cycle.ts");
    let groups = ReferenceFinder::new(&fx.program)
        .find_references(file, start(&fx.program, fx.m[2]))
        .unwrap()
        .expect("a.m() resolves");

    let expected = sorted(fx.m.iter().map(|&m| node_span(&fx.program, m)).collect());
    assert_eq!(reference_spans(&groups), expected);
    assert_eq!(groups.len(), 2, "one group per class member");
    let first = groups[0].definition.as_ref().unwrap();
    assert_eq!(first.text_span, fx.program.span(fx.m[0]).unwrap());
    assert_eq!(groups[0].references.len(), 2);
    assert_eq!(groups[1].references.len(), 1);
}

#[test]
fn test_shadowed_parameter_is_separate_from_outer_const() {
    let fx = shadowed_parameter();
    let file = file_id(&fx.program, "f.ts");
    for narrow in [true, false] {
        let finder = ReferenceFinder::new(&fx.program).with_scope_narrowing(narrow);
        let inner = finder
            .find_references(file, start(&fx.program, fx.param_use))
            .unwrap()
            .unwrap();
        assert_eq!(
            reference_spans(&inner),
            sorted(vec![
                node_span(&fx.program, fx.param),
                node_span(&fx.program, fx.param_use)
            ]),
            "narrowing={narrow}"
        );
        let outer = finder
            .find_references(file, start(&fx.program, fx.outer_use))
            .unwrap()
            .unwrap();
        assert_eq!(
            reference_spans(&outer),
            sorted(vec![
                node_span(&fx.program, fx.outer_decl),
                node_span(&fx.program, fx.outer_use)
            ]),
            "narrowing={narrow}"
        );
    }
}

#[test]
fn test_references_follow_re_export_alias() {
    let fx = alias_chain();
    let m = file_id(&fx.program, "m.ts");
    let groups = ReferenceFinder::new(&fx.program)
        .find_references(m, start(&fx.program, fx.foo_decl))
        .unwrap()
        .unwrap();
    let expected = sorted(
        [
            fx.foo_decl,
            fx.foo_reexport,
            fx.bar_reexport,
            fx.bar_import,
            fx.bar_use,
        ]
        .iter()
        .map(|&n| node_span(&fx.program, n))
        .collect(),
    );
    assert_eq!(reference_spans(&groups), expected);
    assert!(
        groups
            .iter()
            .flat_map(|g| &g.references)
            .all(|r| !r.is_in_string),
        "the \"bar\" string is not a reference"
    );
}

#[test]
fn test_import_side_and_declaration_side_agree() {
    let fx = local_export();
    let p = file_id(&fx.program, "p.ts");
    let q = file_id(&fx.program, "q.ts");
    let finder = ReferenceFinder::new(&fx.program);
    let from_decl = finder
        .find_references(p, start(&fx.program, fx.x_decl))
        .unwrap()
        .unwrap();
    let from_import = finder
        .find_references(q, start(&fx.program, fx.x_use))
        .unwrap()
        .unwrap();
    let expected = sorted(
        [fx.x_decl, fx.x_export, fx.x_import, fx.x_use]
            .iter()
            .map(|&n| node_span(&fx.program, n))
            .collect(),
    );
    assert_eq!(reference_spans(&from_decl), expected);
    assert_eq!(reference_spans(&from_import), expected);
}

#[test]
fn test_file_filter_limits_results() {
    let fx = local_export();
    let p = file_id(&fx.program, "p.ts");
    let groups = ReferenceFinder::new(&fx.program)
        .with_files(vec![p])
        .find_references(p, start(&fx.program, fx.x_decl))
        .unwrap()
        .unwrap();
    assert!(
        reference_spans(&groups).iter().all(|(file, _)| file == "p.ts"),
        "only p.ts was requested"
    );
    assert_eq!(reference_spans(&groups).len(), 2);
}

#[test]
fn test_shorthand_property_credited_to_variable() {
    let fx = shorthand();
    let file = file_id(&fx.program, "s.ts");
    let groups = ReferenceFinder::new(&fx.program)
        .find_references(file, start(&fx.program, fx.x_decl))
        .unwrap()
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        reference_spans(&groups),
        sorted(vec![
            node_span(&fx.program, fx.x_decl),
            node_span(&fx.program, fx.x_shorthand)
        ])
    );
}

#[test]
fn test_cancelled_token_fails_the_query() {
    let fx = const_x();
    let file = file_id(&fx.program, "a.ts");
    let token = AtomicCancellationToken::new();
    token.cancel();
    let result = ReferenceFinder::new(&fx.program)
        .with_cancellation(&token)
        .find_references(file, start(&fx.program, fx.x_decl));
    assert_eq!(result, Err(FindReferencesError::Cancelled));
}

/// Delegates to the program but reports a detached declaration for one
/// symbol.
struct BrokenDeclarations<'p> {
    program: &'p Program,
    broken: SymbolId,
}

static DETACHED: [NodeIndex; 1] = [NodeIndex::NONE];

impl TypeChecker for BrokenDeclarations<'_> {
    fn symbol_at_location(&self, node: NodeIndex) -> Option<SymbolId> {
        self.program.symbol_at_location(node)
    }

    fn declarations(&self, symbol: SymbolId) -> &[NodeIndex] {
        if symbol == self.broken {
            &DETACHED
        } else {
            self.program.declarations(symbol)
        }
    }

    fn type_at_location(&self, node: NodeIndex) -> Option<TypeId> {
        self.program.type_at_location(node)
    }

    fn declared_type_of_symbol(&self, symbol: SymbolId) -> Option<TypeId> {
        self.program.declared_type_of_symbol(symbol)
    }

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.program.type_symbol(ty)
    }

    fn base_types(&self, ty: TypeId) -> Vec<TypeId> {
        self.program.base_types(ty)
    }

    fn union_members(&self, ty: TypeId) -> Option<Vec<TypeId>> {
        self.program.union_members(ty)
    }

    fn property_of_type(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
        self.program.property_of_type(ty, name)
    }

    fn root_symbols(&self, symbol: SymbolId) -> Vec<SymbolId> {
        self.program.root_symbols(symbol)
    }

    fn contextual_type(&self, node: NodeIndex) -> Option<TypeId> {
        self.program.contextual_type(node)
    }

    fn shorthand_assignment_value_symbol(&self, node: NodeIndex) -> Option<SymbolId> {
        self.program.shorthand_assignment_value_symbol(node)
    }

    fn immediate_aliased_symbol(&self, alias: SymbolId) -> Option<SymbolId> {
        self.program.immediate_aliased_symbol(alias)
    }

    fn export_specifier_local_target(&self, specifier: NodeIndex) -> Option<SymbolId> {
        self.program.export_specifier_local_target(specifier)
    }
}

#[test]
fn test_detached_declaration_is_an_invariant_violation() {
    let fx = const_x();
    let file = file_id(&fx.program, "a.ts");
    let checker = BrokenDeclarations {
        program: &fx.program,
        broken: fx.x,
    };
    let result = ReferenceFinder::new(&fx.program)
        .with_checker(&checker)
        .find_references(file, start(&fx.program, fx.x_use));
    assert!(
        matches!(result, Err(FindReferencesError::InvariantViolation { .. })),
        "got {result:?}"
    );
}
