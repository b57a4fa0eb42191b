use super::*;
use tsref_model::{NodeIndex, ProgramBuilder};

fn hits(text: &str, needle: &str) -> Vec<u32> {
    possible_occurrences(text, needle, TextSpan::new(0, text.len() as u32)).collect()
}

#[test]
fn test_hits_respect_identifier_boundaries() {
    assert_eq!(hits("x xx x1 _x x$ (x)", "x"), vec![0, 15]);
    assert_eq!(hits("a.x+x", "x"), vec![2, 4]);
}

#[test]
fn test_non_ascii_identifier_characters_block_a_hit() {
    assert_eq!(hits("éx x", "x"), vec![4], "`éx` is one identifier");
}

#[test]
fn test_scan_is_limited_to_the_span() {
    let text = "x; { x; } x;";
    let found: Vec<u32> = possible_occurrences(text, "x", TextSpan::new(3, 9)).collect();
    assert_eq!(found, vec![5]);
}

#[test]
fn test_boundaries_are_checked_outside_the_span() {
    let text = "abx";
    let found: Vec<u32> = possible_occurrences(text, "x", TextSpan::new(2, 3)).collect();
    assert!(found.is_empty(), "`abx` is one identifier even if the span starts inside it");
}

#[test]
fn test_repeated_name_resumes_after_each_hit() {
    assert_eq!(hits("aa aaaa aa", "aa"), vec![0, 8]);
}

#[test]
fn test_empty_needle_finds_nothing() {
    assert!(hits("abc", "").is_empty());
}

fn strings_and_comments() -> (Program, NodeIndex) {
    let mut b = ProgramBuilder::new();
    let mut f = b.file("a.ts", "s = 'foo'; // foo\n/// <reference path=\"foo\" />");
    let s = f.ident("s", 0);
    let lit = f.string("foo", 0);
    let assign = f.node(NodeKind::BinaryExpression {
        operator: tsref_model::BinaryOperator::Assign,
        left: s,
        right: lit,
    });
    let stmt = f.node(NodeKind::ExpressionStatement { expression: assign });
    f.finish(vec![stmt]);
    (b.finish().unwrap(), lit)
}

#[test]
fn test_string_classification() {
    let (program, _) = strings_and_comments();
    let file = FileId(0);
    assert!(is_in_string(&program, file, 5));
    assert!(!is_in_string(&program, file, 4), "the opening quote is not inside");
    assert!(!is_in_string(&program, file, 0));
}

#[test]
fn test_comment_classification_skips_reference_directives() {
    let (program, _) = strings_and_comments();
    let file = FileId(0);
    assert!(is_in_non_reference_comment(&program, file, 14));
    let directive = program.files()[0].text.rfind("foo").unwrap() as u32;
    assert!(!is_in_non_reference_comment(&program, file, directive));
    assert!(!is_in_non_reference_comment(&program, file, 5));
}
