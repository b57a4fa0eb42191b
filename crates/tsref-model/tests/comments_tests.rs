use super::*;

#[test]
fn test_line_and_block_comments() {
    let source = "// a\nlet s = \"//no\"; /* b */";
    let comments = get_comment_ranges(source);
    assert_eq!(
        comments,
        vec![CommentRange::new(0, 4, false), CommentRange::new(21, 28, true)],
        "the `//` inside a string literal is not a comment"
    );
    assert_eq!(comments[1].get_text(source), "/* b */");
}

#[test]
fn test_comment_at_offset() {
    let source = "// a\nlet s = \"//no\"; /* b */";
    let comments = get_comment_ranges(source);
    assert_eq!(comment_at(&comments, 2).map(|c| c.pos), Some(0));
    assert_eq!(comment_at(&comments, 15), None);
    assert_eq!(comment_at(&comments, 27).map(|c| c.pos), Some(21));
    assert_eq!(comment_at(&comments, 28), None);
}

#[test]
fn test_unclosed_block_comment_runs_to_end() {
    let comments = get_comment_ranges("x /* open");
    assert_eq!(comments, vec![CommentRange::new(2, 9, true)]);
}

#[test]
fn test_template_literal_is_skipped() {
    let comments = get_comment_ranges("`a\n// b` // c");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].pos, 9);
}
