use hbsprep::ast::{CssDisplay, Node, NodeKind};
use hbsprep::preprocess::{
    preprocess, preprocess_source, PreprocessOptions, WhitespaceSensitivity,
};

fn prep(src: &str) -> Node {
    preprocess_source(src, &PreprocessOptions::default()).unwrap()
}

fn prep_mode(src: &str, mode: WhitespaceSensitivity) -> Node {
    let opts = PreprocessOptions {
        whitespace_sensitivity: mode,
    };
    preprocess_source(src, &opts).unwrap()
}

/// Children of a root or element node.
fn children(node: &Node) -> &[Node] {
    match &node.kind {
        NodeKind::Root { children } | NodeKind::Element { children, .. } => children,
        _ => &[],
    }
}

fn child(node: &Node, index: usize) -> &Node {
    &children(node)[index]
}

fn text_chars(node: &Node) -> &str {
    match &node.kind {
        NodeKind::Text { chars } => chars,
        other => panic!("expected a text node, got {:?}", other),
    }
}

/// Structure of a tree with annotations stripped, for idempotence checks.
fn shape(node: &Node) -> String {
    match &node.kind {
        NodeKind::Root { children } => format!(
            "root({})",
            children.iter().map(shape).collect::<Vec<_>>().join(",")
        ),
        NodeKind::Element { tag, children, .. } => format!(
            "{}({})",
            tag,
            children.iter().map(shape).collect::<Vec<_>>().join(",")
        ),
        NodeKind::Text { chars } => format!("text{:?}", chars),
        NodeKind::Mustache { content } => format!("mustache{:?}", content),
        NodeKind::Block {
            name,
            program,
            inverse,
        } => format!(
            "block {}({};{})",
            name,
            program.iter().map(shape).collect::<Vec<_>>().join(","),
            inverse.iter().map(shape).collect::<Vec<_>>().join(",")
        ),
        NodeKind::Comment { value } => format!("comment{:?}", value),
        NodeKind::MustacheComment { value } => format!("mcomment{:?}", value),
    }
}

#[test]
fn pipeline_is_idempotent() {
    let source = "<div>  <p> a {{b}} </p>  <span> c </span>  </div>";
    let once = prep(source);

    let mut twice = once.clone();
    preprocess(&mut twice, &PreprocessOptions::default());
    assert_eq!(shape(&once), shape(&twice), "second run extracted content");

    // After one re-run the annotations reach a fixpoint.
    let mut thrice = twice.clone();
    preprocess(&mut thrice, &PreprocessOptions::default());
    assert_eq!(twice, thrice);
}

#[test]
fn display_none_suppresses_children_edges() {
    // `style` defaults to display: none; nothing inside it renders.
    let tree = prep("<style> <p>x</p> </style>");
    let style = child(&tree, 0);
    assert_eq!(style.display(), CssDisplay::None);
    for node in children(style) {
        assert!(!node.anno.is_leading_space_sensitive);
        assert!(!node.anno.is_trailing_space_sensitive);
    }
}

#[test]
fn display_none_suppresses_dangling() {
    let tree = prep("<style>   </style>");
    let style = child(&tree, 0);
    assert!(!style.anno.is_dangling_space_sensitive);
    // The factual flag is still recorded.
    assert!(style.anno.has_dangling_spaces);
}

#[test]
fn adjacent_text_and_mustache_are_mutually_sensitive() {
    let tree = prep("<div>a {{x}}</div>");
    let div = child(&tree, 0);
    let text = child(div, 0);
    let mustache = child(div, 1);

    assert!(text.anno.is_trailing_space_sensitive);
    assert!(mustache.anno.is_leading_space_sensitive);
    // The shared run of whitespace survives as adjacency flags.
    assert!(text.anno.has_trailing_spaces);
    assert!(mustache.anno.has_leading_spaces);
}

#[test]
fn text_decomposition_reconstructs_original_chars() {
    let original = "  a b  ";
    let tree = prep(&format!("<div>{}<i>x</i></div>", original));
    let div = child(&tree, 0);
    let text = child(div, 0);

    assert_eq!(text_chars(text), "a b");
    assert!(text.anno.has_leading_spaces);
    assert!(text.anno.has_trailing_spaces);

    // leading marker + retained content + trailing marker == original
    let rebuilt = format!("  {}  ", text_chars(text));
    assert_eq!(rebuilt, original);
}

#[test]
fn interior_whitespace_stays_in_content() {
    let tree = prep("<div>u  hello  <i>x</i></div>");
    let div = child(&tree, 0);
    let text = child(div, 0);

    assert_eq!(text_chars(text), "u  hello");
    assert!(!text.anno.has_leading_spaces);
    assert!(text.anno.has_trailing_spaces);
}

#[test]
fn multibyte_text_decomposes_cleanly() {
    let tree = prep("<div>  héllo wörld  <i>é</i></div>");
    let div = child(&tree, 0);
    let text = child(div, 0);

    assert_eq!(text_chars(text), "héllo wörld");
    assert!(text.anno.has_leading_spaces);
    assert!(text.anno.has_trailing_spaces);
    assert_eq!(text_chars(child(child(div, 1), 0)), "é");
}

#[test]
fn whitespace_only_body_collapses_to_dangling() {
    let tree = prep("<div>   </div>");
    let div = child(&tree, 0);
    assert!(children(div).is_empty());
    assert!(div.anno.has_dangling_spaces);
    // Block-like container, so the whitespace is not significant.
    assert!(!div.anno.is_dangling_space_sensitive);
}

#[test]
fn empty_element_has_no_dangling_spaces() {
    let tree = prep("<div></div>");
    let div = child(&tree, 0);
    assert!(children(div).is_empty());
    assert!(!div.anno.has_dangling_spaces);
}

#[test]
fn inline_element_dangling_whitespace_is_sensitive() {
    let tree = prep("<span>   </span>");
    let span = child(&tree, 0);
    assert!(span.anno.is_dangling_space_sensitive);
    assert!(span.anno.has_dangling_spaces);
    assert!(children(span).is_empty());
}

#[test]
fn pre_content_is_verbatim() {
    let tree = prep("<pre>  a\n  b  </pre>");
    let pre = child(&tree, 0);

    assert!(pre.anno.is_whitespace_sensitive);
    assert!(pre.anno.is_indentation_sensitive);
    assert_eq!(children(pre).len(), 1);
    assert_eq!(text_chars(child(pre, 0)), "  a\n  b  ");
}

#[test]
fn block_neighbors_suppress_edge_sensitivity() {
    // Whitespace abutting a block-level sibling never renders.
    let tree = prep("<span>a <div>x</div> c</span>");
    let span = child(&tree, 0);
    let before = child(span, 0);
    let after = child(span, 2);

    assert_eq!(text_chars(before), "a");
    assert!(!before.anno.is_trailing_space_sensitive);
    assert!(before.anno.has_trailing_spaces);

    assert_eq!(text_chars(after), "c");
    assert!(!after.anno.is_leading_space_sensitive);
    assert!(after.anno.has_leading_spaces);
}

#[test]
fn inline_neighbors_keep_edge_sensitivity() {
    let tree = prep("<div>a <i>x</i> c</div>");
    let div = child(&tree, 0);
    assert!(child(div, 0).anno.is_trailing_space_sensitive);
    assert!(child(div, 1).anno.is_leading_space_sensitive);
    assert!(child(div, 1).anno.is_trailing_space_sensitive);
    assert!(child(div, 2).anno.is_leading_space_sensitive);
}

#[test]
fn root_edges_are_not_sensitive() {
    // Whitespace at the template boundary collapses even around an inline
    // element.
    let tree = prep("<i>x</i>");
    let italic = child(&tree, 0);
    assert_eq!(italic.display(), CssDisplay::Inline);
    assert!(!italic.anno.is_leading_space_sensitive);
    assert!(!italic.anno.is_trailing_space_sensitive);
}

#[test]
fn strict_mode_forces_inline() {
    let tree = prep_mode("<div>x</div>", WhitespaceSensitivity::Strict);
    assert_eq!(child(&tree, 0).display(), CssDisplay::Inline);
}

#[test]
fn ignore_mode_forces_block() {
    let tree = prep_mode("<span>x</span>", WhitespaceSensitivity::Ignore);
    assert_eq!(child(&tree, 0).display(), CssDisplay::Block);
}

#[test]
fn comment_display_override_does_not_fire() {
    // No traversal step feeds the override accumulator, so a preceding
    // `display:` comment leaves the element on its table default.
    let tree = prep("{{! display: block }}<span>x y</span>");
    let comment = child(&tree, 0);
    let span = child(&tree, 1);

    assert!(matches!(comment.kind, NodeKind::MustacheComment { .. }));
    assert_eq!(span.display(), CssDisplay::Inline);
}

#[test]
fn statements_classify_as_block() {
    let tree = prep("{{x}}{{! note }}{{#if a}}y{{/if}}<!-- c -->");
    for node in children(&tree) {
        assert_eq!(node.display(), CssDisplay::Block);
    }
}

#[test]
fn block_statement_bodies_are_root_like() {
    let tree = prep("{{#if a}}<i>x</i>{{/if}}");
    let body = match &child(&tree, 0).kind {
        NodeKind::Block { program, .. } => program,
        other => panic!("expected a block statement, got {:?}", other),
    };
    let italic = body.iter().find(|n| n.tag() == Some("i")).unwrap();
    assert!(!italic.anno.is_leading_space_sensitive);
    assert!(!italic.anno.is_trailing_space_sensitive);
}

#[test]
fn sensitive_flags_survive_extraction() {
    // The text next to the mustache keeps its pass-2 sensitivity after the
    // pass-3 rewrite of the child list.
    let tree = prep("<p>hello {{name}} bye</p>");
    let p = child(&tree, 0);
    assert_eq!(children(p).len(), 3);
    assert!(child(p, 0).anno.is_trailing_space_sensitive);
    assert!(child(p, 1).anno.is_leading_space_sensitive);
    assert!(child(p, 1).anno.is_trailing_space_sensitive);
    assert!(child(p, 2).anno.is_leading_space_sensitive);
}

#[test]
fn table_family_counts_as_block_like() {
    let tree = prep("<div>a <table><tr><td>x</td></tr></table> b</div>");
    let div = child(&tree, 0);
    assert_eq!(child(div, 1).display(), CssDisplay::Table);
    assert!(!child(div, 0).anno.is_trailing_space_sensitive);
    assert!(!child(div, 2).anno.is_leading_space_sensitive);
}

#[test]
fn normalized_text_keeps_single_content_run() {
    let tree = prep("<div>  one two  three  </div>");
    let div = child(&tree, 0);
    assert_eq!(children(div).len(), 1);
    assert_eq!(text_chars(child(div, 0)), "one two  three");
}
