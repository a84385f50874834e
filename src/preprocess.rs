//! Whitespace-significance inference over parsed templates
//!
//! This module is the core of the crate: three sequential annotation passes
//! that decide, per node, whether the whitespace immediately around it
//! affects rendered output, approximating browser CSS layout rules.
//!
//! 1. `add_css_display` assigns a [`CssDisplay`] category to every node.
//! 2. `add_space_sensitivity` derives leading/trailing (or dangling)
//!    whitespace significance from each node's own display plus its
//!    parent's and siblings'.
//! 3. `extract_whitespaces` drops provably insignificant whitespace from
//!    text runs, records had-leading/had-trailing adjacency flags, and
//!    collapses whitespace-only element bodies.
//!
//! A pretty-printer that honors the resulting annotations can reflow,
//! indent, and rewrap template text without changing what a browser would
//! render.
//!
//! # Example
//!
//! ```rust
//! use hbsprep::preprocess::{preprocess_source, PreprocessOptions};
//!
//! let opts = PreprocessOptions::default();
//! let tree = preprocess_source("<div>  hello  </div>", &opts).unwrap();
//! // `tree` now carries display, sensitivity, and adjacency annotations.
//! ```

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{CssDisplay, Node, NodeKind};
use crate::parser::parse;
use crate::tables::{display_for_tag, white_space_for_tag};

/// How aggressively surrounding whitespace may be considered insignificant.
///
/// `Css` (the default) follows the display tables; `Strict` treats every
/// element as `inline` so nothing collapses; `Ignore` treats every element
/// as `block` so everything collapses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WhitespaceSensitivity {
    #[default]
    Css,
    Strict,
    Ignore,
}

/// Configuration for the preprocessing pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreprocessOptions {
    pub whitespace_sensitivity: WhitespaceSensitivity,
}

/// Run the three annotation passes over `root`, in place.
///
/// Each pass is a complete depth-first traversal; pass 3 reads the
/// annotations written by passes 1 and 2. The function is total: it never
/// fails and always terminates, bounded by tree size.
pub fn preprocess(root: &mut Node, opts: &PreprocessOptions) {
    add_css_display(root, opts);
    add_space_sensitivity(root);
    extract_whitespaces(root);
}

/// Parse `input` and run [`preprocess`] over the resulting tree.
///
/// # Errors
///
/// Fails only if the template itself is malformed; see
/// [`parse`](crate::parser::parse).
pub fn preprocess_source(input: &str, opts: &PreprocessOptions) -> Result<Node> {
    let mut tree = parse(input)?;
    preprocess(&mut tree, opts);
    Ok(tree)
}

/* PASS 1: display classification */

fn add_css_display(root: &mut Node, opts: &PreprocessOptions) {
    assign_display(root, None, opts);
    classify_descendants(root, opts);
}

fn classify_descendants(node: &mut Node, opts: &PreprocessOptions) {
    match &mut node.kind {
        NodeKind::Root { children } | NodeKind::Element { children, .. } => {
            classify_children(children, opts);
        }
        NodeKind::Block {
            program, inverse, ..
        } => {
            classify_children(program, opts);
            classify_children(inverse, opts);
        }
        NodeKind::Text { .. }
        | NodeKind::Mustache { .. }
        | NodeKind::Comment { .. }
        | NodeKind::MustacheComment { .. } => {}
    }
}

/// Classify one parent's children in order, threading the pending
/// `display:` override accumulator through the sibling iteration, then
/// descend.
fn classify_children(children: &mut [Node], opts: &PreprocessOptions) {
    let mut pending_comment: Option<String> = None;
    for child in children.iter_mut() {
        pending_comment = assign_display(child, pending_comment, opts);
        classify_descendants(child, opts);
    }
}

/// Write the node's display category and return the override accumulator to
/// carry to the next sibling. An Element always consumes the accumulator;
/// every other kind passes it through untouched.
fn assign_display(
    node: &mut Node,
    pending_comment: Option<String>,
    opts: &PreprocessOptions,
) -> Option<String> {
    match &node.kind {
        NodeKind::Element { tag, .. } => {
            node.anno.display = Some(element_display(tag, pending_comment.as_deref(), opts));
            None
        }
        NodeKind::Text { .. } => {
            node.anno.display = Some(CssDisplay::Inline);
            pending_comment
        }
        NodeKind::Root { .. }
        | NodeKind::Mustache { .. }
        | NodeKind::Block { .. }
        | NodeKind::Comment { .. }
        | NodeKind::MustacheComment { .. } => {
            node.anno.display = Some(CssDisplay::Block);
            pending_comment
        }
    }
}

/// Resolve an element's display category, in priority order: a pending
/// `{{! display: block }}` override from a preceding comment, then the
/// whitespace-sensitivity mode, then the per-tag default table.
fn element_display(
    tag: &str,
    pending_comment: Option<&str>,
    opts: &PreprocessOptions,
) -> CssDisplay {
    if let Some(comment) = pending_comment {
        if let Some(display) = parse_display_override(comment) {
            return display;
        }
    }

    match opts.whitespace_sensitivity {
        WhitespaceSensitivity::Strict => CssDisplay::Inline,
        WhitespaceSensitivity::Ignore => CssDisplay::Block,
        WhitespaceSensitivity::Css => display_for_tag(tag),
    }
}

/// Match the `display: <word>` override pattern in a comment body.
fn parse_display_override(comment: &str) -> Option<CssDisplay> {
    static DISPLAY_OVERRIDE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*display:\s*([a-z-]+)\s*$").unwrap());

    DISPLAY_OVERRIDE
        .captures(comment)
        .and_then(|caps| caps[1].parse().ok())
}

/* PASS 2: space sensitivity */

/// The slice of parent context the edge predicates may look at. Pass 2
/// never reaches deeper than the immediate parent and immediate siblings.
struct ParentCtx {
    /// Root containers: the template root and block statement bodies.
    is_root_like: bool,
    display: CssDisplay,
    is_pre_like: bool,
}

fn add_space_sensitivity(node: &mut Node) {
    match &mut node.kind {
        NodeKind::Root { children } => {
            let ctx = ParentCtx {
                is_root_like: true,
                display: CssDisplay::Block,
                is_pre_like: false,
            };
            annotate_sibling_edges(children, &ctx);
            for child in children.iter_mut() {
                add_space_sensitivity(child);
            }
        }
        NodeKind::Block {
            program, inverse, ..
        } => {
            let ctx = ParentCtx {
                is_root_like: true,
                display: CssDisplay::Block,
                is_pre_like: false,
            };
            annotate_sibling_edges(program, &ctx);
            annotate_sibling_edges(inverse, &ctx);
            for child in program.iter_mut().chain(inverse.iter_mut()) {
                add_space_sensitivity(child);
            }
        }
        NodeKind::Element { .. } => {
            annotate_element(node);
        }
        NodeKind::Text { .. }
        | NodeKind::Mustache { .. }
        | NodeKind::Comment { .. }
        | NodeKind::MustacheComment { .. } => {}
    }
}

fn annotate_element(node: &mut Node) {
    let display = node.display();
    let pre_like = node
        .tag()
        .map(|tag| white_space_for_tag(tag).is_pre_like())
        .unwrap_or(false);

    if let NodeKind::Element { children, .. } = &mut node.kind {
        if children.is_empty() {
            return;
        }

        // A sole Text child has no sibling on either side, only a parent
        // boundary: it gets one dangling flag instead of leading/trailing.
        if children.len() == 1 && matches!(children[0].kind, NodeKind::Text { .. }) {
            node.anno.is_dangling_space_sensitive = display != CssDisplay::None
                && !display.is_block_like()
                && display != CssDisplay::InlineBlock;
            return;
        }

        let ctx = ParentCtx {
            is_root_like: false,
            display,
            is_pre_like: pre_like,
        };
        annotate_sibling_edges(children, &ctx);
        for child in children.iter_mut() {
            add_space_sensitivity(child);
        }
    }
}

/// Compute local leading/trailing sensitivity for every child, then
/// coalesce adjacent edges: a whitespace run between two nodes is
/// significant only if both adjacent nodes consider that edge significant.
fn annotate_sibling_edges(children: &mut [Node], parent: &ParentCtx) {
    let local: Vec<(bool, bool)> = (0..children.len())
        .map(|i| {
            (
                is_leading_space_sensitive(children, i, parent),
                is_trailing_space_sensitive(children, i, parent),
            )
        })
        .collect();

    let last = children.len().saturating_sub(1);
    for (i, child) in children.iter_mut().enumerate() {
        let (leading, trailing) = local[i];
        child.anno.is_leading_space_sensitive = if i == 0 {
            leading
        } else {
            local[i - 1].1 && leading
        };
        child.anno.is_trailing_space_sensitive = if i == last {
            trailing
        } else {
            local[i + 1].0 && trailing
        };
    }
}

fn is_leading_space_sensitive(children: &[Node], index: usize, parent: &ParentCtx) -> bool {
    let node = &children[index];
    let prev = index.checked_sub(1).map(|i| &children[i]);

    // Whitespace between two inline data-producing nodes never collapses.
    if node.is_text_like() && prev.is_some_and(Node::is_text_like) {
        return true;
    }
    if parent.display == CssDisplay::None {
        return false;
    }
    if parent.is_pre_like {
        return true;
    }

    match prev {
        None => {
            !(parent.is_root_like
                || is_pre_like_node(node)
                || parent.display.is_block_like()
                || parent.display == CssDisplay::InlineBlock)
        }
        Some(prev) => !prev.display().is_block_like(),
    }
}

fn is_trailing_space_sensitive(children: &[Node], index: usize, parent: &ParentCtx) -> bool {
    let node = &children[index];
    let next = children.get(index + 1);

    if node.is_text_like() && next.is_some_and(|n| n.is_text_like()) {
        return true;
    }
    if parent.display == CssDisplay::None {
        return false;
    }
    if parent.is_pre_like {
        return true;
    }

    match next {
        None => {
            !(parent.is_root_like
                || is_pre_like_node(node)
                || parent.display.is_block_like()
                || parent.display == CssDisplay::InlineBlock)
        }
        Some(next) => !next.display().is_block_like(),
    }
}

fn is_pre_like_node(node: &Node) -> bool {
    node.tag()
        .map(|tag| white_space_for_tag(tag).is_pre_like())
        .unwrap_or(false)
}

/// Verbatim preservation applies to expression placeholders and pre-like
/// elements.
fn is_whitespace_sensitive_node(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Mustache { .. }) || is_pre_like_node(node)
}

/* PASS 3: whitespace extraction */

/// One item of the transient decomposition of an element's children: either
/// a run of whitespace extracted from a text node, or a surviving node.
enum SplitItem {
    Whitespace,
    Item(Node),
}

fn extract_whitespaces(node: &mut Node) {
    if let NodeKind::Element { .. } = node.kind {
        normalize_element(node);
    }

    match &mut node.kind {
        NodeKind::Root { children } | NodeKind::Element { children, .. } => {
            for child in children.iter_mut() {
                extract_whitespaces(child);
            }
        }
        NodeKind::Block {
            program, inverse, ..
        } => {
            for child in program.iter_mut().chain(inverse.iter_mut()) {
                extract_whitespaces(child);
            }
        }
        NodeKind::Text { .. }
        | NodeKind::Mustache { .. }
        | NodeKind::Comment { .. }
        | NodeKind::MustacheComment { .. } => {}
    }
}

/// Normalize one element's child list without descending further; the
/// traversal revisits each element independently.
fn normalize_element(node: &mut Node) {
    let whitespace_sensitive = is_whitespace_sensitive_node(node);
    let indentation_sensitive = is_pre_like_node(node);

    if let NodeKind::Element { children, .. } = &mut node.kind {
        let whitespace_only_body = children.len() == 1
            && matches!(&children[0].kind,
                NodeKind::Text { chars } if chars.trim().is_empty());

        if children.is_empty() || whitespace_only_body {
            node.anno.has_dangling_spaces = !children.is_empty();
            children.clear();
            return;
        }

        node.anno.is_whitespace_sensitive = whitespace_sensitive;
        node.anno.is_indentation_sensitive = indentation_sensitive;

        if !whitespace_sensitive {
            let original = std::mem::take(children);
            *children = split_out_whitespace(original);
        }
    }
}

/// Decompose each text child into up-to-three transient items (leading
/// whitespace, content, trailing whitespace), drop the whitespace markers,
/// and record marker adjacency on every surviving node.
fn split_out_whitespace(children: Vec<Node>) -> Vec<Node> {
    static TEXT_SPLIT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\s*)([\s\S]*?)(\s*)$").unwrap());

    let mut items: Vec<SplitItem> = Vec::with_capacity(children.len());
    for child in children {
        let Node { kind, anno } = child;
        match kind {
            NodeKind::Text { chars } => {
                let (leading, content, trailing) = match TEXT_SPLIT.captures(&chars) {
                    Some(caps) => (
                        caps.get(1).map_or("", |m| m.as_str()).to_string(),
                        caps.get(2).map_or("", |m| m.as_str()).to_string(),
                        caps.get(3).map_or("", |m| m.as_str()).to_string(),
                    ),
                    // The pattern matches every string, the empty one
                    // included.
                    None => (String::new(), chars.clone(), String::new()),
                };

                if !leading.is_empty() {
                    items.push(SplitItem::Whitespace);
                }
                if !content.is_empty() {
                    items.push(SplitItem::Item(Node {
                        kind: NodeKind::Text { chars: content },
                        anno: anno.clone(),
                    }));
                }
                if !trailing.is_empty() {
                    items.push(SplitItem::Whitespace);
                }
            }
            other => items.push(SplitItem::Item(Node { kind: other, anno })),
        }
    }

    let adjacency: Vec<(bool, bool)> = (0..items.len())
        .map(|i| {
            let leading = i > 0 && matches!(items[i - 1], SplitItem::Whitespace);
            let trailing =
                i + 1 < items.len() && matches!(items[i + 1], SplitItem::Whitespace);
            (leading, trailing)
        })
        .collect();

    let mut survivors = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        if let SplitItem::Item(mut node) = item {
            node.anno.has_leading_spaces = adjacency[i].0;
            node.anno.has_trailing_spaces = adjacency[i].1;
            survivors.push(node);
        }
    }
    survivors
}
