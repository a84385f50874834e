//! Template tree data model
//!
//! The tree mirrors the node kinds of a Handlebars/Glimmer-style template:
//! elements, text runs, mustache expressions, block statements and the two
//! comment flavors. Every node carries an [`Annotations`] record that the
//! preprocessing passes fill in incrementally; the annotated tree is what a
//! downstream pretty-printer consumes.
//!
//! # Example
//!
//! ```rust
//! use hbsprep::ast::{Node, NodeKind};
//!
//! let tree = Node::root(vec![
//!     Node::element("p", vec![], vec![Node::text("hello")]),
//! ]);
//! match &tree.kind {
//!     NodeKind::Root { children } => assert_eq!(children.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

use std::fmt;
use std::str::FromStr;

/// Approximation of the CSS `display` property, restricted to the values
/// that matter for whitespace collapsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CssDisplay {
    Block,
    Inline,
    InlineBlock,
    ListItem,
    Table,
    TableCaption,
    TableCell,
    TableColumn,
    TableColumnGroup,
    TableFooterGroup,
    TableHeaderGroup,
    TableRow,
    TableRowGroup,
    None,
}

impl CssDisplay {
    /// Whether this category establishes a block-level box: `block`,
    /// `list-item`, and the whole table family. Whitespace abutting such a
    /// box never renders.
    pub fn is_block_like(self) -> bool {
        matches!(
            self,
            CssDisplay::Block
                | CssDisplay::ListItem
                | CssDisplay::Table
                | CssDisplay::TableCaption
                | CssDisplay::TableCell
                | CssDisplay::TableColumn
                | CssDisplay::TableColumnGroup
                | CssDisplay::TableFooterGroup
                | CssDisplay::TableHeaderGroup
                | CssDisplay::TableRow
                | CssDisplay::TableRowGroup
        )
    }
}

impl fmt::Display for CssDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CssDisplay::Block => "block",
            CssDisplay::Inline => "inline",
            CssDisplay::InlineBlock => "inline-block",
            CssDisplay::ListItem => "list-item",
            CssDisplay::Table => "table",
            CssDisplay::TableCaption => "table-caption",
            CssDisplay::TableCell => "table-cell",
            CssDisplay::TableColumn => "table-column",
            CssDisplay::TableColumnGroup => "table-column-group",
            CssDisplay::TableFooterGroup => "table-footer-group",
            CssDisplay::TableHeaderGroup => "table-header-group",
            CssDisplay::TableRow => "table-row",
            CssDisplay::TableRowGroup => "table-row-group",
            CssDisplay::None => "none",
        };
        f.write_str(s)
    }
}

impl FromStr for CssDisplay {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(CssDisplay::Block),
            "inline" => Ok(CssDisplay::Inline),
            "inline-block" => Ok(CssDisplay::InlineBlock),
            "list-item" => Ok(CssDisplay::ListItem),
            "table" => Ok(CssDisplay::Table),
            "table-caption" => Ok(CssDisplay::TableCaption),
            "table-cell" => Ok(CssDisplay::TableCell),
            "table-column" => Ok(CssDisplay::TableColumn),
            "table-column-group" => Ok(CssDisplay::TableColumnGroup),
            "table-footer-group" => Ok(CssDisplay::TableFooterGroup),
            "table-header-group" => Ok(CssDisplay::TableHeaderGroup),
            "table-row" => Ok(CssDisplay::TableRow),
            "table-row-group" => Ok(CssDisplay::TableRowGroup),
            "none" => Ok(CssDisplay::None),
            _ => Err(()),
        }
    }
}

/// Approximation of the CSS `white-space` property. The `pre`-prefixed
/// categories mean whitespace and indentation inside the element are
/// verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CssWhiteSpace {
    Normal,
    Nowrap,
    Pre,
    PreWrap,
    PreLine,
}

impl CssWhiteSpace {
    pub fn is_pre_like(self) -> bool {
        matches!(
            self,
            CssWhiteSpace::Pre | CssWhiteSpace::PreWrap | CssWhiteSpace::PreLine
        )
    }
}

/// A raw element attribute; opaque to the preprocessing passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// Annotation record filled in by the three preprocessing passes.
///
/// | field | set by |
/// |---|---|
/// | `display` | pass 1 |
/// | `is_whitespace_sensitive`, `is_indentation_sensitive` | pass 3 |
/// | `is_leading_space_sensitive`, `is_trailing_space_sensitive`, `is_dangling_space_sensitive` | pass 2 |
/// | `has_leading_spaces`, `has_trailing_spaces`, `has_dangling_spaces` | pass 3 |
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotations {
    pub display: Option<CssDisplay>,
    pub is_whitespace_sensitive: bool,
    pub is_indentation_sensitive: bool,
    pub is_leading_space_sensitive: bool,
    pub is_trailing_space_sensitive: bool,
    pub is_dangling_space_sensitive: bool,
    pub has_leading_spaces: bool,
    pub has_trailing_spaces: bool,
    pub has_dangling_spaces: bool,
}

/// Closed set of template node kinds.
///
/// Children are strictly owned ordered sequences; there is no sharing
/// between nodes, so in-place mutation during preprocessing cannot alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Top-level program of a template.
    Root { children: Vec<Node> },
    /// `<tag attr="v">…</tag>`
    Element {
        tag: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    /// A run of character data.
    Text { chars: String },
    /// `{{expr}}` expression placeholder.
    Mustache { content: String },
    /// `{{#name}}…{{else}}…{{/name}}`
    Block {
        name: String,
        program: Vec<Node>,
        inverse: Vec<Node>,
    },
    /// `<!-- … -->`
    Comment { value: String },
    /// `{{!-- … --}}` or `{{! … }}`
    MustacheComment { value: String },
}

/// A template node: a kind plus the annotations the pipeline writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub anno: Annotations,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            anno: Annotations::default(),
        }
    }

    pub fn root(children: Vec<Node>) -> Self {
        Node::new(NodeKind::Root { children })
    }

    pub fn element(tag: &str, attributes: Vec<Attribute>, children: Vec<Node>) -> Self {
        Node::new(NodeKind::Element {
            tag: tag.to_string(),
            attributes,
            children,
        })
    }

    pub fn text(chars: &str) -> Self {
        Node::new(NodeKind::Text {
            chars: chars.to_string(),
        })
    }

    pub fn mustache(content: &str) -> Self {
        Node::new(NodeKind::Mustache {
            content: content.to_string(),
        })
    }

    pub fn block(name: &str, program: Vec<Node>, inverse: Vec<Node>) -> Self {
        Node::new(NodeKind::Block {
            name: name.to_string(),
            program,
            inverse,
        })
    }

    pub fn comment(value: &str) -> Self {
        Node::new(NodeKind::Comment {
            value: value.to_string(),
        })
    }

    pub fn mustache_comment(value: &str) -> Self {
        Node::new(NodeKind::MustacheComment {
            value: value.to_string(),
        })
    }

    /// Display category assigned by pass 1. Before classification this
    /// falls back to `inline`, the default table entry.
    pub fn display(&self) -> CssDisplay {
        self.anno.display.unwrap_or(CssDisplay::Inline)
    }

    /// True for the data-producing inline kinds (text runs and mustache
    /// expressions); whitespace between two of these is always significant.
    pub fn is_text_like(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Text { .. } | NodeKind::Mustache { .. }
        )
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }
}
