//! Default CSS display and white-space categories per HTML tag
//!
//! These tables approximate the user-agent stylesheet defaults of major
//! browsers. They are consumed read-only by the preprocessing passes; tags
//! missing from a table fall back to [`CSS_DISPLAY_DEFAULT`] /
//! [`CSS_WHITE_SPACE_DEFAULT`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::{CssDisplay, CssWhiteSpace};

/// Display category for tags absent from [`CSS_DISPLAY_TAGS`].
pub const CSS_DISPLAY_DEFAULT: CssDisplay = CssDisplay::Inline;

/// White-space category for tags absent from [`CSS_WHITE_SPACE_TAGS`].
pub const CSS_WHITE_SPACE_DEFAULT: CssWhiteSpace = CssWhiteSpace::Normal;

/// Tag name → default `display` category.
pub static CSS_DISPLAY_TAGS: Lazy<HashMap<&'static str, CssDisplay>> = Lazy::new(|| {
    use CssDisplay::{
        Block, InlineBlock, ListItem, Table, TableCaption, TableCell, TableColumn,
        TableColumnGroup, TableFooterGroup, TableHeaderGroup, TableRow, TableRowGroup,
    };

    let mut m = HashMap::new();

    for tag in [
        "html",
        "body",
        "address",
        "article",
        "aside",
        "blockquote",
        "details",
        "dialog",
        "dd",
        "div",
        "dl",
        "dt",
        "fieldset",
        "figcaption",
        "figure",
        "footer",
        "form",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "header",
        "hgroup",
        "hr",
        "legend",
        "main",
        "nav",
        "ol",
        "p",
        "pre",
        "section",
        "ul",
        "dir",
        "plaintext",
        "listing",
        "xmp",
        "optgroup",
        "option",
    ] {
        m.insert(tag, Block);
    }

    for tag in [
        "script", "style", "template", "head", "title", "base", "link", "meta", "area",
        "basefont", "datalist", "param", "rp", "source", "track", "noembed", "noframes",
    ] {
        m.insert(tag, CssDisplay::None);
    }

    for tag in [
        "button", "input", "select", "textarea", "meter", "progress", "marquee",
    ] {
        m.insert(tag, InlineBlock);
    }

    m.insert("li", ListItem);
    m.insert("summary", ListItem);

    m.insert("table", Table);
    m.insert("caption", TableCaption);
    m.insert("colgroup", TableColumnGroup);
    m.insert("col", TableColumn);
    m.insert("thead", TableHeaderGroup);
    m.insert("tbody", TableRowGroup);
    m.insert("tfoot", TableFooterGroup);
    m.insert("tr", TableRow);
    m.insert("td", TableCell);
    m.insert("th", TableCell);

    m
});

/// Tag name → default `white-space` category.
pub static CSS_WHITE_SPACE_TAGS: Lazy<HashMap<&'static str, CssWhiteSpace>> = Lazy::new(|| {
    use CssWhiteSpace::*;

    let mut m = HashMap::new();
    m.insert("pre", Pre);
    m.insert("listing", Pre);
    m.insert("plaintext", Pre);
    m.insert("xmp", Pre);
    m.insert("textarea", PreWrap);
    m.insert("nobr", Nowrap);
    m
});

/// Default `display` for a tag, consulting the table.
pub fn display_for_tag(tag: &str) -> CssDisplay {
    CSS_DISPLAY_TAGS
        .get(tag)
        .copied()
        .unwrap_or(CSS_DISPLAY_DEFAULT)
}

/// Default `white-space` for a tag, consulting the table.
pub fn white_space_for_tag(tag: &str) -> CssWhiteSpace {
    CSS_WHITE_SPACE_TAGS
        .get(tag)
        .copied()
        .unwrap_or(CSS_WHITE_SPACE_DEFAULT)
}
