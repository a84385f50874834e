//! Handlebars template parser
//!
//! A minimal hand-rolled parser for the Handlebars/HTML template grammar the
//! preprocessor operates on: nested elements with attributes, self-closing
//! and void tags, text runs, `{{expr}}` mustaches, `{{#block}}…{{else}}…`
//! block statements, and both comment flavors (`<!-- -->`, `{{!-- --}}`).
//! Expression and attribute contents are kept as raw strings; only the tree
//! structure matters to the preprocessing passes.
//!
//! # Example
//!
//! ```rust
//! use hbsprep::ast::NodeKind;
//! use hbsprep::parser::parse;
//!
//! let tree = parse("<div>Hello {{name}}</div>").unwrap();
//! match tree.kind {
//!     NodeKind::Root { ref children } => assert_eq!(children.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

use anyhow::{bail, Result};

use crate::ast::{Attribute, Node};

/// Tags that never have children and need no closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Parse template source into a root tree.
///
/// # Errors
///
/// Returns an error for structurally malformed templates: mismatched or
/// stray closing tags, unterminated elements, mustaches, or comments, and
/// `{{#block}}` statements closed under a different name.
pub fn parse(source: &str) -> Result<Node> {
    let mut parser = Parser::new(source);
    let children = parser.parse_nodes(Stop::Eof)?;
    Ok(Node::root(children))
}

/// Where a child sequence ends.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// End of input.
    Eof,
    /// A `</tag>` for the enclosing element.
    CloseTag,
    /// A `{{/…}}` or `{{else}}` for the enclosing block.
    BlockEnd,
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Advance past one character, however many bytes wide.
    fn advance_char(&mut self) {
        self.pos += 1;
        while self.pos < self.bytes.len() && !self.src.is_char_boundary(self.pos) {
            self.pos += 1;
        }
    }

    /// Consume `prefix` or fail with a structural error.
    fn expect(&mut self, prefix: &str) -> Result<()> {
        if !self.starts_with(prefix) {
            let found: String = self.rest().chars().take(12).collect();
            bail!(
                "expected {:?} at byte {} of template, found {:?}",
                prefix,
                self.pos,
                found
            );
        }
        self.pos += prefix.len();
        Ok(())
    }

    /// Advance past the next occurrence of `end`, returning the text before
    /// it.
    fn take_until(&mut self, end: &str, what: &str) -> Result<&'a str> {
        match self.rest().find(end) {
            Some(offset) => {
                let content = &self.rest()[..offset];
                self.pos += offset + end.len();
                Ok(content)
            }
            None => bail!("unterminated {} at byte {}", what, self.pos),
        }
    }

    fn read_name(&mut self) -> &'a str {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':' {
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    /// True when the cursor sits on the terminator `stop` describes. Does
    /// not consume; the caller owns the terminator.
    fn at_stop(&self, stop: Stop) -> bool {
        match stop {
            Stop::Eof => false,
            Stop::CloseTag => self.starts_with("</"),
            Stop::BlockEnd => self.starts_with("{{/") || self.at_else(),
        }
    }

    /// An `{{else}}` marker, not a mustache that merely begins with "else".
    fn at_else(&self) -> bool {
        if !self.starts_with("{{else") {
            return false;
        }
        matches!(
            self.bytes.get(self.pos + 6),
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'}')
        )
    }

    fn parse_nodes(&mut self, stop: Stop) -> Result<Vec<Node>> {
        let mut children = Vec::new();
        loop {
            if self.at_end() {
                match stop {
                    Stop::Eof => return Ok(children),
                    Stop::CloseTag => bail!("unexpected end of template inside element"),
                    Stop::BlockEnd => bail!("unexpected end of template inside block"),
                }
            }
            if self.at_stop(stop) {
                return Ok(children);
            }

            if self.starts_with("</") {
                bail!("stray closing tag at byte {}", self.pos);
            } else if self.starts_with("{{/") || self.at_else() {
                bail!("block close without open at byte {}", self.pos);
            } else if self.starts_with("<!--") {
                self.expect("<!--")?;
                let value = self.take_until("-->", "comment")?;
                children.push(Node::comment(value));
            } else if self.starts_with("{{!--") {
                self.expect("{{!--")?;
                let value = self.take_until("--}}", "mustache comment")?;
                children.push(Node::mustache_comment(value));
            } else if self.starts_with("{{!") {
                self.expect("{{!")?;
                let value = self.take_until("}}", "mustache comment")?;
                children.push(Node::mustache_comment(value));
            } else if self.starts_with("{{#") {
                children.push(self.parse_block()?);
            } else if self.starts_with("{{") {
                self.expect("{{")?;
                let content = self.take_until("}}", "mustache")?;
                children.push(Node::mustache(content.trim()));
            } else if self.starts_with("<") && self.tag_follows() {
                children.push(self.parse_element()?);
            } else {
                children.push(self.parse_text());
            }
        }
    }

    /// Whether the `<` under the cursor actually opens a tag.
    fn tag_follows(&self) -> bool {
        matches!(self.bytes.get(self.pos + 1), Some(b) if b.is_ascii_alphabetic())
    }

    fn parse_text(&mut self) -> Node {
        let start = self.pos;
        // Always consume at least one character so a lone '<' or '{' stays
        // text.
        self.advance_char();
        while self.pos < self.bytes.len() {
            if self.starts_with("{{")
                || self.starts_with("</")
                || self.starts_with("<!--")
                || (self.starts_with("<") && self.tag_follows())
            {
                break;
            }
            self.advance_char();
        }
        Node::text(&self.src[start..self.pos])
    }

    fn parse_element(&mut self) -> Result<Node> {
        self.expect("<")?;
        let tag = self.read_name().to_string();
        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_ws();
            if self.at_end() {
                bail!("unterminated <{}> tag", tag);
            }
            if self.starts_with("/>") {
                self.expect("/>")?;
                self_closing = true;
                break;
            }
            if self.starts_with(">") {
                self.expect(">")?;
                break;
            }
            attributes.push(self.parse_attribute()?);
        }

        if self_closing || VOID_TAGS.contains(&tag.as_str()) {
            return Ok(Node::element(&tag, attributes, Vec::new()));
        }

        let children = self.parse_nodes(Stop::CloseTag)?;
        self.expect("</")?;
        let close = self.read_name();
        if close != tag {
            bail!("expected </{}>, found </{}>", tag, close);
        }
        self.skip_ws();
        self.expect(">")?;
        Ok(Node::element(&tag, attributes, children))
    }

    fn parse_attribute(&mut self) -> Result<Attribute> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_whitespace() || b == b'=' || b == b'>' {
                break;
            }
            if b == b'/' && self.src[self.pos..].starts_with("/>") {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            bail!("malformed attribute at byte {}", self.pos);
        }
        let name = self.src[start..self.pos].to_string();

        self.skip_ws();
        if !self.starts_with("=") {
            return Ok(Attribute { name, value: None });
        }
        self.expect("=")?;
        self.skip_ws();

        let value = if self.starts_with("\"") {
            self.expect("\"")?;
            self.take_until("\"", "attribute value")?.to_string()
        } else if self.starts_with("'") {
            self.expect("'")?;
            self.take_until("'", "attribute value")?.to_string()
        } else {
            let start = self.pos;
            while self.pos < self.bytes.len()
                && !self.bytes[self.pos].is_ascii_whitespace()
                && self.bytes[self.pos] != b'>'
            {
                self.pos += 1;
            }
            self.src[start..self.pos].to_string()
        };
        Ok(Attribute {
            name,
            value: Some(value),
        })
    }

    fn parse_block(&mut self) -> Result<Node> {
        self.expect("{{#")?;
        let name = self.read_name().to_string();
        if name.is_empty() {
            bail!("block statement without a helper name at byte {}", self.pos);
        }
        // Params are opaque here; skip to the end of the opening mustache.
        self.take_until("}}", "block open")?;

        let program = self.parse_nodes(Stop::BlockEnd)?;
        let inverse = if self.at_else() {
            self.take_until("}}", "else")?;
            self.parse_nodes(Stop::BlockEnd)?
        } else {
            Vec::new()
        };

        self.expect("{{/")?;
        let close = self.read_name();
        if close != name {
            bail!("block #{} closed as /{}", name, close);
        }
        self.skip_ws();
        self.expect("}}")?;
        Ok(Node::block(&name, program, inverse))
    }
}
