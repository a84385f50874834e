//! # hbsprep - Whitespace preprocessor for Handlebars templates
//!
//! hbsprep decides, per node of a parsed Handlebars/HTML template tree,
//! whether the whitespace immediately surrounding it affects rendered
//! output, approximating browser CSS layout rules (`display`,
//! `white-space: pre`). A pretty-printer that honors the annotations can
//! freely reflow, indent, and rewrap template text without changing what a
//! browser would render.
//!
//! ## Status
//!
//! The inference models a fixed tag-keyed default display table plus a small
//! set of structural overrides, not a real CSS cascade. It matches the
//! whitespace behavior of major browsers for the common HTML tags; exotic
//! stylesheets are out of scope.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```rust
//! use hbsprep::preprocess::{preprocess_source, PreprocessOptions};
//!
//! let template = "<p>\n  Hello {{name}}\n</p>";
//!
//! let opts = PreprocessOptions::default();
//! let tree = preprocess_source(template, &opts).unwrap();
//! println!("{:#?}", tree);
//! ```
//!
//! ### As a CLI Tool
//!
//! The crate also ships a command-line tool that walks `.hbs` files and
//! dumps their annotated trees. See the `main` module for CLI usage.
//!
//! ## Modules
//!
//! - [`ast`] - Template tree and annotation data model
//! - [`parser`] - Minimal Handlebars/HTML template parser
//! - [`tables`] - Default CSS display / white-space categories per tag
//! - [`preprocess`] - The three-pass annotation pipeline
//!
//! ## Limitations
//!
//! - The parser covers template structure only; expressions and attribute
//!   values are carried as raw strings
//! - Raw-text elements (`<script>`, `<style>`) are parsed like ordinary
//!   elements, so markup-looking text inside them will confuse the parser
//! - No CSS cascade: only per-tag defaults and structural overrides

/// Template tree and annotation data model
pub mod ast;

/// Minimal Handlebars/HTML template parser
pub mod parser;

/// The three-pass annotation pipeline
pub mod preprocess;

/// Default CSS display / white-space categories per tag
pub mod tables;

#[cfg(test)]
mod debug;
