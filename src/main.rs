mod ast;
mod parser;
mod preprocess;
mod tables;

use anyhow::{bail, Result};
use ast::{Node, NodeKind};
use clap::{Parser, Subcommand};
use preprocess::{preprocess_source, PreprocessOptions, WhitespaceSensitivity};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "hbsprep",
    version,
    about = "Whitespace-significance analyzer for Handlebars templates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse templates, run the annotation pipeline, and dump the result
    Annotate {
        /// Paths (files or directories) to analyze (defaults to current dir)
        paths: Vec<PathBuf>,
        /// Whitespace sensitivity: css, strict, or ignore
        #[arg(long, default_value = "css")]
        whitespace_sensitivity: String,
    },
    /// Print the parsed tree without annotations
    Parse {
        /// File to parse
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Annotate {
            paths,
            whitespace_sensitivity,
        } => {
            let sensitivity = match whitespace_sensitivity.as_str() {
                "css" => WhitespaceSensitivity::Css,
                "strict" => WhitespaceSensitivity::Strict,
                "ignore" => WhitespaceSensitivity::Ignore,
                other => bail!("unknown whitespace sensitivity {:?}", other),
            };
            let opts = PreprocessOptions {
                whitespace_sensitivity: sensitivity,
            };
            let targets = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            let mut template_files = Vec::new();
            for p in targets {
                collect_template_files(&p, &mut template_files);
            }

            let results: Vec<_> = template_files
                .par_iter()
                .map(|path| annotate_file(path, &opts))
                .collect();
            let mut had_error = false;
            for r in results {
                match r {
                    Ok(report) => print!("{}", report),
                    Err(e) => {
                        had_error = true;
                        eprintln!("{}", e);
                    }
                }
            }
            if had_error {
                std::process::exit(1);
            }
        }
        Commands::Parse { file } => {
            parse_file(&file)?;
        }
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let tree = parser::parse(&content)?;
    println!("===== {} =====", path.display());
    print_tree(&tree, 0, false);
    Ok(())
}

fn annotate_file(path: &Path, opts: &PreprocessOptions) -> Result<String> {
    let content = fs::read_to_string(path)?;
    let tree = preprocess_source(&content, opts)?;
    let mut out = format!("===== {} =====\n", path.display());
    render_tree(&tree, 0, true, &mut out);
    Ok(out)
}

fn print_tree(node: &Node, depth: usize, annotated: bool) {
    let mut out = String::new();
    render_tree(node, depth, annotated, &mut out);
    print!("{}", out);
}

fn render_tree(node: &Node, depth: usize, annotated: bool, out: &mut String) {
    let indent = "  ".repeat(depth);
    let label = match &node.kind {
        NodeKind::Root { .. } => "root".to_string(),
        NodeKind::Element { tag, .. } => format!("element <{}>", tag),
        NodeKind::Text { chars } => format!("text {:?}", chars),
        NodeKind::Mustache { content } => format!("mustache {{{{{}}}}}", content),
        NodeKind::Block { name, .. } => format!("block #{}", name),
        NodeKind::Comment { value } => format!("comment {:?}", value),
        NodeKind::MustacheComment { value } => format!("mustache-comment {:?}", value),
    };
    out.push_str(&indent);
    out.push_str(&label);
    if annotated {
        out.push_str(&format!(" [{}]", describe_annotations(node)));
    }
    out.push('\n');

    match &node.kind {
        NodeKind::Root { children } | NodeKind::Element { children, .. } => {
            for child in children {
                render_tree(child, depth + 1, annotated, out);
            }
        }
        NodeKind::Block {
            program, inverse, ..
        } => {
            for child in program {
                render_tree(child, depth + 1, annotated, out);
            }
            if !inverse.is_empty() {
                out.push_str(&indent);
                out.push_str("  else\n");
                for child in inverse {
                    render_tree(child, depth + 2, annotated, out);
                }
            }
        }
        NodeKind::Text { .. }
        | NodeKind::Mustache { .. }
        | NodeKind::Comment { .. }
        | NodeKind::MustacheComment { .. } => {}
    }
}

fn describe_annotations(node: &Node) -> String {
    let mut parts = vec![format!("display={}", node.display())];
    let a = &node.anno;
    for (set, name) in [
        (a.is_whitespace_sensitive, "ws-sensitive"),
        (a.is_indentation_sensitive, "indent-sensitive"),
        (a.is_leading_space_sensitive, "lead-sensitive"),
        (a.is_trailing_space_sensitive, "trail-sensitive"),
        (a.is_dangling_space_sensitive, "dangling-sensitive"),
        (a.has_leading_spaces, "lead-spaces"),
        (a.has_trailing_spaces, "trail-spaces"),
        (a.has_dangling_spaces, "dangling-spaces"),
    ] {
        if set {
            parts.push(name.to_string());
        }
    }
    parts.join(" ")
}

fn collect_template_files(path: &Path, out: &mut Vec<PathBuf>) {
    if path.is_file() {
        if is_template_path(path) {
            out.push(path.to_path_buf());
        }
        return;
    }
    for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && is_template_path(p) {
            out.push(p.to_path_buf());
        }
    }
}

fn is_template_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("hbs") | Some("handlebars")
    )
}
