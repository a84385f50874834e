use crate::ast::{Node, NodeKind};

fn debug_tree(node: &Node, indent: usize) {
    let indent_str = "  ".repeat(indent);
    let label = match &node.kind {
        NodeKind::Root { .. } => "root".to_string(),
        NodeKind::Element { tag, .. } => format!("element <{}>", tag),
        NodeKind::Text { chars } => format!("text {:?}", chars),
        NodeKind::Mustache { content } => format!("mustache {:?}", content),
        NodeKind::Block { name, .. } => format!("block {:?}", name),
        NodeKind::Comment { value } => format!("comment {:?}", value),
        NodeKind::MustacheComment { value } => format!("mustache-comment {:?}", value),
    };

    println!("{}{}: {:?}", indent_str, label, node.anno);

    match &node.kind {
        NodeKind::Root { children } | NodeKind::Element { children, .. } => {
            for child in children {
                debug_tree(child, indent + 1);
            }
        }
        NodeKind::Block {
            program, inverse, ..
        } => {
            for child in program.iter().chain(inverse.iter()) {
                debug_tree(child, indent + 1);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::{preprocess_source, PreprocessOptions};

    #[test]
    fn debug_annotated_list() {
        let source = r#"<ul>
  <li>one</li>
  <li>{{two}}</li>
</ul>"#;

        let tree = preprocess_source(source, &PreprocessOptions::default()).unwrap();
        debug_tree(&tree, 0);
    }
}
