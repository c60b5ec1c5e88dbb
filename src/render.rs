use std::fmt::Write as _;

use crate::tree::TreeNode;

/// Render a description as an indented Markdown list, directories suffixed with `/`.
pub fn listing(root_name: &str, tree: &TreeNode) -> String {
    let mut output = String::new();
    match tree {
        TreeNode::Directory(_) => {
            let _ = writeln!(output, "- 📁 **{}/**", root_name);
            walk(tree, &mut output, 1);
        }
        TreeNode::File(_) => {
            let _ = writeln!(output, "- 📄 **{}**", root_name);
        }
    }
    output
}

fn walk(node: &TreeNode, output: &mut String, depth: usize) {
    let Some(children) = node.children() else {
        return;
    };
    let indent = "  ".repeat(depth);

    for (name, child) in children {
        match child {
            TreeNode::Directory(_) => {
                let _ = writeln!(output, "{}- 📁 **{}/**", indent, name);
                walk(child, output, depth + 1);
            }
            TreeNode::File(contents) if contents.is_empty() => {
                let _ = writeln!(output, "{}- 📄 **{}**", indent, name);
            }
            TreeNode::File(contents) => {
                let _ = writeln!(output, "{}- 📄 **{}** ({} bytes)", indent, name, contents.len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_entries_in_name_order() {
        let tree = TreeNode::dir([
            ("sub", TreeNode::dir([("b.txt", TreeNode::file("hello"))])),
            ("a.txt", TreeNode::empty_file()),
        ]);
        assert_eq!(
            listing(".", &tree),
            "- 📁 **./**\n  - 📄 **a.txt**\n  - 📁 **sub/**\n    - 📄 **b.txt** (5 bytes)\n"
        );
    }
}
