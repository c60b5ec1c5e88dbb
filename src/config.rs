use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use toml_edit::{DocumentMut, Item, Table, value};

use crate::tree::TreeNode;

/// Load a skeleton description. `.json` files are read as JSON, anything else as TOML.
pub fn load_from_path(path: &Utf8Path) -> Result<TreeNode> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading description {}", path))?;
    let tree = parse(path, &raw)?;
    if !tree.is_dir() {
        bail!("description {} must have a table at the top level", path);
    }
    tree.validate()
        .with_context(|| format!("validating description {}", path))?;
    Ok(tree)
}

fn is_json(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse(path: &Utf8Path, raw: &str) -> Result<TreeNode> {
    if is_json(path) {
        serde_json::from_str(raw).with_context(|| format!("parsing description {}", path))
    } else {
        toml::from_str(raw).with_context(|| format!("parsing description {}", path))
    }
}

/// Write `tree` as a description that [`load_from_path`] reads back unchanged.
///
/// `.json` targets get pretty-printed JSON, anything else TOML.
pub fn write_description(path: &Utf8Path, tree: &TreeNode, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!("{} already exists; rerun with --force to overwrite", path);
    }
    let Some(children) = tree.children() else {
        bail!("only a directory can be written as a description");
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating directory {}", parent))?;
    }

    let rendered = if is_json(path) {
        let mut json = serde_json::to_string_pretty(tree)
            .with_context(|| format!("serializing description {}", path))?;
        json.push('\n');
        json
    } else {
        let mut doc = DocumentMut::new();
        fill_table(doc.as_table_mut(), children);
        doc.to_string()
    };
    fs::write(path, rendered).with_context(|| format!("writing description {}", path))
}

fn fill_table(table: &mut Table, children: &BTreeMap<String, TreeNode>) {
    for (name, child) in children {
        match child {
            TreeNode::File(contents) => {
                table.insert(name, value(contents.as_str()));
            }
            TreeNode::Directory(grandchildren) => {
                let mut nested = Table::new();
                fill_table(&mut nested, grandchildren);
                table.insert(name, Item::Table(nested));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn loads_toml_description() {
        let (_guard, root) = scratch();
        let path = root.join("skeleton.toml");
        fs::write(
            &path,
            r#"
"a.txt" = ""

[sub]
"b.txt" = "hello"
"#,
        )
        .unwrap();
        let tree = load_from_path(&path).unwrap();
        assert_eq!(
            tree,
            TreeNode::dir([
                ("a.txt", TreeNode::empty_file()),
                ("sub", TreeNode::dir([("b.txt", TreeNode::file("hello"))])),
            ])
        );
    }

    #[test]
    fn loads_json_description() {
        let (_guard, root) = scratch();
        let path = root.join("skeleton.json");
        fs::write(&path, r#"{"a.txt": "", "sub": {"b.txt": "hello"}}"#).unwrap();
        assert_eq!(load_from_path(&path).unwrap().counts(), (1, 2));
    }

    #[test]
    fn rejects_unusable_names() {
        let (_guard, root) = scratch();
        let path = root.join("bad.json");
        fs::write(&path, r#"{"src": {"../up": ""}}"#).unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("src/../up"), "{err:#}");
    }

    #[test]
    fn rejects_top_level_string() {
        let (_guard, root) = scratch();
        let path = root.join("flat.json");
        fs::write(&path, r#""just text""#).unwrap();
        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn written_blueprint_reads_back() {
        let (_guard, root) = scratch();
        let path = root.join("nested").join("skeleton.toml");
        let tree = blueprint::default_tree();
        write_description(&path, &tree, false).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), tree);
    }

    #[test]
    fn written_json_description_reads_back() {
        let (_guard, root) = scratch();
        let path = root.join("skeleton.json");
        let tree = TreeNode::dir([
            ("a.txt", TreeNode::empty_file()),
            ("sub", TreeNode::dir([("b.txt", TreeNode::file("hello"))])),
        ]);
        write_description(&path, &tree, false).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let written: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            written,
            serde_json::json!({"a.txt": "", "sub": {"b.txt": "hello"}})
        );
        assert_eq!(load_from_path(&path).unwrap(), tree);
    }

    #[test]
    fn write_refuses_to_clobber_without_force() {
        let (_guard, root) = scratch();
        let path = root.join("skeleton.toml");
        fs::write(&path, "# mine\n").unwrap();
        let tree = TreeNode::dir([("x", TreeNode::file("body"))]);
        assert!(write_description(&path, &tree, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        write_description(&path, &tree, true).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), tree);
    }
}
