use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// One entry of a skeleton description.
///
/// Directories hold their children keyed by name, so sibling names are unique
/// by construction. Files hold the literal contents written on creation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TreeNode {
    Directory(BTreeMap<String, TreeNode>),
    File(String),
}

/// Structural problem found while validating a description.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("invalid entry name at `{location}`: {reason}")]
pub struct NameError {
    pub location: String,
    pub reason: &'static str,
}

impl TreeNode {
    pub fn dir<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, TreeNode)>,
        K: Into<String>,
    {
        TreeNode::Directory(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    pub fn file(contents: impl Into<String>) -> Self {
        TreeNode::File(contents.into())
    }

    pub fn empty_file() -> Self {
        TreeNode::File(String::new())
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory(_))
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match self {
            TreeNode::Directory(children) => Some(children),
            TreeNode::File(_) => None,
        }
    }

    /// Count `(directories, files)` below this node, excluding the node itself.
    pub fn counts(&self) -> (usize, usize) {
        let mut dirs = 0;
        let mut files = 0;
        let mut pending: Vec<&TreeNode> = vec![self];
        while let Some(node) = pending.pop() {
            let Some(children) = node.children() else {
                continue;
            };
            for child in children.values() {
                if child.is_dir() {
                    dirs += 1;
                    pending.push(child);
                } else {
                    files += 1;
                }
            }
        }
        (dirs, files)
    }

    /// Reject names that cannot be used as a single path segment.
    pub fn validate(&self) -> Result<(), NameError> {
        let mut pending: Vec<(String, &TreeNode)> = vec![(String::new(), self)];
        while let Some((prefix, node)) = pending.pop() {
            let Some(children) = node.children() else {
                continue;
            };
            for (name, child) in children {
                let location = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };
                if let Err(reason) = check_name(name) {
                    return Err(NameError { location, reason });
                }
                pending.push((location, child));
            }
        }
        Ok(())
    }
}

/// Check that `name` is a usable path segment.
pub fn check_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }
    if name == "." || name == ".." {
        return Err("name refers to a relative directory");
    }
    if name.contains(['/', '\\']) {
        return Err("name contains a path separator");
    }
    if name.contains('\0') {
        return Err("name contains a NUL byte");
    }
    Ok(())
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeNode::File(contents) => serializer.serialize_str(contents),
            TreeNode::Directory(children) => serializer.collect_map(children),
        }
    }
}

impl<'de> Deserialize<'de> for TreeNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = TreeNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string of file contents or a table of directory entries")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<TreeNode, E> {
        Ok(TreeNode::File(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<TreeNode, E> {
        Ok(TreeNode::File(value))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TreeNode, A::Error> {
        let mut children = BTreeMap::new();
        while let Some(name) = map.next_key::<String>()? {
            let node = map
                .next_value::<TreeNode>()
                .map_err(|err| de::Error::custom(format!("entry `{name}`: {err}")))?;
            if children.insert(name.clone(), node).is_some() {
                return Err(de::Error::custom(format!("duplicate entry `{name}`")));
            }
        }
        Ok(TreeNode::Directory(children))
    }
}
