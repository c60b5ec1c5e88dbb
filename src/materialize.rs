use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::error::MaterializeError;
use crate::fsops;
use crate::tree::{TreeNode, check_name};

/// How a failure partway through the walk is handled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Stop at the first failure and return it.
    #[default]
    FailFast,
    /// Keep going with the remaining siblings and collect every failure.
    BestEffort,
}

/// Walks a [`TreeNode`] and creates the matching layout on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct Materializer {
    pub policy: ErrorPolicy,
    pub dry_run: bool,
}

/// Outcome of a walk.
#[derive(Debug, Default)]
pub struct Report {
    pub directories: usize,
    pub files: usize,
    /// Only populated under [`ErrorPolicy::BestEffort`].
    pub failures: Vec<MaterializeError>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Materialize `node`'s children under `base`, aborting on the first error.
pub fn materialize(base: &Utf8Path, node: &TreeNode) -> Result<(), MaterializeError> {
    Materializer::default().run(base, node).map(|_| ())
}

impl Materializer {
    pub fn new(policy: ErrorPolicy, dry_run: bool) -> Self {
        Self { policy, dry_run }
    }

    /// Create every entry below `root` under `base`. `base` itself is not created.
    ///
    /// Entries are visited depth-first in name order. A directory's children are
    /// only queued once the directory is known to exist, so under
    /// [`ErrorPolicy::BestEffort`] a failed directory takes its subtree with it.
    pub fn run(&self, base: &Utf8Path, root: &TreeNode) -> Result<Report, MaterializeError> {
        let Some(children) = root.children() else {
            return Err(MaterializeError::RootNotDirectory {
                path: base.to_owned(),
            });
        };

        let mut report = Report::default();
        let mut pending: Vec<Pending<'_>> = Vec::new();
        queue_children(&mut pending, base, children);

        while let Some(Pending { name, path, node }) = pending.pop() {
            match self.create(name, &path, node) {
                Ok(()) => match node {
                    TreeNode::Directory(grandchildren) => {
                        report.directories += 1;
                        queue_children(&mut pending, &path, grandchildren);
                    }
                    TreeNode::File(_) => report.files += 1,
                },
                Err(err) => match self.policy {
                    ErrorPolicy::FailFast => return Err(err),
                    ErrorPolicy::BestEffort => {
                        warn!(path = %path, error = %err, "skipping entry");
                        report.failures.push(err);
                    }
                },
            }
        }

        Ok(report)
    }

    fn create(&self, name: &str, path: &Utf8Path, node: &TreeNode) -> Result<(), MaterializeError> {
        check_name(name).map_err(|reason| MaterializeError::InvalidPath {
            path: path.to_owned(),
            reason: reason.to_owned(),
        })?;

        match node {
            TreeNode::Directory(_) => {
                debug!(path = %path, dry_run = self.dry_run, "directory");
                if !self.dry_run {
                    fsops::ensure_directory(path)?;
                }
            }
            TreeNode::File(contents) => {
                debug!(path = %path, bytes = contents.len(), dry_run = self.dry_run, "file");
                if !self.dry_run {
                    fsops::create_or_truncate_file(path, contents)?;
                }
            }
        }
        Ok(())
    }
}

struct Pending<'a> {
    name: &'a str,
    path: Utf8PathBuf,
    node: &'a TreeNode,
}

/// Push children in reverse name order so they pop in name order.
fn queue_children<'a>(
    pending: &mut Vec<Pending<'a>>,
    parent: &Utf8Path,
    children: &'a BTreeMap<String, TreeNode>,
) {
    for (name, node) in children.iter().rev() {
        pending.push(Pending {
            name,
            path: fsops::join(parent, name),
            node,
        });
    }
}
