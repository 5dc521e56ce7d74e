//! Build a project tree from a directory on disk.
//!
//! Used when no host supplies its own tree (the CLI, tests). Entries are
//! sorted by path so the walk order is stable across platforms. Hidden
//! entries and excluded directories are skipped. A subdirectory holding a
//! [`PROJECT_MARKER`] file is a sub-project: it is scanned into its own
//! [`NodeTree`] and attached as a nested hierarchy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hierarchy::{ItemId, NodeTree};

/// File marking a directory as a sub-project
pub const PROJECT_MARKER: &str = "project.epochproj";

/// Result of scanning a workspace directory.
#[derive(Debug)]
pub struct ScannedWorkspace {
    /// Canonical workspace root
    pub root: PathBuf,
    /// The project tree, rooted at `root`
    pub tree: NodeTree,
    /// Directories that could not be read (path, error reason)
    pub directories_skipped: Vec<(PathBuf, String)>,
    /// Number of sub-projects attached as nested hierarchies
    pub nested_projects: usize,
}

/// Scan `root` into a project tree.
///
/// Unreadable directories are logged and recorded, never fatal.
///
/// # Errors
///
/// Returns [`Error::Workspace`] if `root` does not exist or is not a directory.
pub fn scan(root: &Path, config: &Config) -> Result<ScannedWorkspace> {
    let root = root.canonicalize().map_err(|e| {
        Error::Workspace(format!("workspace root not found: {}: {e}", root.display()))
    })?;
    if !root.is_dir() {
        return Err(Error::Workspace(format!(
            "workspace root is not a directory: {}",
            root.display()
        )));
    }

    let mut scanner = Scanner {
        config,
        directories_skipped: Vec::new(),
        nested_projects: 0,
    };
    let tree = scanner.scan_project(&root);
    debug!(
        root = %root.display(),
        items = tree.len(),
        nested = scanner.nested_projects,
        "Workspace scanned"
    );

    Ok(ScannedWorkspace {
        root,
        tree,
        directories_skipped: scanner.directories_skipped,
        nested_projects: scanner.nested_projects,
    })
}

struct Scanner<'a> {
    config: &'a Config,
    directories_skipped: Vec<(PathBuf, String)>,
    nested_projects: usize,
}

impl Scanner<'_> {
    fn scan_project(&mut self, dir: &Path) -> NodeTree {
        let mut tree = NodeTree::new(Some(dir.to_path_buf()));
        self.walk_dir(dir, &mut tree, ItemId::ROOT);
        tree
    }

    fn walk_dir(&mut self, dir: &Path, tree: &mut NodeTree, parent: ItemId) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    error = %e,
                    "Cannot read directory, skipping"
                );
                self.directories_skipped
                    .push((dir.to_path_buf(), e.to_string()));
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(e) => Some(e.path()),
                Err(e) => {
                    warn!(
                        directory = %dir.display(),
                        error = %e,
                        "Failed to read directory entry, skipping"
                    );
                    None
                }
            })
            .collect();
        paths.sort();

        for path in paths {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            if path.is_dir() {
                if self.config.is_excluded_dir(&name) {
                    continue;
                }
                if path.join(PROJECT_MARKER).is_file() {
                    let nested = self.scan_project(&path);
                    self.nested_projects += 1;
                    tree.add_nested(parent, Arc::new(nested));
                } else if let Some(item) = tree.add_item(parent, Some(path.clone())) {
                    self.walk_dir(&path, tree, item);
                }
            } else if path.is_file() {
                tree.add_item(parent, Some(path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::collect_paths;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("should create parent dirs");
        }
        fs::write(path, "").expect("should write file");
    }

    fn relative_sources(scanned: ScannedWorkspace) -> Vec<String> {
        let root = scanned.root.clone();
        let config = Config::default();
        collect_paths(Arc::new(scanned.tree), |p| config.is_source_file(p))
            .into_iter()
            .map(|p| {
                p.strip_prefix(&root)
                    .expect("paths should be under the root")
                    .display()
                    .to_string()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn scan_orders_entries_and_skips_hidden_and_excluded() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        touch(dir.path(), "b.epoch");
        touch(dir.path(), "a.epoch");
        touch(dir.path(), "lib/c.epoch");
        touch(dir.path(), ".git/hidden.epoch");
        touch(dir.path(), "target/built.epoch");
        touch(dir.path(), "notes.txt");

        let scanned = scan(dir.path(), &Config::default()).expect("scan should succeed");

        assert_eq!(relative_sources(scanned), ["a.epoch", "b.epoch", "lib/c.epoch"]);
    }

    #[test]
    fn marked_subdirectory_becomes_nested_hierarchy() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        touch(dir.path(), "a.epoch");
        touch(dir.path(), "sub/project.epochproj");
        touch(dir.path(), "sub/inner.epoch");
        touch(dir.path(), "z.epoch");

        let scanned = scan(dir.path(), &Config::default()).expect("scan should succeed");

        assert_eq!(scanned.nested_projects, 1);
        assert_eq!(
            relative_sources(scanned),
            ["a.epoch", "sub/inner.epoch", "z.epoch"]
        );
    }

    #[test]
    fn missing_root_is_workspace_error() {
        let err = scan(Path::new("/nonexistent/epoch/workspace"), &Config::default()).unwrap_err();

        assert!(matches!(err, Error::Workspace(_)));
    }

    #[test]
    fn file_root_is_workspace_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        touch(dir.path(), "a.epoch");

        let err = scan(&dir.path().join("a.epoch"), &Config::default()).unwrap_err();

        assert!(err.to_string().contains("not a directory"));
    }
}
