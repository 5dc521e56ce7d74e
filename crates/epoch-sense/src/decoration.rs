//! Icons for project tree nodes.

use std::path::Path;

use serde::Serialize;

use crate::config::Config;

/// What a tree node represents to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// The workspace root node
    ProjectRoot,
    /// A file that exists on disk
    FileOnDisk,
    /// Folders, virtual items and anything else
    Other,
}

/// Icon a host should show for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Epoch project icon
    Project,
    /// Epoch source document icon
    Document,
}

/// Pick the icon for a node, or `None` to leave the host default.
#[must_use]
pub fn icon_for(role: NodeRole, path: Option<&Path>, config: &Config) -> Option<Icon> {
    match role {
        NodeRole::ProjectRoot => Some(Icon::Project),
        NodeRole::FileOnDisk if path.is_some_and(|p| config.is_source_file(p)) => {
            Some(Icon::Document)
        }
        NodeRole::FileOnDisk | NodeRole::Other => None,
    }
}
