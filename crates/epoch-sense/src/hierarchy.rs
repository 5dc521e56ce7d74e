//! The host's project tree, reduced to the four queries the reparse needs.
//!
//! A host exposes its tree through [`Hierarchy`]: resolve a nested
//! hierarchy, resolve a canonical path, and follow first-child/next-sibling
//! links. [`NodeTree`] is an in-memory implementation used by the directory
//! scanner and by hosts that mirror their own tree.
//!
//! ## Walk order
//!
//! Depth first, parent before children, siblings in link order. A node whose
//! nested hierarchy resolves to that hierarchy's root is replaced by the
//! nested hierarchy, which is walked to completion before the parent's next
//! sibling. The walk keeps an explicit stack, so tree depth never grows the
//! call stack.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

/// Identifier of an item within one hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

impl ItemId {
    /// The root item of any hierarchy.
    pub const ROOT: Self = Self(0xFFFF_FFFE);
    /// "No item", terminating child and sibling chains.
    pub const NIL: Self = Self(0xFFFF_FFFF);
}

/// Read-only view of a host project tree.
pub trait Hierarchy {
    /// If `item` hosts a nested hierarchy, that hierarchy and the item it maps to.
    fn resolve_nested_root(&self, item: ItemId) -> Option<(Arc<dyn Hierarchy>, ItemId)>;

    /// Canonical path of `item`, if it has one.
    fn canonical_path(&self, item: ItemId) -> Option<PathBuf>;

    /// First child of `item`.
    fn first_child(&self, item: ItemId) -> Option<ItemId>;

    /// Next sibling of `item`.
    fn next_sibling(&self, item: ItemId) -> Option<ItemId>;
}

/// Collect the canonical paths accepted by `filter`, in walk order.
pub fn collect_paths(root: Arc<dyn Hierarchy>, mut filter: impl FnMut(&Path) -> bool) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut stack: Vec<(Arc<dyn Hierarchy>, ItemId)> = vec![(root, ItemId::ROOT)];

    while let Some((hierarchy, item)) = stack.pop() {
        if let Some((nested, nested_item)) = hierarchy.resolve_nested_root(item) {
            if nested_item == ItemId::ROOT {
                trace!(item = item.0, "Descending into nested hierarchy");
                stack.push((nested, ItemId::ROOT));
                continue;
            }
        }

        if let Some(path) = hierarchy.canonical_path(item) {
            if filter(&path) {
                paths.push(path);
            }
        }

        let mut children = Vec::new();
        let mut next = hierarchy.first_child(item);
        while let Some(child) = next.filter(|c| *c != ItemId::NIL) {
            children.push(child);
            next = hierarchy.next_sibling(child);
        }

        // Reversed so the first child is popped first.
        stack.extend(children.into_iter().rev().map(|c| (Arc::clone(&hierarchy), c)));
    }

    paths
}

#[derive(Default)]
struct Node {
    path: Option<PathBuf>,
    first_child: Option<ItemId>,
    last_child: Option<ItemId>,
    next_sibling: Option<ItemId>,
    nested: Option<Arc<dyn Hierarchy>>,
}

/// An arena-backed [`Hierarchy`].
///
/// Item ids are handed out in insertion order starting at 1; the root is
/// always [`ItemId::ROOT`].
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Create a tree holding only a root.
    #[must_use]
    pub fn new(root_path: Option<PathBuf>) -> Self {
        Self {
            nodes: vec![Node {
                path: root_path,
                ..Node::default()
            }],
        }
    }

    /// Append an item under `parent`, after its existing children.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn add_item(&mut self, parent: ItemId, path: Option<PathBuf>) -> Option<ItemId> {
        self.push_child(
            parent,
            Node {
                path,
                ..Node::default()
            },
        )
    }

    /// Append an item under `parent` that hosts a nested hierarchy.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn add_nested(&mut self, parent: ItemId, nested: Arc<dyn Hierarchy>) -> Option<ItemId> {
        self.push_child(
            parent,
            Node {
                nested: Some(nested),
                ..Node::default()
            },
        )
    }

    /// Number of items, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn push_child(&mut self, parent: ItemId, node: Node) -> Option<ItemId> {
        let parent_index = self.index(parent)?;
        let id = ItemId(u32::try_from(self.nodes.len()).ok()?);
        self.nodes.push(node);

        match self.nodes[parent_index].last_child {
            Some(last) => {
                let last_index = self.index(last)?;
                self.nodes[last_index].next_sibling = Some(id);
            }
            None => self.nodes[parent_index].first_child = Some(id),
        }
        self.nodes[parent_index].last_child = Some(id);

        Some(id)
    }

    fn index(&self, item: ItemId) -> Option<usize> {
        match item {
            ItemId::ROOT => Some(0),
            ItemId(0) | ItemId::NIL => None,
            ItemId(n) => usize::try_from(n).ok().filter(|i| *i < self.nodes.len()),
        }
    }

    fn node(&self, item: ItemId) -> Option<&Node> {
        self.nodes.get(self.index(item)?)
    }
}

impl Hierarchy for NodeTree {
    fn resolve_nested_root(&self, item: ItemId) -> Option<(Arc<dyn Hierarchy>, ItemId)> {
        let nested = self.node(item)?.nested.as_ref()?;
        Some((Arc::clone(nested), ItemId::ROOT))
    }

    fn canonical_path(&self, item: ItemId) -> Option<PathBuf> {
        self.node(item)?.path.clone()
    }

    fn first_child(&self, item: ItemId) -> Option<ItemId> {
        self.node(item)?.first_child
    }

    fn next_sibling(&self, item: ItemId) -> Option<ItemId> {
        self.node(item)?.next_sibling
    }
}

impl std::fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeTree")
            .field("items", &self.nodes.len())
            .finish_non_exhaustive()
    }
}
