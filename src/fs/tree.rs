//! The namespace: an arena of directory and
//! file nodes addressed by [`NodeId`] handles.
//!
//! A handle carries the generation of the slot
//! it was issued for, so a handle that outlives
//! its node never resolves to a newer node that
//! reused the slot.

use std::collections::VecDeque;
use std::ops::Index;

use super::alloc::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File {
        /// Declared size in bytes
        size: u64,
        /// Every block backing the file, in order
        chain: Vec<BlockId>,
    },
}

/// Which kinds of node a lookup accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Directory,
    File,
    Any,
}

impl KindFilter {
    fn accepts(self, kind: &NodeKind) -> bool {
        match (self, kind) {
            (KindFilter::Any, _) => true,
            (KindFilter::Directory, NodeKind::Directory) => true,
            (KindFilter::File, NodeKind::File { .. }) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Creation time, already formatted for display.
    pub created: String,
    /// The directory's own block, or the head of a file's chain.
    /// `None` for the root and for empty files.
    pub block: Option<BlockId>,
    pub kind: NodeKind,
    /// Newest first.
    children: VecDeque<NodeId>,
}

impl Node {
    pub fn directory(name: impl Into<String>, created: impl Into<String>, block: BlockId) -> Self {
        Self {
            name: name.into(),
            created: created.into(),
            block: Some(block),
            kind: NodeKind::Directory,
            children: VecDeque::new(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        created: impl Into<String>,
        size: u64,
        chain: Vec<BlockId>,
    ) -> Self {
        Self {
            name: name.into(),
            created: created.into(),
            block: chain.first().copied(),
            kind: NodeKind::File { size, chain },
            children: VecDeque::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of blocks this node holds in the allocator.
    pub fn block_usage(&self) -> usize {
        match &self.kind {
            NodeKind::Directory => usize::from(self.block.is_some()),
            NodeKind::File { chain, .. } => chain.len(),
        }
    }

    /// Blocks to hand back to the allocator when the node is destroyed.
    pub fn owned_blocks(&self) -> Vec<BlockId> {
        match &self.kind {
            NodeKind::Directory => self.block.into_iter().collect(),
            NodeKind::File { chain, .. } => chain.clone(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    root: NodeId,
}

impl Tree {
    pub fn new(created: impl Into<String>) -> Self {
        let root = Node {
            name: String::new(),
            created: created.into(),
            block: None,
            kind: NodeKind::Directory,
            children: VecDeque::new(),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            vacant: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Live nodes, the root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.slots.iter().filter_map(|slot| slot.node.as_ref())
    }

    /// Children of `parent`, newest first.
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.get(parent)
            .into_iter()
            .flat_map(|node| node.children.iter().copied())
    }

    pub fn find_child(&self, parent: NodeId, name: &str, filter: KindFilter) -> Option<NodeId> {
        self.children(parent).find(|&child| {
            self.get(child)
                .is_some_and(|node| node.name == name && filter.accepts(&node.kind))
        })
    }

    /// Stores `node` and makes it the newest child of `parent`.
    /// Returns `None`, dropping `node`, if `parent` is stale.
    pub fn insert_child(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        self.get(parent)?;
        let id = match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.get_mut(parent)?.children.push_front(id);
        Some(id)
    }

    /// Unlinks `child` from `parent` and hands the node back. The caller
    /// is responsible for its blocks. Children of `child`, if any, are
    /// left unreachable, so callers check emptiness first.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<Node> {
        let siblings = &mut self.get_mut(parent)?.children;
        let position = siblings.iter().position(|&id| id == child)?;
        siblings.remove(position);
        let slot = &mut self.slots[child.index];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(child.index);
        Some(node)
    }

    /// Every directory below the root in pre-order, with its depth
    /// (direct children of the root have depth 0).
    pub fn directories(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, NodeId)> = self
            .children(self.root)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|id| (0, id))
            .collect();
        while let Some((depth, id)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if !node.is_dir() {
                continue;
            }
            out.push((depth, id));
            stack.extend(node.children.iter().rev().map(|&child| (depth + 1, child)));
        }
        out
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    /// Panics if `id` is stale.
    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {id:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &Tree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .map(|id| tree[id].name.clone())
            .collect()
    }

    #[test]
    fn children_are_listed_newest_first() {
        let mut tree = Tree::new("now");
        let root = tree.root();
        tree.insert_child(root, Node::directory("a", "now", 10));
        tree.insert_child(root, Node::file("b", "now", 10, vec![11]));
        tree.insert_child(root, Node::directory("c", "now", 12));
        assert_eq!(names(&tree, root), ["c", "b", "a"]);
    }

    #[test]
    fn find_child_honours_kind_filter() {
        let mut tree = Tree::new("now");
        let root = tree.root();
        let dir = tree.insert_child(root, Node::directory("x", "now", 10)).unwrap();
        assert_eq!(tree.find_child(root, "x", KindFilter::Directory), Some(dir));
        assert_eq!(tree.find_child(root, "x", KindFilter::Any), Some(dir));
        assert_eq!(tree.find_child(root, "x", KindFilter::File), None);
        assert_eq!(tree.find_child(root, "X", KindFilter::Any), None);
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut tree = Tree::new("now");
        let root = tree.root();
        let old = tree.insert_child(root, Node::directory("a", "now", 10)).unwrap();
        let node = tree.remove_child(root, old).unwrap();
        assert_eq!(node.name, "a");
        assert!(tree.get(old).is_none());

        let new = tree.insert_child(root, Node::directory("b", "now", 11)).unwrap();
        assert_ne!(old, new);
        assert!(tree.get(old).is_none());
        assert_eq!(tree[new].name, "b");
        assert!(tree.remove_child(root, old).is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn remove_keeps_sibling_order() {
        let mut tree = Tree::new("now");
        let root = tree.root();
        tree.insert_child(root, Node::directory("a", "now", 10));
        let b = tree.insert_child(root, Node::directory("b", "now", 11)).unwrap();
        tree.insert_child(root, Node::directory("c", "now", 12));
        tree.remove_child(root, b);
        assert_eq!(names(&tree, root), ["c", "a"]);
    }

    #[test]
    fn directories_walk_in_pre_order_skipping_files() {
        let mut tree = Tree::new("now");
        let root = tree.root();
        let a = tree.insert_child(root, Node::directory("a", "now", 10)).unwrap();
        tree.insert_child(a, Node::directory("a1", "now", 11));
        tree.insert_child(a, Node::file("f", "now", 0, vec![]));
        tree.insert_child(root, Node::directory("b", "now", 12));

        let walk: Vec<_> = tree
            .directories()
            .into_iter()
            .map(|(depth, id)| (depth, tree[id].name.clone()))
            .collect();
        assert_eq!(
            walk,
            [(0, "b".to_string()), (0, "a".to_string()), (1, "a1".to_string())]
        );
    }

    #[test]
    fn block_usage_counts_owned_blocks() {
        let dir = Node::directory("d", "now", 10);
        let file = Node::file("f", "now", 1500, vec![11, 12, 13]);
        let empty = Node::file("e", "now", 0, vec![]);
        assert_eq!(dir.block_usage(), 1);
        assert_eq!(file.block_usage(), 3);
        assert_eq!(file.block, Some(11));
        assert_eq!(empty.block_usage(), 0);
        assert_eq!(empty.block, None);
    }
}
