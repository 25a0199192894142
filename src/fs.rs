use thiserror::Error;
use tracing::debug;

pub mod alloc;
pub mod geometry;
pub mod path;
pub mod tree;

pub use alloc::{BlockAllocator, BlockId, BlockState};
pub use geometry::Geometry;
use tree::{KindFilter, Node, NodeId, NodeKind, Tree};

#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FSError {
    #[error("Not enough space: {needed} block(s) needed, {free} free")]
    OutOfSpace { needed: u64, free: usize },
    #[error("Directory '{0}' not found")]
    PathNotFound(String),
    #[error("'{0}' not found")]
    NotFound(String),
    #[error("'{0}' already exists")]
    AlreadyExists(String),
    #[error("Directory '{0}' is not empty")]
    DirectoryNotEmpty(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, FSError>;

/// Format of node timestamps.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

fn local_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { size: u64 },
}

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Newest first
    pub entries: Vec<Entry>,
    pub file_count: usize,
    pub dir_count: usize,
    /// Sum of the declared sizes of the listed files
    pub used_bytes: u64,
    /// Free space left on the whole disk
    pub free_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub depth: usize,
    pub name: String,
}

/// A simulated disk together with the namespace stored on it.
/// Every operation either succeeds completely or leaves the
/// file system untouched.
#[derive(Debug)]
pub struct FileSystem {
    geometry: Geometry,
    blocks: BlockAllocator,
    tree: Tree,
    clock: fn() -> String,
}

impl FileSystem {
    pub fn new(geometry: Geometry) -> Self {
        Self::with_clock(geometry, local_timestamp)
    }

    /// Like [`FileSystem::new`], with `clock` producing the timestamps.
    pub fn with_clock(geometry: Geometry, clock: fn() -> String) -> Self {
        debug!(
            "Initializing {} blocks of {} bytes, {} reserved",
            geometry.block_count, geometry.block_size, geometry.reserved
        );
        Self {
            blocks: BlockAllocator::new(&geometry),
            tree: Tree::new(clock()),
            geometry,
            clock,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn free_count(&self) -> usize {
        self.blocks.free_count()
    }

    pub fn free_bytes(&self) -> u64 {
        self.blocks.free_count() as u64 * self.geometry.block_size
    }

    pub fn is_free(&self, block: BlockId) -> bool {
        self.blocks.is_free(block)
    }

    /// Blocks held by live nodes: one per directory plus every file chain.
    pub fn used_blocks(&self) -> usize {
        self.tree.nodes().map(Node::block_usage).sum()
    }

    /// Nodes in the namespace, the root included.
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    fn ensure_vacant(&self, parent: NodeId, name: &str) -> Result<()> {
        match self.tree.find_child(parent, name, KindFilter::Any) {
            Some(_) => Err(FSError::AlreadyExists(name.to_string())),
            None => Ok(()),
        }
    }

    fn insert(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        let name = node.name.clone();
        let blocks = node.owned_blocks();
        match self.tree.insert_child(parent, node) {
            Some(id) => Ok(id),
            None => {
                blocks.into_iter().for_each(|block| self.blocks.release(block));
                Err(FSError::PathNotFound(name))
            }
        }
    }

    pub fn create_dir(&mut self, path: &str) -> Result<()> {
        let (parent, name) = path::resolve_parent(&self.tree, self.tree.root(), path)?;
        self.ensure_vacant(parent, name)?;
        let block = self.blocks.allocate()?;
        let node = Node::directory(name, (self.clock)(), block);
        self.insert(parent, node)?;
        debug!("Created directory {path:?} on block {block}");
        Ok(())
    }

    pub fn create_file(&mut self, path: &str, size: u64) -> Result<()> {
        let (parent, name) = path::resolve_parent(&self.tree, self.tree.root(), path)?;
        self.ensure_vacant(parent, name)?;
        let needed = self.geometry.blocks_for(size);
        let free = self.blocks.free_count();
        if needed > free as u64 {
            return Err(FSError::OutOfSpace { needed, free });
        }
        let mut chain = Vec::with_capacity(needed as usize);
        for _ in 0..needed {
            match self.blocks.allocate() {
                Ok(block) => chain.push(block),
                Err(_) => {
                    chain.iter().for_each(|&block| self.blocks.release(block));
                    return Err(FSError::OutOfSpace { needed, free });
                }
            }
        }
        debug!("Created file {path:?} of {size} bytes on blocks {chain:?}");
        let node = Node::file(name, (self.clock)(), size, chain);
        self.insert(parent, node)?;
        Ok(())
    }

    pub fn remove_dir(&mut self, path: &str) -> Result<()> {
        let (parent, name) = path::resolve_parent(&self.tree, self.tree.root(), path)?;
        let target = self
            .tree
            .find_child(parent, name, KindFilter::Directory)
            .ok_or_else(|| FSError::NotFound(name.to_string()))?;
        if self.tree[target].has_children() {
            return Err(FSError::DirectoryNotEmpty(name.to_string()));
        }
        self.destroy(parent, target, name)?;
        debug!("Removed directory {path:?}");
        Ok(())
    }

    pub fn remove_file(&mut self, path: &str) -> Result<()> {
        let (parent, name) = path::resolve_parent(&self.tree, self.tree.root(), path)?;
        let target = self
            .tree
            .find_child(parent, name, KindFilter::File)
            .ok_or_else(|| FSError::NotFound(name.to_string()))?;
        self.destroy(parent, target, name)?;
        debug!("Removed file {path:?}");
        Ok(())
    }

    /// Detaches `target` first, then gives its blocks back.
    fn destroy(&mut self, parent: NodeId, target: NodeId, name: &str) -> Result<()> {
        let node = self
            .tree
            .remove_child(parent, target)
            .ok_or_else(|| FSError::NotFound(name.to_string()))?;
        for block in node.owned_blocks() {
            self.blocks.release(block);
        }
        Ok(())
    }

    /// Lists the directory at `path`, or the root when `path` is `None`.
    pub fn list_dir(&self, path: Option<&str>) -> Result<Listing> {
        let dir = path::resolve_dir(&self.tree, self.tree.root(), path.unwrap_or(""))?;
        let mut listing = Listing {
            entries: Vec::new(),
            file_count: 0,
            dir_count: 0,
            used_bytes: 0,
            free_bytes: self.free_bytes(),
        };
        for child in self.tree.children(dir) {
            let node = &self.tree[child];
            let kind = match &node.kind {
                NodeKind::Directory => {
                    listing.dir_count += 1;
                    EntryKind::Directory
                }
                NodeKind::File { size, .. } => {
                    listing.file_count += 1;
                    listing.used_bytes += size;
                    EntryKind::File { size: *size }
                }
            };
            listing.entries.push(Entry {
                name: node.name.clone(),
                kind,
                created: node.created.clone(),
            });
        }
        Ok(listing)
    }

    /// Every directory in pre-order. Files are not part of the tree view.
    pub fn tree(&self) -> Vec<TreeEntry> {
        self.tree
            .directories()
            .into_iter()
            .map(|(depth, id)| TreeEntry {
                depth,
                name: self.tree[id].name.clone(),
            })
            .collect()
    }

    pub fn block_map(&self) -> Vec<BlockState> {
        self.blocks.states().collect()
    }

    pub fn file_blocks(&self, path: &str) -> Result<Vec<BlockId>> {
        let (parent, name) = path::resolve_parent(&self.tree, self.tree.root(), path)?;
        let target = self
            .tree
            .find_child(parent, name, KindFilter::File)
            .ok_or_else(|| FSError::NotFound(name.to_string()))?;
        match &self.tree[target].kind {
            NodeKind::File { chain, .. } => Ok(chain.clone()),
            NodeKind::Directory => Err(FSError::NotFound(name.to_string())),
        }
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}
