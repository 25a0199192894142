//! Slash separated paths, always relative to the root.
//!
//! A single leading `/` is accepted and ignored. Anything else that
//! would produce an empty segment (a trailing or doubled `/`, or an
//! empty path where a name is required) is rejected.

use super::tree::{KindFilter, NodeId, Tree};
use super::{FSError, Result};

pub const SEPARATOR: char = '/';
/// Longest accepted node name, in bytes.
pub const MAX_NAME_LEN: usize = 99;

fn strip_root(path: &str) -> &str {
    path.strip_prefix(SEPARATOR).unwrap_or(path)
}

/// Splits `path` into its segments, validating each one.
pub fn segments(path: &str) -> Result<Vec<&str>> {
    let trimmed = strip_root(path);
    if trimmed.is_empty() {
        return Err(FSError::InvalidArgument(format!("empty path '{path}'")));
    }
    trimmed
        .split(SEPARATOR)
        .map(|segment| {
            if segment.is_empty() {
                Err(FSError::InvalidArgument(format!(
                    "empty segment in path '{path}'"
                )))
            } else if segment.len() > MAX_NAME_LEN {
                Err(FSError::InvalidArgument(format!(
                    "name '{segment}' is longer than {MAX_NAME_LEN} bytes"
                )))
            } else {
                Ok(segment)
            }
        })
        .collect()
}

/// Walks `dirs` from `start`, requiring every one of them to be a directory.
fn walk(tree: &Tree, start: NodeId, dirs: &[&str]) -> Result<NodeId> {
    dirs.iter().try_fold(start, |current, &name| {
        tree.find_child(current, name, KindFilter::Directory)
            .ok_or_else(|| FSError::PathNotFound(name.to_string()))
    })
}

/// Resolves everything but the last segment. Returns the directory that
/// should hold the target together with the target's name.
pub fn resolve_parent<'p>(tree: &Tree, start: NodeId, path: &'p str) -> Result<(NodeId, &'p str)> {
    let segments = segments(path)?;
    let Some((name, dirs)) = segments.split_last() else {
        return Err(FSError::InvalidArgument(format!("empty path '{path}'")));
    };
    Ok((walk(tree, start, dirs)?, *name))
}

/// Resolves a path naming a directory. An empty path, or `/`, names `start`.
pub fn resolve_dir(tree: &Tree, start: NodeId, path: &str) -> Result<NodeId> {
    if strip_root(path).is_empty() {
        return Ok(start);
    }
    let (parent, name) = resolve_parent(tree, start, path)?;
    tree.find_child(parent, name, KindFilter::Directory)
        .ok_or_else(|| FSError::NotFound(name.to_string()))
}
