use crate::fs::{BlockId, BlockState, EntryKind, Listing, TreeEntry};

/// Block map symbols per row.
pub const MAP_WIDTH: usize = 32;

pub const HELP: &str = "\
Available commands:
  criad <path/dir_name> - Creates a new directory.
  criaa <path/file_name> <size> - Creates a new file of the given size in bytes.
  removed <path/dir_name> - Removes an empty directory.
  removea <path/file_name> - Removes a file.
  verd [path] - Lists the contents of a directory.
  verset <path/file_name> - Shows the blocks used by a file.
  mapa - Shows the disk block map.
  arvore - Shows the directory tree.
  ajuda - Shows this help message.
  sair - Leaves the file system.";

pub fn listing(listing: &Listing) -> String {
    if listing.entries.is_empty() {
        return "No files or directories found.".to_string();
    }
    let mut lines: Vec<String> = listing
        .entries
        .iter()
        .map(|entry| {
            let size = match entry.kind {
                EntryKind::Directory => "<DIR>".to_string(),
                EntryKind::File { size } => size.to_string(),
            };
            format!("{}    {}    {}", entry.created, size, entry.name)
        })
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "{} file(s)     {} bytes used",
        listing.file_count, listing.used_bytes
    ));
    lines.push(format!(
        "{} dir(s)      {} bytes free",
        listing.dir_count, listing.free_bytes
    ));
    lines.join("\n")
}

pub fn tree(entries: &[TreeEntry]) -> String {
    let mut lines = vec!["Directory tree:".to_string(), "Root".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|entry| format!("{}|- {}/", "  ".repeat(entry.depth), entry.name)),
    );
    lines.join("\n")
}

fn symbol(state: BlockState) -> char {
    match state {
        BlockState::Boot => 'B',
        BlockState::Free => '0',
        BlockState::Used => '#',
    }
}

pub fn block_map(states: &[BlockState]) -> String {
    let mut out = String::new();
    for row in states.chunks(MAP_WIDTH) {
        let line: Vec<String> = row.iter().map(|state| symbol(*state).to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out.push_str("B-Boot 0-Free #-Used");
    out
}

pub fn file_blocks(name: &str, chain: &[BlockId]) -> String {
    let blocks: Vec<String> = chain.iter().map(BlockId::to_string).collect();
    format!("Blocks of '{name}': {}", blocks.join(" "))
        .trim_end()
        .to_string()
}
