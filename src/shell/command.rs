use crate::fs::{FSError, Result};

/// A parsed command line. Paths borrow from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `criad <path>`
    CreateDir(&'a str),
    /// `criaa <path> <size>`
    CreateFile(&'a str, u64),
    /// `removed <path>`
    RemoveDir(&'a str),
    /// `removea <path>`
    RemoveFile(&'a str),
    /// `verd [path]`
    List(Option<&'a str>),
    /// `arvore`
    Tree,
    /// `mapa`
    Map,
    /// `verset <path>`
    FileBlocks(&'a str),
    /// `ajuda`
    Help,
    /// `sair`
    Exit,
}

fn required<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| FSError::InvalidArgument(format!("missing {what}")))
}

fn size(arg: &str) -> Result<u64> {
    arg.parse()
        .map_err(|_| FSError::InvalidArgument(format!("'{arg}' is not a valid size")))
}

impl<'a> Command<'a> {
    /// Parses `verb` with its `args`. Unknown verbs yield `Ok(None)`,
    /// extra arguments are ignored.
    pub fn parse(verb: &str, args: &[&'a str]) -> Result<Option<Self>> {
        let command = match verb {
            "criad" => Command::CreateDir(required(args, 0, "directory path")?),
            "criaa" => Command::CreateFile(
                required(args, 0, "file path")?,
                size(required(args, 1, "file size")?)?,
            ),
            "removed" => Command::RemoveDir(required(args, 0, "directory path")?),
            "removea" => Command::RemoveFile(required(args, 0, "file path")?),
            "verd" => Command::List(args.first().copied()),
            "arvore" => Command::Tree,
            "mapa" => Command::Map,
            "verset" => Command::FileBlocks(required(args, 0, "file path")?),
            "ajuda" => Command::Help,
            "sair" => Command::Exit,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}
