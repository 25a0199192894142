//! Line oriented front end over a [`FileSystem`].

mod command;
pub mod render;

pub use command::Command;

use crate::fs::{FSError, FileSystem, Result};
use tracing::debug;

pub const PROMPT: &str = "[MyExplorer] >> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show the operator, possibly empty.
    Output(String),
    /// The session is over.
    Exit,
}

#[derive(Debug)]
pub struct Shell {
    fs: FileSystem,
}

impl Shell {
    pub fn new(fs: FileSystem) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &FileSystem {
        &self.fs
    }

    /// Runs one command line. Failures are reported in the output,
    /// they never end the session.
    pub fn execute(&mut self, line: &str) -> Outcome {
        let mut tokens = line.split_ascii_whitespace();
        let Some(verb) = tokens.next() else {
            return Outcome::Output(String::new());
        };
        let args: Vec<&str> = tokens.collect();
        let command = match Command::parse(verb, &args) {
            Ok(Some(command)) => command,
            Ok(None) => {
                return Outcome::Output(format!(
                    "Invalid command '{verb}'!\nType 'ajuda' to see the available commands."
                ))
            }
            Err(err) => return Outcome::Output(Self::report(verb, err)),
        };
        if command == Command::Exit {
            return Outcome::Exit;
        }
        match self.run(command) {
            Ok(out) => Outcome::Output(out),
            Err(err) => Outcome::Output(Self::report(verb, err)),
        }
    }

    fn report(verb: &str, err: FSError) -> String {
        debug!("{verb} failed: {err:?}");
        format!("Error: {err}")
    }

    fn run(&mut self, command: Command<'_>) -> Result<String> {
        Ok(match command {
            Command::CreateDir(path) => {
                self.fs.create_dir(path)?;
                format!("Directory '{path}' created.")
            }
            Command::CreateFile(path, size) => {
                self.fs.create_file(path, size)?;
                format!("File '{path}' created.")
            }
            Command::RemoveDir(path) => {
                self.fs.remove_dir(path)?;
                format!("Directory '{path}' removed.")
            }
            Command::RemoveFile(path) => {
                self.fs.remove_file(path)?;
                format!("File '{path}' removed.")
            }
            Command::List(path) => render::listing(&self.fs.list_dir(path)?),
            Command::Tree => render::tree(&self.fs.tree()),
            Command::Map => render::block_map(&self.fs.block_map()),
            Command::FileBlocks(path) => render::file_blocks(path, &self.fs.file_blocks(path)?),
            Command::Help => render::HELP.to_string(),
            Command::Exit => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::Geometry;

    fn shell() -> Shell {
        Shell::new(FileSystem::with_clock(Geometry::default(), || {
            "01/01/2024 00:00:00".to_string()
        }))
    }

    fn output(shell: &mut Shell, line: &str) -> String {
        match shell.execute(line) {
            Outcome::Output(out) => out,
            Outcome::Exit => panic!("{line:?} ended the session"),
        }
    }

    #[test]
    fn blank_lines_do_nothing() {
        let mut shell = shell();
        assert_eq!(output(&mut shell, ""), "");
        assert_eq!(output(&mut shell, "   \t "), "");
    }

    #[test]
    fn exit_ends_the_session() {
        assert_eq!(shell().execute("sair"), Outcome::Exit);
    }

    #[test]
    fn unknown_verb_points_to_help() {
        let out = output(&mut shell(), "format c:");
        assert!(out.contains("Invalid command 'format'"));
        assert!(out.contains("ajuda"));
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let mut shell = shell();
        assert_eq!(
            output(&mut shell, "criad a/b"),
            "Error: Directory 'a' not found"
        );
        assert_eq!(
            output(&mut shell, "criaa f x"),
            "Error: Invalid argument: 'x' is not a valid size"
        );
        assert_eq!(output(&mut shell, "criad a"), "Directory 'a' created.");
        assert_eq!(shell.fs().free_count(), 245);
    }

    #[test]
    fn runs_file_commands() {
        let mut shell = shell();
        output(&mut shell, "criad docs");
        assert_eq!(
            output(&mut shell, "criaa docs/a.txt 1024"),
            "File 'docs/a.txt' created."
        );
        assert_eq!(
            output(&mut shell, "verset docs/a.txt"),
            "Blocks of 'docs/a.txt': 11 12"
        );
        assert!(output(&mut shell, "verd docs").starts_with("01/01/2024 00:00:00    1024    a.txt"));
        assert_eq!(output(&mut shell, "removea docs/a.txt"), "File 'docs/a.txt' removed.");
        assert_eq!(output(&mut shell, "removed docs"), "Directory 'docs' removed.");
        assert_eq!(output(&mut shell, "verd"), "No files or directories found.");
    }

    #[test]
    fn help_lists_every_verb() {
        let help = output(&mut shell(), "ajuda");
        for verb in [
            "criad", "criaa", "removed", "removea", "verd", "verset", "mapa", "arvore", "ajuda",
            "sair",
        ] {
            assert!(help.contains(verb), "help is missing {verb}");
        }
    }
}
