//! A simulated block based file system: a fixed size disk of
//! blocks, a directory tree stored on it and a small command
//! shell to drive both.

pub mod fs;
pub mod shell;

pub use fs::{FSError, FileSystem, Geometry};
pub use shell::{Outcome, Shell};
