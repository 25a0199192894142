use clap::Parser;
use eyre::{Result, WrapErr};
use explorer::{
    shell::{Outcome, PROMPT},
    FileSystem, Geometry, Shell,
};
use libc::STDIN_FILENO;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::trace;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(about = "Simulated block file system shell")]
struct Cli {
    /// Total number of blocks on the disk
    #[arg(short = 'n', long, default_value_t = Geometry::DEFAULT_BLOCK_COUNT)]
    blocks: usize,
    /// Leading blocks reserved for boot data
    #[arg(short = 'r', long, default_value_t = Geometry::DEFAULT_RESERVED)]
    reserved: usize,
    /// Size of one block in bytes
    #[arg(short = 'b', long, default_value_t = Geometry::DEFAULT_BLOCK_SIZE)]
    block_size: u64,
    /// Don't print the prompt
    #[arg(short = 'q', long)]
    quiet: bool,
    /// Read commands from this file instead of stdin
    #[arg(index = 1)]
    script: Option<PathBuf>,
}

fn run(shell: &mut Shell, input: impl BufRead, prompt: bool) -> Result<()> {
    let mut stdout = std::io::stdout();
    let mut lines = input.lines();
    loop {
        if prompt {
            print!("{PROMPT}");
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            if prompt {
                println!();
            }
            return Ok(());
        };
        let line = line.wrap_err("Failed to read command")?;
        trace!("> {line}");
        match shell.execute(&line) {
            Outcome::Output(out) if out.is_empty() => {}
            Outcome::Output(out) => println!("{out}"),
            Outcome::Exit => return Ok(()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
    trace!("Starting up explorer shell");
    let geometry = Geometry::new(cli.blocks, cli.reserved, cli.block_size)
        .wrap_err("Invalid disk geometry")?;
    let mut shell = Shell::new(FileSystem::new(geometry));
    println!("File system initialized.");
    match cli.script {
        Some(script) => {
            let file = File::open(&script)
                .wrap_err_with(|| format!("Couldn't open script {script:?}"))?;
            run(&mut shell, BufReader::new(file), false)
        }
        None => {
            let isatty = unsafe { libc::isatty(STDIN_FILENO) == 1 };
            run(&mut shell, std::io::stdin().lock(), isatty && !cli.quiet)
        }
    }
}
