#![forbid(unsafe_code)]

//! `cg`: command interpreter driving an in-memory citation graph.
//!
//! Reads one command per line from a script file (or stdin), applies it to
//! a [`CitationGraph`](citegraph_core::CitationGraph) rooted at `--root`,
//! and prints one result line per command. Command failures are reported on
//! stderr and do not stop the run; the exit status reflects whether any
//! command failed.

mod interp;
mod output;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use interp::Session;
use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "citegraph: reachability-managed citation graph interpreter",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Identifier of the root publication.
    #[arg(long, default_value = "root")]
    root: String,

    /// Command script to execute; reads stdin when omitted.
    script: Option<PathBuf>,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let input = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read script {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            for line in io::stdin().lock().lines() {
                buf.push_str(&line?);
                buf.push('\n');
            }
            buf
        }
    };

    let mode = cli.output_mode();
    let mut session = Session::new(cli.root.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut failures = 0usize;
    for (lineno, line) in input.lines().enumerate() {
        match session.eval(line) {
            Ok(outcomes) => {
                for outcome in &outcomes {
                    output::render(&mut out, mode, outcome)?;
                }
            }
            Err(err) => {
                failures += 1;
                tracing::debug!(lineno = lineno + 1, error = %err, "command failed");
                eprintln!("error (line {}): {err}", lineno + 1);
            }
        }
    }
    out.flush()?;

    if failures > 0 {
        anyhow::bail!("{failures} command(s) failed");
    }
    Ok(())
}
