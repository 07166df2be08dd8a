use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::debug;
use vdiff_engine::{print_diff, DiffResult, Printer, WritePrinter};
use vdiff_types::Value;

use crate::cli::{Cli, OutputFormat};
use crate::quote::quote_command;

/// Compare the two documents named on the command line and print the
/// differences. Returns how many were found.
pub fn run(cli: &Cli) -> anyhow::Result<usize> {
    debug!(command = %quote_command(std::env::args_os()), "vdiff invoked");

    let left = load_document(&cli.left)?;
    let right = load_document(&cli.right)?;

    let count = match cli.format {
        OutputFormat::Text => {
            let mut printer = Counted::new(WritePrinter::new(io::stdout().lock()));
            print_diff(&mut printer, &left, &right).context("comparing documents")?;
            printer.lines
        }
        OutputFormat::Json => {
            let lines = vdiff_engine::diff(&left, &right).context("comparing documents")?;
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &lines)?;
            writeln!(stdout)?;
            lines.len()
        }
    };

    if !cli.quiet {
        eprintln!("{}", summary(&cli.left, &cli.right, count));
    }
    Ok(count)
}

fn summary(left: &Path, right: &Path, count: usize) -> String {
    let (left, right) = (left.display(), right.display());
    match count {
        0 => format!("{} {left} and {right} match", "✓".green().bold()),
        1 => format!("{} 1 difference between {left} and {right}", "✗".red().bold()),
        n => format!(
            "{} {} differences between {left} and {right}",
            "✗".red().bold(),
            n.to_string().yellow()
        ),
    }
}

/// Read a JSON or TOML document (chosen by extension) into a [`Value`].
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: serde_json::Value = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&text)
            .with_context(|| format!("parsing {} as TOML", path.display()))?,
        _ => serde_json::from_str(&text)
            .with_context(|| format!("parsing {} as JSON", path.display()))?,
    };
    Ok(Value::from(doc))
}

/// Passes lines through to another printer and counts them.
struct Counted<P> {
    inner: P,
    lines: usize,
}

impl<P: Printer> Counted<P> {
    fn new(inner: P) -> Self {
        Self { inner, lines: 0 }
    }
}

impl<P: Printer> Printer for Counted<P> {
    fn print(&mut self, line: fmt::Arguments<'_>) -> DiffResult<()> {
        self.lines += 1;
        self.inner.print(line)
    }
}
