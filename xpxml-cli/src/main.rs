//! xpxml - reformat XML documents
//!
//! Reads a document from a file or stdin, builds its tree and writes it back
//! in the chosen indent mode and encoding.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xp_xml::{Indent, StreamInputSource, Tree};

/// Reformat an XML document
#[derive(Parser)]
#[command(name = "xpxml")]
#[command(version)]
#[command(about = "Parse an XML document and write it back in a normalized layout", long_about = None)]
struct Cli {
    /// Input file (default: stdin)
    file: Option<String>,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = IndentArg::Default)]
    indent: IndentArg,

    /// Output encoding (default: utf-8)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Write the XML declaration before the root element
    #[arg(short, long)]
    declaration: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum IndentArg {
    /// Indented, leaf content on the tag line
    Default,
    /// Indented, leaf content on its own line
    Wrapped,
    /// Everything on one line
    None,
}

impl From<IndentArg> for Indent {
    fn from(value: IndentArg) -> Self {
        match value {
            IndentArg::Default => Indent::Default,
            IndentArg::Wrapped => Indent::Wrapped,
            IndentArg::None => Indent::None,
        }
    }
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Parses the input and writes the reformatted document.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut tree = match &cli.file {
        Some(path) => {
            info!(path = %path, "reading document");
            Tree::from_file(path)?
        }
        None => Tree::from_source(StreamInputSource::with_origin(io::stdin().lock(), "(stdin)"))?,
    };

    if let Some(encoding) = &cli.encoding {
        xp_xml::xml::output_encoding(encoding)?;
        tree.set_encoding(encoding);
    }

    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    tree.write_to(&mut output, cli.indent.into(), cli.declaration)?;
    output.flush()?;
    Ok(())
}
