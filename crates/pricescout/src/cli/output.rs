//! Where command results go: a table or JSON records, on stdout or in a file.

use anyhow::Context;
use clap::{Args, ValueEnum};
use pricescout_core::{
    OutputFormat, OutputWriter, PriceReport, ProductIdentification, Result,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::render;

/// Result format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table
    #[default]
    Table,
    /// One pretty-printed JSON array holding every record of the run
    Json,
    /// One JSON record per line
    Jsonl,
}

/// Output options shared by `identify` and `search`.
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: Format,

    /// Write results to a file instead of stdout
    #[arg(short, long = "output", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Destination for one command's results.
pub enum ResultSink {
    Table(Box<dyn Write>),
    Records(OutputWriter<Box<dyn Write>>),
}

impl ResultSink {
    pub fn open(args: &OutputArgs) -> anyhow::Result<Self> {
        let writer: Box<dyn Write> = match &args.file {
            Some(path) => {
                // Files get plain text, not terminal escapes.
                console::set_colors_enabled(false);
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };
        Ok(Self::new(writer, args.format))
    }

    pub fn new(writer: Box<dyn Write>, format: Format) -> Self {
        match format {
            Format::Table => Self::Table(writer),
            Format::Json => Self::Records(OutputWriter::new(writer, OutputFormat::Json)),
            Format::Jsonl => Self::Records(OutputWriter::new(writer, OutputFormat::JsonLines)),
        }
    }

    pub fn identification(&mut self, identification: &ProductIdentification) -> Result<()> {
        match self {
            Self::Table(w) => writeln!(w, "{}", render::identification(identification))?,
            Self::Records(w) => w.write_identification(identification)?,
        }
        Ok(())
    }

    pub fn report(&mut self, report: &PriceReport) -> Result<()> {
        match self {
            Self::Table(w) => writeln!(w, "{}", render::report(report))?,
            Self::Records(w) => w.write_report(report)?,
        }
        Ok(())
    }

    /// Flush everything written so far. `json` output is emitted here.
    pub fn finish(&mut self) -> Result<()> {
        match self {
            Self::Table(w) => w.flush()?,
            Self::Records(w) => {
                tracing::debug!(records = w.records_written(), "Output complete");
                w.flush()?;
            }
        }
        Ok(())
    }
}
