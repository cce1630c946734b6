//! Machine-readable output of pipeline results.
//!
//! `json` collects every record of a run and writes them as one pretty-printed
//! array when the writer is flushed, so the output is always a single valid
//! document. `jsonl` writes one compact record per line as it arrives, so an
//! identify run that also fetches prices emits an `identification` line
//! followed by a `prices` line.

use std::io::Write;

use crate::error::Result;
use crate::types::{OutputRecord, PriceReport, ProductIdentification};

/// Structured output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonLines,
}

/// Serializes [`OutputRecord`]s to any writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pending: Vec<OutputRecord>,
    records_written: usize,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            pending: Vec::new(),
            records_written: 0,
        }
    }

    pub fn write_record(&mut self, record: &OutputRecord) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.pending.push(record.clone()),
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, record)?;
                writeln!(self.writer)?;
            }
        }
        self.records_written += 1;
        Ok(())
    }

    pub fn write_identification(&mut self, identification: &ProductIdentification) -> Result<()> {
        self.write_record(&OutputRecord::Identification(identification.clone()))
    }

    pub fn write_report(&mut self, report: &PriceReport) -> Result<()> {
        self.write_record(&OutputRecord::Prices(report.clone()))
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Write any collected `json` records, then flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        if !self.pending.is_empty() {
            serde_json::to_writer_pretty(&mut self.writer, &self.pending)?;
            writeln!(self.writer)?;
            self.pending.clear();
        }
        self.writer.flush()?;
        Ok(())
    }
}
