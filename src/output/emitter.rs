// Mon Oct 19 2026 - Alex

use crate::layout::{ArchitectureDatabase, ComparisonReport};
use crate::output::{JsonSerializer, LayoutOutput, OutputError, OutputFormat, ReportGenerator};
use crate::signature::FunctionSignature;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Opens `path` for writing, or stdout when no path is given.
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>, OutputError> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Writes extraction results in the requested format to any sink.
pub struct ReportEmitter {
    format: OutputFormat,
    json: JsonSerializer,
    text: ReportGenerator,
}

impl ReportEmitter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            json: JsonSerializer::new(),
            text: ReportGenerator::new(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.text = self.text.with_color(color);
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.json = self.json.with_pretty_print(pretty);
        self
    }

    pub fn emit_databases<W: Write + ?Sized>(
        &self,
        header: &Path,
        databases: &[ArchitectureDatabase],
        sink: &mut W,
    ) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = LayoutOutput::new(header.display().to_string(), databases);
                self.json.write(&output, sink)?;
            }
            OutputFormat::Text => {
                for (index, db) in databases.iter().enumerate() {
                    if index > 0 {
                        writeln!(sink)?;
                    }
                    write!(sink, "{}", self.text.generate_database(db))?;
                }
            }
        }
        sink.flush()?;
        Ok(())
    }

    /// Text output is one specialization stub per line in declaration order.
    pub fn emit_signatures<W: Write + ?Sized>(
        &self,
        signatures: &[FunctionSignature],
        sink: &mut W,
    ) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => self.json.write(signatures, sink)?,
            OutputFormat::Text => {
                for signature in signatures {
                    writeln!(sink, "{}", signature.stub_declaration())?;
                }
            }
        }
        sink.flush()?;
        Ok(())
    }

    pub fn emit_comparison<W: Write + ?Sized>(
        &self,
        report: &ComparisonReport,
        sink: &mut W,
    ) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => self.json.write(report, sink)?,
            OutputFormat::Text => write!(sink, "{}", self.text.generate_comparison(report))?,
        }
        sink.flush()?;
        Ok(())
    }
}
