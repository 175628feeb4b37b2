// Mon Oct 19 2026 - Alex

pub mod emitter;
pub mod json;
pub mod report;

pub use emitter::{open_sink, ReportEmitter};
pub use json::JsonSerializer;
pub use report::ReportGenerator;

use crate::layout::ArchitectureDatabase;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error writing output: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level JSON document for an extraction run.
#[derive(Debug, Serialize)]
pub struct LayoutOutput<'a> {
    pub version: &'static str,
    pub header: String,
    pub architectures: Vec<&'a ArchitectureDatabase>,
}

impl<'a> LayoutOutput<'a> {
    pub fn new(header: impl Into<String>, databases: &'a [ArchitectureDatabase]) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            header: header.into(),
            architectures: databases.iter().collect(),
        }
    }
}
