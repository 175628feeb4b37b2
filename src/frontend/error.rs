// Mon Oct 19 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Failed to load compiler frontend: {0}")]
    Load(String),
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Failed to run compiler '{compiler}': {source}")]
    Compiler {
        compiler: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Compiler '{compiler}' did not report an include search list (exit status {status})")]
    NoSearchList { compiler: String, status: String },
}
