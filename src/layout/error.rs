// Mon Oct 19 2026 - Alex

use crate::frontend::NodeKind;
use thiserror::Error;

/// Errors that stop the whole run, not just one architecture.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unhandled {context} child {kind} '{spelling}' in scope '{scope}'")]
    UnrecognizedNode {
        context: &'static str,
        kind: NodeKind,
        spelling: String,
        scope: String,
    },
}

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("Database for {arch} failed with {failures} error(s) and cannot be compared")]
    UnusableDatabase { arch: String, failures: usize },
}
