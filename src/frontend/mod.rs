// Mon Oct 19 2026 - Alex

pub mod kind;
pub mod node;
pub mod error;
pub mod search_paths;
pub mod synthetic;
#[cfg(feature = "libclang")]
pub mod libclang;

pub use kind::NodeKind;
pub use node::{SyntaxNode, TypedefTarget, Diagnostic, Severity, ParsedUnit};
pub use error::FrontendError;
pub use search_paths::{SearchPathResolver, CompilerSearchPaths};
pub use synthetic::SyntheticFrontend;
#[cfg(feature = "libclang")]
pub use libclang::ClangFrontend;

use std::path::Path;

/// Parses one header under one architecture's full argument list.
///
/// Implementations parse in incomplete mode: the header is a fragment meant to
/// be included, so diagnostics are returned rather than treated as failures.
/// `Err` means no tree could be produced at all.
pub trait Frontend {
    fn parse(&self, header: &Path, arguments: &[String]) -> Result<ParsedUnit, FrontendError>;
}

impl<F> Frontend for F
where
    F: Fn(&Path, &[String]) -> Result<ParsedUnit, FrontendError>,
{
    fn parse(&self, header: &Path, arguments: &[String]) -> Result<ParsedUnit, FrontendError> {
        self(header, arguments)
    }
}
