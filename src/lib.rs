// Mon Oct 19 2026 - Alex

pub mod config;
pub mod frontend;
pub mod layout;
pub mod orchestration;
pub mod output;
pub mod signature;
pub mod ui;
pub mod utils;

pub use config::{ArchitectureConfig, ExtractorConfig};
pub use frontend::{Frontend, SearchPathResolver};
pub use layout::{ArchitectureDatabase, LayoutBuilder, LayoutComparator};
pub use orchestration::ExtractionCoordinator;
pub use output::ReportEmitter;
pub use signature::{FunctionSignature, SignatureCollector};
