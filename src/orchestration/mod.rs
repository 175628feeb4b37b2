// Mon Oct 19 2026 - Alex

pub mod coordinator;

pub use coordinator::{ArchitectureExtraction, ExtractionCoordinator};
