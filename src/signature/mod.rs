// Mon Oct 19 2026 - Alex

pub mod function;
pub mod collector;

pub use function::FunctionSignature;
pub use collector::SignatureCollector;
