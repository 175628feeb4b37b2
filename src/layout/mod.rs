// Mon Oct 19 2026 - Alex

pub mod alias;
pub mod builder;
pub mod comparison;
pub mod database;
pub mod error;
pub mod record;
pub mod scope;

pub use alias::{AliasAnnotation, AliasError, ArchTag, EXPECT_MATCH_MARKER};
pub use builder::LayoutBuilder;
pub use comparison::{ComparisonReport, DifferenceSeverity, LayoutComparator, LayoutDifference, RecordComparison};
pub use database::ArchitectureDatabase;
pub use error::{ComparisonError, ExtractError};
pub use record::{AggregateRecord, FieldRecord, MemberKind, RecordKind, VarDeclRecord, VarKind};
pub use scope::ScopeStack;
