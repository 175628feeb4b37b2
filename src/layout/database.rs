// Mon Oct 19 2026 - Alex

use crate::layout::record::{AggregateRecord, FieldRecord, RecordKind, VarDeclRecord};
use crate::layout::scope::ScopeStack;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Every layout fact extracted for one target architecture.
///
/// Maps keep first-insertion order; a later declaration under an existing
/// name replaces the earlier record wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureDatabase {
    pub arch: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
    #[serde(default)]
    pub structs: IndexMap<String, AggregateRecord>,
    #[serde(default)]
    pub unions: IndexMap<String, AggregateRecord>,
    #[serde(default)]
    pub variables: IndexMap<String, VarDeclRecord>,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    /// How many records were replaced by a later declaration of the same name.
    #[serde(default)]
    pub replaced: usize,
    #[serde(skip)]
    scope: ScopeStack,
}

impl ArchitectureDatabase {
    pub fn new(arch: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            success: true,
            failures: Vec::new(),
            structs: IndexMap::new(),
            unions: IndexMap::new(),
            variables: IndexMap::new(),
            fields: Vec::new(),
            replaced: 0,
            scope: ScopeStack::new(),
        }
    }

    /// A failed database must not take part in comparisons.
    pub fn is_usable(&self) -> bool {
        self.success
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.success = false;
        self.failures.push(reason.into());
    }

    pub fn scope(&self) -> &ScopeStack {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut ScopeStack {
        &mut self.scope
    }

    pub fn insert_record(&mut self, record: AggregateRecord) -> Option<AggregateRecord> {
        let map = match record.kind {
            RecordKind::Struct => &mut self.structs,
            RecordKind::Union => &mut self.unions,
        };
        let previous = map.insert(record.name.clone(), record);
        if let Some(previous) = &previous {
            self.replaced += 1;
            log::debug!("[{}] {} {} replaced by a later declaration", self.arch, previous.kind, previous.name);
        }
        previous
    }

    pub fn insert_variable(&mut self, variable: VarDeclRecord) -> Option<VarDeclRecord> {
        let previous = self.variables.insert(variable.name.clone(), variable);
        if let Some(previous) = &previous {
            self.replaced += 1;
            log::debug!("[{}] declaration {} replaced by a later declaration", self.arch, previous.name);
        }
        previous
    }

    pub fn push_field(&mut self, field: FieldRecord) {
        self.fields.push(field);
    }

    pub fn get_struct(&self, name: &str) -> Option<&AggregateRecord> {
        self.structs.get(name)
    }

    pub fn get_union(&self, name: &str) -> Option<&AggregateRecord> {
        self.unions.get(name)
    }

    pub fn get_variable(&self, name: &str) -> Option<&VarDeclRecord> {
        self.variables.get(name)
    }

    /// Struct or union by name, structs first.
    pub fn get_record(&self, name: &str) -> Option<&AggregateRecord> {
        self.get_struct(name).or_else(|| self.get_union(name))
    }

    pub fn record_count(&self) -> usize {
        self.structs.len() + self.unions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::record::{MemberKind, VarKind};

    fn field(name: &str) -> FieldRecord {
        FieldRecord {
            name: name.to_string(),
            kind: MemberKind::Field,
            size: Some(4),
            offset: Some(0),
            bit_offset: Some(0),
            alignment: Some(4),
            members: Vec::new(),
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut db = ArchitectureDatabase::new("x86_64");

        let mut first = AggregateRecord::new("A", RecordKind::Struct, Some(8), Some(4));
        first.members.push(field("x"));
        first.members.push(field("y"));
        assert!(db.insert_record(first).is_none());

        let mut second = AggregateRecord::new("A", RecordKind::Struct, Some(4), Some(4));
        second.members.push(field("z"));
        let previous = db.insert_record(second).unwrap();

        assert_eq!(previous.members.len(), 2);
        let stored = db.get_struct("A").unwrap();
        assert_eq!(stored.size, Some(4));
        assert_eq!(stored.members.len(), 1);
        assert_eq!(stored.members[0].name, "z");
        assert_eq!(db.replaced, 1);
    }

    #[test]
    fn test_structs_and_unions_are_separate() {
        let mut db = ArchitectureDatabase::new("aarch64");
        db.insert_record(AggregateRecord::new("S", RecordKind::Struct, Some(4), Some(4)));
        db.insert_record(AggregateRecord::new("S", RecordKind::Union, Some(8), Some(8)));
        assert_eq!(db.record_count(), 2);
        assert_eq!(db.replaced, 0);
        assert_eq!(db.get_record("S").unwrap().kind, RecordKind::Struct);
    }

    #[test]
    fn test_variable_redeclaration() {
        let mut db = ArchitectureDatabase::new("x86_64");
        db.insert_variable(VarDeclRecord::new("FOO", VarKind::Variable, Some(4)));
        db.insert_variable(VarDeclRecord::new("FOO", VarKind::Variable, Some(4)).with_value(Some("7".into())));
        assert_eq!(db.variables.len(), 1);
        assert_eq!(db.get_variable("FOO").unwrap().value.as_deref(), Some("7"));
    }

    #[test]
    fn test_mark_failed() {
        let mut db = ArchitectureDatabase::new("x86_32");
        assert!(db.is_usable());
        db.mark_failed("bad alias");
        assert!(!db.is_usable());
        assert_eq!(db.failures, vec!["bad alias"]);
    }
}
