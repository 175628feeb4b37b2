// Mon Oct 19 2026 - Alex

use crate::frontend::SyntaxNode;
use crate::layout::alias::{AliasAnnotation, ArchTag};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Struct,
    Union,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Struct => write!(f, "struct"),
            RecordKind::Union => write!(f, "union"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Field,
    Struct,
    Union,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => write!(f, "field"),
            MemberKind::Struct => write!(f, "struct"),
            MemberKind::Union => write!(f, "union"),
        }
    }
}

impl From<RecordKind> for MemberKind {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Struct => MemberKind::Struct,
            RecordKind::Union => MemberKind::Union,
        }
    }
}

/// One member slot of a struct or union. `offset` is in bytes from the start
/// of the immediately enclosing aggregate, `bit_offset` is the same position
/// in bits (they differ only for bit-fields). Nested aggregate slots carry the
/// nested aggregate's members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub name: String,
    pub kind: MemberKind,
    pub size: Option<u64>,
    pub offset: Option<u64>,
    pub bit_offset: Option<u64>,
    pub alignment: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<FieldRecord>,
}

impl FieldRecord {
    pub fn from_node(node: &SyntaxNode, kind: MemberKind) -> Self {
        Self {
            name: node.spelling.clone(),
            kind,
            size: node.size,
            offset: node.offset_bits.map(|bits| bits / 8),
            bit_offset: node.offset_bits,
            alignment: node.alignment,
            members: Vec::new(),
        }
    }

    /// First byte past this member, when both offset and size are known.
    pub fn end(&self) -> Option<u64> {
        Some(self.offset? + self.size?)
    }

    pub fn is_bitfield(&self) -> bool {
        self.bit_offset.map_or(false, |bits| bits % 8 != 0)
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

/// Shared shape of struct and union records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub name: String,
    pub kind: RecordKind,
    pub size: Option<u64>,
    pub alignment: Option<u64>,
    pub members: Vec<FieldRecord>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub aliases: IndexSet<AliasAnnotation>,
    #[serde(default)]
    pub expect_match: bool,
}

pub type StructRecord = AggregateRecord;
pub type UnionRecord = AggregateRecord;

impl AggregateRecord {
    pub fn new(name: impl Into<String>, kind: RecordKind, size: Option<u64>, alignment: Option<u64>) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
            alignment,
            members: Vec::new(),
            aliases: IndexSet::new(),
            expect_match: false,
        }
    }

    pub fn member(&self, name: &str) -> Option<&FieldRecord> {
        self.members.iter().find(|member| member.name == name)
    }

    pub fn aliases_for(&self, arch: ArchTag) -> impl Iterator<Item = &AliasAnnotation> {
        self.aliases.iter().filter(move |alias| alias.arch == arch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    Variable,
    Typedef,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Variable => write!(f, "variable"),
            VarKind::Typedef => write!(f, "typedef"),
        }
    }
}

/// A free-standing declaration: usually an ioctl number, or a typedef of a
/// scalar or pointer type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarDeclRecord {
    pub name: String,
    pub kind: VarKind,
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub aliases: IndexSet<AliasAnnotation>,
    #[serde(default)]
    pub expect_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl VarDeclRecord {
    pub fn new(name: impl Into<String>, kind: VarKind, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
            aliases: IndexSet::new(),
            expect_match: false,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }
}

/// Records that can carry alias annotations and the expect-match flag.
pub trait Annotated {
    fn aliases(&self) -> &IndexSet<AliasAnnotation>;
    fn aliases_mut(&mut self) -> &mut IndexSet<AliasAnnotation>;
    fn expect_match(&self) -> bool;
    fn set_expect_match(&mut self);

    fn add_alias(&mut self, alias: AliasAnnotation) {
        self.aliases_mut().insert(alias);
    }
}

impl Annotated for AggregateRecord {
    fn aliases(&self) -> &IndexSet<AliasAnnotation> {
        &self.aliases
    }

    fn aliases_mut(&mut self) -> &mut IndexSet<AliasAnnotation> {
        &mut self.aliases
    }

    fn expect_match(&self) -> bool {
        self.expect_match
    }

    fn set_expect_match(&mut self) {
        self.expect_match = true;
    }
}

impl Annotated for VarDeclRecord {
    fn aliases(&self) -> &IndexSet<AliasAnnotation> {
        &self.aliases
    }

    fn aliases_mut(&mut self) -> &mut IndexSet<AliasAnnotation> {
        &mut self.aliases
    }

    fn expect_match(&self) -> bool {
        self.expect_match
    }

    fn set_expect_match(&mut self) {
        self.expect_match = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::synthetic;

    #[test]
    fn test_field_from_node() {
        let node = synthetic::field("y", "char", 1, 1, 4);
        let field = FieldRecord::from_node(&node, MemberKind::Field);
        assert_eq!(field.offset, Some(4));
        assert_eq!(field.bit_offset, Some(32));
        assert_eq!(field.end(), Some(5));
        assert!(!field.is_bitfield());
    }

    #[test]
    fn test_bitfield_offset() {
        let node = synthetic::field("flag", "unsigned int", 4, 4, 0).with_offset_bits(35);
        let field = FieldRecord::from_node(&node, MemberKind::Field);
        assert_eq!(field.offset, Some(4));
        assert!(field.is_bitfield());
    }

    #[test]
    fn test_alias_set_deduplicates() {
        let mut record = AggregateRecord::new("Bar", RecordKind::Struct, Some(8), Some(4));
        record.add_alias(AliasAnnotation::new("Foo", ArchTag::X86_64));
        record.add_alias(AliasAnnotation::new("Foo", ArchTag::X86_64));
        record.add_alias(AliasAnnotation::new("Foo", ArchTag::Aarch64));
        assert_eq!(record.aliases.len(), 2);
        assert_eq!(record.aliases_for(ArchTag::X86_64).count(), 1);
    }
}
