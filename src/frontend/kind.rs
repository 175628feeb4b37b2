// Mon Oct 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of syntax-tree node kinds the extractor knows how to treat.
///
/// Frontends fold their own cursor kinds into these variants. Anything
/// without an explicit mapping becomes [`NodeKind::Unrecognized`] carrying the
/// frontend's raw kind number, which the walkers treat as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    TranslationUnit,
    Namespace,
    LinkageSpec,
    UnexposedDecl,
    StructDecl,
    UnionDecl,
    ClassDecl,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    FunctionDecl,
    VarDecl,
    ParmDecl,
    TypedefDecl,
    TypeAliasDecl,
    Method,
    Template,
    AccessSpecifier,
    Using,
    FriendDecl,
    StaticAssert,
    TypeRef,
    NamespaceRef,
    TemplateRef,
    MemberRef,
    OtherRef,
    AnnotateAttr,
    AsmLabelAttr,
    FinalAttr,
    VisibilityAttr,
    UnexposedAttr,
    ConstAttr,
    PureAttr,
    WarnUnusedAttr,
    WarnUnusedResultAttr,
    AlignedAttr,
    PackedAttr,
    DllAttr,
    Preprocessing,
    Expression,
    Statement,
    Unrecognized(i32),
}

impl NodeKind {
    pub fn is_record(self) -> bool {
        matches!(self, Self::StructDecl | Self::UnionDecl | Self::ClassDecl)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(raw) => write!(f, "cursor kind {}", raw),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kinds() {
        assert!(NodeKind::StructDecl.is_record());
        assert!(NodeKind::UnionDecl.is_record());
        assert!(NodeKind::ClassDecl.is_record());
        assert!(!NodeKind::TypedefDecl.is_record());
        assert!(!NodeKind::FinalAttr.is_record());
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeKind::Unrecognized(72).to_string(), "cursor kind 72");
        assert_eq!(NodeKind::FieldDecl.to_string(), "FieldDecl");
    }
}
