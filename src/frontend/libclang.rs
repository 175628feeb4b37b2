// Mon Oct 19 2026 - Alex

use crate::frontend::node::{is_anonymous_spelling, normalize_record_spelling};
use crate::frontend::{
    Diagnostic, Frontend, FrontendError, NodeKind, ParsedUnit, Severity, SyntaxNode, TypedefTarget,
};
use clang::diagnostic::Severity as ClangSeverity;
use clang::{Clang, Entity, EntityKind, EvaluationResult, Index, Type, TypeKind, Unsaved};
use std::path::Path;
use std::sync::Mutex;

// The clang crate allows a single live `Clang` per process.
static CLANG_LOCK: Mutex<()> = Mutex::new(());

/// libclang-backed frontend. The library is loaded at runtime on every parse
/// and the tree is copied into owned [`SyntaxNode`]s before it is released.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClangFrontend;

impl ClangFrontend {
    pub fn new() -> Self {
        Self
    }
}

impl Frontend for ClangFrontend {
    fn parse(&self, header: &Path, arguments: &[String]) -> Result<ParsedUnit, FrontendError> {
        parse_with(header, arguments, &[])
    }
}

/// Parses `header`, taking file contents from `unsaved` where given.
fn parse_with(header: &Path, arguments: &[String], unsaved: &[Unsaved]) -> Result<ParsedUnit, FrontendError> {
    let _guard = CLANG_LOCK
        .lock()
        .map_err(|_| FrontendError::Load("libclang lock poisoned".to_string()))?;

    let clang = Clang::new().map_err(FrontendError::Load)?;
    let index = Index::new(&clang, false, false);
    let unit = index
        .parser(header)
        .arguments(arguments)
        .unsaved(unsaved)
        .incomplete(true)
        .parse()
        .map_err(|e| FrontendError::Parse {
            path: header.to_path_buf(),
            message: e.to_string(),
        })?;

    let diagnostics = unit
        .get_diagnostics()
        .iter()
        .map(|diagnostic| Diagnostic::new(severity(diagnostic.get_severity()), diagnostic.to_string()))
        .collect();

    // libclang 15 renumbered the root cursor past what the bindings know,
    // so the root's kind is taken from its position rather than its number.
    let root = snapshot_as(&unit.get_entity(), NodeKind::TranslationUnit, None);
    log::debug!("Snapshotted {} syntax nodes from {}", root.node_count(), header.display());

    Ok(ParsedUnit { root, diagnostics })
}

fn severity(severity: ClangSeverity) -> Severity {
    match severity {
        ClangSeverity::Ignored => Severity::Ignored,
        ClangSeverity::Note => Severity::Note,
        ClangSeverity::Warning => Severity::Warning,
        ClangSeverity::Error => Severity::Error,
        ClangSeverity::Fatal => Severity::Fatal,
    }
}

fn snapshot(entity: &Entity<'_>, parent: Option<&Type<'_>>) -> SyntaxNode {
    snapshot_as(entity, node_kind(entity.get_kind()), parent)
}

fn snapshot_as(entity: &Entity<'_>, kind: NodeKind, parent: Option<&Type<'_>>) -> SyntaxNode {
    let mut spelling = entity.get_name().unwrap_or_default();
    if kind.is_record() && is_anonymous_spelling(&spelling) {
        spelling.clear();
    }

    let mut node = SyntaxNode::new(kind, spelling);
    node.is_definition = entity.is_definition();

    let ty = entity.get_type();
    if let Some(ty) = &ty {
        node.type_spelling = if kind.is_record() {
            normalize_record_spelling(&ty.get_display_name())
        } else {
            ty.get_display_name()
        };
        node.size = ty.get_sizeof().ok().map(|size| size as u64);
        node.alignment = ty.get_alignof().ok().map(|align| align as u64);
    }

    match kind {
        NodeKind::FieldDecl => {
            node.offset_bits = parent.and_then(|p| p.get_offsetof(&node.spelling).ok().map(|bits| bits as u64));
        }
        NodeKind::StructDecl | NodeKind::UnionDecl | NodeKind::ClassDecl => {
            if let (Some(parent), Some(ty)) = (parent, &ty) {
                node.offset_bits = nested_offset(entity, parent, ty);
            }
        }
        NodeKind::TypedefDecl | NodeKind::TypeAliasDecl => {
            node.typedef = entity.get_typedef_underlying_type().map(|underlying| {
                let canonical = underlying.get_canonical_type();
                TypedefTarget {
                    elaborated_record: underlying.get_kind() == TypeKind::Elaborated
                        && canonical.get_kind() == TypeKind::Record,
                    size: canonical.get_sizeof().ok().map(|size| size as u64),
                }
            });
        }
        NodeKind::FunctionDecl => {
            node.result_type = entity.get_result_type().map(|ty| ty.get_display_name());
        }
        NodeKind::VarDecl => {
            node.value = entity.evaluate().and_then(literal);
        }
        _ => {}
    }

    if descends_into(kind, node.is_definition) {
        let record_type = if kind.is_record() { ty.as_ref() } else { None };
        node.children = entity
            .get_children()
            .iter()
            .map(|child| snapshot(child, record_type))
            .collect();
    }

    node
}

/// Offset of an anonymous member record, found through its first named field.
/// Named nested record declarations are not members and report `None`.
fn nested_offset(entity: &Entity<'_>, parent: &Type<'_>, ty: &Type<'_>) -> Option<u64> {
    let first = entity
        .get_children()
        .into_iter()
        .filter(|child| child.get_kind() == EntityKind::FieldDecl)
        .find_map(|child| child.get_name())?;

    let in_parent = parent.get_offsetof(&first).ok()?;
    let in_record = ty.get_offsetof(&first).ok()?;
    in_parent.checked_sub(in_record).map(|bits| bits as u64)
}

/// Folds the bindings' entity kinds into [`NodeKind`]. Kinds the bindings
/// could not name arrive as `NotImplemented` and stay unrecognized.
fn node_kind(kind: EntityKind) -> NodeKind {
    use EntityKind as K;

    match kind {
        K::TranslationUnit => NodeKind::TranslationUnit,
        K::Namespace => NodeKind::Namespace,
        K::LinkageSpec => NodeKind::LinkageSpec,
        K::UnexposedDecl => NodeKind::UnexposedDecl,
        K::StructDecl => NodeKind::StructDecl,
        K::UnionDecl => NodeKind::UnionDecl,
        K::ClassDecl => NodeKind::ClassDecl,
        K::EnumDecl => NodeKind::EnumDecl,
        K::EnumConstantDecl => NodeKind::EnumConstantDecl,
        K::FieldDecl => NodeKind::FieldDecl,
        K::FunctionDecl => NodeKind::FunctionDecl,
        K::VarDecl => NodeKind::VarDecl,
        K::ParmDecl => NodeKind::ParmDecl,
        K::TypedefDecl => NodeKind::TypedefDecl,
        K::TypeAliasDecl => NodeKind::TypeAliasDecl,
        K::Method | K::Constructor | K::Destructor | K::ConversionFunction => NodeKind::Method,
        K::TemplateTypeParameter
        | K::NonTypeTemplateParameter
        | K::TemplateTemplateParameter
        | K::FunctionTemplate
        | K::ClassTemplate
        | K::ClassTemplatePartialSpecialization
        | K::TypeAliasTemplateDecl => NodeKind::Template,
        K::AccessSpecifier => NodeKind::AccessSpecifier,
        K::NamespaceAlias | K::UsingDirective | K::UsingDeclaration => NodeKind::Using,
        K::FriendDecl => NodeKind::FriendDecl,
        K::StaticAssert => NodeKind::StaticAssert,
        K::TypeRef => NodeKind::TypeRef,
        K::NamespaceRef => NodeKind::NamespaceRef,
        K::TemplateRef => NodeKind::TemplateRef,
        K::MemberRef => NodeKind::MemberRef,
        K::BaseSpecifier | K::LabelRef | K::OverloadedDeclRef | K::VariableRef => NodeKind::OtherRef,
        K::AnnotateAttr => NodeKind::AnnotateAttr,
        K::AsmLabelAttr => NodeKind::AsmLabelAttr,
        K::FinalAttr => NodeKind::FinalAttr,
        K::VisibilityAttr => NodeKind::VisibilityAttr,
        K::UnexposedAttr => NodeKind::UnexposedAttr,
        K::ConstAttr => NodeKind::ConstAttr,
        K::PureAttr => NodeKind::PureAttr,
        K::WarnUnusedAttr => NodeKind::WarnUnusedAttr,
        K::WarnUnusedResultAttr => NodeKind::WarnUnusedResultAttr,
        K::AlignedAttr => NodeKind::AlignedAttr,
        K::PackedAttr => NodeKind::PackedAttr,
        K::DllExport | K::DllImport => NodeKind::DllAttr,
        K::PreprocessingDirective | K::MacroDefinition | K::MacroExpansion | K::InclusionDirective => {
            NodeKind::Preprocessing
        }
        K::UnexposedExpr
        | K::DeclRefExpr
        | K::MemberRefExpr
        | K::CallExpr
        | K::ObjCMessageExpr
        | K::BlockExpr
        | K::IntegerLiteral
        | K::FloatingLiteral
        | K::ImaginaryLiteral
        | K::StringLiteral
        | K::CharacterLiteral
        | K::ParenExpr
        | K::UnaryOperator
        | K::ArraySubscriptExpr
        | K::BinaryOperator
        | K::CompoundAssignOperator
        | K::ConditionalOperator
        | K::CStyleCastExpr
        | K::CompoundLiteralExpr
        | K::InitListExpr
        | K::AddrLabelExpr
        | K::StmtExpr
        | K::GenericSelectionExpr
        | K::GNUNullExpr
        | K::StaticCastExpr
        | K::DynamicCastExpr
        | K::ReinterpretCastExpr
        | K::ConstCastExpr
        | K::FunctionalCastExpr
        | K::TypeidExpr
        | K::BoolLiteralExpr
        | K::NullPtrLiteralExpr
        | K::ThisExpr
        | K::ThrowExpr
        | K::NewExpr
        | K::DeleteExpr
        | K::UnaryExpr
        | K::ObjCStringLiteral
        | K::ObjCEncodeExpr
        | K::ObjCSelectorExpr
        | K::ObjCProtocolExpr
        | K::ObjCBridgedCastExpr
        | K::PackExpansionExpr
        | K::SizeOfPackExpr
        | K::LambdaExpr
        | K::ObjCBoolLiteralExpr
        | K::ObjCSelfExpr
        | K::OmpArraySectionExpr
        | K::ObjCAvailabilityCheckExpr
        | K::FixedPointLiteral
        | K::BitCastExpr => NodeKind::Expression,
        K::UnexposedStmt
        | K::LabelStmt
        | K::CompoundStmt
        | K::CaseStmt
        | K::DefaultStmt
        | K::IfStmt
        | K::SwitchStmt
        | K::WhileStmt
        | K::DoStmt
        | K::ForStmt
        | K::GotoStmt
        | K::IndirectGotoStmt
        | K::ContinueStmt
        | K::BreakStmt
        | K::ReturnStmt
        | K::AsmStmt
        | K::ObjCAtTryStmt
        | K::ObjCAtCatchStmt
        | K::ObjCAtFinallyStmt
        | K::ObjCAtThrowStmt
        | K::ObjCAtSynchronizedStmt
        | K::ObjCAutoreleasePoolStmt
        | K::ObjCForCollectionStmt
        | K::CatchStmt
        | K::TryStmt
        | K::ForRangeStmt
        | K::SehTryStmt
        | K::SehExceptStmt
        | K::SehFinallyStmt
        | K::SehLeaveStmt
        | K::MsAsmStmt
        | K::NullStmt
        | K::DeclStmt
        | K::OmpParallelDirective
        | K::OmpSimdDirective
        | K::OmpForDirective
        | K::OmpSectionsDirective
        | K::OmpSectionDirective
        | K::OmpSingleDirective
        | K::OmpParallelForDirective
        | K::OmpParallelSectionsDirective
        | K::OmpTaskDirective
        | K::OmpMasterDirective
        | K::OmpCriticalDirective
        | K::OmpTaskyieldDirective
        | K::OmpBarrierDirective
        | K::OmpTaskwaitDirective
        | K::OmpFlushDirective
        | K::OmpOrderedDirective
        | K::OmpAtomicDirective
        | K::OmpForSimdDirective
        | K::OmpParallelForSimdDirective
        | K::OmpTargetDirective
        | K::OmpTeamsDirective
        | K::OmpTaskgroupDirective
        | K::OmpCancellationPointDirective
        | K::OmpCancelDirective
        | K::OmpTargetDataDirective
        | K::OmpTaskLoopDirective
        | K::OmpTaskLoopSimdDirective
        | K::OmpDistributeDirective
        | K::OmpTargetEnterDataDirective
        | K::OmpTargetExitDataDirective
        | K::OmpTargetParallelDirective
        | K::OmpTargetParallelForDirective
        | K::OmpTargetUpdateDirective
        | K::OmpDistributeParallelForDirective
        | K::OmpDistributeParallelForSimdDirective
        | K::OmpDistributeSimdDirective
        | K::OmpTargetParallelForSimdDirective
        | K::OmpTargetSimdDirective
        | K::OmpTeamsDistributeDirective
        | K::OmpTeamsDistributeSimdDirective
        | K::OmpTeamsDistributeParallelForSimdDirective
        | K::OmpTeamsDistributeParallelForDirective
        | K::OmpTargetTeamsDirective
        | K::OmpTargetTeamsDistributeDirective
        | K::OmpTargetTeamsDistributeParallelForDirective
        | K::OmpTargetTeamsDistributeParallelForSimdDirective
        | K::OmpTargetTeamsDistributeSimdDirective
        | K::OmpMasterTaskLoopDirective
        | K::OmpParallelMasterTaskLoopDirective
        | K::OmpMasterTaskLoopSimdDirective
        | K::OmpParallelMasterTaskLoopSimdDirective
        | K::OmpParallelMasterDirective => NodeKind::Statement,
        // Objective-C, CUDA and the remaining attributes stay unrecognized.
        K::ObjCInterfaceDecl
        | K::ObjCCategoryDecl
        | K::ObjCProtocolDecl
        | K::ObjCPropertyDecl
        | K::ObjCIvarDecl
        | K::ObjCInstanceMethodDecl
        | K::ObjCClassMethodDecl
        | K::ObjCImplementationDecl
        | K::ObjCCategoryImplDecl
        | K::ObjCSynthesizeDecl
        | K::ObjCDynamicDecl
        | K::ObjCSuperClassRef
        | K::ObjCProtocolRef
        | K::ObjCClassRef
        | K::InvalidFile
        | K::InvalidDecl
        | K::NotImplemented
        | K::InvalidCode
        | K::IbActionAttr
        | K::IbOutletAttr
        | K::IbOutletCollectionAttr
        | K::OverrideAttr
        | K::NoDuplicateAttr
        | K::CudaConstantAttr
        | K::CudaDeviceAttr
        | K::CudaGlobalAttr
        | K::CudaHostAttr
        | K::CudaSharedAttr
        | K::NSReturnsRetained
        | K::NSReturnsNotRetained
        | K::NSReturnsAutoreleased
        | K::NSConsumesSelf
        | K::NSConsumed
        | K::ObjCException
        | K::ObjCNSObject
        | K::ObjCIndependentClass
        | K::ObjCPreciseLifetime
        | K::ObjCReturnsInnerPointer
        | K::ObjCRequiresSuper
        | K::ObjCRootClass
        | K::ObjCSubclassingRestricted
        | K::ObjCExplicitProtocolImpl
        | K::ObjCDesignatedInitializer
        | K::ObjCRuntimeVisible
        | K::ObjCBoxable
        | K::FlagEnum
        | K::ConvergentAttr
        | K::ModuleImportDecl
        | K::OverloadCandidate => NodeKind::Unrecognized(kind as i32),
    }
}

fn descends_into(kind: NodeKind, is_definition: bool) -> bool {
    match kind {
        NodeKind::TranslationUnit
        | NodeKind::Namespace
        | NodeKind::LinkageSpec
        | NodeKind::UnexposedDecl
        | NodeKind::StructDecl
        | NodeKind::UnionDecl
        | NodeKind::ClassDecl
        | NodeKind::TypedefDecl
        | NodeKind::TypeAliasDecl
        | NodeKind::VarDecl => true,
        NodeKind::FunctionDecl => !is_definition,
        _ => false,
    }
}

fn literal(result: EvaluationResult) -> Option<String> {
    match result {
        EvaluationResult::SignedInteger(value) => Some(value.to_string()),
        EvaluationResult::UnsignedInteger(value) => Some(value.to_string()),
        EvaluationResult::Float(value) => Some(value.to_string()),
        EvaluationResult::String(value) => Some(value.to_string_lossy().into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ArchitectureDatabase, LayoutBuilder, MemberKind};
    use crate::signature::SignatureCollector;

    /// Parses `source` as an in-memory C++ header for x86_64. `None` when
    /// libclang cannot be loaded on this machine.
    fn parse_source(source: &str) -> Option<ParsedUnit> {
        let header = Path::new("layout_test.h");
        let arguments = ["-x", "c++", "--target=x86_64-linux-unknown"].map(String::from);

        match parse_with(header, &arguments, &[Unsaved::new(header, source)]) {
            Ok(unit) => Some(unit),
            Err(FrontendError::Load(reason)) => {
                eprintln!("skipping, libclang unavailable: {}", reason);
                None
            }
            Err(e) => panic!("parse failed: {}", e),
        }
    }

    fn build(unit: &ParsedUnit) -> ArchitectureDatabase {
        let mut db = ArchitectureDatabase::new("x86_64");
        let mut sigs = SignatureCollector::new();
        LayoutBuilder::new(&mut db, &mut sigs).build(&unit.root).unwrap();
        db
    }

    #[test]
    fn test_entity_kind_mapping() {
        assert_eq!(node_kind(EntityKind::TranslationUnit), NodeKind::TranslationUnit);
        assert_eq!(node_kind(EntityKind::StructDecl), NodeKind::StructDecl);
        assert_eq!(node_kind(EntityKind::TypedefDecl), NodeKind::TypedefDecl);
        assert_eq!(node_kind(EntityKind::FinalAttr), NodeKind::FinalAttr);
        assert_eq!(node_kind(EntityKind::IntegerLiteral), NodeKind::Expression);
        assert_eq!(node_kind(EntityKind::CompoundStmt), NodeKind::Statement);
        assert_eq!(
            node_kind(EntityKind::NotImplemented),
            NodeKind::Unrecognized(EntityKind::NotImplemented as i32)
        );
        assert!(matches!(node_kind(EntityKind::ObjCInterfaceDecl), NodeKind::Unrecognized(_)));
    }

    #[test]
    fn test_struct_layout_from_source() {
        let Some(unit) = parse_source("struct A { int x; char y; };") else {
            return;
        };
        assert_eq!(unit.root.kind, NodeKind::TranslationUnit);

        let db = build(&unit);
        assert!(db.success);
        let a = db.get_struct("A").unwrap();
        assert_eq!((a.size, a.alignment), (Some(8), Some(4)));

        let offsets: Vec<_> = a.members.iter().map(|m| (m.name.as_str(), m.offset)).collect();
        assert_eq!(offsets, vec![("x", Some(0)), ("y", Some(4))]);
    }

    #[test]
    fn test_anonymous_union_member_offset() {
        let Some(unit) = parse_source("struct B { int tag; union { int i; float f; }; };") else {
            return;
        };

        let db = build(&unit);
        let b = db.get_struct("B").unwrap();
        assert_eq!(b.size, Some(8));

        let slot = b.members.iter().find(|m| m.kind == MemberKind::Union).unwrap();
        assert!(slot.is_anonymous());
        assert_eq!(slot.offset, Some(4));
        let inner: Vec<_> = slot.members.iter().map(|m| (m.name.as_str(), m.offset)).collect();
        assert_eq!(inner, vec![("i", Some(0)), ("f", Some(0))]);
        assert!(db.get_union("").is_none());
    }

    #[test]
    fn test_typedef_of_anonymous_struct() {
        let Some(unit) = parse_source("typedef struct { int a; } MyStruct;") else {
            return;
        };

        let db = build(&unit);
        let record = db.get_struct("MyStruct").unwrap();
        assert_eq!(record.size, Some(4));
        assert_eq!(record.members[0].name, "a");
        assert!(db.get_struct("").is_none());
    }

    #[test]
    fn test_final_struct_from_source() {
        let Some(unit) = parse_source("struct S final { int v; };") else {
            return;
        };

        let db = build(&unit);
        assert_eq!(db.get_struct("S").unwrap().members.len(), 1);
    }
}
