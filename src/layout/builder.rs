// Mon Oct 19 2026 - Alex

use crate::frontend::{NodeKind, SyntaxNode};
use crate::layout::alias::{resolve_annotation, Annotation, AnnotationSite};
use crate::layout::record::{
    AggregateRecord, Annotated, FieldRecord, MemberKind, RecordKind, VarDeclRecord, VarKind,
};
use crate::layout::{ArchitectureDatabase, ExtractError};
use crate::signature::SignatureCollector;

/// Depth-first walk over one architecture's syntax tree.
///
/// Every node kind is handled explicitly: layout-bearing declarations are
/// recorded, known-inert kinds are skipped, and anything unrecognized aborts
/// the walk so no layout fact can be dropped silently.
pub struct LayoutBuilder<'a> {
    database: &'a mut ArchitectureDatabase,
    signatures: &'a mut SignatureCollector,
}

impl<'a> LayoutBuilder<'a> {
    pub fn new(database: &'a mut ArchitectureDatabase, signatures: &'a mut SignatureCollector) -> Self {
        Self {
            database,
            signatures,
        }
    }

    pub fn build(mut self, root: &SyntaxNode) -> Result<(), ExtractError> {
        self.visit(root)
    }

    fn visit(&mut self, node: &SyntaxNode) -> Result<(), ExtractError> {
        match node.kind {
            NodeKind::TranslationUnit | NodeKind::LinkageSpec | NodeKind::UnexposedDecl => {
                self.visit_children(node)
            }
            NodeKind::Namespace => self.with_scope(&node.spelling, |builder| builder.visit_children(node)),
            NodeKind::StructDecl | NodeKind::ClassDecl => {
                self.visit_record(node, RecordKind::Struct, None, &[]).map(drop)
            }
            NodeKind::UnionDecl => self.visit_record(node, RecordKind::Union, None, &[]).map(drop),
            NodeKind::TypedefDecl | NodeKind::TypeAliasDecl => self.visit_typedef(node),
            NodeKind::VarDecl => self.visit_variable(node),
            NodeKind::FunctionDecl => self.signatures.collect(node),
            NodeKind::FieldDecl
            | NodeKind::ParmDecl
            | NodeKind::EnumDecl
            | NodeKind::EnumConstantDecl
            | NodeKind::Method
            | NodeKind::Template
            | NodeKind::AccessSpecifier
            | NodeKind::Using
            | NodeKind::FriendDecl
            | NodeKind::StaticAssert
            | NodeKind::TypeRef
            | NodeKind::NamespaceRef
            | NodeKind::TemplateRef
            | NodeKind::MemberRef
            | NodeKind::OtherRef
            | NodeKind::AnnotateAttr
            | NodeKind::AsmLabelAttr
            | NodeKind::FinalAttr
            | NodeKind::VisibilityAttr
            | NodeKind::UnexposedAttr
            | NodeKind::ConstAttr
            | NodeKind::PureAttr
            | NodeKind::WarnUnusedAttr
            | NodeKind::WarnUnusedResultAttr
            | NodeKind::AlignedAttr
            | NodeKind::PackedAttr
            | NodeKind::DllAttr
            | NodeKind::Preprocessing
            | NodeKind::Expression
            | NodeKind::Statement => Ok(()),
            NodeKind::Unrecognized(_) => Err(ExtractError::UnrecognizedNode {
                context: "declaration",
                kind: node.kind,
                spelling: node.spelling.clone(),
                scope: self.database.scope().current().to_string(),
            }),
        }
    }

    fn visit_children(&mut self, node: &SyntaxNode) -> Result<(), ExtractError> {
        node.children.iter().try_for_each(|child| self.visit(child))
    }

    /// Runs `body` with `name` pushed on the scope stack. The pop happens on
    /// every exit path, errors included. Empty names are not pushed.
    fn with_scope<T>(
        &mut self,
        name: &str,
        body: impl FnOnce(&mut Self) -> Result<T, ExtractError>,
    ) -> Result<T, ExtractError> {
        if name.is_empty() {
            return body(self);
        }

        self.database.scope_mut().push(name);
        let result = body(self);
        self.database.scope_mut().pop();
        result
    }

    fn visit_record(
        &mut self,
        node: &SyntaxNode,
        kind: RecordKind,
        name_override: Option<&str>,
        inherited: &[&str],
    ) -> Result<AggregateRecord, ExtractError> {
        let name = match name_override {
            Some(name) if node.type_spelling.is_empty() => name.to_string(),
            _ => node.type_spelling.clone(),
        };
        // A record reached through a typedef already sits in the typedef's scope.
        let scope_name = if name_override.is_some() { "" } else { node.spelling.as_str() };

        self.with_scope(scope_name, |builder| {
            let mut record = AggregateRecord::new(name, kind, node.size, node.alignment);
            for text in inherited {
                builder.annotate(&mut record, AnnotationSite::Aggregate, text);
            }
            builder.walk_members(node, &mut record)?;

            if record.name.is_empty() {
                log::trace!(
                    "[{}] anonymous {} in '{}' kept as a member only",
                    builder.database.arch,
                    kind,
                    builder.database.scope().current()
                );
            } else {
                builder.database.insert_record(record.clone());
            }
            Ok(record)
        })
    }

    fn walk_members(&mut self, node: &SyntaxNode, record: &mut AggregateRecord) -> Result<(), ExtractError> {
        for child in &node.children {
            match child.kind {
                NodeKind::AnnotateAttr => self.annotate(record, AnnotationSite::Aggregate, &child.spelling),
                NodeKind::FieldDecl => {
                    let field = FieldRecord::from_node(child, MemberKind::Field);
                    self.database.push_field(field.clone());
                    record.members.push(field);
                }
                NodeKind::StructDecl | NodeKind::ClassDecl | NodeKind::UnionDecl => {
                    let nested_kind = if child.kind == NodeKind::UnionDecl {
                        RecordKind::Union
                    } else {
                        RecordKind::Struct
                    };
                    let mut slot = FieldRecord::from_node(child, nested_kind.into());
                    self.database.push_field(slot.clone());

                    let nested = self.visit_record(child, nested_kind, None, &[])?;
                    slot.members = nested.members;
                    record.members.push(slot);
                }
                _ => self.visit(child)?,
            }
        }
        Ok(())
    }

    fn visit_typedef(&mut self, node: &SyntaxNode) -> Result<(), ExtractError> {
        if node.spelling.is_empty() {
            return Ok(());
        }

        let qualified = self.database.scope().qualify(&node.spelling);
        let target = node.typedef.clone().unwrap_or_default();

        if target.elaborated_record {
            return self.with_scope(&node.spelling, |builder| builder.walk_typedef_record(node, &qualified));
        }

        let mut variable = VarDeclRecord::new(qualified, VarKind::Typedef, target.size);
        for text in node.annotations() {
            self.annotate(&mut variable, AnnotationSite::Variable, text);
        }
        self.database.insert_variable(variable);
        Ok(())
    }

    /// Children of a typedef naming a record. An anonymous inline record takes
    /// the typedef's name, and annotations on the typedef apply to it.
    fn walk_typedef_record(&mut self, node: &SyntaxNode, qualified: &str) -> Result<(), ExtractError> {
        let inherited: Vec<&str> = node.annotations().collect();
        let mut inline_record = false;

        for child in &node.children {
            match child.kind {
                NodeKind::StructDecl | NodeKind::ClassDecl => {
                    self.visit_record(child, RecordKind::Struct, Some(qualified), &inherited)?;
                    inline_record = true;
                }
                NodeKind::UnionDecl => {
                    self.visit_record(child, RecordKind::Union, Some(qualified), &inherited)?;
                    inline_record = true;
                }
                NodeKind::AnnotateAttr => {}
                _ => self.visit(child)?,
            }
        }

        if !inline_record && !inherited.is_empty() {
            log::debug!(
                "[{}] typedef {} has annotations but no inline record to attach them to",
                self.database.arch,
                qualified
            );
        }
        Ok(())
    }

    fn visit_variable(&mut self, node: &SyntaxNode) -> Result<(), ExtractError> {
        let name = self.database.scope().qualify(&node.spelling);
        let mut variable =
            VarDeclRecord::new(name, VarKind::Variable, node.size).with_value(node.value.clone());
        for text in node.annotations() {
            self.annotate(&mut variable, AnnotationSite::Variable, text);
        }
        self.database.insert_variable(variable);
        Ok(())
    }

    /// An unknown alias tag poisons this architecture's database but lets the
    /// walk continue, so every bad annotation gets reported.
    fn annotate<R: Annotated>(&mut self, record: &mut R, site: AnnotationSite, text: &str) {
        match resolve_annotation(site, text) {
            Ok(Annotation::Alias(alias)) => record.add_alias(alias),
            Ok(Annotation::ExpectMatch) => record.set_expect_match(),
            Ok(Annotation::Unrelated) => log::trace!("Ignoring annotation '{}'", text),
            Err(error) => {
                log::error!("[{}] {}", self.database.arch, error);
                self.database.mark_failed(error.to_string());
            }
        }
    }
}
