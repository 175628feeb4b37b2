// Mon Oct 19 2026 - Alex

//! Hand-built syntax trees. Used to drive the builder without a compiler,
//! mostly from tests, and by tools that already have layout facts at hand.

use crate::frontend::{Frontend, FrontendError, NodeKind, ParsedUnit, SyntaxNode, TypedefTarget};
use std::collections::HashMap;
use std::path::Path;

pub fn translation_unit<I: IntoIterator<Item = SyntaxNode>>(children: I) -> SyntaxNode {
    SyntaxNode::new(NodeKind::TranslationUnit, "header.h")
        .with_definition(true)
        .with_children(children)
}

pub fn namespace<I: IntoIterator<Item = SyntaxNode>>(name: &str, children: I) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Namespace, name).with_children(children)
}

/// Struct definition whose type spelling is `name` (empty for anonymous).
pub fn structure(name: &str, size: u64, alignment: u64) -> SyntaxNode {
    SyntaxNode::new(NodeKind::StructDecl, name)
        .with_type(name, size, alignment)
        .with_definition(true)
}

pub fn union(name: &str, size: u64, alignment: u64) -> SyntaxNode {
    SyntaxNode::new(NodeKind::UnionDecl, name)
        .with_type(name, size, alignment)
        .with_definition(true)
}

/// Field at `offset` bytes inside its enclosing record.
pub fn field(name: &str, ty: &str, size: u64, alignment: u64, offset: u64) -> SyntaxNode {
    SyntaxNode::new(NodeKind::FieldDecl, name)
        .with_type(ty, size, alignment)
        .with_offset(offset)
}

pub fn annotate(text: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::AnnotateAttr, text)
}

pub fn type_ref(spelling: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::TypeRef, spelling).with_type_spelling(spelling)
}

/// `typedef struct/union ... name;`, the canonical type being a record.
pub fn typedef_record(name: &str, size: u64, alignment: u64) -> SyntaxNode {
    SyntaxNode::new(NodeKind::TypedefDecl, name)
        .with_type(name, size, alignment)
        .with_definition(true)
        .with_typedef(TypedefTarget {
            elaborated_record: true,
            size: Some(size),
        })
}

/// `typedef <scalar or pointer> name;`
pub fn typedef_scalar(name: &str, underlying: &str, size: u64) -> SyntaxNode {
    SyntaxNode::new(NodeKind::TypedefDecl, name)
        .with_type(name, size, size.max(1))
        .with_definition(true)
        .with_typedef(TypedefTarget {
            elaborated_record: false,
            size: Some(size),
        })
        .with_child(type_ref(underlying))
}

pub fn variable(name: &str, ty: &str, size: u64) -> SyntaxNode {
    SyntaxNode::new(NodeKind::VarDecl, name).with_type(ty, size, size.max(1))
}

/// Function declaration (not a definition) with `(name, type)` parameters.
pub fn function(name: &str, return_type: &str, parameters: &[(&str, &str)]) -> SyntaxNode {
    SyntaxNode::new(NodeKind::FunctionDecl, name)
        .with_type_spelling(format!("{} ({})", return_type, join_types(parameters)))
        .with_result_type(return_type)
        .with_children(parameters.iter().map(|(param, ty)| parameter(param, ty)))
}

pub fn parameter(name: &str, ty: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::ParmDecl, name).with_type_spelling(ty)
}

pub fn attribute(kind: NodeKind, spelling: &str) -> SyntaxNode {
    SyntaxNode::new(kind, spelling)
}

fn join_types(parameters: &[(&str, &str)]) -> String {
    parameters
        .iter()
        .map(|(_, ty)| *ty)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Frontend that hands back prepared trees, keyed by the `--target=` triple
/// found in the argument list.
#[derive(Debug, Default, Clone)]
pub struct SyntheticFrontend {
    units: HashMap<String, ParsedUnit>,
}

impl SyntheticFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, triple: &str, unit: ParsedUnit) -> Self {
        self.units.insert(triple.to_string(), unit);
        self
    }

    pub fn with_tree(self, triple: &str, root: SyntaxNode) -> Self {
        self.with_unit(triple, ParsedUnit::new(root))
    }
}

impl Frontend for SyntheticFrontend {
    fn parse(&self, header: &Path, arguments: &[String]) -> Result<ParsedUnit, FrontendError> {
        let triple = arguments
            .iter()
            .rev()
            .find_map(|arg| arg.strip_prefix("--target="))
            .unwrap_or_default();

        self.units
            .get(triple)
            .cloned()
            .ok_or_else(|| FrontendError::Parse {
                path: header.to_path_buf(),
                message: format!("no prepared tree for target '{}'", triple),
            })
    }
}
