// Mon Oct 19 2026 - Alex

use crate::frontend::NodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a typedef resolves to once the compiler strips the sugar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefTarget {
    /// Underlying type is an elaborated reference whose canonical type is a record.
    pub elaborated_record: bool,
    /// Size of the canonical type in bytes.
    pub size: Option<u64>,
}

/// Owned snapshot of one syntax-tree node and the layout facts the compiler
/// reported for it. All sizes and alignments are in bytes; `offset_bits` is the
/// member offset inside the immediately enclosing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub spelling: String,
    #[serde(default)]
    pub type_spelling: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub alignment: Option<u64>,
    #[serde(default)]
    pub offset_bits: Option<u64>,
    #[serde(default)]
    pub is_definition: bool,
    #[serde(default)]
    pub typedef: Option<TypedefTarget>,
    #[serde(default)]
    pub result_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            type_spelling: String::new(),
            size: None,
            alignment: None,
            offset_bits: None,
            is_definition: false,
            typedef: None,
            result_type: None,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_type(mut self, spelling: impl Into<String>, size: u64, alignment: u64) -> Self {
        self.type_spelling = spelling.into();
        self.size = Some(size);
        self.alignment = Some(alignment);
        self
    }

    pub fn with_type_spelling(mut self, spelling: impl Into<String>) -> Self {
        self.type_spelling = spelling.into();
        self
    }

    pub fn with_offset(mut self, bytes: u64) -> Self {
        self.offset_bits = Some(bytes * 8);
        self
    }

    pub fn with_offset_bits(mut self, bits: u64) -> Self {
        self.offset_bits = Some(bits);
        self
    }

    pub fn with_definition(mut self, is_definition: bool) -> Self {
        self.is_definition = is_definition;
        self
    }

    pub fn with_typedef(mut self, target: TypedefTarget) -> Self {
        self.typedef = Some(target);
        self
    }

    pub fn with_result_type(mut self, spelling: impl Into<String>) -> Self {
        self.result_type = Some(spelling.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children<I: IntoIterator<Item = SyntaxNode>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(move |child| child.kind == kind)
    }

    /// Annotation strings attached directly to this node.
    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.children_of_kind(NodeKind::AnnotateAttr)
            .map(|child| child.spelling.as_str())
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::node_count).sum::<usize>()
    }
}

/// Strips the elaborated keyword C mode puts in front of record spellings and
/// maps the compiler's placeholder names for anonymous records to "".
pub fn normalize_record_spelling(spelling: &str) -> String {
    if is_anonymous_spelling(spelling) {
        return String::new();
    }

    let trimmed = spelling.trim();
    for keyword in ["struct ", "union ", "class "] {
        if let Some(rest) = trimmed.strip_prefix(keyword) {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}

pub fn is_anonymous_spelling(spelling: &str) -> bool {
    let trimmed = spelling.trim();
    trimmed.is_empty() || trimmed.contains("(unnamed") || trimmed.contains("(anonymous")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ignored => write!(f, "ignored"),
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// A parsed header: the tree root plus every diagnostic the compiler emitted.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub root: SyntaxNode,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedUnit {
    pub fn new(root: SyntaxNode) -> Self {
        Self {
            root,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }
}
