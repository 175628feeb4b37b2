// Mon Oct 19 2026 - Alex

use crate::frontend::{NodeKind, SyntaxNode};
use crate::layout::ExtractError;
use crate::signature::FunctionSignature;

/// Collects extern function declarations seen during one architecture's walk.
#[derive(Debug, Default, Clone)]
pub struct SignatureCollector {
    signatures: Vec<FunctionSignature>,
    skipped: usize,
}

impl SignatureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `node` if it is a plain declaration. Definitions and functions
    /// carrying an asm label are left out; an unknown child kind is fatal.
    pub fn collect(&mut self, node: &SyntaxNode) -> Result<(), ExtractError> {
        if node.is_definition {
            return Ok(());
        }

        let return_type = node.result_type.clone().unwrap_or_default();
        let mut signature = FunctionSignature::new(node.spelling.clone(), return_type);

        for child in &node.children {
            match child.kind {
                NodeKind::ParmDecl => signature.parameters.push(child.type_spelling.clone()),
                NodeKind::AsmLabelAttr => {
                    log::debug!("Skipping {} (asm label '{}')", node.spelling, child.spelling);
                    self.skipped += 1;
                    return Ok(());
                }
                NodeKind::TypeRef
                | NodeKind::NamespaceRef
                | NodeKind::TemplateRef
                | NodeKind::VisibilityAttr
                | NodeKind::UnexposedAttr
                | NodeKind::ConstAttr
                | NodeKind::PureAttr
                | NodeKind::WarnUnusedAttr
                | NodeKind::WarnUnusedResultAttr => {}
                kind => {
                    return Err(ExtractError::UnrecognizedNode {
                        context: "function declaration",
                        kind,
                        spelling: child.spelling.clone(),
                        scope: node.spelling.clone(),
                    });
                }
            }
        }

        self.signatures.push(signature);
        Ok(())
    }

    pub fn signatures(&self) -> &[FunctionSignature] {
        &self.signatures
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_signatures(self) -> Vec<FunctionSignature> {
        self.signatures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::synthetic;

    #[test]
    fn test_unused_result_declaration() {
        let node = synthetic::function("foo", "int", &[("a", "int"), ("b", "char")])
            .with_child(synthetic::attribute(NodeKind::WarnUnusedResultAttr, ""));

        let mut collector = SignatureCollector::new();
        collector.collect(&node).unwrap();

        let sigs = collector.signatures();
        assert_eq!(sigs.len(), 1);
        assert_eq!(sigs[0].name, "foo");
        assert_eq!(sigs[0].return_type, "int");
        assert_eq!(sigs[0].parameters, vec!["int", "char"]);
    }

    #[test]
    fn test_definition_skipped() {
        let node = synthetic::function("bar", "void", &[]).with_definition(true);
        let mut collector = SignatureCollector::new();
        collector.collect(&node).unwrap();
        assert!(collector.signatures().is_empty());
    }

    #[test]
    fn test_asm_label_aborts_only_that_function() {
        let labelled = synthetic::function("stat64", "int", &[("path", "const char *")])
            .with_child(synthetic::attribute(NodeKind::AsmLabelAttr, "__xstat64"));
        let plain = synthetic::function("close", "int", &[("fd", "int")])
            .with_child(synthetic::attribute(NodeKind::VisibilityAttr, "default"));

        let mut collector = SignatureCollector::new();
        collector.collect(&labelled).unwrap();
        collector.collect(&plain).unwrap();

        assert_eq!(collector.skipped(), 1);
        let names: Vec<_> = collector.signatures().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["close"]);
    }

    #[test]
    fn test_unknown_child_is_fatal() {
        let node = synthetic::function("baz", "void", &[])
            .with_child(SyntaxNode::new(NodeKind::Unrecognized(437), "nodiscard"));
        let mut collector = SignatureCollector::new();
        let err = collector.collect(&node).unwrap_err();
        assert!(matches!(err, ExtractError::UnrecognizedNode { kind: NodeKind::Unrecognized(437), .. }));
        assert!(collector.signatures().is_empty());
    }
}
