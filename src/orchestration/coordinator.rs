// Mon Oct 19 2026 - Alex

use crate::config::{ArchitectureConfig, ExtractorConfig};
use crate::frontend::{Diagnostic, Frontend, SearchPathResolver};
use crate::layout::{ArchitectureDatabase, ExtractError, LayoutBuilder};
use crate::signature::{FunctionSignature, SignatureCollector};
use std::path::Path;

/// Everything one architecture's pass produced.
#[derive(Debug, Clone)]
pub struct ArchitectureExtraction {
    pub database: ArchitectureDatabase,
    pub signatures: Vec<FunctionSignature>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ArchitectureExtraction {
    fn failed(database: ArchitectureDatabase) -> Self {
        Self {
            database,
            signatures: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// Drives search-path resolution, parsing and the layout walk for each
/// architecture in turn. Architectures share nothing mutable.
pub struct ExtractionCoordinator<F, R> {
    frontend: F,
    resolver: R,
}

impl<F: Frontend, R: SearchPathResolver> ExtractionCoordinator<F, R> {
    pub fn new(frontend: F, resolver: R) -> Self {
        Self { frontend, resolver }
    }

    /// A resolver or parse failure yields a failed database; only an
    /// unrecognized node stops the run.
    pub fn extract(
        &self,
        header: &Path,
        arch: &ArchitectureConfig,
        base_arguments: &[String],
    ) -> Result<ArchitectureExtraction, ExtractError> {
        let mut database = ArchitectureDatabase::new(arch.label.as_str());
        log::info!("Extracting {} for {}", header.display(), arch.label);

        let arguments = match self.resolver.resolve(&arch.arguments(base_arguments)) {
            Ok(arguments) => arguments,
            Err(e) => {
                log::error!("[{}] {}", arch.label, e);
                database.mark_failed(e.to_string());
                return Ok(ArchitectureExtraction::failed(database));
            }
        };
        log::debug!("[{}] arguments: {}", arch.label, arguments.join(" "));

        let unit = match self.frontend.parse(header, &arguments) {
            Ok(unit) => unit,
            Err(e) => {
                log::error!("[{}] {}", arch.label, e);
                database.mark_failed(e.to_string());
                return Ok(ArchitectureExtraction::failed(database));
            }
        };

        if !unit.diagnostics.is_empty() {
            log::warn!("Diagnostics from Arch: {}", arch.label);
            for diagnostic in &unit.diagnostics {
                log::warn!("{}", diagnostic);
            }
        }

        let mut signatures = SignatureCollector::new();
        LayoutBuilder::new(&mut database, &mut signatures).build(&unit.root)?;

        log::info!(
            "[{}] {} structs, {} unions, {} variables, {} functions",
            arch.label,
            database.structs.len(),
            database.unions.len(),
            database.variables.len(),
            signatures.signatures().len()
        );

        Ok(ArchitectureExtraction {
            database,
            signatures: signatures.into_signatures(),
            diagnostics: unit.diagnostics,
        })
    }

    /// Runs every configured architecture in order.
    pub fn extract_all(&self, header: &Path, config: &ExtractorConfig) -> Result<Vec<ArchitectureExtraction>, ExtractError> {
        config
            .architectures
            .iter()
            .map(|arch| self.extract(header, arch, &config.base_arguments))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::synthetic::*;
    use crate::frontend::{FrontendError, NodeKind, ParsedUnit, Severity, SyntaxNode, SyntheticFrontend};
    use crate::layout::{ArchTag, LayoutComparator};

    fn no_resolver() -> Option<crate::frontend::CompilerSearchPaths> {
        None
    }

    fn flags_tree(size: u64) -> SyntaxNode {
        translation_unit([structure("Flags", size, 4).with_child(field("bits", "int", 4, 4, 0))])
    }

    fn two_arch_config() -> ExtractorConfig {
        ExtractorConfig::new().with_architectures(vec![
            ArchitectureConfig::preset(ArchTag::X86_64),
            ArchitectureConfig::preset(ArchTag::Aarch64),
        ])
    }

    #[test]
    fn test_two_architectures_mismatch_detected() {
        let frontend = SyntheticFrontend::new()
            .with_tree("x86_64-linux-unknown", flags_tree(8))
            .with_tree("aarch64-linux-unknown", flags_tree(4));
        let coordinator = ExtractionCoordinator::new(frontend, no_resolver());

        let results = coordinator.extract_all(Path::new("flags.h"), &two_arch_config()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].database.arch, "x86_64");
        assert_eq!(results[1].database.arch, "aarch64");

        let report = LayoutComparator::new()
            .compare(&results[0].database, &results[1].database)
            .unwrap();
        assert!(report.has_unreconciled_mismatch());
    }

    #[test]
    fn test_parse_failure_marks_only_that_architecture() {
        let frontend = SyntheticFrontend::new().with_tree("x86_64-linux-unknown", flags_tree(8));
        let coordinator = ExtractionCoordinator::new(frontend, no_resolver());

        let results = coordinator.extract_all(Path::new("flags.h"), &two_arch_config()).unwrap();
        assert!(results[0].database.success);
        assert!(!results[1].database.success);
        assert!(results[1].database.structs.is_empty());
    }

    #[test]
    fn test_diagnostics_and_signatures_are_per_architecture() {
        let unit = ParsedUnit::new(translation_unit([function("ioctl", "int", &[("fd", "int")])]))
            .with_diagnostic(Diagnostic::new(Severity::Warning, "implicit conversion"));
        let frontend = SyntheticFrontend::new().with_unit("x86_64-linux-unknown", unit);
        let coordinator = ExtractionCoordinator::new(frontend, no_resolver());

        let result = coordinator
            .extract(Path::new("ioctl.h"), &ArchitectureConfig::preset(ArchTag::X86_64), &[])
            .unwrap();

        assert!(result.database.success);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.signatures.len(), 1);
        assert_eq!(result.signatures[0].to_string(), "int ioctl(int)");
    }

    #[test]
    fn test_resolver_failure_marks_database() {
        struct Broken;
        impl SearchPathResolver for Broken {
            fn resolve(&self, _: &[String]) -> Result<Vec<String>, FrontendError> {
                Err(FrontendError::NoSearchList {
                    compiler: "cc".into(),
                    status: "exit status: 1".into(),
                })
            }
        }

        let frontend = SyntheticFrontend::new().with_tree("x86_64-linux-unknown", flags_tree(8));
        let coordinator = ExtractionCoordinator::new(frontend, Broken);
        let result = coordinator
            .extract(Path::new("flags.h"), &ArchitectureConfig::preset(ArchTag::X86_64), &[])
            .unwrap();
        assert!(!result.database.success);
        assert_eq!(result.database.failures.len(), 1);
    }

    #[test]
    fn test_closure_frontend_receives_arguments() {
        let frontend = |_: &Path, args: &[String]| -> Result<ParsedUnit, FrontendError> {
            assert!(args.contains(&"-DEXTRA".to_string()));
            assert_eq!(args.last().map(String::as_str), Some("-std=c++17"));
            Ok(ParsedUnit::new(translation_unit([])))
        };
        let arch = ArchitectureConfig::preset(ArchTag::Win64).with_define("EXTRA");
        let coordinator = ExtractionCoordinator::new(frontend, no_resolver());

        let result = coordinator
            .extract(Path::new("a.h"), &arch, &["-std=c++17".to_string()])
            .unwrap();
        assert!(result.database.success);
    }

    #[test]
    fn test_unrecognized_node_stops_run() {
        let tree = translation_unit([SyntaxNode::new(NodeKind::Unrecognized(600), "odd")]);
        let frontend = SyntheticFrontend::new()
            .with_tree("x86_64-linux-unknown", tree)
            .with_tree("aarch64-linux-unknown", flags_tree(4));
        let coordinator = ExtractionCoordinator::new(frontend, no_resolver());

        assert!(coordinator.extract_all(Path::new("odd.h"), &two_arch_config()).is_err());
    }
}
