// Mon Oct 19 2026 - Alex

use super::args::{Args, Command, CompareArgs, ExtractArgs, SignaturesArgs};
use crate::config::{ArchitectureConfig, ExtractorConfig};
use crate::frontend::{CompilerSearchPaths, Frontend};
use crate::layout::{ArchTag, LayoutComparator};
use crate::orchestration::{ArchitectureExtraction, ExtractionCoordinator};
use crate::output::{open_sink, ReportEmitter};
use crate::utils::LoggingUtils;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

#[cfg(feature = "libclang")]
fn default_frontend() -> anyhow::Result<crate::frontend::ClangFrontend> {
    Ok(crate::frontend::ClangFrontend::new())
}

#[cfg(not(feature = "libclang"))]
fn default_frontend() -> anyhow::Result<crate::frontend::SyntheticFrontend> {
    anyhow::bail!("Built without the `libclang` feature; no compiler frontend is available")
}

/// Global options that shape the extractor config for every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub compiler: Option<String>,
    pub no_search_paths: bool,
}

pub struct CommandHandler {
    color: bool,
    options: GlobalOptions,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            color: true,
            options: GlobalOptions::default(),
        }
    }

    pub fn execute(mut self, args: Args) -> anyhow::Result<ExitCode> {
        self.setup_logging(&args);
        self.options = GlobalOptions {
            compiler: args.compiler.clone(),
            no_search_paths: args.no_search_paths,
        };

        match args.command {
            Command::Extract(extract_args) => self.handle_extract(extract_args),
            Command::Signatures(signature_args) => self.handle_signatures(signature_args),
            Command::Compare(compare_args) => self.handle_compare(compare_args),
        }
    }

    fn setup_logging(&mut self, args: &Args) {
        if args.no_color {
            colored::control::set_override(false);
            self.color = false;
        }
        LoggingUtils::init_logger(LoggingUtils::level_from_str(&args.log_level), self.color);
    }

    fn handle_extract(&self, args: ExtractArgs) -> anyhow::Result<ExitCode> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let config = resolve_config(&self.options, args.config.as_deref(), &args.arches, &args.clang_args)?;
        let results = self.run(&args.header, &config)?;
        let databases: Vec<_> = results.into_iter().map(|r| r.database).collect();

        let mut sink = open_sink(args.output.as_deref())?;
        ReportEmitter::new(args.format)
            .with_color(self.color && args.output.is_none())
            .emit_databases(&args.header, &databases, &mut sink)?;

        let failed: Vec<&str> = databases.iter().filter(|db| !db.success).map(|db| db.arch.as_str()).collect();
        if !failed.is_empty() {
            eprintln!("{} Extraction failed for: {}", "[!]".red(), failed.join(", "));
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    fn handle_signatures(&self, args: SignaturesArgs) -> anyhow::Result<ExitCode> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let arches = [args.arch.clone()];
        let config = resolve_config(&self.options, args.config.as_deref(), &arches, &args.clang_args)?;
        let mut results = self.run(&args.header, &config)?;
        let Some(result) = results.pop() else {
            anyhow::bail!("No architecture selected");
        };

        if !result.database.success {
            anyhow::bail!("Extraction failed for {}: {}", result.database.arch, result.database.failures.join("; "));
        }

        let mut sink = open_sink(args.output.as_deref())?;
        ReportEmitter::new(args.format).emit_signatures(&result.signatures, &mut sink)?;
        Ok(ExitCode::SUCCESS)
    }

    fn handle_compare(&self, args: CompareArgs) -> anyhow::Result<ExitCode> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let config = resolve_config(&self.options, args.config.as_deref(), &args.arches, &args.clang_args)?;
        let results = self.run(&args.header, &config)?;
        let [first, second] = results.as_slice() else {
            anyhow::bail!("Expected two architectures, got {}", results.len());
        };

        let report = LayoutComparator::new().compare(&first.database, &second.database)?;

        let mut sink = open_sink(args.output.as_deref())?;
        ReportEmitter::new(args.format)
            .with_color(self.color && args.output.is_none())
            .emit_comparison(&report, &mut sink)?;

        if report.is_clean() {
            Ok(ExitCode::SUCCESS)
        } else {
            eprintln!(
                "{} {} unreconciled mismatch(es), {} violation(s)",
                "[!]".red(),
                report.unreconciled().count(),
                report.violations().count()
            );
            Ok(ExitCode::FAILURE)
        }
    }

    fn run(&self, header: &Path, config: &ExtractorConfig) -> anyhow::Result<Vec<ArchitectureExtraction>> {
        let resolver = config
            .resolve_search_paths
            .then(|| CompilerSearchPaths::new(config.compiler.as_str()));
        run_with(default_frontend()?, resolver, header, config)
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn run_with<F: Frontend>(
    frontend: F,
    resolver: Option<CompilerSearchPaths>,
    header: &Path,
    config: &ExtractorConfig,
) -> anyhow::Result<Vec<ArchitectureExtraction>> {
    let coordinator = ExtractionCoordinator::new(frontend, resolver);
    let results = coordinator
        .extract_all(header, config)
        .with_context(|| format!("Walking {}", header.display()))?;
    Ok(results)
}

/// Builds the run's config from an optional config file, the selected
/// architecture labels and the trailing compiler arguments.
///
/// Without a config file every label must name a known architecture preset.
/// With one, labels select from the file's architectures.
pub fn resolve_config(
    options: &GlobalOptions,
    config_path: Option<&Path>,
    arches: &[String],
    clang_args: &[String],
) -> anyhow::Result<ExtractorConfig> {
    let mut config = match config_path {
        Some(path) => ExtractorConfig::from_json_file(path)
            .with_context(|| format!("Loading config {}", path.display()))?,
        None => ExtractorConfig::new(),
    };

    if !arches.is_empty() {
        let selected = arches
            .iter()
            .map(|label| select_architecture(&config, config_path.is_some(), label))
            .collect::<anyhow::Result<Vec<_>>>()?;
        config.architectures = selected;
    }

    if let Some(compiler) = &options.compiler {
        config.compiler = compiler.clone();
    }
    if options.no_search_paths {
        config.resolve_search_paths = false;
    }
    config.base_arguments.extend(clang_args.iter().cloned());

    config.validate()?;
    Ok(config)
}

fn select_architecture(config: &ExtractorConfig, from_file: bool, label: &str) -> anyhow::Result<ArchitectureConfig> {
    if from_file {
        return config
            .architecture(label)
            .cloned()
            .with_context(|| format!("Architecture '{}' is not in the config file", label));
    }

    let tag: ArchTag = label.parse()?;
    Ok(ArchitectureConfig::preset(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::synthetic::*;
    use crate::frontend::SyntheticFrontend;

    #[test]
    fn test_resolve_config_presets() {
        let options = GlobalOptions {
            compiler: Some("clang-15".into()),
            no_search_paths: true,
        };
        let config = resolve_config(
            &options,
            None,
            &["aarch64".to_string(), "win32".to_string()],
            &["-std=c++20".to_string()],
        )
        .unwrap();

        let labels: Vec<_> = config.architectures.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["aarch64", "win32"]);
        assert_eq!(config.compiler, "clang-15");
        assert!(!config.resolve_search_paths);
        assert_eq!(config.base_arguments, vec!["-std=c++20"]);
    }

    #[test]
    fn test_resolve_config_defaults_to_x86_64() {
        let config = resolve_config(&GlobalOptions::default(), None, &[], &[]).unwrap();
        assert_eq!(config.architectures.len(), 1);
        assert_eq!(config.architectures[0].label, "x86_64");
        assert!(config.resolve_search_paths);
    }

    #[test]
    fn test_resolve_config_unknown_label() {
        let err = resolve_config(&GlobalOptions::default(), None, &["riscv64".to_string()], &[]).unwrap_err();
        assert!(err.to_string().contains("riscv64"));
    }

    #[test]
    fn test_run_with_synthetic_frontend() {
        let frontend = SyntheticFrontend::new()
            .with_tree("x86_64-linux-unknown", translation_unit([structure("A", 8, 4)]));
        let config = resolve_config(&GlobalOptions::default(), None, &[], &[]).unwrap();

        let results = run_with(frontend, None, Path::new("a.h"), &config).unwrap();
        assert!(results[0].database.get_struct("A").is_some());
    }
}
