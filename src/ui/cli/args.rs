// Mon Oct 19 2026 - Alex

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "abi-layout-extractor")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Extracts struct, union and constant layouts from a C/C++ header for several target architectures", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Compiler queried for default include search paths
    #[arg(long, global = true)]
    pub compiler: Option<String>,

    #[arg(long, global = true)]
    pub no_search_paths: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump the layout database of each architecture
    Extract(ExtractArgs),
    /// Emit function specialization stubs for one architecture
    Signatures(SignaturesArgs),
    /// Compare two architectures and fail on unreconciled differences
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    pub header: PathBuf,

    #[arg(short, long = "arch")]
    pub arches: Vec<String>,

    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra arguments passed to the compiler after `--`
    #[arg(last = true)]
    pub clang_args: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct SignaturesArgs {
    pub header: PathBuf,

    #[arg(short, long, default_value = "x86_64")]
    pub arch: String,

    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(last = true)]
    pub clang_args: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct CompareArgs {
    pub header: PathBuf,

    #[arg(short, long = "arch", required = true)]
    pub arches: Vec<String>,

    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(last = true)]
    pub clang_args: Vec<String>,
}

fn check_header(header: &Path) -> Result<(), String> {
    if !header.exists() {
        return Err(format!("Header does not exist: {:?}", header));
    }
    Ok(())
}

impl ExtractArgs {
    pub fn validate(&self) -> Result<(), String> {
        check_header(&self.header)
    }
}

impl SignaturesArgs {
    pub fn validate(&self) -> Result<(), String> {
        check_header(&self.header)
    }
}

impl CompareArgs {
    pub fn validate(&self) -> Result<(), String> {
        check_header(&self.header)?;
        if self.arches.len() != 2 {
            return Err(format!("compare needs exactly two --arch values, got {}", self.arches.len()));
        }
        if self.arches[0] == self.arches[1] {
            return Err("Cannot compare an architecture with itself".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_args() {
        let args = Args::try_parse_from([
            "abi-layout-extractor",
            "--no-color",
            "extract",
            "abi.h",
            "--arch",
            "x86_64",
            "-a",
            "aarch64",
            "--format",
            "text",
            "--",
            "-std=c++17",
            "-DFOO",
        ])
        .unwrap();

        assert!(args.no_color);
        assert_eq!(args.log_level, "info");
        match args.command {
            Command::Extract(extract) => {
                assert_eq!(extract.header, PathBuf::from("abi.h"));
                assert_eq!(extract.arches, vec!["x86_64", "aarch64"]);
                assert_eq!(extract.format, OutputFormat::Text);
                assert_eq!(extract.clang_args, vec!["-std=c++17", "-DFOO"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_compare_requires_arch() {
        assert!(Args::try_parse_from(["abi-layout-extractor", "compare", "abi.h"]).is_err());
    }

    #[test]
    fn test_compare_validate_counts_arches() {
        let args = CompareArgs {
            header: PathBuf::from(file!()),
            arches: vec!["x86_64".into()],
            config: None,
            format: OutputFormat::Text,
            output: None,
            clang_args: Vec::new(),
        };
        assert!(args.validate().is_err());

        let args = CompareArgs {
            arches: vec!["x86_64".into(), "x86_64".into()],
            ..args
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_missing_header_rejected() {
        let args = SignaturesArgs {
            header: PathBuf::from("/nonexistent/abi.h"),
            arch: "x86_64".into(),
            config: None,
            format: OutputFormat::Text,
            output: None,
            clang_args: Vec::new(),
        };
        assert!(args.validate().is_err());
    }
}
