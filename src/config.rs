// Mon Oct 19 2026 - Alex

use crate::layout::ArchTag;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No architectures configured")]
    NoArchitectures,
    #[error("Architecture '{0}' configured more than once")]
    DuplicateArchitecture(String),
    #[error("Architecture '{0}' has no target triple")]
    MissingTriple(String),
}

/// Compiler flags for one target architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    pub label: String,
    pub triple: String,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub include_dirs: Vec<String>,
    #[serde(default)]
    pub extra_arguments: Vec<String>,
}

impl ArchitectureConfig {
    pub fn new(label: impl Into<String>, triple: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            triple: triple.into(),
            defines: Vec::new(),
            include_dirs: Vec::new(),
            extra_arguments: Vec::new(),
        }
    }

    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    pub fn with_include_dir(mut self, dir: impl Into<String>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.extra_arguments.push(argument.into());
        self
    }

    /// Cross-compilation flags for a known architecture tag.
    pub fn preset(tag: ArchTag) -> Self {
        match tag {
            ArchTag::X86_64 => Self::new(tag.as_str(), "x86_64-linux-unknown")
                .with_include_dir("/usr/include/x86_64-linux-gnu")
                .with_include_dir("/usr/x86_64-linux-gnu/include/c++/10/x86_64-linux-gnu/")
                .with_include_dir("/usr/x86_64-linux-gnu/include/")
                .with_argument("-O2")
                .with_define("_M_X86_64"),
            ArchTag::X86_32 => Self::new(tag.as_str(), "i686-linux-unknown")
                .with_include_dir("/usr/include/i386-linux-gnu")
                .with_include_dir("/usr/i686-linux-gnu/include/c++/10/i686-linux-gnu/")
                .with_include_dir("/usr/i686-linux-gnu/include/")
                .with_argument("-O2")
                .with_define("_M_IX86"),
            ArchTag::Aarch64 => Self::new(tag.as_str(), "aarch64-linux-unknown")
                .with_include_dir("/usr/include/aarch64-linux-gnu")
                .with_include_dir("/usr/aarch64-linux-gnu/include/c++/10/aarch64-linux-gnu/")
                .with_include_dir("/usr/aarch64-linux-gnu/include/")
                .with_argument("-O2")
                .with_define("_M_ARM_64"),
            ArchTag::Win32 => Self::new(tag.as_str(), "i686-w64-windows-gnu")
                .with_include_dir("/usr/i686-w64-mingw32/include/")
                .with_argument("-O2")
                .with_define("_M_IX86")
                .with_define("_WIN32"),
            ArchTag::Win64 => Self::new(tag.as_str(), "x86_64-w64-windows-gnu")
                .with_include_dir("/usr/x86_64-w64-mingw32/include/")
                .with_argument("-O2")
                .with_define("_M_X86_64")
                .with_define("_WIN64"),
        }
    }

    /// Full argument list: include dirs, extra flags, target, defines, then
    /// the caller's base arguments.
    pub fn arguments(&self, base: &[String]) -> Vec<String> {
        let mut args: Vec<String> = self.include_dirs.iter().map(|dir| format!("-I{}", dir)).collect();
        args.extend(self.extra_arguments.iter().cloned());
        args.push(format!("--target={}", self.triple));
        args.extend(self.defines.iter().map(|define| format!("-D{}", define)));
        args.extend(base.iter().cloned());
        args
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub header: Option<PathBuf>,
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default = "default_true")]
    pub resolve_search_paths: bool,
    #[serde(default)]
    pub base_arguments: Vec<String>,
    #[serde(default)]
    pub architectures: Vec<ArchitectureConfig>,
}

fn default_compiler() -> String {
    "clang".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            header: None,
            compiler: default_compiler(),
            resolve_search_paths: true,
            base_arguments: Vec::new(),
            architectures: vec![ArchitectureConfig::preset(ArchTag::X86_64)],
        }
    }
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn with_header(mut self, header: impl Into<PathBuf>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    pub fn with_search_path_resolution(mut self, enabled: bool) -> Self {
        self.resolve_search_paths = enabled;
        self
    }

    pub fn with_base_arguments(mut self, arguments: Vec<String>) -> Self {
        self.base_arguments = arguments;
        self
    }

    pub fn with_architectures(mut self, architectures: Vec<ArchitectureConfig>) -> Self {
        self.architectures = architectures;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.architectures.is_empty() {
            return Err(ConfigError::NoArchitectures);
        }

        let mut seen = HashSet::new();
        for arch in &self.architectures {
            if !seen.insert(arch.label.as_str()) {
                return Err(ConfigError::DuplicateArchitecture(arch.label.clone()));
            }
            if arch.triple.trim().is_empty() {
                return Err(ConfigError::MissingTriple(arch.label.clone()));
            }
        }
        Ok(())
    }

    pub fn architecture(&self, label: &str) -> Option<&ArchitectureConfig> {
        self.architectures.iter().find(|arch| arch.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x86_64_preset_arguments() {
        let args = ArchitectureConfig::preset(ArchTag::X86_64).arguments(&["-std=c++17".to_string()]);
        assert_eq!(
            args,
            vec![
                "-I/usr/include/x86_64-linux-gnu",
                "-I/usr/x86_64-linux-gnu/include/c++/10/x86_64-linux-gnu/",
                "-I/usr/x86_64-linux-gnu/include/",
                "-O2",
                "--target=x86_64-linux-unknown",
                "-D_M_X86_64",
                "-std=c++17",
            ]
        );
    }

    #[test]
    fn test_every_tag_has_a_preset() {
        for tag in ArchTag::ALL {
            let preset = ArchitectureConfig::preset(tag);
            assert_eq!(preset.label, tag.as_str());
            assert!(!preset.triple.is_empty());
        }
    }

    #[test]
    fn test_from_json_defaults() {
        let config = ExtractorConfig::from_json_str(
            r#"{ "architectures": [ { "label": "aarch64", "triple": "aarch64-linux-gnu" } ] }"#,
        )
        .unwrap();

        assert_eq!(config.compiler, "clang");
        assert!(config.resolve_search_paths);
        assert!(config.architecture("aarch64").unwrap().defines.is_empty());
        assert!(config.architecture("x86_64").is_none());
    }

    #[test]
    fn test_validation() {
        let empty = ExtractorConfig::new().with_architectures(Vec::new());
        assert!(matches!(empty.validate(), Err(ConfigError::NoArchitectures)));

        let duplicate = ExtractorConfig::new().with_architectures(vec![
            ArchitectureConfig::preset(ArchTag::X86_64),
            ArchitectureConfig::preset(ArchTag::X86_64),
        ]);
        assert!(matches!(duplicate.validate(), Err(ConfigError::DuplicateArchitecture(l)) if l == "x86_64"));

        let no_triple = ExtractorConfig::new().with_architectures(vec![ArchitectureConfig::new("odd", " ")]);
        assert!(matches!(no_triple.validate(), Err(ConfigError::MissingTriple(_))));

        assert!(ExtractorConfig::new().validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(ExtractorConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }
}
