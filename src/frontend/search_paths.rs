// Mon Oct 19 2026 - Alex

use crate::frontend::FrontendError;
use std::process::{Command, Stdio};

const SEARCH_LIST_BEGIN: &str = "#include <...> search starts here:";
const SEARCH_LIST_END: &str = "End of search list.";
const FRAMEWORK_SUFFIX: &str = "(framework directory)";

/// Turns an architecture's argument list into the full list handed to the
/// parser, including the compiler's default system include directories.
pub trait SearchPathResolver {
    fn resolve(&self, arguments: &[String]) -> Result<Vec<String>, FrontendError>;
}

/// `None` leaves the arguments untouched.
impl<R: SearchPathResolver> SearchPathResolver for Option<R> {
    fn resolve(&self, arguments: &[String]) -> Result<Vec<String>, FrontendError> {
        match self {
            Some(resolver) => resolver.resolve(arguments),
            None => Ok(arguments.to_vec()),
        }
    }
}

/// Queries a compiler driver in verbose no-op mode for its search list.
#[derive(Debug, Clone)]
pub struct CompilerSearchPaths {
    compiler: String,
}

impl CompilerSearchPaths {
    pub fn new(compiler: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
        }
    }

    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    pub fn query(&self, arguments: &[String]) -> Result<Vec<String>, FrontendError> {
        let output = Command::new(&self.compiler)
            .args(arguments)
            .args(["-v", "-x", "c++", "-S", "-", "-o", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| FrontendError::Compiler {
                compiler: self.compiler.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        match parse_search_list(&stderr) {
            Some(paths) => Ok(paths),
            None => Err(FrontendError::NoSearchList {
                compiler: self.compiler.clone(),
                status: output.status.to_string(),
            }),
        }
    }
}

impl Default for CompilerSearchPaths {
    fn default() -> Self {
        Self::new("clang")
    }
}

impl SearchPathResolver for CompilerSearchPaths {
    fn resolve(&self, arguments: &[String]) -> Result<Vec<String>, FrontendError> {
        let paths = self.query(arguments)?;
        log::debug!("{} reported {} system include directories", self.compiler, paths.len());
        Ok(include_arguments(&paths, arguments))
    }
}

/// Extracts the directories between the `#include <...>` banner and the end
/// marker. Returns `None` when the banner never appears.
pub fn parse_search_list(stderr: &str) -> Option<Vec<String>> {
    let mut lines = stderr.lines().map(str::trim);
    lines.find(|line| *line == SEARCH_LIST_BEGIN)?;

    let paths = lines
        .take_while(|line| *line != SEARCH_LIST_END)
        .filter(|line| !line.is_empty() && !line.ends_with(FRAMEWORK_SUFFIX))
        .map(str::to_string)
        .collect();
    Some(paths)
}

/// `-I<dir>` for every directory, followed by the original arguments.
pub fn include_arguments(paths: &[String], arguments: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|path| format!("-I{}", path))
        .chain(arguments.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLANG_STDERR: &str = "\
clang version 14.0.0
Target: x86_64-unknown-linux-gnu
ignoring nonexistent directory \"/usr/local/include/x86_64-linux-gnu\"
#include \"...\" search starts here:
#include <...> search starts here:
 /usr/lib/llvm-14/lib/clang/14.0.0/include
 /usr/local/include
 /usr/include/x86_64-linux-gnu
 /usr/include
End of search list.
";

    #[test]
    fn test_parse_search_list() {
        let paths = parse_search_list(CLANG_STDERR).unwrap();
        assert_eq!(paths, vec![
            "/usr/lib/llvm-14/lib/clang/14.0.0/include",
            "/usr/local/include",
            "/usr/include/x86_64-linux-gnu",
            "/usr/include",
        ]);
    }

    #[test]
    fn test_missing_banner() {
        assert!(parse_search_list("clang: error: unknown target triple").is_none());
    }

    #[test]
    fn test_framework_directories_skipped() {
        let stderr = "#include <...> search starts here:\n /usr/include\n /Library/Frameworks (framework directory)\nEnd of search list.\n";
        assert_eq!(parse_search_list(stderr).unwrap(), vec!["/usr/include"]);
    }

    #[test]
    fn test_include_arguments_keep_original_order() {
        let args = include_arguments(
            &["/usr/include".to_string()],
            &["--target=x86_64-linux-unknown".to_string(), "-D_M_X86_64".to_string()],
        );
        assert_eq!(args, vec!["-I/usr/include", "--target=x86_64-linux-unknown", "-D_M_X86_64"]);
    }

    #[test]
    fn test_none_resolver_passes_through() {
        let resolver: Option<CompilerSearchPaths> = None;
        let args = vec!["-O2".to_string()];
        assert_eq!(resolver.resolve(&args).unwrap(), args);
    }
}
