// Mon Oct 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marker that asks for an exact layout match across architectures.
pub const EXPECT_MATCH_MARKER: &str = "fex-match";

const AGGREGATE_ALIAS_PREFIX: &str = "alias-";
const VARIABLE_ALIAS_PREFIX: &str = "ioctl-alias-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArchTag {
    #[serde(rename = "x86_32")]
    X86_32,
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "aarch64")]
    Aarch64,
    #[serde(rename = "win32")]
    Win32,
    #[serde(rename = "win64")]
    Win64,
}

impl ArchTag {
    pub const ALL: [ArchTag; 5] = [
        ArchTag::X86_32,
        ArchTag::X86_64,
        ArchTag::Aarch64,
        ArchTag::Win32,
        ArchTag::Win64,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArchTag::X86_32 => "x86_32",
            ArchTag::X86_64 => "x86_64",
            ArchTag::Aarch64 => "aarch64",
            ArchTag::Win32 => "win32",
            ArchTag::Win64 => "win64",
        }
    }
}

impl fmt::Display for ArchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchTag {
    type Err = AliasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArchTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| AliasError::UnknownArchitecture(s.to_string()))
    }
}

/// Declares that the annotated declaration is the intentional counterpart of
/// `name` on architecture `arch`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AliasAnnotation {
    pub name: String,
    pub arch: ArchTag,
}

impl AliasAnnotation {
    pub fn new(name: impl Into<String>, arch: ArchTag) -> Self {
        Self {
            name: name.into(),
            arch,
        }
    }
}

impl fmt::Display for AliasAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.arch, self.name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    #[error("Unknown alias target architecture '{0}'")]
    UnknownArchitecture(String),
    #[error("Can't handle alias type '{0}'")]
    Malformed(String),
}

/// Which convention applies depends on what the annotation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationSite {
    /// Structs and unions: `alias-<tag>-<name>`.
    Aggregate,
    /// Variables and scalar typedefs: `ioctl-alias-<tag>-<name>`.
    Variable,
}

impl AnnotationSite {
    pub fn prefix(self) -> &'static str {
        match self {
            AnnotationSite::Aggregate => AGGREGATE_ALIAS_PREFIX,
            AnnotationSite::Variable => VARIABLE_ALIAS_PREFIX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Alias(AliasAnnotation),
    ExpectMatch,
    /// Belongs to some other tool.
    Unrelated,
}

pub fn resolve_annotation(site: AnnotationSite, text: &str) -> Result<Annotation, AliasError> {
    if text == EXPECT_MATCH_MARKER {
        return Ok(Annotation::ExpectMatch);
    }

    let Some(rest) = text.strip_prefix(site.prefix()) else {
        return Ok(Annotation::Unrelated);
    };

    let (tag, name) = rest
        .split_once('-')
        .ok_or_else(|| AliasError::Malformed(text.to_string()))?;
    if name.is_empty() {
        return Err(AliasError::Malformed(text.to_string()));
    }

    let arch = tag.parse::<ArchTag>()?;
    Ok(Annotation::Alias(AliasAnnotation::new(name, arch)))
}
