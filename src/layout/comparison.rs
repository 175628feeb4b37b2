// Mon Oct 19 2026 - Alex

use crate::layout::alias::AliasAnnotation;
use crate::layout::record::{AggregateRecord, Annotated, FieldRecord, VarDeclRecord};
use crate::layout::{ArchitectureDatabase, ComparisonError};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// A single way two records with the same name disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "difference", rename_all = "snake_case")]
pub enum LayoutDifference {
    /// Present on one architecture only
    MissingIn { arch: String },
    SizeChanged { old_size: Option<u64>, new_size: Option<u64> },
    AlignmentChanged { old_alignment: Option<u64>, new_alignment: Option<u64> },
    MemberAdded { member: String, offset: Option<u64> },
    MemberRemoved { member: String, offset: Option<u64> },
    MemberMoved { member: String, old_offset: Option<u64>, new_offset: Option<u64> },
    MemberResized { member: String, old_size: Option<u64>, new_size: Option<u64> },
    MemberRealigned { member: String, old_alignment: Option<u64>, new_alignment: Option<u64> },
    /// Evaluated constant differs (ioctl numbers and friends)
    ValueChanged { old_value: Option<String>, new_value: Option<String> },
}

impl LayoutDifference {
    pub fn severity(&self) -> DifferenceSeverity {
        match self {
            LayoutDifference::MissingIn { .. } => DifferenceSeverity::Breaking,
            LayoutDifference::SizeChanged { .. } => DifferenceSeverity::Breaking,
            LayoutDifference::MemberRemoved { .. } => DifferenceSeverity::Breaking,
            LayoutDifference::MemberMoved { .. } => DifferenceSeverity::Breaking,
            LayoutDifference::MemberResized { .. } => DifferenceSeverity::Breaking,
            LayoutDifference::ValueChanged { .. } => DifferenceSeverity::Breaking,
            LayoutDifference::AlignmentChanged { .. } => DifferenceSeverity::Moderate,
            LayoutDifference::MemberRealigned { .. } => DifferenceSeverity::Moderate,
            LayoutDifference::MemberAdded { .. } => DifferenceSeverity::Minor,
        }
    }
}

struct Measure(Option<u64>);

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("?"),
        }
    }
}

struct Offset(Option<u64>);

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "0x{:X}", value),
            None => f.write_str("?"),
        }
    }
}

impl fmt::Display for LayoutDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDifference::MissingIn { arch } => write!(f, "Missing in {}", arch),
            LayoutDifference::SizeChanged { old_size, new_size } => {
                write!(f, "Size changed: {} -> {} bytes", Measure(*old_size), Measure(*new_size))
            }
            LayoutDifference::AlignmentChanged { old_alignment, new_alignment } => {
                write!(f, "Alignment changed: {} -> {}", Measure(*old_alignment), Measure(*new_alignment))
            }
            LayoutDifference::MemberAdded { member, offset } => {
                write!(f, "Added: {} @ {}", member, Offset(*offset))
            }
            LayoutDifference::MemberRemoved { member, offset } => {
                write!(f, "Removed: {} @ {}", member, Offset(*offset))
            }
            LayoutDifference::MemberMoved { member, old_offset, new_offset } => {
                write!(f, "Moved: {} from {} to {}", member, Offset(*old_offset), Offset(*new_offset))
            }
            LayoutDifference::MemberResized { member, old_size, new_size } => {
                write!(f, "Size changed: {}: {} -> {} bytes", member, Measure(*old_size), Measure(*new_size))
            }
            LayoutDifference::MemberRealigned { member, old_alignment, new_alignment } => {
                write!(f, "Alignment changed: {}: {} -> {}", member, Measure(*old_alignment), Measure(*new_alignment))
            }
            LayoutDifference::ValueChanged { old_value, new_value } => write!(
                f,
                "Value changed: {} -> {}",
                old_value.as_deref().unwrap_or("?"),
                new_value.as_deref().unwrap_or("?")
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DifferenceSeverity {
    Informational,
    Minor,
    Moderate,
    Breaking,
}

impl fmt::Display for DifferenceSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifferenceSeverity::Informational => write!(f, "INFO"),
            DifferenceSeverity::Minor => write!(f, "MINOR"),
            DifferenceSeverity::Moderate => write!(f, "MODERATE"),
            DifferenceSeverity::Breaking => write!(f, "BREAKING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    Struct,
    Union,
    Variable,
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordCategory::Struct => write!(f, "struct"),
            RecordCategory::Union => write!(f, "union"),
            RecordCategory::Variable => write!(f, "variable"),
        }
    }
}

/// Outcome for one record name across the two architectures.
#[derive(Debug, Clone, Serialize)]
pub struct RecordComparison {
    pub name: String,
    pub category: RecordCategory,
    pub differences: Vec<LayoutDifference>,
    /// Aliases naming the other architecture whose aliased pair is identical
    pub reconciled_by: Vec<AliasAnnotation>,
    pub expect_match: bool,
}

impl RecordComparison {
    fn new(name: &str, category: RecordCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
            differences: Vec::new(),
            reconciled_by: Vec::new(),
            expect_match: false,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }

    /// Identical, or explained by an alias pointing at the other architecture.
    pub fn is_reconciled(&self) -> bool {
        self.is_identical() || !self.reconciled_by.is_empty()
    }

    /// A record annotated to match exactly that does not.
    pub fn is_violation(&self) -> bool {
        self.expect_match && !self.is_identical()
    }

    pub fn worst_severity(&self) -> Option<DifferenceSeverity> {
        self.differences.iter().map(LayoutDifference::severity).max()
    }
}

impl fmt::Display for RecordComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.name)?;
        if self.is_violation() {
            write!(f, " (expected match)")?;
        } else if !self.is_identical() && self.is_reconciled() {
            write!(f, " (aliased: {})", self.reconciled_by.iter().join(", "))?;
        }
        for diff in &self.differences {
            write!(f, "\n  [{}] {}", diff.severity(), diff)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub first: String,
    pub second: String,
    pub records: Vec<RecordComparison>,
}

impl ComparisonReport {
    pub fn differing(&self) -> impl Iterator<Item = &RecordComparison> {
        self.records.iter().filter(|r| !r.is_identical())
    }

    pub fn unreconciled(&self) -> impl Iterator<Item = &RecordComparison> {
        self.records.iter().filter(|r| !r.is_reconciled())
    }

    pub fn violations(&self) -> impl Iterator<Item = &RecordComparison> {
        self.records.iter().filter(|r| r.is_violation())
    }

    pub fn has_unreconciled_mismatch(&self) -> bool {
        self.unreconciled().next().is_some()
    }

    pub fn has_violations(&self) -> bool {
        self.violations().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_unreconciled_mismatch() && !self.has_violations()
    }

    pub fn get(&self, name: &str) -> Option<&RecordComparison> {
        self.records.iter().find(|r| r.name == name)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comparison: {} vs {}", self.first, self.second)?;
        writeln!(f, "Records: {}", self.records.len())?;
        writeln!(f, "Differing: {}", self.differing().count())?;
        writeln!(f, "Unreconciled: {}", self.unreconciled().count())?;
        writeln!(f, "Violations: {}", self.violations().count())?;

        for record in self.differing() {
            writeln!(f, "\n{}", record)?;
        }
        Ok(())
    }
}

/// Read-only join of two architecture databases.
pub struct LayoutComparator {
    compare_alignment: bool,
    compare_values: bool,
}

impl Default for LayoutComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutComparator {
    pub fn new() -> Self {
        Self {
            compare_alignment: true,
            compare_values: true,
        }
    }

    pub fn with_alignment_comparison(mut self, enabled: bool) -> Self {
        self.compare_alignment = enabled;
        self
    }

    pub fn with_value_comparison(mut self, enabled: bool) -> Self {
        self.compare_values = enabled;
        self
    }

    pub fn compare(
        &self,
        first: &ArchitectureDatabase,
        second: &ArchitectureDatabase,
    ) -> Result<ComparisonReport, ComparisonError> {
        for db in [first, second] {
            if !db.is_usable() {
                return Err(ComparisonError::UnusableDatabase {
                    arch: db.arch.clone(),
                    failures: db.failures.len(),
                });
            }
        }

        let mut records = Vec::new();
        self.compare_records(first, second, RecordCategory::Struct, |db| &db.structs, Self::aggregate_differences, &mut records);
        self.compare_records(first, second, RecordCategory::Union, |db| &db.unions, Self::aggregate_differences, &mut records);
        self.compare_records(first, second, RecordCategory::Variable, |db| &db.variables, Self::variable_differences, &mut records);

        log::debug!(
            "Compared {} records between {} and {}",
            records.len(),
            first.arch,
            second.arch
        );

        Ok(ComparisonReport {
            first: first.arch.clone(),
            second: second.arch.clone(),
            records,
        })
    }

    /// One comparison per name present on either side, each followed by a
    /// comparison for every alias naming the other architecture. An alias
    /// reconciles the same-name comparison only when its aliased pair is
    /// identical.
    fn compare_records<T: Annotated>(
        &self,
        first: &ArchitectureDatabase,
        second: &ArchitectureDatabase,
        category: RecordCategory,
        records: fn(&ArchitectureDatabase) -> &IndexMap<String, T>,
        differences: fn(&Self, &T, &T) -> Vec<LayoutDifference>,
        out: &mut Vec<RecordComparison>,
    ) {
        let (left, right) = (records(first), records(second));
        let pair = |name: &str, a: Option<&T>, b: Option<&T>| {
            let mut comparison = RecordComparison::new(name, category);
            comparison.differences = match (a, b) {
                (Some(a), Some(b)) => differences(self, a, b),
                (Some(_), None) => vec![LayoutDifference::MissingIn { arch: second.arch.clone() }],
                (None, Some(_)) => vec![LayoutDifference::MissingIn { arch: first.arch.clone() }],
                (None, None) => Vec::new(),
            };
            comparison.expect_match = a.map_or(false, |r| r.expect_match()) || b.map_or(false, |r| r.expect_match());
            comparison
        };

        for name in left.keys().chain(right.keys()).unique() {
            let a = left.get(name);
            let b = right.get(name);
            let mut aliased = Vec::new();

            for alias in a.into_iter().flat_map(|r| r.aliases()) {
                if alias.arch.as_str() == second.arch && alias.name != *name {
                    let label = format!("{} ~ {}", name, alias);
                    aliased.push((alias, pair(&label, a, right.get(&alias.name))));
                }
            }
            for alias in b.into_iter().flat_map(|r| r.aliases()) {
                if alias.arch.as_str() == first.arch && alias.name != *name {
                    let label = format!("{} ~ {}", alias, name);
                    aliased.push((alias, pair(&label, left.get(&alias.name), b)));
                }
            }

            let mut comparison = pair(name, a, b);
            comparison.reconciled_by = aliased
                .iter()
                .filter(|(_, checked)| checked.is_identical())
                .map(|(alias, _)| AliasAnnotation::clone(alias))
                .collect();
            for (alias, checked) in &aliased {
                if !checked.is_identical() {
                    log::debug!("{} {} does not match its alias {}", category, name, alias);
                }
            }

            out.push(comparison);
            out.extend(aliased.into_iter().map(|(_, checked)| checked));
        }
    }

    fn aggregate_differences(&self, a: &AggregateRecord, b: &AggregateRecord) -> Vec<LayoutDifference> {
        let mut out = Vec::new();
        if a.size != b.size {
            out.push(LayoutDifference::SizeChanged {
                old_size: a.size,
                new_size: b.size,
            });
        }
        if self.compare_alignment && a.alignment != b.alignment {
            out.push(LayoutDifference::AlignmentChanged {
                old_alignment: a.alignment,
                new_alignment: b.alignment,
            });
        }
        self.compare_members("", &a.members, &b.members, &mut out);
        out
    }

    fn variable_differences(&self, a: &VarDeclRecord, b: &VarDeclRecord) -> Vec<LayoutDifference> {
        let mut out = Vec::new();
        if a.size != b.size {
            out.push(LayoutDifference::SizeChanged {
                old_size: a.size,
                new_size: b.size,
            });
        }
        if self.compare_values && a.value != b.value {
            out.push(LayoutDifference::ValueChanged {
                old_value: a.value.clone(),
                new_value: b.value.clone(),
            });
        }
        out
    }

    fn compare_members(
        &self,
        prefix: &str,
        left: &[FieldRecord],
        right: &[FieldRecord],
        out: &mut Vec<LayoutDifference>,
    ) {
        let keyed = |members: &[FieldRecord]| -> IndexMap<String, usize> {
            members
                .iter()
                .enumerate()
                .map(|(index, member)| (member_key(prefix, member, index), index))
                .collect()
        };
        let left_keys = keyed(left);
        let right_keys = keyed(right);

        for (key, &index) in &left_keys {
            let a = &left[index];
            let Some(&other) = right_keys.get(key) else {
                out.push(LayoutDifference::MemberRemoved {
                    member: key.clone(),
                    offset: a.offset,
                });
                continue;
            };
            let b = &right[other];

            if a.offset != b.offset || a.bit_offset != b.bit_offset {
                out.push(LayoutDifference::MemberMoved {
                    member: key.clone(),
                    old_offset: a.offset,
                    new_offset: b.offset,
                });
            }
            if a.size != b.size {
                out.push(LayoutDifference::MemberResized {
                    member: key.clone(),
                    old_size: a.size,
                    new_size: b.size,
                });
            }
            if self.compare_alignment && a.alignment != b.alignment {
                out.push(LayoutDifference::MemberRealigned {
                    member: key.clone(),
                    old_alignment: a.alignment,
                    new_alignment: b.alignment,
                });
            }
            if !a.members.is_empty() || !b.members.is_empty() {
                self.compare_members(key, &a.members, &b.members, out);
            }
        }

        for (key, &index) in &right_keys {
            if !left_keys.contains_key(key) {
                out.push(LayoutDifference::MemberAdded {
                    member: key.clone(),
                    offset: right[index].offset,
                });
            }
        }
    }
}

/// Anonymous members are keyed by position since they have no name to match on.
fn member_key(prefix: &str, member: &FieldRecord, index: usize) -> String {
    let local = if member.is_anonymous() {
        format!("<anonymous #{}>", index)
    } else {
        member.name.clone()
    };

    if prefix.is_empty() {
        local
    } else {
        format!("{}.{}", prefix, local)
    }
}
