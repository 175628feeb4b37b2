// Mon Oct 19 2026 - Alex

use crate::layout::{AggregateRecord, ArchitectureDatabase, ComparisonReport, FieldRecord, VarDeclRecord};
use colored::{Color, Colorize};
use std::fmt::Write;

/// Plain-text rendering of databases and comparison reports.
pub struct ReportGenerator {
    color: bool,
    include_fields: bool,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            color: false,
            include_fields: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_fields(mut self, include: bool) -> Self {
        self.include_fields = include;
        self
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn generate_database(&self, db: &ArchitectureDatabase) -> String {
        let mut out = String::new();

        let status = if db.success {
            self.paint("ok", Color::Green)
        } else {
            self.paint("FAILED", Color::Red)
        };
        let _ = writeln!(out, "=== {} [{}] ===", self.paint(&db.arch, Color::Cyan), status);
        for failure in &db.failures {
            let _ = writeln!(out, "  {} {}", self.paint("[!]", Color::Red), failure);
        }
        let _ = writeln!(
            out,
            "{} structs, {} unions, {} variables, {} fields",
            db.structs.len(),
            db.unions.len(),
            db.variables.len(),
            db.fields.len()
        );
        if db.replaced > 0 {
            let _ = writeln!(out, "{} redeclarations replaced an earlier record", db.replaced);
        }

        for record in db.structs.values().chain(db.unions.values()) {
            out.push('\n');
            self.write_aggregate(&mut out, record);
        }

        if !db.variables.is_empty() {
            out.push('\n');
            for variable in db.variables.values() {
                self.write_variable(&mut out, variable);
            }
        }

        out
    }

    fn write_aggregate(&self, out: &mut String, record: &AggregateRecord) {
        let _ = writeln!(
            out,
            "{} {} (size {}, align {})",
            record.kind,
            self.paint(&record.name, Color::Yellow),
            measure(record.size),
            measure(record.alignment)
        );
        if !record.aliases.is_empty() {
            let aliases: Vec<String> = record.aliases.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  aliases: {}", aliases.join(", "));
        }
        if record.expect_match {
            let _ = writeln!(out, "  {}", self.paint("expect match", Color::Magenta));
        }
        if self.include_fields {
            for member in &record.members {
                self.write_member(out, member, 1);
            }
        }
    }

    fn write_member(&self, out: &mut String, member: &FieldRecord, depth: usize) {
        let indent = "  ".repeat(depth);
        let name = if member.is_anonymous() { "<anonymous>" } else { member.name.as_str() };
        let offset = match (member.offset, member.bit_offset) {
            (Some(bytes), Some(bits)) if member.is_bitfield() => format!("+0x{:X}:{}", bytes, bits % 8),
            (Some(bytes), _) => format!("+0x{:X}", bytes),
            (None, _) => "+?".to_string(),
        };
        let _ = writeln!(
            out,
            "{}{:<10} {} ({}, size {}, align {})",
            indent,
            self.paint(&offset, Color::BrightBlack),
            name,
            member.kind,
            measure(member.size),
            measure(member.alignment)
        );
        for nested in &member.members {
            self.write_member(out, nested, depth + 1);
        }
    }

    fn write_variable(&self, out: &mut String, variable: &VarDeclRecord) {
        let _ = write!(
            out,
            "{} {} (size {})",
            variable.kind,
            self.paint(&variable.name, Color::Yellow),
            measure(variable.size)
        );
        if let Some(value) = &variable.value {
            let _ = write!(out, " = {}", value);
        }
        if !variable.aliases.is_empty() {
            let aliases: Vec<String> = variable.aliases.iter().map(ToString::to_string).collect();
            let _ = write!(out, " aliases: {}", aliases.join(", "));
        }
        if variable.expect_match {
            let _ = write!(out, " {}", self.paint("expect match", Color::Magenta));
        }
        out.push('\n');
    }

    pub fn generate_comparison(&self, report: &ComparisonReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Comparison: {} vs {}", report.first, report.second);
        let _ = writeln!(
            out,
            "{} records, {} differing, {} unreconciled, {} violations",
            report.records.len(),
            report.differing().count(),
            report.unreconciled().count(),
            report.violations().count()
        );

        for record in report.differing() {
            let tag = if record.is_violation() {
                self.paint("VIOLATION", Color::Red)
            } else if record.is_reconciled() {
                self.paint("ALIASED", Color::Green)
            } else {
                self.paint("MISMATCH", Color::Yellow)
            };
            let _ = writeln!(out, "\n[{}] {}", tag, record);
        }
        out
    }
}

fn measure(value: Option<u64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{MemberKind, RecordKind, VarKind};

    fn sample() -> ArchitectureDatabase {
        let mut db = ArchitectureDatabase::new("x86_32");
        let mut record = AggregateRecord::new("stat", RecordKind::Struct, Some(12), Some(4));
        record.members.push(FieldRecord {
            name: "st_dev".into(),
            kind: MemberKind::Field,
            size: Some(8),
            offset: Some(0),
            bit_offset: Some(0),
            alignment: Some(4),
            members: Vec::new(),
        });
        record.expect_match = true;
        db.insert_record(record);
        db.insert_variable(VarDeclRecord::new("FIONREAD", VarKind::Variable, Some(4)).with_value(Some("21531".into())));
        db
    }

    #[test]
    fn test_database_text() {
        let text = ReportGenerator::new().generate_database(&sample());
        assert!(text.starts_with("=== x86_32 [ok] ==="));
        assert!(text.contains("struct stat (size 12, align 4)"));
        assert!(text.contains("st_dev"));
        assert!(text.contains("expect match"));
        assert!(text.contains("variable FIONREAD (size 4) = 21531"));
    }

    #[test]
    fn test_failed_database_text() {
        let mut db = sample();
        db.mark_failed("Unknown architecture tag 'riscv'");
        let text = ReportGenerator::new().with_fields(false).generate_database(&db);
        assert!(text.contains("[FAILED]"));
        assert!(text.contains("riscv"));
        assert!(!text.contains("st_dev"));
    }
}
