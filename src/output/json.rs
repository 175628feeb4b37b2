// Mon Oct 19 2026 - Alex

use crate::output::OutputError;
use serde::Serialize;
use std::io::Write;

pub struct JsonSerializer {
    pretty_print: bool,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, OutputError> {
        let text = if self.pretty_print {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    pub fn write<T: Serialize + ?Sized, W: Write + ?Sized>(&self, value: &T, sink: &mut W) -> Result<(), OutputError> {
        if self.pretty_print {
            serde_json::to_writer_pretty(&mut *sink, value)?;
        } else {
            serde_json::to_writer(&mut *sink, value)?;
        }
        writeln!(sink)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{AggregateRecord, ArchitectureDatabase, RecordKind};
    use crate::output::LayoutOutput;
    use serde_json::Value;

    #[test]
    fn test_database_json_shape() {
        let mut db = ArchitectureDatabase::new("aarch64");
        db.insert_record(AggregateRecord::new("B", RecordKind::Struct, Some(4), Some(4)));
        db.insert_record(AggregateRecord::new("A", RecordKind::Struct, Some(8), Some(8)));
        let dbs = vec![db];

        let text = JsonSerializer::new()
            .with_pretty_print(false)
            .serialize(&LayoutOutput::new("test.h", &dbs))
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        let arch = &value["architectures"][0];
        assert_eq!(arch["arch"], "aarch64");
        assert_eq!(arch["success"], true);
        assert_eq!(arch["structs"]["A"]["size"], 8);
        assert!(arch.get("scope").is_none());

        // Declaration order survives serialization.
        let b = text.find("\"B\":").unwrap();
        let a = text.find("\"A\":").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_write_appends_newline() {
        let mut sink = Vec::new();
        JsonSerializer::new().with_pretty_print(false).write(&vec![1, 2], &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "[1,2]\n");
    }
}
