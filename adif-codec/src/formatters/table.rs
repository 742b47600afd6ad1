//! Enumeration table parser
//!
//! Parses plain-text enumeration tables into a two-way lookup. Each line is
//! `KEY "Human Readable Value"`; `#` comment lines and blank lines are skipped.

use crate::types::{AdifError, Result};
use std::collections::HashMap;
use std::path::Path;

/// A two-way enumeration between wire values and human-readable labels
#[derive(Debug, Clone, Default)]
pub struct EnumerationTable {
    /// Table name, used in error messages and stats
    name: String,
    /// Lower-cased wire value -> label
    labels: HashMap<String, String>,
    /// Lower-cased label -> wire value
    values: HashMap<String, String>,
}

impl EnumerationTable {
    /// Parse a table from its text form
    ///
    /// When a key or label appears twice, the later line wins.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        let mut table = Self {
            name: name.to_string(),
            ..Self::default()
        };

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, label) = parse_line(line).map_err(|reason| AdifError::TableParse {
                table: name.to_string(),
                line: idx + 1,
                reason,
            })?;
            table.insert(key, label);
        }

        log::debug!("Parsed {} entries from table {}", table.len(), name);
        Ok(table)
    }

    /// Load and parse a table file
    pub fn from_file(path: &Path) -> Result<Self> {
        log::info!("Loading enumeration table: {:?}", path);

        if !path.exists() {
            return Err(AdifError::TableNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("table");

        Self::parse(name, &content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for a wire value (case-insensitive)
    pub fn label(&self, value: &str) -> Option<&str> {
        self.labels.get(&value.trim().to_lowercase()).map(String::as_str)
    }

    /// Wire value for a label (case-insensitive)
    pub fn value(&self, label: &str) -> Option<&str> {
        self.values.get(&label.trim().to_lowercase()).map(String::as_str)
    }

    fn insert(&mut self, key: &str, label: &str) {
        self.labels.insert(key.to_lowercase(), label.to_string());
        self.values.insert(label.to_lowercase(), key.to_string());
    }
}

/// Split one table line into key and unquoted label
fn parse_line(line: &str) -> std::result::Result<(&str, &str), String> {
    let (key, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("expected KEY \"Label\", found {:?}", line))?;

    let label = rest
        .trim()
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .ok_or_else(|| format!("label for key {:?} is not quoted", key))?;

    if label.is_empty() {
        return Err(format!("empty label for key {:?}", key));
    }

    Ok((key, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Continents
NA "North America"
EU   "Europe"

AS "Asia"
"#;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let table = EnumerationTable::parse("cont", SAMPLE).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.name(), "cont");
    }

    #[test]
    fn test_lookup_both_directions_case_insensitive() {
        let table = EnumerationTable::parse("cont", SAMPLE).unwrap();
        assert_eq!(table.label("na"), Some("North America"));
        assert_eq!(table.label("EU"), Some("Europe"));
        assert_eq!(table.value("north AMERICA"), Some("NA"));
        assert_eq!(table.value("Oceania"), None);
    }

    #[test]
    fn test_later_line_overrides() {
        let table = EnumerationTable::parse("t", "1 \"ONE\"\n1 \"UNO\"\n").unwrap();
        assert_eq!(table.label("1"), Some("UNO"));
    }

    #[test]
    fn test_unquoted_label_is_an_error() {
        let err = EnumerationTable::parse("t", "ok \"fine\"\nbad label\n").unwrap_err();
        match err {
            AdifError::TableParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_label_is_an_error() {
        assert!(EnumerationTable::parse("t", "lonely\n").is_err());
        assert!(EnumerationTable::parse("t", "k \"\"\n").is_err());
    }

    #[test]
    fn test_table_file_not_found() {
        let result = EnumerationTable::from_file(Path::new("nonexistent.txt"));
        assert!(matches!(result, Err(AdifError::TableNotFound(_))));
    }
}
