//! Field formatter registry
//!
//! Maps canonical field names to formatters that convert values between their
//! wire form and a human-readable form. The registry is built once, then only
//! read; lookups for unregistered fields fall back to the identity.

use crate::config::RegistryConfig;
use crate::formatters::table::EnumerationTable;
use crate::formatters::{CONTINENT_TABLE, DXCC_TABLE};
use crate::types::Result;
use std::collections::HashMap;
use std::path::Path;

/// Conversion direction for a formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Human-readable value -> wire value
    To,
    /// Wire value -> human-readable value
    From,
}

/// A bidirectional value formatter for one field
#[derive(Debug, Clone)]
pub enum Formatter {
    /// Lookup in an enumeration table; misses pass the value through
    Enumeration(EnumerationTable),
    /// Plain conversion functions
    Functions {
        to: fn(&str) -> String,
        from: fn(&str) -> String,
    },
}

impl Formatter {
    /// Convert a human-readable value to its wire form
    pub fn to(&self, value: &str) -> String {
        match self {
            Formatter::Enumeration(table) => table.value(value).unwrap_or(value).to_string(),
            Formatter::Functions { to, .. } => to(value),
        }
    }

    /// Convert a wire value to its human-readable form
    pub fn from(&self, value: &str) -> String {
        match self {
            Formatter::Enumeration(table) => table.label(value).unwrap_or(value).to_string(),
            Formatter::Functions { from, .. } => from(value),
        }
    }

    /// Apply the formatter in the given direction
    pub fn apply(&self, direction: Direction, value: &str) -> String {
        match direction {
            Direction::To => self.to(value),
            Direction::From => self.from(value),
        }
    }
}

/// The set of formatters keyed by canonical (lower-case) field name
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Formatter>,
}

impl FormatterRegistry {
    /// Create an empty registry (identity for every field)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in `dxcc` and `cont` tables
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(
            "dxcc",
            Formatter::Enumeration(EnumerationTable::parse("dxcc", DXCC_TABLE)?),
        );
        registry.register(
            "cont",
            Formatter::Enumeration(EnumerationTable::parse("continent", CONTINENT_TABLE)?),
        );
        Ok(registry)
    }

    /// Build a registry from configuration
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let mut registry = if config.builtin_tables {
            Self::builtin()?
        } else {
            Self::new()
        };

        for table in &config.tables {
            registry.register_table(&table.field, &table.path)?;
        }

        Ok(registry)
    }

    /// Register (or replace) the formatter for a field
    pub fn register(&mut self, field: &str, formatter: Formatter) {
        let field = field.trim().to_ascii_lowercase();
        if self.formatters.insert(field.clone(), formatter).is_some() {
            log::debug!("Replaced formatter for field {}", field);
        }
    }

    /// Load an enumeration table file and register it for a field
    pub fn register_table(&mut self, field: &str, path: &Path) -> Result<()> {
        let table = EnumerationTable::from_file(path)?;
        log::info!(
            "Registered table {:?} ({} entries) for field {}",
            path,
            table.len(),
            field
        );
        self.register(field, Formatter::Enumeration(table));
        Ok(())
    }

    /// Formatter registered for a field, if any
    pub fn get(&self, field: &str) -> Option<&Formatter> {
        self.formatters.get(&field.to_ascii_lowercase())
    }

    /// Convert a value for a field; identity when nothing is registered
    pub fn format(&self, field: &str, direction: Direction, value: &str) -> String {
        match self.get(field) {
            Some(formatter) => formatter.apply(direction, value),
            None => value.to_string(),
        }
    }

    /// Shorthand for `format(field, Direction::To, value)`
    pub fn to_wire(&self, field: &str, value: &str) -> String {
        self.format(field, Direction::To, value)
    }

    /// Shorthand for `format(field, Direction::From, value)`
    pub fn from_wire(&self, field: &str, value: &str) -> String {
        self.format(field, Direction::From, value)
    }

    /// Names of all fields with a formatter, sorted
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        let num_entries = self
            .formatters
            .values()
            .map(|f| match f {
                Formatter::Enumeration(table) => table.len(),
                Formatter::Functions { .. } => 0,
            })
            .sum();

        RegistryStats {
            num_formatters: self.formatters.len(),
            num_entries,
        }
    }
}

/// Registry statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of fields with a formatter
    pub num_formatters: usize,
    /// Total enumeration entries across all tables
    pub num_entries: usize,
}

/// Build a registry from `(field, table path)` pairs
///
/// Only the given tables are registered; the built-in ones are not included.
pub fn load_registry<P: AsRef<Path>>(table_paths: &[(&str, P)]) -> Result<FormatterRegistry> {
    let mut registry = FormatterRegistry::new();
    for (field, path) in table_paths {
        registry.register_table(field, path.as_ref())?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_is_identity() {
        let registry = FormatterRegistry::new();
        assert_eq!(registry.from_wire("dxcc", "291"), "291");
        assert_eq!(registry.stats().num_formatters, 0);
    }

    #[test]
    fn test_builtin_tables() {
        let registry = FormatterRegistry::builtin().unwrap();
        assert_eq!(registry.fields(), vec!["cont", "dxcc"]);
        assert_eq!(registry.from_wire("dxcc", "291"), "UNITED STATES OF AMERICA");
        assert_eq!(registry.from_wire("DXCC", "1"), "CANADA");
        assert_eq!(registry.from_wire("cont", "oc"), "Oceania");
        assert_eq!(registry.to_wire("cont", "SOUTH AMERICA"), "SA");

        let stats = registry.stats();
        assert_eq!(stats.num_formatters, 2);
        assert!(stats.num_entries > 250);
    }

    #[test]
    fn test_unknown_enumeration_value_is_identity() {
        let registry = FormatterRegistry::builtin().unwrap();
        assert_eq!(registry.format("dxcc", Direction::From, "99999"), "99999");
        assert_eq!(registry.format("dxcc", Direction::To, "ATLANTIS"), "ATLANTIS");
    }

    #[test]
    fn test_function_formatter() {
        let mut registry = FormatterRegistry::new();
        registry.register(
            "Call",
            Formatter::Functions {
                to: |v| v.to_ascii_uppercase(),
                from: |v| v.to_ascii_lowercase(),
            },
        );
        assert_eq!(registry.to_wire("CALL", "k1abc"), "K1ABC");
        assert_eq!(registry.from_wire("call", "K1ABC"), "k1abc");
    }

    #[test]
    fn test_from_config_without_builtin() {
        let config = RegistryConfig::new().with_builtin_tables(false);
        let registry = FormatterRegistry::from_config(&config).unwrap();
        assert!(registry.get("dxcc").is_none());
    }

    #[test]
    fn test_load_registry_missing_file() {
        let result = load_registry(&[("band", "no/such/table.txt")]);
        assert!(result.is_err());
    }
}
