//! Registry configuration types
//!
//! This module defines which enumeration tables the formatter registry is
//! built from. Tool-level settings (Cabrillo headers, report options) live in
//! the application layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for building a [`FormatterRegistry`](crate::FormatterRegistry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Whether to load the built-in DXCC and continent tables
    #[serde(default = "default_true")]
    pub builtin_tables: bool,

    /// Extra enumeration tables, registered after the built-in ones
    #[serde(default)]
    pub tables: Vec<TableSource>,
}

fn default_true() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            builtin_tables: true,
            tables: Vec::new(),
        }
    }
}

/// An enumeration table file bound to a field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSource {
    /// Field the table formats (case-insensitive)
    pub field: String,
    /// Path to the table file
    pub path: PathBuf,
}

impl TableSource {
    pub fn new(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            field: field.into(),
            path: path.into(),
        }
    }
}

impl RegistryConfig {
    /// Create a new registry configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable the built-in tables
    pub fn with_builtin_tables(mut self, enabled: bool) -> Self {
        self.builtin_tables = enabled;
        self
    }

    /// Builder method: add a table file for a field
    pub fn add_table(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.tables.push(TableSource::new(field, path));
        self
    }
}
