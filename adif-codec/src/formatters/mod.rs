//! Field formatter registry and enumeration tables
//!
//! This module contains the enumeration table parser and the registry that
//! maps field names to bidirectional value formatters.

pub mod registry;
pub mod table;

// Re-export key types for convenience
pub use registry::{load_registry, Direction, Formatter, FormatterRegistry, RegistryStats};
pub use table::EnumerationTable;

/// Built-in DXCC entity table (`dxcc` field)
pub(crate) const DXCC_TABLE: &str = include_str!("data/dxcc.txt");

/// Built-in continent table (`cont` field)
pub(crate) const CONTINENT_TABLE: &str = include_str!("data/continent.txt");
