//! ADIF Codec Library
//!
//! A small library for reading and writing Amateur Data Interchange Format
//! (ADIF) logs and translating enumerated field values to readable labels.
//!
//! # Architecture
//!
//! - A streaming reader/writer for the length-prefixed tag format
//! - A record model with case-insensitive field names
//! - A formatter registry built from enumeration tables (DXCC entities,
//!   continents) and applied on field access, with a `.raw` opt-out
//! - Iteration helpers that feed every record of one or more files to a
//!   consumer
//!
//! The library does NOT:
//! - Validate field contents against the ADIF schema
//! - Support user-defined fields or types
//! - Generate reports (see adif-cli)
//!
//! # Example Usage
//!
//! ```no_run
//! use adif_codec::Logbook;
//! use std::path::Path;
//!
//! let logbook = Logbook::new().unwrap();
//!
//! for record in logbook.records(Path::new("contest.adi")).unwrap() {
//!     match record {
//!         Ok(qso) if qso.is_qso() => {
//!             println!(
//!                 "{} in {}",
//!                 logbook.get_field(&qso, "call", "?"),
//!                 logbook.get_field(&qso, "dxcc", "unknown"),
//!             );
//!         }
//!         Ok(_) => {}
//!         Err(e) => eprintln!("Read error: {}", e),
//!     }
//! }
//! ```

// Public modules
pub mod config;
pub mod formats;
pub mod formatters;
pub mod iter;
pub mod logbook;
pub mod record;
pub mod types;

// Re-export main types for convenience
pub use config::{RegistryConfig, TableSource};
pub use formats::{AdifReader, AdifWriter};
pub use formatters::{
    load_registry, Direction, EnumerationTable, Formatter, FormatterRegistry, RegistryStats,
};
pub use iter::{for_each_record, for_each_record_in, open_records, FileOutcome, ReadSummary, RecordIterator};
pub use logbook::Logbook;
pub use record::Record;
pub use types::{AdifError, FieldRef, RecordKind, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
