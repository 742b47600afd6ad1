//! Main library API
//!
//! The [`Logbook`] owns a formatter registry and is the entry point for
//! opening ADIF files and reading or writing fields through the registry.

use crate::config::RegistryConfig;
use crate::formats::AdifWriter;
use crate::formatters::{FormatterRegistry, RegistryStats};
use crate::iter::{self, FileOutcome, ReadSummary, RecordIterator};
use crate::record::Record;
use crate::types::{AdifError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Entry point for reading and formatting ADIF logs
#[derive(Debug, Clone)]
pub struct Logbook {
    registry: FormatterRegistry,
}

impl Logbook {
    /// Create a logbook with the built-in DXCC and continent tables
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(FormatterRegistry::builtin()?))
    }

    /// Create a logbook around an existing registry
    pub fn with_registry(registry: FormatterRegistry) -> Self {
        Self { registry }
    }

    /// Create a logbook from registry configuration
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        Ok(Self::with_registry(FormatterRegistry::from_config(config)?))
    }

    /// Load an enumeration table file and use it to format `field`
    ///
    /// # Example
    /// ```no_run
    /// use adif_codec::Logbook;
    /// use std::path::Path;
    ///
    /// let mut logbook = Logbook::new().unwrap();
    /// logbook.add_table("band", Path::new("tables/band.txt")).unwrap();
    /// ```
    pub fn add_table(&mut self, field: &str, path: &Path) -> Result<()> {
        self.registry.register_table(field, path)
    }

    pub fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    /// Get statistics about the loaded formatters
    pub fn registry_stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Open an ADIF file and iterate over its records
    pub fn records(&self, path: &Path) -> Result<RecordIterator<BufReader<File>>> {
        iter::open_records(path)
    }

    /// See [`iter::for_each_record`]
    pub fn for_each_record<F, E>(&self, path: &Path, consumer: F) -> std::result::Result<ReadSummary, E>
    where
        F: FnMut(Record) -> std::result::Result<(), E>,
        E: From<AdifError>,
    {
        iter::for_each_record(path, consumer)
    }

    /// See [`iter::for_each_record_in`]
    pub fn for_each_record_in<P, F, E>(
        &self,
        paths: &[P],
        consumer: F,
    ) -> std::result::Result<Vec<FileOutcome>, E>
    where
        P: AsRef<Path>,
        F: FnMut(Record) -> std::result::Result<(), E>,
    {
        iter::for_each_record_in(paths, consumer)
    }

    /// Read a field through this logbook's registry
    pub fn get_field(&self, record: &Record, field: &str, default: &str) -> String {
        record.get_field(&self.registry, field, default)
    }

    /// Write a field through this logbook's registry
    pub fn set_field<'r>(
        &self,
        record: &'r mut Record,
        field: &str,
        value: &str,
    ) -> Result<&'r mut Record> {
        record.set_field(&self.registry, field, value)
    }

    /// Write records to a new ADIF file
    pub fn write_file<'a, I>(&self, path: &Path, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        log::info!("Writing ADIF file: {:?}", path);

        let mut writer = AdifWriter::new(BufWriter::new(File::create(path)?));
        writer.write_all(records)?;
        writer.flush()?;
        Ok(writer.records_written())
    }
}
