//! Sequential access to the records of one or more ADIF files
//!
//! [`RecordIterator`] adapts an [`AdifReader`] to `Iterator`. The helpers
//! [`for_each_record`] and [`for_each_record_in`] open files, hand every
//! record to a consumer in file order, and close the file on every exit path.
//!
//! # Example
//! ```no_run
//! use adif_codec::{for_each_record, AdifError, Record};
//!
//! let mut calls = Vec::new();
//! let summary = for_each_record("log.adi", |record: Record| {
//!     if record.is_qso() {
//!         calls.push(record.raw("call").unwrap_or_default().to_string());
//!     }
//!     Ok::<(), AdifError>(())
//! })
//! .unwrap();
//! println!("{} records, {} skipped", summary.records, summary.skipped);
//! ```

use crate::formats::AdifReader;
use crate::record::Record;
use crate::types::{AdifError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Iterator over the records of a stream
///
/// Yields `Err` for malformed records and I/O failures; iteration may continue
/// after a malformed record but stops after an I/O error.
pub struct RecordIterator<R> {
    reader: AdifReader<R>,
    failed: bool,
}

impl<R: BufRead> RecordIterator<R> {
    pub fn new(reader: AdifReader<R>) -> Self {
        Self {
            reader,
            failed: false,
        }
    }

    /// Access the underlying reader (e.g. for its counters)
    pub fn reader(&self) -> &AdifReader<R> {
        &self.reader
    }
}

impl<R: BufRead> Iterator for RecordIterator<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.reader.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                if !e.is_record_level() {
                    self.failed = true;
                }
                Some(Err(e))
            }
        }
    }
}

/// Open an ADIF file and iterate over its records
pub fn open_records<P: AsRef<Path>>(path: P) -> Result<RecordIterator<BufReader<File>>> {
    let path = path.as_ref();
    log::info!("Opening ADIF file: {:?}", path);

    let file = File::open(path)?;
    Ok(AdifReader::new(BufReader::new(file)).records())
}

/// Counts for one file processed by the iteration helpers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Records delivered to the consumer
    pub records: usize,
    /// Malformed records that were skipped
    pub skipped: usize,
}

/// Outcome of one file in a multi-file run
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Counts on success, or the error that stopped this file
    pub result: Result<ReadSummary>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Deliver every record of a file to `consumer`, in file order
///
/// Malformed records are logged and skipped. I/O errors and consumer errors
/// stop processing and are returned; the file is closed either way.
pub fn for_each_record<P, F, E>(path: P, mut consumer: F) -> std::result::Result<ReadSummary, E>
where
    P: AsRef<Path>,
    F: FnMut(Record) -> std::result::Result<(), E>,
    E: From<AdifError>,
{
    let path = path.as_ref();
    let records = open_records(path)?;
    match drive(path, records, &mut consumer)? {
        Ok(summary) => Ok(summary),
        Err(e) => Err(e.into()),
    }
}

/// Run [`for_each_record`] over several files, strictly in the given order
///
/// A file that cannot be opened or read is recorded in its [`FileOutcome`]
/// and the next file is processed. A consumer error aborts the whole run.
pub fn for_each_record_in<P, F, E>(
    paths: &[P],
    mut consumer: F,
) -> std::result::Result<Vec<FileOutcome>, E>
where
    P: AsRef<Path>,
    F: FnMut(Record) -> std::result::Result<(), E>,
{
    let mut outcomes = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let result = match open_records(path) {
            Ok(records) => drive(path, records, &mut consumer)?,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            log::error!("Failed to process {:?}: {}", path, e);
        }
        outcomes.push(FileOutcome {
            path: path.to_path_buf(),
            result,
        });
    }

    Ok(outcomes)
}

/// Feed records to the consumer. The outer error is the consumer's; the
/// inner result carries reader failures.
fn drive<R, F, E>(
    path: &Path,
    records: RecordIterator<R>,
    consumer: &mut F,
) -> std::result::Result<Result<ReadSummary>, E>
where
    R: BufRead,
    F: FnMut(Record) -> std::result::Result<(), E>,
{
    let mut summary = ReadSummary::default();

    for item in records {
        match item {
            Ok(record) => {
                consumer(record)?;
                summary.records += 1;
            }
            Err(e) if e.is_record_level() => {
                log::warn!("Skipping malformed record in {:?}: {}", path, e);
                summary.skipped += 1;
            }
            Err(e) => return Ok(Err(e)),
        }
    }

    log::info!(
        "Read {} records from {:?} ({} skipped)",
        summary.records,
        path,
        summary.skipped
    );
    Ok(Ok(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterator_over_slice() {
        let input = b"<EOH><CALL:5>K1ABC<EOR><CALL:4>W1AW<EOR>";
        let records: Vec<Record> = AdifReader::new(&input[..])
            .records()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_header());
        assert_eq!(records[2].raw("call"), Some("W1AW"));
    }

    #[test]
    fn test_iterator_continues_after_malformed() {
        let input = b"<CALL:z>K1ABC<EOR><CALL:4>W1AW<EOR>";
        let items: Vec<Result<Record>> = AdifReader::new(&input[..]).records().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_err());
        assert_eq!(items[1].as_ref().unwrap().raw("call"), Some("W1AW"));
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_records("nonexistent.adi");
        assert!(matches!(result, Err(AdifError::Io(_))));
    }
}
