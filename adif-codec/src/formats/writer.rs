//! ADIF stream writer
//!
//! Serializes records as one `<NAME:length>value` field per line followed by
//! the record's boundary tag and a blank line. Lengths are UTF-8 byte counts,
//! matching how the reader consumes values.

use crate::record::Record;
use crate::types::Result;
use std::fmt;
use std::io::Write;

/// Canonical wire form of a record
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.fields() {
            writeln!(f, "<{}:{}>{}", name.to_ascii_uppercase(), value.len(), value)?;
        }
        writeln!(f, "{}", self.kind().boundary_tag())?;
        writeln!(f)
    }
}

/// Write a single record to any byte sink
pub fn write_record<W: Write + ?Sized>(out: &mut W, record: &Record) -> Result<()> {
    write!(out, "{}", record)?;
    Ok(())
}

/// Streaming ADIF record writer
pub struct AdifWriter<W: Write> {
    inner: W,
    records_written: usize,
}

impl<W: Write> AdifWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    /// Serialize one record
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        write_record(&mut self.inner, record)?;
        self.records_written += 1;
        Ok(())
    }

    /// Serialize every record from an iterator
    pub fn write_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Unwrap the underlying sink
    pub fn into_inner(self) -> W {
        self.inner
    }
}
