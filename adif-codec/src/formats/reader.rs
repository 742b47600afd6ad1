//! ADIF stream reader
//!
//! Scans a byte stream for `<...>` tags and assembles fields into records.
//! Text outside tags is ignored. Field values are read by their declared byte
//! length, so they may contain any byte including `<`, `>` and `:`.
//!
//! ## End of stream
//! A stream that ends mid-tag or mid-value ends the sequence: the partial
//! record is discarded and `read_next` returns `Ok(None)`, exactly as for a
//! clean end of stream.
//!
//! ## Malformed tags
//! A field tag whose length is missing or not a non-negative integer produces
//! [`AdifError::MalformedRecord`]. The reader then drops the rest of that
//! record (up to its boundary tag) so the next call starts on the next record.

use crate::iter::RecordIterator;
use crate::record::Record;
use crate::types::{validate_field_name, AdifError, RecordKind, Result};
use std::io::{self, BufRead, Read};

/// Streaming ADIF record reader
pub struct AdifReader<R> {
    inner: R,
    /// Bytes consumed from `inner` so far
    offset: u64,
    records_read: usize,
    /// Fields accumulated since the last boundary tag
    pending: Record,
    /// Set after a malformed tag until the record's boundary is skipped
    resync: bool,
}

impl<R: BufRead> AdifReader<R> {
    /// Wrap a buffered byte source
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            records_read: 0,
            pending: Record::qso(),
            resync: false,
        }
    }

    /// Read the next complete record
    ///
    /// Returns `Ok(None)` at end of stream (including truncated input).
    /// Blocks until the underlying reader delivers enough bytes.
    pub fn read_next(&mut self) -> Result<Option<Record>> {
        loop {
            let tag_offset = self.offset;
            let body = match self.next_tag()? {
                Some(body) => body,
                None => return Ok(self.end_of_stream()),
            };
            let body = body.trim();
            let lowered = body.to_ascii_lowercase();

            if let Some(kind) = RecordKind::from_boundary(&lowered) {
                let mut record = std::mem::replace(&mut self.pending, Record::qso());
                if self.resync {
                    log::debug!("Resynchronised at <{}> (byte {})", body, tag_offset);
                    self.resync = false;
                    continue;
                }
                record.set_kind(kind);
                self.records_read += 1;
                log::trace!("Read {} record with {} fields", kind, record.len());
                return Ok(Some(record));
            }

            match parse_field_tag(body) {
                Ok((name, length)) => {
                    let value = match self.read_value(length)? {
                        Some(value) => value,
                        None => return Ok(self.end_of_stream()),
                    };
                    if !self.resync {
                        self.pending.insert(name, value);
                    }
                }
                Err(_) if self.resync => {
                    // Already skipping this record
                }
                Err(reason) => {
                    self.pending = Record::qso();
                    self.resync = true;
                    return Err(AdifError::MalformedRecord {
                        offset: tag_offset,
                        reason,
                    });
                }
            }
        }
    }

    /// Number of records returned so far
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Bytes consumed from the underlying reader so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Turn this reader into an iterator of records
    pub fn records(self) -> RecordIterator<R> {
        RecordIterator::new(self)
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn end_of_stream(&mut self) -> Option<Record> {
        if !self.pending.is_empty() {
            log::debug!(
                "Discarding partial record with {} fields at end of stream",
                self.pending.len()
            );
            self.pending = Record::qso();
        }
        None
    }

    /// Skip to the next `<` and return the body up to `>`, or `None` at EOF
    fn next_tag(&mut self) -> Result<Option<String>> {
        if !self.skip_past(b'<')? {
            return Ok(None);
        }

        let mut body = Vec::new();
        let n = self.inner.read_until(b'>', &mut body)?;
        self.offset += n as u64;
        if body.pop() != Some(b'>') {
            return Ok(None);
        }

        Ok(Some(decode_text(body)))
    }

    /// Read exactly `length` bytes, or `None` if the stream ends first
    fn read_value(&mut self, length: usize) -> Result<Option<String>> {
        let mut buf = Vec::with_capacity(length.min(64 * 1024));
        let n = (&mut self.inner).take(length as u64).read_to_end(&mut buf)?;
        self.offset += n as u64;

        if n < length {
            log::debug!("Value truncated: expected {} bytes, got {}", length, n);
            return Ok(None);
        }
        Ok(Some(decode_text(buf)))
    }

    /// Consume bytes up to and including `delim`; false if EOF came first
    fn skip_past(&mut self, delim: u8) -> io::Result<bool> {
        loop {
            let (found, used) = {
                let available = match self.inner.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                if available.is_empty() {
                    return Ok(false);
                }
                match available.iter().position(|&b| b == delim) {
                    Some(idx) => (true, idx + 1),
                    None => (false, available.len()),
                }
            };
            self.inner.consume(used);
            self.offset += used as u64;
            if found {
                return Ok(true);
            }
        }
    }
}

/// Split a field tag body `name:length[:type]` into canonical name and length
fn parse_field_tag(body: &str) -> std::result::Result<(String, usize), String> {
    let mut parts = body.split(':');
    let name = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let length = parts
        .next()
        .ok_or_else(|| format!("tag <{}> has no field length", body))?
        .trim();

    validate_field_name(&name).map_err(|_| format!("tag <{}> has an invalid field name", body))?;

    let length = length
        .parse::<usize>()
        .map_err(|_| format!("tag <{}> has invalid length {:?}", body, length))?;

    Ok((name, length))
}

/// Decode bytes as UTF-8, falling back to Latin-1
fn decode_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(input: &str) -> AdifReader<&[u8]> {
        AdifReader::new(input.as_bytes())
    }

    #[test]
    fn test_boundary_delivery() {
        let mut r = reader("<CALL:6>ABC123<DXCC:3>291<EOR>");
        let rec = r.read_next().unwrap().unwrap();
        assert_eq!(rec.kind(), RecordKind::Qso);
        assert_eq!(rec.raw("call"), Some("ABC123"));
        assert_eq!(rec.raw("dxcc"), Some("291"));
        assert_eq!(rec.len(), 2);
        assert!(r.read_next().unwrap().is_none());
    }

    #[test]
    fn test_header_delivery() {
        let mut r = reader("<PROGRAMID:4>ADIF<ADIF_VER:5>3.1.3<EOH>");
        let rec = r.read_next().unwrap().unwrap();
        assert_eq!(rec.kind(), RecordKind::Header);
        assert_eq!(rec.raw("programid"), Some("ADIF"));
        assert_eq!(rec.raw("adif_ver"), Some("3.1.3"));
    }

    #[test]
    fn test_eof_truncation_discards_partial_record() {
        let mut r = reader("<CALL:6>ABC123<DXCC:3>291<");
        assert!(r.read_next().unwrap().is_none());
        assert_eq!(r.records_read(), 0);
    }

    #[test]
    fn test_truncated_value_is_end_of_stream() {
        let mut r = reader("<CALL:6>ABC<EOR>");
        // Declared 6 bytes, the value swallows "ABC<EO" and then "R>" is text
        // with no further tag
        assert!(r.read_next().unwrap().is_none());

        let mut r = reader("<CALL:10>ABC");
        assert!(r.read_next().unwrap().is_none());
    }

    #[test]
    fn test_sequential_records() {
        let mut r = reader("<CALL:5>K1ABC<EOR>\n<CALL:5>W1AW <EOR>");
        let first = r.read_next().unwrap().unwrap();
        let second = r.read_next().unwrap().unwrap();
        assert_eq!(first.raw("call"), Some("K1ABC"));
        assert_eq!(second.raw("call"), Some("W1AW "));
        assert!(r.read_next().unwrap().is_none());
        assert_eq!(r.records_read(), 2);
    }

    #[test]
    fn test_length_exactness_with_delimiters_in_value() {
        let mut r = reader("<COMMENT:9>a<b>:c<d><EOR>");
        let rec = r.read_next().unwrap().unwrap();
        assert_eq!(rec.raw("comment"), Some("a<b>:c<d>"));
    }

    #[test]
    fn test_zero_length_and_empty_record() {
        let mut r = reader("<NOTES:0><EOR><eor>");
        let rec = r.read_next().unwrap().unwrap();
        assert_eq!(rec.raw("notes"), Some(""));
        let empty = r.read_next().unwrap().unwrap();
        assert!(empty.is_empty());
        assert!(empty.is_qso());
    }

    #[test]
    fn test_free_text_and_case_and_datatype() {
        let input = "Exported by hand\n<adif_ver:5>3.1.0 <eoh>\n\
                     junk <Call:5:S>K1ABC <Mode:2>CW\n< eor >";
        let mut r = reader(input);
        let header = r.read_next().unwrap().unwrap();
        assert!(header.is_header());
        let qso = r.read_next().unwrap().unwrap();
        assert_eq!(qso.raw("CALL"), Some("K1ABC"));
        assert_eq!(qso.raw("mode"), Some("CW"));
    }

    #[test]
    fn test_duplicate_field_overwrites() {
        let mut r = reader("<CALL:5>K1ABC<call:4>W1AW<EOR>");
        let rec = r.read_next().unwrap().unwrap();
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.raw("call"), Some("W1AW"));
    }

    #[test]
    fn test_malformed_length_then_resync() {
        let mut r = reader("<CALL:5>K1ABC<FREQ:x>14.0<MODE:2>CW<EOR><CALL:4>W1AW<EOR>");
        let err = r.read_next().unwrap_err();
        assert!(matches!(err, AdifError::MalformedRecord { offset: 13, .. }));
        assert!(err.is_record_level());

        let next = r.read_next().unwrap().unwrap();
        assert_eq!(next.raw("call"), Some("W1AW"));
        assert!(!next.contains("mode"));
        assert!(r.read_next().unwrap().is_none());
    }

    #[test]
    fn test_missing_length_is_malformed() {
        let mut r = reader("<CALL>K1ABC<EOR>");
        assert!(matches!(
            r.read_next(),
            Err(AdifError::MalformedRecord { .. })
        ));
        let mut r = reader("<>x<EOR>");
        assert!(r.read_next().is_err());
        let mut r = reader("<CALL:-1>x<EOR>");
        assert!(r.read_next().is_err());
        let mut r = reader("<N\u{c9}:1>x<EOR>");
        assert!(r.read_next().is_err());
    }

    #[test]
    fn test_latin1_fallback() {
        let bytes: &[u8] = b"<NAME:4>J\xf6rg<EOR>";
        let mut r = AdifReader::new(bytes);
        let rec = r.read_next().unwrap().unwrap();
        assert_eq!(rec.raw("name"), Some("J\u{f6}rg"));
    }

    #[test]
    fn test_utf8_value_counted_in_bytes() {
        let mut r = reader("<NAME:5>J\u{f6}rg<EOR>");
        let rec = r.read_next().unwrap().unwrap();
        assert_eq!(rec.raw("name"), Some("J\u{f6}rg"));
    }
}
