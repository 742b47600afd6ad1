//! Core types for the ADIF codec library
//!
//! This module defines the record model produced and consumed by the stream
//! codec, the field reference parsed from accessor names, and the error type
//! shared by every operation in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, AdifError>;

/// Errors that can occur while reading, writing or formatting ADIF data
///
/// End of stream is not an error: readers report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum AdifError {
    #[error("Malformed record at byte {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    #[error("Unknown record kind: {0:?}")]
    UnknownRecordKind(String),

    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),

    #[error("Failed to parse enumeration table {table} line {line}: {reason}")]
    TableParse {
        table: String,
        line: usize,
        reason: String,
    },

    #[error("Enumeration table not found: {0:?}")]
    TableNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdifError {
    /// True for errors scoped to a single record, after which reading can continue
    pub fn is_record_level(&self) -> bool {
        matches!(self, AdifError::MalformedRecord { .. })
    }
}

/// The two record kinds an ADIF stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// File header, terminated by `<EOH>`
    Header,
    /// A logged contact, terminated by `<EOR>`
    Qso,
}

impl RecordKind {
    /// Boundary tag written after the fields of a record of this kind
    pub fn boundary_tag(&self) -> &'static str {
        match self {
            RecordKind::Header => "<EOH>",
            RecordKind::Qso => "<EOR>",
        }
    }

    /// Map a lower-cased boundary tag body (`eoh`/`eor`) to a kind
    pub(crate) fn from_boundary(body: &str) -> Option<Self> {
        match body {
            "eoh" => Some(RecordKind::Header),
            "eor" => Some(RecordKind::Qso),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Header => write!(f, "Header"),
            RecordKind::Qso => write!(f, "QSO"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = AdifError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" | "eoh" => Ok(RecordKind::Header),
            "qso" | "eor" => Ok(RecordKind::Qso),
            _ => Err(AdifError::UnknownRecordKind(s.to_string())),
        }
    }
}

/// A field name as passed to the accessors, split into its base name and
/// the `.raw` bypass modifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Lower-cased field name
    pub name: String,
    /// Skip the formatter registry for this access
    pub raw: bool,
}

impl FieldRef {
    /// Parse `name[.modifier]`. Only the `raw` modifier has a meaning;
    /// anything else after the first `.` is ignored.
    pub fn parse(field: &str) -> Self {
        let (base, modifier) = match field.split_once('.') {
            Some((base, modifier)) => (base, Some(modifier)),
            None => (field, None),
        };

        Self {
            name: base.trim().to_ascii_lowercase(),
            raw: modifier.is_some_and(|m| m.eq_ignore_ascii_case("raw")),
        }
    }
}

/// Check the field-name invariant: non-empty ASCII, no tag delimiters
pub(crate) fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty()
        || !name.is_ascii()
        || name.contains([':', '<', '>'])
        || name.contains(char::is_whitespace)
    {
        return Err(AdifError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_from_str() {
        assert_eq!("QSO".parse::<RecordKind>().unwrap(), RecordKind::Qso);
        assert_eq!("header".parse::<RecordKind>().unwrap(), RecordKind::Header);
        assert_eq!("EOR".parse::<RecordKind>().unwrap(), RecordKind::Qso);
    }

    #[test]
    fn test_unknown_record_kind_fails_fast() {
        let err = "contact".parse::<RecordKind>().unwrap_err();
        assert!(matches!(err, AdifError::UnknownRecordKind(ref s) if s == "contact"));
    }

    #[test]
    fn test_field_ref_parse() {
        assert_eq!(
            FieldRef::parse("DXCC.raw"),
            FieldRef { name: "dxcc".to_string(), raw: true }
        );
        assert_eq!(
            FieldRef::parse("Call"),
            FieldRef { name: "call".to_string(), raw: false }
        );
        // Unknown modifiers are ignored, not treated as part of the name
        assert_eq!(
            FieldRef::parse("cont.pretty"),
            FieldRef { name: "cont".to_string(), raw: false }
        );
    }

    #[test]
    fn test_validate_field_name() {
        assert!(validate_field_name("qso_date").is_ok());
        assert!(validate_field_name("").is_err());
        assert!(validate_field_name("bad:name").is_err());
        assert!(validate_field_name("bad>name").is_err());
        assert!(validate_field_name("app_k1\u{e9}").is_err());
    }

    #[test]
    fn test_boundary_tags() {
        assert_eq!(RecordKind::Header.boundary_tag(), "<EOH>");
        assert_eq!(RecordKind::Qso.boundary_tag(), "<EOR>");
        assert_eq!(RecordKind::from_boundary("eor"), Some(RecordKind::Qso));
        assert_eq!(RecordKind::from_boundary("call"), None);
    }
}
