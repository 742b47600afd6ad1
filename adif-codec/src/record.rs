//! ADIF record model and field accessors
//!
//! A [`Record`] is one header or QSO: its kind plus a map of lower-cased field
//! names to raw wire values. Insertion order is kept so that an unmodified
//! record is written back in the order it was read.

use crate::formatters::{Direction, FormatterRegistry};
use crate::types::{validate_field_name, FieldRef, RecordKind, Result};

/// One ADIF record (header or QSO)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record of the given kind
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    /// Create an empty QSO record
    pub fn qso() -> Self {
        Self::new(RecordKind::Qso)
    }

    /// Create an empty header record
    pub fn header() -> Self {
        Self::new(RecordKind::Header)
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn is_qso(&self) -> bool {
        self.kind == RecordKind::Qso
    }

    pub fn is_header(&self) -> bool {
        self.kind == RecordKind::Header
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if the record has a field with this name (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.position(&name.to_ascii_lowercase()).is_some()
    }

    /// Raw wire value of a field, without formatting
    pub fn raw(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.position(&name).map(|idx| self.fields[idx].1.as_str())
    }

    /// Store a raw wire value, overwriting any existing value in place
    pub fn set_raw(&mut self, name: &str, value: impl Into<String>) -> Result<&mut Self> {
        let name = name.trim().to_ascii_lowercase();
        validate_field_name(&name)?;
        self.insert(name, value.into());
        Ok(self)
    }

    /// Remove a field, returning its raw value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.position(&name).map(|idx| self.fields.remove(idx).1)
    }

    /// Iterate over `(name, raw value)` pairs in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Read a field through the formatter registry
    ///
    /// `field` may carry a `.raw` suffix to skip formatting. A missing field
    /// yields `default` as-is.
    ///
    /// # Example
    /// ```
    /// use adif_codec::{FormatterRegistry, Record};
    ///
    /// let registry = FormatterRegistry::builtin().unwrap();
    /// let mut qso = Record::qso();
    /// qso.set_raw("dxcc", "291").unwrap();
    ///
    /// assert_eq!(qso.get_field(&registry, "DXCC", ""), "UNITED STATES OF AMERICA");
    /// assert_eq!(qso.get_field(&registry, "dxcc.raw", ""), "291");
    /// assert_eq!(qso.get_field(&registry, "gridsquare", "n/a"), "n/a");
    /// ```
    pub fn get_field(&self, registry: &FormatterRegistry, field: &str, default: &str) -> String {
        let field = FieldRef::parse(field);
        match self.position(&field.name) {
            None => default.to_string(),
            Some(idx) => {
                let value = &self.fields[idx].1;
                if field.raw {
                    value.clone()
                } else {
                    registry.format(&field.name, Direction::From, value)
                }
            }
        }
    }

    /// Write a field through the formatter registry
    ///
    /// Unless `field` carries `.raw`, `value` is converted to its wire form
    /// (e.g. a country name to its DXCC code) before it is stored.
    pub fn set_field(
        &mut self,
        registry: &FormatterRegistry,
        field: &str,
        value: &str,
    ) -> Result<&mut Self> {
        let field = FieldRef::parse(field);
        validate_field_name(&field.name)?;

        let stored = if field.raw {
            value.to_string()
        } else {
            registry.format(&field.name, Direction::To, value)
        };
        self.insert(field.name, stored);
        Ok(self)
    }

    /// Serialize this record to its ADIF wire form
    pub fn to_adif_string(&self) -> String {
        self.to_string()
    }

    /// Insert an already-canonical name; used by the reader
    pub(crate) fn insert(&mut self, name: String, value: String) {
        match self.position(&name) {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub(crate) fn set_kind(&mut self, kind: RecordKind) {
        self.kind = kind;
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }
}
