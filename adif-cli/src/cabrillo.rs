//! ADIF to Cabrillo 3.0 conversion
//!
//! Writes the log header from configuration, one `QSO:` line per contact and
//! the closing `END-OF-LOG:` line.

use crate::band::{band_by_name, band_for_mhz, cabrillo_mode, freq_mhz, BandRange};
use crate::config::CabrilloConfig;
use adif_codec::{FormatterRegistry, Record};
use chrono::{NaiveDate, NaiveTime};
use std::io::{self, Write};

/// Reasons a QSO cannot be turned into a Cabrillo line
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CabrilloError {
    #[error("missing field {0}")]
    MissingField(String),

    #[error("invalid QSO_DATE {0:?}")]
    InvalidDate(String),

    #[error("invalid TIME_ON {0:?}")]
    InvalidTime(String),

    #[error("no frequency or known band")]
    NoFrequency,
}

/// Cabrillo frequency token for VHF and up, keyed by ADIF band
const VHF_BANDS: &[(&str, &str)] = &[
    ("6m", "50"),
    ("4m", "70"),
    ("2m", "144"),
    ("1.25m", "222"),
    ("70cm", "432"),
    ("33cm", "902"),
    ("23cm", "1.2G"),
    ("13cm", "2.3G"),
    ("9cm", "3.4G"),
    ("6cm", "5.7G"),
    ("3cm", "10G"),
];

/// Cabrillo log writer
pub struct CabrilloWriter<'a, W: Write> {
    out: W,
    config: &'a CabrilloConfig,
    registry: &'a FormatterRegistry,
    qsos_written: usize,
}

impl<'a, W: Write> CabrilloWriter<'a, W> {
    pub fn new(out: W, config: &'a CabrilloConfig, registry: &'a FormatterRegistry) -> Self {
        Self {
            out,
            config,
            registry,
            qsos_written: 0,
        }
    }

    /// Write the START-OF-LOG block
    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "START-OF-LOG: 3.0")?;
        writeln!(self.out, "CREATED-BY: {}", self.config.created_by)?;
        if let Some(contest) = &self.config.contest {
            writeln!(self.out, "CONTEST: {}", contest)?;
        }
        if let Some(callsign) = &self.config.callsign {
            writeln!(self.out, "CALLSIGN: {}", callsign.to_ascii_uppercase())?;
        }
        for (category, value) in &self.config.categories {
            writeln!(self.out, "CATEGORY-{}: {}", category.to_ascii_uppercase(), value)?;
        }
        for (key, value) in &self.config.headers {
            writeln!(self.out, "{}: {}", key.to_ascii_uppercase(), value)?;
        }
        Ok(())
    }

    /// Write one QSO line
    ///
    /// Returns `Ok(Err(..))` when the record lacks data for a line; nothing
    /// is written in that case.
    pub fn write_qso(&mut self, record: &Record) -> io::Result<Result<(), CabrilloError>> {
        match qso_line(record, self.registry, self.config) {
            Ok(line) => {
                writeln!(self.out, "{}", line)?;
                self.qsos_written += 1;
                Ok(Ok(()))
            }
            Err(e) => Ok(Err(e)),
        }
    }

    pub fn write_footer(&mut self) -> io::Result<()> {
        writeln!(self.out, "END-OF-LOG:")?;
        self.out.flush()
    }

    pub fn qsos_written(&self) -> usize {
        self.qsos_written
    }
}

/// Render a QSO as a Cabrillo `QSO:` line
pub fn qso_line(
    record: &Record,
    registry: &FormatterRegistry,
    config: &CabrilloConfig,
) -> Result<String, CabrilloError> {
    let freq = frequency(record)?;
    let mode = cabrillo_mode(&required(record, registry, "mode")?);
    let date = qso_date(&required(record, registry, "qso_date")?)?;
    let time = time_on(&required(record, registry, "time_on")?)?;

    let my_call = ["operator", "station_callsign"]
        .iter()
        .map(|f| record.get_field(registry, f, ""))
        .find(|v| !v.trim().is_empty())
        .or_else(|| config.callsign.clone())
        .ok_or_else(|| CabrilloError::MissingField("operator".to_string()))?;
    let call = required(record, registry, "call")?;

    let sent = exchange(record, registry, &config.sent, mode)?;
    let rcvd = exchange(record, registry, &config.rcvd, mode)?;

    let line = format!(
        "QSO: {:>5} {} {} {} {:<13} {} {:<13} {}",
        freq,
        mode,
        date,
        time,
        my_call.trim().to_ascii_uppercase(),
        sent,
        call.trim().to_ascii_uppercase(),
        rcvd
    );
    Ok(line.trim_end().to_string())
}

fn required(
    record: &Record,
    registry: &FormatterRegistry,
    field: &str,
) -> Result<String, CabrilloError> {
    let value = record.get_field(registry, field, "");
    if value.trim().is_empty() {
        return Err(CabrilloError::MissingField(field.to_string()));
    }
    Ok(value.trim().to_string())
}

/// Frequency token: kHz below 50 MHz, band designator above
fn frequency(record: &Record) -> Result<String, CabrilloError> {
    let band: Option<&BandRange> = match freq_mhz(record) {
        Some(mhz) => {
            let band = band_for_mhz(mhz);
            if mhz < 50.0 {
                return Ok(format!("{}", (mhz * 1000.0).round() as u64));
            }
            band
        }
        None => record.raw("band").and_then(band_by_name),
    };

    let band = band.ok_or(CabrilloError::NoFrequency)?;
    if let Some((_, token)) = VHF_BANDS.iter().find(|(name, _)| *name == band.name) {
        return Ok(token.to_string());
    }
    Ok(format!("{}", (band.lower_mhz * 1000.0).round() as u64))
}

/// `YYYYMMDD` -> `YYYY-MM-DD`
fn qso_date(value: &str) -> Result<String, CabrilloError> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| CabrilloError::InvalidDate(value.to_string()))
}

/// `HHMM` or `HHMMSS` -> `HHMM`
fn time_on(value: &str) -> Result<String, CabrilloError> {
    let invalid = || CabrilloError::InvalidTime(value.to_string());
    if !(value.len() == 4 || value.len() == 6) {
        return Err(invalid());
    }
    let hhmm = value.get(..4).ok_or_else(invalid)?;
    NaiveTime::parse_from_str(hhmm, "%H%M")
        .map(|t| t.format("%H%M").to_string())
        .map_err(|_| invalid())
}

/// Exchange tokens, each padded to a fixed column
fn exchange(
    record: &Record,
    registry: &FormatterRegistry,
    fields: &[String],
    mode: &str,
) -> Result<String, CabrilloError> {
    let mut tokens = Vec::with_capacity(fields.len());
    for field in fields {
        let value = record.get_field(registry, field, "");
        let value = value.trim();
        let token = if !value.is_empty() {
            value.to_string()
        } else if field == "rst_sent" || field == "rst_rcvd" {
            default_rst(mode).to_string()
        } else {
            return Err(CabrilloError::MissingField(field.clone()));
        };
        tokens.push(format!("{:<6}", token.replace(' ', "-")));
    }
    Ok(tokens.join(" "))
}

fn default_rst(mode: &str) -> &'static str {
    match mode {
        "PH" | "FM" => "59",
        _ => "599",
    }
}
