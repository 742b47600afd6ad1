//! Amateur band plan and mode classification

use adif_codec::Record;

/// An amateur band: ADIF band name and frequency limits in MHz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub name: &'static str,
    pub lower_mhz: f64,
    pub upper_mhz: f64,
}

impl BandRange {
    const fn new(name: &'static str, lower_mhz: f64, upper_mhz: f64) -> Self {
        Self {
            name,
            lower_mhz,
            upper_mhz,
        }
    }

    pub fn contains(&self, mhz: f64) -> bool {
        mhz >= self.lower_mhz && mhz <= self.upper_mhz
    }
}

/// ADIF band enumeration, lowest first
pub const BANDS: &[BandRange] = &[
    BandRange::new("2190m", 0.1357, 0.1378),
    BandRange::new("630m", 0.472, 0.479),
    BandRange::new("560m", 0.501, 0.504),
    BandRange::new("160m", 1.8, 2.0),
    BandRange::new("80m", 3.5, 4.0),
    BandRange::new("60m", 5.06, 5.45),
    BandRange::new("40m", 7.0, 7.3),
    BandRange::new("30m", 10.1, 10.15),
    BandRange::new("20m", 14.0, 14.35),
    BandRange::new("17m", 18.068, 18.168),
    BandRange::new("15m", 21.0, 21.45),
    BandRange::new("12m", 24.89, 24.99),
    BandRange::new("10m", 28.0, 29.7),
    BandRange::new("8m", 40.0, 45.0),
    BandRange::new("6m", 50.0, 54.0),
    BandRange::new("5m", 54.000001, 69.9),
    BandRange::new("4m", 70.0, 71.0),
    BandRange::new("2m", 144.0, 148.0),
    BandRange::new("1.25m", 222.0, 225.0),
    BandRange::new("70cm", 420.0, 450.0),
    BandRange::new("33cm", 902.0, 928.0),
    BandRange::new("23cm", 1240.0, 1300.0),
    BandRange::new("13cm", 2300.0, 2450.0),
    BandRange::new("9cm", 3300.0, 3500.0),
    BandRange::new("6cm", 5650.0, 5925.0),
    BandRange::new("3cm", 10000.0, 10500.0),
];

/// Band containing a frequency in MHz
pub fn band_for_mhz(mhz: f64) -> Option<&'static BandRange> {
    BANDS.iter().find(|b| b.contains(mhz))
}

/// Look up a band by its ADIF name (case-insensitive)
pub fn band_by_name(name: &str) -> Option<&'static BandRange> {
    BANDS.iter().find(|b| b.name.eq_ignore_ascii_case(name.trim()))
}

/// Frequency of a QSO in MHz, from its FREQ field
pub fn freq_mhz(record: &Record) -> Option<f64> {
    record
        .raw("freq")
        .and_then(|f| f.trim().parse::<f64>().ok())
        .filter(|f| *f > 0.0)
}

/// Band name of a QSO: the BAND field if present, else derived from FREQ
pub fn band_of(record: &Record) -> Option<String> {
    if let Some(band) = record.raw("band").map(str::trim).filter(|b| !b.is_empty()) {
        return Some(band.to_ascii_lowercase());
    }
    freq_mhz(record)
        .and_then(band_for_mhz)
        .map(|b| b.name.to_string())
}

/// Cabrillo mode for an ADIF mode (CW, PH, FM, RY, DG)
pub fn cabrillo_mode(mode: &str) -> &'static str {
    match mode.trim().to_ascii_uppercase().as_str() {
        "CW" => "CW",
        "SSB" | "USB" | "LSB" | "AM" | "PHONE" => "PH",
        "FM" => "FM",
        "RTTY" => "RY",
        _ => "DG",
    }
}
