//! QSO statistics: band/mode grid and grouped counts

use crate::band::{band_of, BANDS};
use crate::prefix::callsign_prefix;
use crate::report::TextTable;
use adif_codec::{FormatterRegistry, Record};
use clap::ValueEnum;
use std::collections::{BTreeSet, HashMap};

const UNKNOWN: &str = "?";

/// QSO counts per band and mode
#[derive(Debug, Default)]
pub struct BandModeStats {
    counts: HashMap<(String, String), usize>,
    bands: BTreeSet<String>,
    modes: BTreeSet<String>,
    total: usize,
}

impl BandModeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one QSO; header records are ignored
    pub fn add(&mut self, record: &Record) {
        if !record.is_qso() {
            return;
        }

        let band = band_of(record).unwrap_or_else(|| UNKNOWN.to_string());
        let mode = record
            .raw("mode")
            .map(|m| m.trim().to_ascii_uppercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        self.bands.insert(band.clone());
        self.modes.insert(mode.clone());
        *self.counts.entry((band, mode)).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, band: &str, mode: &str) -> usize {
        self.counts
            .get(&(band.to_string(), mode.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Bands in band-plan order, unknown names last
    fn ordered_bands(&self) -> Vec<&String> {
        let mut bands: Vec<&String> = self.bands.iter().collect();
        bands.sort_by_key(|b| {
            let pos = BANDS
                .iter()
                .position(|r| r.name == b.as_str())
                .unwrap_or(BANDS.len());
            (pos, (*b).clone())
        });
        bands
    }

    /// Render the grid with row and column totals
    pub fn render(&self) -> String {
        let mut headers = vec!["Band".to_string()];
        headers.extend(self.modes.iter().cloned());
        headers.push("Total".to_string());
        let mut table = TextTable::new(headers);

        for band in self.ordered_bands() {
            let mut row = vec![band.clone()];
            let mut band_total = 0;
            for mode in &self.modes {
                let n = self.count(band, mode);
                band_total += n;
                row.push(n.to_string());
            }
            row.push(band_total.to_string());
            table.add_row(row);
        }

        let mut footer = vec!["Total".to_string()];
        for mode in &self.modes {
            let n: usize = self.bands.iter().map(|b| self.count(b, mode)).sum();
            footer.push(n.to_string());
        }
        footer.push(self.total.to_string());
        table.set_footer(footer);

        table.render()
    }
}

/// Grouping key for [`GroupCounts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Continent,
    Country,
    Prefix,
}

impl GroupBy {
    pub fn label(&self) -> &'static str {
        match self {
            GroupBy::Continent => "Continent",
            GroupBy::Country => "Country",
            GroupBy::Prefix => "Prefix",
        }
    }

    /// Grouping key of a QSO, formatted through the registry
    pub fn key_for(&self, record: &Record, registry: &FormatterRegistry) -> Option<String> {
        let key = match self {
            GroupBy::Continent => record.get_field(registry, "cont", ""),
            GroupBy::Country => {
                let country = record.get_field(registry, "dxcc", "");
                if country.is_empty() {
                    record.get_field(registry, "country", "").to_ascii_uppercase()
                } else {
                    country
                }
            }
            GroupBy::Prefix => callsign_prefix(&record.get_field(registry, "call", ""))?,
        };

        let key = key.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}

/// QSO counts grouped by continent, country or prefix
#[derive(Debug)]
pub struct GroupCounts {
    group_by: GroupBy,
    counts: HashMap<String, usize>,
    total: usize,
}

impl GroupCounts {
    pub fn new(group_by: GroupBy) -> Self {
        Self {
            group_by,
            counts: HashMap::new(),
            total: 0,
        }
    }

    /// Count one QSO; header records are ignored
    pub fn add(&mut self, record: &Record, registry: &FormatterRegistry) {
        if !record.is_qso() {
            return;
        }
        let key = self
            .group_by
            .key_for(record, registry)
            .unwrap_or_else(|| UNKNOWN.to_string());
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    /// Groups sorted by descending count, then name
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut groups: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        groups
    }

    pub fn render(&self) -> String {
        let mut table = TextTable::new([self.group_by.label(), "QSOs", "%"]);
        for (key, n) in self.sorted() {
            table.add_row(vec![key.to_string(), n.to_string(), percent(n, self.total)]);
        }
        table.set_footer(vec![
            format!("{} groups", self.counts.len()),
            self.total.to_string(),
            percent(self.total, self.total),
        ]);
        table.render()
    }
}

fn percent(n: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", n as f64 * 100.0 / total as f64)
}
