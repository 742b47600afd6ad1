//! Human-readable record listing

use adif_codec::{FormatterRegistry, Record};
use std::io::{self, Write};

/// Prints records as titled blocks of `NAME : value` lines
pub struct PrettyPrinter<'a, W: Write> {
    out: W,
    registry: &'a FormatterRegistry,
    raw: bool,
    qso_count: usize,
}

impl<'a, W: Write> PrettyPrinter<'a, W> {
    pub fn new(out: W, registry: &'a FormatterRegistry, raw: bool) -> Self {
        Self {
            out,
            registry,
            raw,
            qso_count: 0,
        }
    }

    pub fn print(&mut self, record: &Record) -> io::Result<()> {
        let title = if record.is_qso() {
            self.qso_count += 1;
            format!("QSO #{}", self.qso_count)
        } else {
            "Header".to_string()
        };
        writeln!(self.out, "--- {} ---", title)?;

        let width = record.fields().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in record.fields() {
            let shown = if self.raw {
                value.to_string()
            } else {
                let formatted = self.registry.from_wire(name, value);
                if formatted != value {
                    format!("{} ({})", formatted, value)
                } else {
                    formatted
                }
            };
            writeln!(
                self.out,
                "  {:<width$} : {}",
                name.to_ascii_uppercase(),
                shown,
                width = width
            )?;
        }
        writeln!(self.out)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_print_formats_values() {
        let registry = FormatterRegistry::builtin().unwrap();
        let mut header = Record::header();
        header.set_raw("adif_ver", "3.1.3").unwrap();
        let mut qso = Record::qso();
        qso.set_raw("call", "K1ABC").unwrap();
        qso.set_raw("dxcc", "291").unwrap();

        let mut out = Vec::new();
        let mut printer = PrettyPrinter::new(&mut out, &registry, false);
        printer.print(&header).unwrap();
        printer.print(&qso).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "--- Header ---\n  ADIF_VER : 3.1.3\n\n\
             --- QSO #1 ---\n  CALL : K1ABC\n  DXCC : UNITED STATES OF AMERICA (291)\n\n"
        );
    }

    #[test]
    fn test_pretty_print_raw() {
        let registry = FormatterRegistry::builtin().unwrap();
        let mut qso = Record::qso();
        qso.set_raw("cont", "EU").unwrap();

        let mut out = Vec::new();
        PrettyPrinter::new(&mut out, &registry, true).print(&qso).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "--- QSO #1 ---\n  CONT : EU\n\n");
    }
}
