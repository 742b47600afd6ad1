//! ADIF Log Tools CLI
//!
//! Command-line front end for the adif-codec library:
//! - Cabrillo contest log conversion
//! - Band/mode statistics and continent/country/prefix counts
//! - Pretty-printing and ADIF normalisation

use adif_codec::{AdifWriter, FileOutcome, Logbook, Record};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

mod band;
mod cabrillo;
mod config;
mod prefix;
mod pretty;
mod report;
mod stats;

use cabrillo::CabrilloWriter;
use config::{load_config, parse_field_list, AppConfig, CabrilloConfig};
use pretty::PrettyPrinter;
use stats::{BandModeStats, GroupBy, GroupCounts};

/// ADIF Log Tools - Convert and summarise amateur radio logs
#[derive(Parser, Debug)]
#[command(name = "adif-cli")]
#[command(about = "Convert and summarise ADIF amateur radio logs", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert QSOs to a Cabrillo 3.0 contest log
    Cabrillo {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Contest name (overrides config)
        #[arg(long)]
        contest: Option<String>,

        /// Station callsign (overrides config)
        #[arg(long)]
        callsign: Option<String>,

        /// Comma-separated ADIF fields for the sent exchange
        #[arg(long, value_name = "FIELDS")]
        sent: Option<String>,

        /// Comma-separated ADIF fields for the received exchange
        #[arg(long, value_name = "FIELDS")]
        rcvd: Option<String>,
    },

    /// QSO counts per band and mode
    Stats {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// QSO counts per continent, country or callsign prefix
    Geo {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t = GroupBy::Continent)]
        by: GroupBy,
    },

    /// Print every record with formatted field values
    Pretty {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Show wire values without formatting
        #[arg(long)]
        raw: bool,
    },

    /// Rewrite input as canonical ADIF
    Normalize {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("ADIF Log Tools CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using adif-codec v{}", adif_codec::VERSION);

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            load_config(path)?
        }
        None => AppConfig::default(),
    };

    let logbook = Logbook::from_config(&config.registry).context("Failed to build formatter registry")?;
    let stats = logbook.registry_stats();
    log::debug!(
        "Formatter registry: {} formatters, {} entries",
        stats.num_formatters,
        stats.num_entries
    );

    let mut out = open_output(args.output.as_ref())?;

    let outcomes = match args.command {
        Command::Cabrillo {
            files,
            contest,
            callsign,
            sent,
            rcvd,
        } => {
            let mut cabrillo = config.cabrillo;
            if contest.is_some() {
                cabrillo.contest = contest;
            }
            if callsign.is_some() {
                cabrillo.callsign = callsign;
            }
            if let Some(list) = sent {
                cabrillo.sent = parse_field_list(&list);
            }
            if let Some(list) = rcvd {
                cabrillo.rcvd = parse_field_list(&list);
            }
            run_cabrillo(&logbook, &cabrillo, &files, &mut out)?
        }
        Command::Stats { files } => run_stats(&logbook, &files, &mut out)?,
        Command::Geo { files, by } => run_geo(&logbook, &files, by, &mut out)?,
        Command::Pretty { files, raw } => run_pretty(&logbook, &files, raw, &mut out)?,
        Command::Normalize { files } => run_normalize(&logbook, &files, &mut out)?,
    };

    // Each failure was already logged with its cause while reading
    let failed = failed_files(&outcomes);
    if failed > 0 {
        eprintln!("Error: {} of {} input files failed", failed, outcomes.len());
        std::process::exit(1);
    }

    Ok(())
}

/// Output file or stdout
fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Number of input files that could not be read to the end
fn failed_files(outcomes: &[FileOutcome]) -> usize {
    outcomes.iter().filter(|o| !o.is_ok()).count()
}

fn run_cabrillo<W: Write>(
    logbook: &Logbook,
    config: &CabrilloConfig,
    files: &[PathBuf],
    out: &mut W,
) -> Result<Vec<FileOutcome>> {
    let mut writer = CabrilloWriter::new(out, config, logbook.registry());
    writer.write_header()?;

    let mut skipped = 0usize;
    let outcomes = logbook.for_each_record_in(files, |record: Record| -> Result<()> {
        if !record.is_qso() {
            return Ok(());
        }
        if let Err(e) = writer.write_qso(&record)? {
            log::warn!(
                "Skipping QSO with {}: {}",
                record.raw("call").unwrap_or("?"),
                e
            );
            skipped += 1;
        }
        Ok(())
    })?;

    writer.write_footer()?;
    log::info!(
        "Wrote {} QSO lines ({} skipped)",
        writer.qsos_written(),
        skipped
    );
    Ok(outcomes)
}

fn run_stats<W: Write>(logbook: &Logbook, files: &[PathBuf], out: &mut W) -> Result<Vec<FileOutcome>> {
    let mut stats = BandModeStats::new();
    let outcomes = logbook.for_each_record_in(files, |record: Record| -> Result<()> {
        stats.add(&record);
        Ok(())
    })?;

    log::info!("Counted {} QSOs", stats.total());
    write!(out, "{}", stats.render())?;
    out.flush()?;
    Ok(outcomes)
}

fn run_geo<W: Write>(
    logbook: &Logbook,
    files: &[PathBuf],
    by: GroupBy,
    out: &mut W,
) -> Result<Vec<FileOutcome>> {
    let mut counts = GroupCounts::new(by);
    let outcomes = logbook.for_each_record_in(files, |record: Record| -> Result<()> {
        counts.add(&record, logbook.registry());
        Ok(())
    })?;

    write!(out, "{}", counts.render())?;
    out.flush()?;
    Ok(outcomes)
}

fn run_pretty<W: Write>(
    logbook: &Logbook,
    files: &[PathBuf],
    raw: bool,
    out: &mut W,
) -> Result<Vec<FileOutcome>> {
    let mut printer = PrettyPrinter::new(out, logbook.registry(), raw);
    let outcomes = logbook.for_each_record_in(files, |record: Record| -> Result<()> {
        printer.print(&record)?;
        Ok(())
    })?;

    printer.flush()?;
    Ok(outcomes)
}

/// Only the first header survives when several files are merged
fn run_normalize<W: Write>(logbook: &Logbook, files: &[PathBuf], out: &mut W) -> Result<Vec<FileOutcome>> {
    let mut writer = AdifWriter::new(out);
    let mut seen_header = false;
    let outcomes = logbook.for_each_record_in(files, |record: Record| -> Result<()> {
        if record.is_header() {
            if seen_header {
                log::debug!("Dropping additional header record");
                return Ok(());
            }
            seen_header = true;
        }
        writer.write_record(&record)?;
        Ok(())
    })?;

    writer.flush()?;
    log::info!("Wrote {} records", writer.records_written());
    Ok(outcomes)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_normalize_keeps_first_header() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_input(dir.path(), "a.adi", "<ADIF_VER:5>3.1.3<EOH><CALL:5>K1ABC<EOR>");
        let second = write_input(dir.path(), "b.adi", "<PROGRAMID:3>abc<eoh>\n<call:4>W1AW<eor>");

        let logbook = Logbook::new().unwrap();
        let mut out = Vec::new();
        let outcomes = run_normalize(&logbook, &[first, second], &mut out).unwrap();

        assert_eq!(failed_files(&outcomes), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<ADIF_VER:5>3.1.3\n<EOH>\n\n<CALL:5>K1ABC\n<EOR>\n\n<CALL:4>W1AW\n<EOR>\n\n"
        );
    }

    #[test]
    fn test_cabrillo_skips_incomplete_qso() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "contest.adi",
            "<CALL:5>DL1AA<FREQ:6>14.025<MODE:2>CW<QSO_DATE:8>20240127<TIME_ON:4>0012<EOR>\n\
             <CALL:4>G4XX<FREQ:5>7.010<MODE:2>CW<QSO_DATE:8>20240127<EOR>\n",
        );
        let config = CabrilloConfig {
            callsign: Some("K1ABC".to_string()),
            created_by: "test".to_string(),
            ..CabrilloConfig::default()
        };

        let logbook = Logbook::new().unwrap();
        let mut out = Vec::new();
        let outcomes = run_cabrillo(&logbook, &config, &[input], &mut out).unwrap();
        assert_eq!(failed_files(&outcomes), 0);

        let text = String::from_utf8(out).unwrap();
        let qso_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("QSO:")).collect();
        assert_eq!(
            qso_lines,
            vec!["QSO: 14025 CW 2024-01-27 0012 K1ABC         599    DL1AA         599"]
        );
        assert!(text.starts_with("START-OF-LOG: 3.0\n"));
        assert!(text.ends_with("END-OF-LOG:\n"));
    }

    #[test]
    fn test_batch_continues_past_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_input(dir.path(), "a.adi", "<BAND:3>20m<MODE:2>CW<EOR>");
        let missing = dir.path().join("missing.adi");
        let last = write_input(dir.path(), "c.adi", "<BAND:3>40m<MODE:3>SSB<EOR>");

        let logbook = Logbook::new().unwrap();
        let mut out = Vec::new();
        let outcomes = run_stats(&logbook, &[first, missing.clone(), last], &mut out).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(failed_files(&outcomes), 1);
        assert_eq!(outcomes[1].path, missing);
        assert!(outcomes[2].is_ok());

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().last(), Some("Total |  1 |   1 |     2"));
    }

    #[test]
    fn test_pretty_numbers_qsos_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_input(dir.path(), "a.adi", "<CALL:5>K1ABC<EOR>");
        let second = write_input(dir.path(), "b.adi", "<CALL:4>W1AW<CONT:2>EU<EOR>");

        let logbook = Logbook::new().unwrap();
        let mut out = Vec::new();
        run_pretty(&logbook, &[first, second], false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--- QSO #2 ---\n  CALL : W1AW\n  CONT : Europe (EU)\n"));
    }
}
