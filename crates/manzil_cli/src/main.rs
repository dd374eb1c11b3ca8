mod config;
mod local_time;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use manzil_ephem::{GeoLocation, TablePositionProvider};
use manzil_export::{ExportOptions, PreviewTable, preview_rows, write_csv, write_ics};
use manzil_search::{ScanConfig, ScanWindow, SearchError, search_station_crossings};
use manzil_stations::StationTable;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::FileConfig;
use crate::local_time::{parse_local, parse_timezone};

#[derive(Parser)]
#[command(name = "manzil", about = "Lunar station crossing calculator")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Ics,
}

impl Format {
    fn default_file(self) -> &'static str {
        match self {
            Format::Csv => "lunar_stations.csv",
            Format::Ics => "lunar_stations.ics",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find station boundary crossings in a local time window
    Crossings {
        /// Observer latitude in degrees (negative = south)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Observer longitude in degrees (negative = west)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Observer altitude in metres
        #[arg(long, default_value_t = 0.0)]
        alt: f64,
        /// IANA timezone of --start/--end and of the output
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// Window start, local time (YYYY-MM-DD HH:MM[:SS])
        #[arg(long)]
        start: String,
        /// Window end, local time (YYYY-MM-DD HH:MM[:SS])
        #[arg(long)]
        end: String,
        /// Moon position table (CSV: utc,longitude_deg,latitude_deg)
        #[arg(long)]
        ephemeris: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,
        /// Output file (default lunar_stations.csv / lunar_stations.ics)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Omit the reminder at each calendar entry
        #[arg(long)]
        no_alerts: bool,
        /// Omit ecliptic longitude
        #[arg(long)]
        no_longitude: bool,
        /// Include ecliptic latitude
        #[arg(long)]
        latitude: bool,
        /// Include station names
        #[arg(long)]
        description: bool,
        /// TOML settings file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Longest accepted window in days
        #[arg(long)]
        max_span_days: Option<u32>,
        /// Wall-clock budget in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Resident memory ceiling in MB
        #[arg(long)]
        memory_mb: Option<f64>,
        /// Skip the station sequence check
        #[arg(long)]
        no_sequence_check: bool,
    },
    /// List the station table
    Stations {
        /// TOML settings file with a [[station]] list
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Station containing an ecliptic longitude
    StationAt {
        /// Ecliptic longitude in degrees
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        /// TOML settings file with a [[station]] list
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stations(table: &StationTable) {
    println!("{:<7} {:>10}  Name", "Station", "Boundary");
    for s in table {
        println!("{:<7} {:>10.4}  {}", s.id.label(), s.threshold_deg, s.description);
    }
}

fn write_output(
    path: &Path,
    format: Format,
    events: &[manzil_search::CrossingEvent],
    table: &StationTable,
    options: &ExportOptions,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let writer = BufWriter::new(file);
    match format {
        Format::Csv => write_csv(writer, events, table, options)?,
        Format::Ics => write_ics(writer, events, table, options)?,
    }
    Ok(())
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Crossings {
            lat,
            lon,
            alt,
            timezone,
            start,
            end,
            ephemeris,
            format,
            output,
            no_alerts,
            no_longitude,
            latitude,
            description,
            config,
            max_span_days,
            timeout_secs,
            memory_mb,
            no_sequence_check,
        } => {
            let file_config = FileConfig::load_optional(config.as_deref())?;
            let table = file_config.station_table()?;

            let mut scan = ScanConfig::default();
            file_config.apply(&mut scan);
            if let Some(days) = max_span_days {
                scan.max_span = TimeDelta::days(i64::from(days));
            }
            if let Some(secs) = timeout_secs {
                scan.timeout = Duration::from_secs(secs);
            }
            if let Some(mb) = memory_mb {
                scan.memory_ceiling_mb = mb;
            }
            if no_sequence_check {
                scan.validate_sequence = false;
            }

            let tz = parse_timezone(&timezone)?;
            let window = ScanWindow::new(parse_local(&start, tz)?, parse_local(&end, tz)?)?;
            let location = GeoLocation::new(lat, lon, alt);
            scan.validate().map_err(SearchError::InvalidConfig)?;
            location.validate().map_err(SearchError::InvalidLocation)?;
            window.validate_span(scan.max_span)?;

            let provider = TablePositionProvider::load(&ephemeris).map_err(SearchError::from)?;
            let events = search_station_crossings(&provider, &location, &window, &table, &scan)?;

            print!("{}", PreviewTable::new(preview_rows(&events, &table, tz)));

            let options = ExportOptions {
                timezone: tz,
                include_longitude: !no_longitude,
                include_latitude: latitude,
                include_description: description,
                include_alerts: !no_alerts,
                generated_at: Utc::now(),
            };
            let path = output.unwrap_or_else(|| PathBuf::from(format.default_file()));
            write_output(&path, format, &events, &table, &options)?;
            info!(events = events.len(), path = %path.display(), "results written");
        }

        Commands::Stations { config } => {
            let table = FileConfig::load_optional(config.as_deref())?.station_table()?;
            print_stations(&table);
        }

        Commands::StationAt { lon, config } => {
            let table = FileConfig::load_optional(config.as_deref())?.station_table()?;
            let info = table.station_at(lon);
            println!(
                "{} {} - boundary {:.4} deg ({:.4} of {:.4} deg in station)",
                info.station,
                table.description(info.station),
                info.threshold_deg,
                info.degrees_in_station,
                info.span_deg
            );
        }
    }
    Ok(())
}

/// Error text with each cause appended once; sources already quoted by
/// their parent message are skipped.
fn error_report(e: &anyhow::Error) -> String {
    let mut msg = e.to_string();
    for cause in e.chain().skip(1) {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg = format!("{msg}: {text}");
        }
    }
    msg
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", error_report(&e));
        std::process::exit(1);
    }
}
