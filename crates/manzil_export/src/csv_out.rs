//! Delimited table export.

use std::io::Write;

use manzil_search::CrossingEvent;
use manzil_stations::StationTable;
use tracing::debug;

use crate::error::ExportError;
use crate::options::ExportOptions;

fn header(options: &ExportOptions) -> Vec<&'static str> {
    let mut cols = vec!["Time (Local)", "Lunar_Station"];
    if options.include_longitude {
        cols.push("Ecliptic_Longitude");
    }
    if options.include_latitude {
        cols.push("Ecliptic_Latitude");
    }
    if options.include_description {
        cols.push("Description");
    }
    cols
}

/// Write one row per event: local time, station label, then the selected
/// optional columns. Angles carry two decimals.
pub fn write_csv<W: Write>(
    writer: W,
    events: &[CrossingEvent],
    table: &StationTable,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(options))?;

    for e in events {
        let mut row = vec![options.local_time(e.utc), e.station.label()];
        if options.include_longitude {
            row.push(format!("{:.2}", e.longitude_deg));
        }
        if options.include_latitude {
            row.push(format!("{:.2}", e.latitude_deg));
        }
        if options.include_description {
            row.push(table.description(e.station).to_string());
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    debug!(rows = events.len(), "csv written");
    Ok(())
}
