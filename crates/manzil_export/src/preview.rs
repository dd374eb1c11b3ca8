//! Plain-text results table for the terminal.

use std::fmt;

use chrono_tz::Tz;
use manzil_search::CrossingEvent;
use manzil_stations::{StationId, StationTable};

use crate::options::LOCAL_TIME_FORMAT;

/// One preview line.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub time: String,
    pub station: StationId,
    pub longitude: String,
    pub name: String,
}

/// Render events as preview rows in local time.
pub fn preview_rows(events: &[CrossingEvent], table: &StationTable, tz: Tz) -> Vec<PreviewRow> {
    events
        .iter()
        .map(|e| PreviewRow {
            time: e.utc.with_timezone(&tz).format(LOCAL_TIME_FORMAT).to_string(),
            station: e.station,
            longitude: format!("{:.2}°", e.longitude_deg),
            name: table.description(e.station).to_string(),
        })
        .collect()
}

/// Column-aligned table of preview rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTable {
    pub rows: Vec<PreviewRow>,
}

impl PreviewTable {
    pub fn new(rows: Vec<PreviewRow>) -> Self {
        Self { rows }
    }
}

const HEADERS: [&str; 4] = ["Time", "Station", "Ecliptic Longitude", "Name"];

impl fmt::Display for PreviewTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|r| {
                [
                    r.time.clone(),
                    r.station.label(),
                    r.longitude.clone(),
                    r.name.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (w, c) in widths.iter_mut().zip(row) {
                *w = (*w).max(c.chars().count());
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, cols: [&str; 4]| -> fmt::Result {
            let mut out = String::new();
            for (i, (c, w)) in cols.iter().zip(widths).enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                out.push_str(c);
                let pad = w - c.chars().count();
                out.extend(std::iter::repeat_n(' ', pad));
            }
            writeln!(f, "{}", out.trim_end())
        };

        line(f, HEADERS)?;
        let rule = widths.map(|w| "-".repeat(w));
        line(f, [&rule[0], &rule[1], &rule[2], &rule[3]])?;
        for row in &cells {
            line(f, [&row[0], &row[1], &row[2], &row[3]])?;
        }
        Ok(())
    }
}
