//! iCalendar (RFC 5545) export.
//!
//! One `VEVENT` per crossing, 30 minutes long from the crossing instant,
//! with an optional display alarm at its start. Times are written in UTC.
//! Lines end in CRLF and are folded at 75 octets.

use std::io::Write;

use chrono::{DateTime, TimeDelta, Utc};
use manzil_search::CrossingEvent;
use manzil_stations::StationTable;
use tracing::debug;

use crate::error::ExportError;
use crate::options::ExportOptions;

const PRODID: &str = "-//manzil//Lunar Station Calculator//EN";
const EVENT_MINUTES: i64 = 30;
const FOLD_OCTETS: usize = 75;

fn ics_time(t: DateTime<Utc>) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Split a content line into CRLF-terminated segments of at most 75 octets,
/// continuation segments starting with a single space. Never splits a
/// UTF-8 sequence.
fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / FOLD_OCTETS * 3 + 2);
    let mut used = 0;
    for c in line.chars() {
        let w = c.len_utf8();
        if used + w > FOLD_OCTETS {
            out.push_str("\r\n ");
            used = 1;
        }
        out.push(c);
        used += w;
    }
    out.push_str("\r\n");
    out
}

fn description(event: &CrossingEvent, table: &StationTable, options: &ExportOptions) -> String {
    let mut lines = vec![format!("Lunar Station {}", event.station)];
    if options.include_longitude {
        lines.push(format!("Ecliptic Longitude: {:.2}°", event.longitude_deg));
    }
    if options.include_latitude {
        lines.push(format!("Ecliptic Latitude: {:.2}°", event.latitude_deg));
    }
    if options.include_description {
        let name = table.description(event.station);
        if !name.is_empty() {
            lines.push(name.to_string());
        }
    }
    lines.join("\n")
}

fn calendar_lines(
    events: &[CrossingEvent],
    table: &StationTable,
    options: &ExportOptions,
) -> Vec<String> {
    let stamp = ics_time(options.generated_at);
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        format!("PRODID:{PRODID}"),
        "VERSION:2.0".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for e in events {
        let start = ics_time(e.utc);
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{start}-{}@manzil", e.station.get()));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("DTSTART:{start}"));
        lines.push(format!(
            "DTEND:{}",
            ics_time(e.utc + TimeDelta::minutes(EVENT_MINUTES))
        ));
        lines.push(format!("SUMMARY:{}", escape_text(&format!("Lunar Station {}", e.station))));
        lines.push(format!(
            "DESCRIPTION:{}",
            escape_text(&description(e, table, options))
        ));
        if options.include_alerts {
            lines.push("BEGIN:VALARM".to_string());
            lines.push("ACTION:DISPLAY".to_string());
            lines.push(format!(
                "DESCRIPTION:{}",
                escape_text(&format!("Lunar Station {} active now", e.station))
            ));
            lines.push("TRIGGER:PT0S".to_string());
            lines.push("END:VALARM".to_string());
        }
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines
}

/// Write a calendar with one entry per event, in the given order.
pub fn write_ics<W: Write>(
    mut writer: W,
    events: &[CrossingEvent],
    table: &StationTable,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    for line in calendar_lines(events, table, options) {
        writer.write_all(fold_line(&line).as_bytes())?;
    }
    writer.flush()?;
    debug!(events = events.len(), alerts = options.include_alerts, "calendar written");
    Ok(())
}
